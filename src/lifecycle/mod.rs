//! Dual-listener lifecycle management.
//!
//! # Data Flow
//! ```text
//! create (server.rs):
//!     Generate certificate → build shared router + middleware → start
//!
//! start (server.rs + endpoint.rs):
//!     Bind plain and encrypted endpoints concurrently on port 0
//!     → derive http://localhost:<port> / https://localhost:<port>
//!
//! stop (server.rs + endpoint.rs):
//!     Signal both handles → join serve tasks → reset port/url state
//! ```
//!
//! # Design Decisions
//! - Every start binds fresh ephemeral ports; a stop/start cycle observing
//!   a new port proves the old listener was actually released.
//! - If one of the two concurrent binds fails, the side that succeeded is
//!   shut down before the error is returned; no half-started pair escapes.
//! - A listener that does not confirm closure keeps its port/url state.

pub mod endpoint;
pub mod server;

pub use server::{create, TestServer};
