//! The request-handling capability shared by both listeners.
//!
//! # Data Flow
//! ```text
//! Incoming request (either listener)
//!     → middleware/body.rs (content-type scoped decoding, payload ceiling)
//!     → dispatch.rs (per-request snapshot of the shared router)
//!     → registered handler (closure or Reply literal)
//!     → middleware/headers.rs (entity-tag suppression)
//! ```
//!
//! # Design Decisions
//! - Routing itself is axum's; this layer only makes the router shared and
//!   mutable so tests can register routes on a live server.
//! - Literal bodies are a tagged union (`Reply`) resolved at registration
//!   time, not argument-type sniffing at request time.

pub mod dispatch;
pub mod middleware;

pub use dispatch::{Reply, SharedRouter};
pub use middleware::body::ParsedBody;
