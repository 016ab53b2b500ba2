//! Ephemeral HTTP/HTTPS server pairs for integration tests.
//!
//! # Architecture Overview
//!
//! ```text
//!                  create(options)
//!                        │
//!          ┌─────────────┼──────────────┐
//!          ▼             ▼              ▼
//!     ┌────────┐    ┌─────────┐   ┌──────────┐
//!     │ config │    │   tls   │   │   http   │
//!     │ schema │    │ rcgen CA│   │ dispatch │
//!     └────────┘    └────┬────┘   └────┬─────┘
//!                        │             │ shared router + middleware
//!                        ▼             ▼
//!                   ┌──────────────────────┐
//!                   │      lifecycle       │
//!                   │  TestServer (start / │
//!                   │  stop, dual Endpoint)│
//!                   └──────────┬───────────┘
//!               ┌──────────────┴──────────────┐
//!               ▼                             ▼
//!     http://localhost:<port>      https://localhost:<port>
//! ```
//!
//! The crate is glue: axum routes and dispatches, axum-server binds and
//! terminates TLS, rcgen mints the throwaway certificate authority. What
//! this crate owns is the dual-listener lifecycle: coordinated start and
//! stop of the plain and encrypted endpoints on fresh ephemeral ports, with
//! the derived port/URL state kept honest across restarts.
//!
//! # Example
//!
//! ```no_run
//! use create_test_server::{create, Reply, ServerOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), create_test_server::ServerError> {
//!     let mut server = create(ServerOptions::default()).await?;
//!     server.get("/foo", Reply::text("bar"));
//!
//!     let url = server.plain_url().expect("server is running").to_owned();
//!     // ... point the code under test at `url` ...
//!
//!     server.stop().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod tls;

pub use config::{BodyParser, BodyParserConfig, CertificateOptions, ServerOptions, TlsOptions};
pub use error::{ServerError, ServerResult};
pub use http::dispatch::Reply;
pub use http::middleware::body::ParsedBody;
pub use lifecycle::server::{create, TestServer};
pub use tls::CertificateMaterial;
