//! Configuration surface passed to [`create`](crate::create).
//!
//! # Design Decisions
//! - Every knob has a working default: `ServerOptions::default()` gives a
//!   dual-listener server with body parsing enabled and a self-signed
//!   certificate for `localhost`.
//! - Optional features are tagged enums (`BodyParser`, `TlsOptions`), not
//!   bags of `Option` fields checked at use sites.

pub mod schema;

pub use schema::{BodyParser, BodyParserConfig, CertificateOptions, ServerOptions, TlsOptions};
