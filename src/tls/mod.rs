//! Certificate collaborator for the encrypted listener.
//!
//! # Data Flow
//! ```text
//! CertificateOptions
//!     → self_signed.rs (rcgen: throwaway CA, leaf signed by it)
//!     → CertificateMaterial (PEM private key, leaf, CA trust anchor)
//!     → rustls server config for the encrypted listener
//! ```
//!
//! # Design Decisions
//! - Material is generated once at construction and reused across
//!   restarts; the CA a caller trusted stays valid after `stop`/`start`.
//! - The leaf always covers `localhost` and `127.0.0.1` so the derived
//!   `https://localhost:<port>` URL validates out of the box.

pub mod self_signed;

pub use self_signed::CertificateMaterial;
