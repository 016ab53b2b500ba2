//! Error taxonomy for server construction and lifecycle operations.

use thiserror::Error;

/// Errors surfaced by [`create`](crate::create), [`TestServer::start`] and
/// [`TestServer::stop`].
///
/// No retries happen anywhere in this crate; every failure propagates
/// immediately to the caller.
///
/// [`TestServer::start`]: crate::TestServer::start
/// [`TestServer::stop`]: crate::TestServer::stop
#[derive(Debug, Error)]
pub enum ServerError {
    /// Self-signed certificate material could not be generated.
    #[error("failed to generate certificate material: {0}")]
    Certificate(#[from] rcgen::Error),

    /// The generated PEM could not be turned into a rustls server config.
    #[error("failed to build TLS config: {0}")]
    Tls(std::io::Error),

    /// A listener failed to bind to an ephemeral port.
    #[error("failed to bind listener: {0}")]
    Bind(std::io::Error),

    /// A serve task reported an I/O error when asked to close.
    #[error("listener failed to close cleanly: {0}")]
    Close(std::io::Error),

    /// A serve task panicked or was aborted out from under us.
    #[error("listener task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// `start` was called while the listeners are still bound.
    #[error("server is already running")]
    AlreadyRunning,

    /// `stop` was called while the listeners are not bound.
    #[error("server is not running")]
    NotRunning,
}

/// Result type for server lifecycle operations.
pub type ServerResult<T> = Result<T, ServerError>;
