//! A single bound listener and its serve task.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::error::{ServerError, ServerResult};

/// URL scheme served by an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scheme {
    Http,
    Https,
}

impl Scheme {
    fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// One listener bound to an ephemeral port, serving the shared router.
///
/// Port and URL live inside the endpoint, so "URL is defined" and
/// "listener is bound" cannot drift apart: while the `Endpoint` exists the
/// pair is populated, and dropping it on close resets both at once.
pub(crate) struct Endpoint {
    scheme: Scheme,
    port: u16,
    url: String,
    handle: Handle,
    task: Option<JoinHandle<io::Result<()>>>,
}

impl Endpoint {
    /// Bind a plain HTTP listener on a fresh ephemeral port.
    pub(crate) async fn bind_plain(app: Router) -> ServerResult<Self> {
        let (listener, port) = Self::allocate().await?;
        let handle = Handle::new();
        let task = tokio::spawn(
            axum_server::from_tcp(listener)
                .handle(handle.clone())
                .serve(app.into_make_service()),
        );
        Ok(Self::bound(Scheme::Http, port, handle, task))
    }

    /// Bind an encrypted listener on a fresh ephemeral port.
    pub(crate) async fn bind_secure(app: Router, tls: RustlsConfig) -> ServerResult<Self> {
        let (listener, port) = Self::allocate().await?;
        let handle = Handle::new();
        let task = tokio::spawn(
            axum_server::from_tcp_rustls(listener, tls)
                .handle(handle.clone())
                .serve(app.into_make_service()),
        );
        Ok(Self::bound(Scheme::Https, port, handle, task))
    }

    /// Ask the OS for a free ephemeral port. Deliberately never reuses the
    /// port from a previous start.
    async fn allocate() -> ServerResult<(std::net::TcpListener, u16)> {
        let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
            .await
            .map_err(ServerError::Bind)?;
        let port = listener.local_addr().map_err(ServerError::Bind)?.port();
        let listener = listener.into_std().map_err(ServerError::Bind)?;
        Ok((listener, port))
    }

    fn bound(scheme: Scheme, port: u16, handle: Handle, task: JoinHandle<io::Result<()>>) -> Self {
        let url = format!("{}://localhost:{}", scheme.as_str(), port);
        tracing::debug!(scheme = scheme.as_str(), port, "listener bound");
        Self {
            scheme,
            port,
            url,
            handle,
            task: Some(task),
        }
    }

    /// Signal the listener to close and wait for its serve task to finish.
    pub(crate) async fn shutdown(&mut self) -> ServerResult<()> {
        self.handle.shutdown();

        // Joined at most once; a repeat shutdown after a reported failure
        // has nothing left to wait for.
        let Some(task) = self.task.take() else {
            return Ok(());
        };

        match task.await {
            Ok(Ok(())) => {
                tracing::debug!(scheme = self.scheme.as_str(), port = self.port, "listener closed");
                Ok(())
            }
            Ok(Err(err)) => Err(ServerError::Close(err)),
            Err(err) => Err(ServerError::Task(err)),
        }
    }

    pub(crate) fn port(&self) -> u16 {
        self.port
    }

    pub(crate) fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for Endpoint {
    fn drop(&mut self) {
        // Best-effort release when a running server is discarded without
        // an explicit stop.
        self.handle.shutdown();
    }
}
