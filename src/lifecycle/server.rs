//! The server handle returned to callers.

use axum::handler::Handler;
use axum::routing::{self, MethodRouter};
use axum::{middleware, Router};
use axum_server::tls_rustls::RustlsConfig;
use tower_http::trace::TraceLayer;

use crate::config::{BodyParser, ServerOptions, TlsOptions};
use crate::error::{ServerError, ServerResult};
use crate::http::dispatch::SharedRouter;
use crate::http::middleware::body::parse_request_body;
use crate::http::middleware::headers::strip_entity_tags;
use crate::lifecycle::endpoint::Endpoint;
use crate::tls::CertificateMaterial;

/// Certificate enablement, fixed at construction.
enum TlsState {
    Disabled,
    Enabled {
        material: CertificateMaterial,
        rustls: RustlsConfig,
    },
}

/// An ephemeral HTTP/HTTPS server pair for tests.
///
/// Returned by [`create`] already started: both listeners bound to
/// OS-assigned ports, URLs derived, handlers registrable at any time.
/// `stop` releases both listeners and clears the port/URL state; `start`
/// rebinds on fresh ports with the same routes and certificate.
pub struct TestServer {
    routes: SharedRouter,
    body_parser: BodyParser,
    tls: TlsState,
    plain: Option<Endpoint>,
    secure: Option<Endpoint>,
}

/// Stand up a started [`TestServer`] from the given options.
pub async fn create(options: ServerOptions) -> ServerResult<TestServer> {
    TestServer::create(options).await
}

impl TestServer {
    /// See [`create`].
    pub async fn create(options: ServerOptions) -> ServerResult<Self> {
        let tls = match options.certificate {
            TlsOptions::Disabled => TlsState::Disabled,
            TlsOptions::SelfSigned(descriptor) => {
                let material = CertificateMaterial::generate(&descriptor)?;
                let rustls = material.rustls_config().await.map_err(ServerError::Tls)?;
                TlsState::Enabled { material, rustls }
            }
        };

        let mut server = Self {
            routes: SharedRouter::new(),
            body_parser: options.body_parser,
            tls,
            plain: None,
            secure: None,
        };
        server.start().await?;
        Ok(server)
    }

    /// Bind both listeners on fresh ephemeral ports.
    ///
    /// The two binds run concurrently; this resolves once both have
    /// completed. If one bind fails the succeeding side is shut down
    /// before the error is returned.
    pub async fn start(&mut self) -> ServerResult<()> {
        if self.plain.is_some() || self.secure.is_some() {
            return Err(ServerError::AlreadyRunning);
        }

        let app = self.make_app();
        match &self.tls {
            TlsState::Disabled => {
                self.plain = Some(Endpoint::bind_plain(app).await?);
            }
            TlsState::Enabled { rustls, .. } => {
                let (plain, secure) = tokio::join!(
                    Endpoint::bind_plain(app.clone()),
                    Endpoint::bind_secure(app, rustls.clone()),
                );
                match (plain, secure) {
                    (Ok(plain), Ok(secure)) => {
                        self.plain = Some(plain);
                        self.secure = Some(secure);
                    }
                    (Ok(mut plain), Err(err)) => {
                        let _ = plain.shutdown().await;
                        return Err(err);
                    }
                    (Err(err), Ok(mut secure)) => {
                        let _ = secure.shutdown().await;
                        return Err(err);
                    }
                    (Err(err), Err(_)) => return Err(err),
                }
            }
        }

        tracing::info!(
            plain_port = ?self.plain_port(),
            secure_port = ?self.secure_port(),
            "test server started"
        );
        Ok(())
    }

    /// Close both listeners and clear their port/URL state.
    ///
    /// The closes run concurrently; this resolves once both have
    /// completed. A listener whose close fails keeps its state populated,
    /// since it never confirmed closure.
    pub async fn stop(&mut self) -> ServerResult<()> {
        if self.plain.is_none() && self.secure.is_none() {
            return Err(ServerError::NotRunning);
        }

        let mut plain = self.plain.take();
        let mut secure = self.secure.take();
        let (plain_result, secure_result) = tokio::join!(
            async {
                match plain.as_mut() {
                    Some(endpoint) => endpoint.shutdown().await,
                    None => Ok(()),
                }
            },
            async {
                match secure.as_mut() {
                    Some(endpoint) => endpoint.shutdown().await,
                    None => Ok(()),
                }
            },
        );

        if plain_result.is_err() {
            self.plain = plain;
        }
        if secure_result.is_err() {
            self.secure = secure;
        }
        plain_result?;
        secure_result?;

        tracing::info!("test server stopped");
        Ok(())
    }

    /// Port of the plain listener, while bound.
    pub fn plain_port(&self) -> Option<u16> {
        self.plain.as_ref().map(|endpoint| endpoint.port())
    }

    /// `http://localhost:<port>`, while the plain listener is bound.
    pub fn plain_url(&self) -> Option<&str> {
        self.plain.as_ref().map(|endpoint| endpoint.url())
    }

    /// Port of the encrypted listener, while bound.
    pub fn secure_port(&self) -> Option<u16> {
        self.secure.as_ref().map(|endpoint| endpoint.port())
    }

    /// `https://localhost:<port>`, while the encrypted listener is bound.
    pub fn secure_url(&self) -> Option<&str> {
        self.secure.as_ref().map(|endpoint| endpoint.url())
    }

    /// PEM trust anchor for the encrypted listener, if TLS is enabled.
    ///
    /// Stable across restarts: material is generated once at construction.
    pub fn ca_certificate(&self) -> Option<&str> {
        self.certificate_material()
            .map(|material| material.ca_certificate.as_str())
    }

    /// Full generated certificate material, if TLS is enabled.
    pub fn certificate_material(&self) -> Option<&CertificateMaterial> {
        match &self.tls {
            TlsState::Enabled { material, .. } => Some(material),
            TlsState::Disabled => None,
        }
    }

    /// Register a handler (closure or [`Reply`](crate::Reply) literal) for
    /// `GET` requests on `path`. Applies to traffic on both listeners.
    pub fn get<H, T>(&self, path: &str, handler: H)
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.route(path, routing::get(handler));
    }

    /// Register a handler for `POST` requests on `path`.
    pub fn post<H, T>(&self, path: &str, handler: H)
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.route(path, routing::post(handler));
    }

    /// Register a handler for `PUT` requests on `path`.
    pub fn put<H, T>(&self, path: &str, handler: H)
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.route(path, routing::put(handler));
    }

    /// Register a handler for `DELETE` requests on `path`.
    pub fn delete<H, T>(&self, path: &str, handler: H)
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.route(path, routing::delete(handler));
    }

    /// Register a handler for `PATCH` requests on `path`.
    pub fn patch<H, T>(&self, path: &str, handler: H)
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.route(path, routing::patch(handler));
    }

    /// Register a handler for `HEAD` requests on `path`.
    pub fn head<H, T>(&self, path: &str, handler: H)
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.route(path, routing::head(handler));
    }

    /// Register a handler for `OPTIONS` requests on `path`.
    pub fn options<H, T>(&self, path: &str, handler: H)
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.route(path, routing::options(handler));
    }

    /// Register a prebuilt method router, for multi-method routes or
    /// per-route middleware stacks.
    pub fn route(&self, path: &str, method_router: MethodRouter) {
        let path = path.to_string();
        self.routes
            .modify(move |router| router.route(&path, method_router));
    }

    /// The app served by both listeners: shared routes behind the
    /// middleware stack fixed at construction.
    fn make_app(&self) -> Router {
        let mut app = Router::new().fallback_service(self.routes.clone());
        if let BodyParser::Enabled(config) = &self.body_parser {
            app = app.layer(middleware::from_fn_with_state(
                config.clone(),
                parse_request_body,
            ));
        }
        app.layer(middleware::map_response(strip_entity_tags))
            .layer(TraceLayer::new_for_http())
    }
}
