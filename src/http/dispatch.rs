//! Shared router and the literal-reply handler.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};
use std::task::{Context, Poll};

use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde::Serialize;
use tower::Service;

/// An axum router behind a lock, callable as a service.
///
/// Each request dispatches against a snapshot of the router taken at call
/// time, so routes registered after the listeners are bound (the normal
/// pattern in tests) are visible to traffic on both listeners immediately.
#[derive(Clone, Default)]
pub struct SharedRouter {
    inner: Arc<RwLock<Router>>,
}

impl SharedRouter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Apply a router transformation under the write lock.
    ///
    /// Panics if the same path/method pair is registered twice, which is
    /// axum's own behavior for overlapping routes.
    pub(crate) fn modify(&self, f: impl FnOnce(Router) -> Router) {
        let mut guard = self.inner.write().expect("router lock poisoned");
        let router = std::mem::take(&mut *guard);
        *guard = f(router);
    }

    fn snapshot(&self) -> Router {
        self.inner.read().expect("router lock poisoned").clone()
    }
}

impl Service<Request> for SharedRouter {
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let mut router = self.snapshot();
        Box::pin(async move { router.call(request).await })
    }
}

/// A canned response registered in place of a handler closure.
///
/// `Reply` implements axum's `Handler`, so the registration methods accept
/// it anywhere a closure is accepted:
///
/// ```no_run
/// # async fn example(server: create_test_server::TestServer) {
/// server.get("/foo", create_test_server::Reply::text("bar"));
/// server.get("/bar", || async { "computed" });
/// # }
/// ```
#[derive(Debug, Clone)]
pub enum Reply {
    /// Plain-text body, `text/plain` content type.
    Text(String),

    /// JSON body, `application/json` content type.
    Json(serde_json::Value),

    /// Raw bytes, `application/octet-stream` content type.
    Bytes(Vec<u8>),

    /// Empty body with the given status.
    Status(StatusCode),
}

impl Reply {
    /// Plain-text literal.
    pub fn text(body: impl Into<String>) -> Self {
        Reply::Text(body.into())
    }

    /// Raw-bytes literal.
    pub fn bytes(body: impl Into<Vec<u8>>) -> Self {
        Reply::Bytes(body.into())
    }

    /// Status-only literal.
    pub fn status(status: StatusCode) -> Self {
        Reply::Status(status)
    }

    /// JSON literal from any serializable value.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Reply::Json(serde_json::to_value(value)?))
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Text(body) => body.into_response(),
            Reply::Json(value) => Json(value).into_response(),
            Reply::Bytes(body) => body.into_response(),
            Reply::Status(status) => status.into_response(),
        }
    }
}

impl From<&str> for Reply {
    fn from(body: &str) -> Self {
        Reply::Text(body.to_string())
    }
}

impl From<String> for Reply {
    fn from(body: String) -> Self {
        Reply::Text(body)
    }
}

impl From<serde_json::Value> for Reply {
    fn from(value: serde_json::Value) -> Self {
        Reply::Json(value)
    }
}

impl From<Vec<u8>> for Reply {
    fn from(body: Vec<u8>) -> Self {
        Reply::Bytes(body)
    }
}

impl From<StatusCode> for Reply {
    fn from(status: StatusCode) -> Self {
        Reply::Status(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::header::CONTENT_TYPE;
    use serde_json::json;

    #[tokio::test]
    async fn text_reply_encodes_verbatim() {
        let response = Reply::text("bar").into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"bar");
    }

    #[tokio::test]
    async fn json_reply_sets_content_type() {
        let response = Reply::from(json!({ "foo": "bar" })).into_response();
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], br#"{"foo":"bar"}"#);
    }

    #[test]
    fn status_reply_carries_status() {
        let response = Reply::status(StatusCode::NO_CONTENT).into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn snapshot_sees_later_registrations() {
        let shared = SharedRouter::new();
        let mut service = shared.clone();

        let request = || Request::builder().uri("/foo").body(Body::empty()).unwrap();
        let response = service.call(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        shared.modify(|router| router.route("/foo", axum::routing::get(Reply::text("bar"))));

        let response = service.call(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
