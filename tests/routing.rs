//! Dispatch wrapper ergonomics and request body decoding.

mod common;

use axum::extract::Request;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::middleware::{from_fn, Next};
use axum::response::{IntoResponse, Response};
use axum::{routing, Extension, Json};
use create_test_server::{create, ParsedBody, Reply, ServerOptions};
use serde_json::{json, Value};

#[tokio::test]
async fn literal_and_computed_bodies() {
    common::init_tracing();
    let server = create(ServerOptions::new().without_tls()).await.unwrap();

    server.get("/text", Reply::text("bar"));
    server.get("/json", Reply::from(json!({ "foo": "bar" })));
    server.get("/bytes", Reply::bytes(vec![1u8, 2, 3]));
    server.get("/status", Reply::status(StatusCode::NO_CONTENT));
    server.get("/computed", || async { "computed" });
    server.get("/computed-json", || async { Json(json!({ "n": 42 })) });

    let client = common::quick_client();
    let base = server.plain_url().unwrap().to_owned();

    let response = client.get(format!("{base}/text")).send().await.unwrap();
    assert_eq!(response.text().await.unwrap(), "bar");

    let response = client.get(format!("{base}/json")).send().await.unwrap();
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "foo": "bar" })
    );

    let response = client.get(format!("{base}/bytes")).send().await.unwrap();
    assert_eq!(&response.bytes().await.unwrap()[..], &[1u8, 2, 3]);

    let response = client.get(format!("{base}/status")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client.get(format!("{base}/computed")).send().await.unwrap();
    assert_eq!(response.text().await.unwrap(), "computed");

    let response = client
        .get(format!("{base}/computed-json"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.json::<Value>().await.unwrap(), json!({ "n": 42 }));
}

#[tokio::test]
async fn multiple_methods_on_one_path() {
    common::init_tracing();
    let server = create(ServerOptions::new().without_tls()).await.unwrap();

    server.route(
        "/multi",
        routing::get(Reply::text("from-get")).post(Reply::text("from-post")),
    );

    let client = common::quick_client();
    let base = server.plain_url().unwrap().to_owned();

    let body = client
        .get(format!("{base}/multi"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "from-get");

    let body = client
        .post(format!("{base}/multi"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "from-post");
}

async fn stamp_response(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert("x-stamp", "seen".parse().unwrap());
    response
}

#[tokio::test]
async fn per_route_middleware_composes() {
    common::init_tracing();
    let server = create(ServerOptions::new().without_tls()).await.unwrap();

    server.route(
        "/chained",
        routing::get(Reply::text("bar")).layer(from_fn(stamp_response)),
    );

    let client = common::quick_client();
    let response = client
        .get(format!("{}/chained", server.plain_url().unwrap()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()["x-stamp"], "seen");
    assert_eq!(response.text().await.unwrap(), "bar");
}

fn echo_parsed(body: ParsedBody) -> Response {
    match body {
        ParsedBody::Json(value) => Json(value).into_response(),
        ParsedBody::Text(text) => text.into_response(),
        ParsedBody::Form(form) => Json(json!(form)).into_response(),
        ParsedBody::Raw(bytes) => bytes.to_vec().into_response(),
    }
}

#[tokio::test]
async fn decodes_json_text_form_and_raw_bodies() {
    common::init_tracing();
    let server = create(ServerOptions::new().without_tls()).await.unwrap();
    server.post("/echo", |Extension(body): Extension<ParsedBody>| async move {
        echo_parsed(body)
    });

    let client = common::quick_client();
    let url = format!("{}/echo", server.plain_url().unwrap());

    let response = client
        .post(&url)
        .header(CONTENT_TYPE, "application/json")
        .body(r#"{"foo":"bar"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "foo": "bar" })
    );

    let response = client
        .post(&url)
        .header(CONTENT_TYPE, "text/plain")
        .body("foo")
        .send()
        .await
        .unwrap();
    assert_eq!(response.text().await.unwrap(), "foo");

    let response = client
        .post(&url)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body("foo=bar")
        .send()
        .await
        .unwrap();
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({ "foo": "bar" })
    );

    let payload = vec![0u8, 1, 2, 3];
    let response = client
        .post(&url)
        .header(CONTENT_TYPE, "application/octet-stream")
        .body(payload.clone())
        .send()
        .await
        .unwrap();
    assert_eq!(&response.bytes().await.unwrap()[..], &payload[..]);
}

#[tokio::test]
async fn malformed_json_is_rejected_before_the_handler() {
    common::init_tracing();
    let server = create(ServerOptions::new().without_tls()).await.unwrap();
    server.post("/echo", || async { "reached" });

    let client = common::quick_client();
    let response = client
        .post(format!("{}/echo", server.plain_url().unwrap()))
        .header(CONTENT_TYPE, "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn disabled_body_parser_leaves_body_unparsed() {
    common::init_tracing();
    let server = create(ServerOptions::new().without_tls().without_body_parser())
        .await
        .unwrap();

    server.post("/probe", |request: Request| async move {
        if request.extensions().get::<ParsedBody>().is_some() {
            "parsed"
        } else {
            "unparsed"
        }
    });
    server.post("/raw-len", |body: axum::body::Bytes| async move {
        body.len().to_string()
    });

    let client = common::quick_client();
    let base = server.plain_url().unwrap().to_owned();

    let body = client
        .post(format!("{base}/probe"))
        .header(CONTENT_TYPE, "application/json")
        .body(r#"{"foo":"bar"}"#)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "unparsed");

    // The raw body is still readable through ordinary extractors.
    let body = client
        .post(format!("{base}/raw-len"))
        .header(CONTENT_TYPE, "application/json")
        .body("12345")
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "5");
}

#[tokio::test]
async fn payload_ceiling_is_enforced() {
    common::init_tracing();
    let small = create(
        ServerOptions::new()
            .without_tls()
            .body_limit(100 * 1024),
    )
    .await
    .unwrap();
    let big = create(
        ServerOptions::new()
            .without_tls()
            .body_limit(200 * 1024),
    )
    .await
    .unwrap();

    small.post("/", || async { "reached" });
    big.post("/", |Extension(body): Extension<ParsedBody>| async move {
        match body {
            ParsedBody::Raw(bytes) => bytes.len().to_string().into_response(),
            _ => StatusCode::UNPROCESSABLE_ENTITY.into_response(),
        }
    });

    let payload = vec![0u8; 150 * 1024];
    let client = common::quick_client();

    // Over the ceiling: either a 413 response, or the connection is torn
    // down while the client is still uploading.
    match client
        .post(small.plain_url().unwrap())
        .header(CONTENT_TYPE, "application/octet-stream")
        .body(payload.clone())
        .send()
        .await
    {
        Ok(response) => assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE),
        Err(err) => assert!(err.is_request() || err.is_timeout()),
    }

    let body = client
        .post(big.plain_url().unwrap())
        .header(CONTENT_TYPE, "application/octet-stream")
        .body(payload.clone())
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, (150 * 1024).to_string());
}
