//! Content-type scoped request body decoding.
//!
//! Four decoders, each bound to one content type and one payload ceiling.
//! The decoded value lands in the request extensions as [`ParsedBody`]; the
//! buffered raw bytes are put back as the request body so axum extractors
//! keep working downstream.

use std::collections::HashMap;

use axum::body::{to_bytes, Body, Bytes};
use axum::extract::{Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::config::BodyParserConfig;

/// A request body decoded by the body middleware.
///
/// Handlers observe it through `axum::Extension<ParsedBody>`. Requests
/// whose content type matches no decoder (or servers created with
/// `BodyParser::Disabled`) carry no extension.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedBody {
    /// `application/json`.
    Json(serde_json::Value),

    /// `text/plain`.
    Text(String),

    /// `application/x-www-form-urlencoded`.
    Form(HashMap<String, String>),

    /// `application/octet-stream`.
    Raw(Bytes),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decoder {
    Json,
    Text,
    Form,
    Raw,
}

impl Decoder {
    fn limit(self, config: &BodyParserConfig) -> usize {
        let per_decoder = match self {
            Decoder::Json => config.json_limit,
            Decoder::Text => config.text_limit,
            Decoder::Form => config.form_limit,
            Decoder::Raw => config.raw_limit,
        };
        per_decoder.unwrap_or(config.limit)
    }

    fn decode(self, bytes: &Bytes) -> Result<ParsedBody, Response> {
        match self {
            Decoder::Json => serde_json::from_slice(bytes)
                .map(ParsedBody::Json)
                .map_err(|err| {
                    (StatusCode::BAD_REQUEST, format!("invalid JSON body: {err}")).into_response()
                }),
            Decoder::Text => std::str::from_utf8(bytes)
                .map(|text| ParsedBody::Text(text.to_string()))
                .map_err(|err| {
                    (StatusCode::BAD_REQUEST, format!("invalid UTF-8 body: {err}")).into_response()
                }),
            Decoder::Form => Ok(ParsedBody::Form(
                url::form_urlencoded::parse(bytes).into_owned().collect(),
            )),
            Decoder::Raw => Ok(ParsedBody::Raw(bytes.clone())),
        }
    }
}

/// Select the decoder for a request, if any, from the content-type essence.
fn decoder_for(headers: &HeaderMap) -> Option<Decoder> {
    let content_type = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    let essence = content_type.split(';').next()?.trim().to_ascii_lowercase();
    match essence.as_str() {
        "application/json" => Some(Decoder::Json),
        "text/plain" => Some(Decoder::Text),
        "application/x-www-form-urlencoded" => Some(Decoder::Form),
        "application/octet-stream" => Some(Decoder::Raw),
        _ => None,
    }
}

/// Middleware entry point, installed with `from_fn_with_state` when body
/// parsing is enabled.
pub async fn parse_request_body(
    State(config): State<BodyParserConfig>,
    request: Request,
    next: Next,
) -> Response {
    let Some(decoder) = decoder_for(request.headers()) else {
        return next.run(request).await;
    };

    let limit = decoder.limit(&config);
    let (parts, body) = request.into_parts();

    // `to_bytes` enforces the ceiling while buffering.
    let bytes = match to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(_) => return StatusCode::PAYLOAD_TOO_LARGE.into_response(),
    };

    let parsed = match decoder.decode(&bytes) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };

    let mut request = Request::from_parts(parts, Body::from(bytes));
    request.extensions_mut().insert(parsed);
    next.run(request).await
}
