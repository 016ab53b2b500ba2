//! Response header adjustments.

use axum::http::header;
use axum::response::Response;

/// Strip entity tags so repeated requests see byte-identical responses
/// instead of `304 Not Modified` negotiation.
pub async fn strip_entity_tags(mut response: Response) -> Response {
    response.headers_mut().remove(header::ETAG);
    response
}
