use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::PurgeError;

/// Logs the error and answers it as plain text.
pub fn show_error(msg: &str, code: StatusCode) -> Response {
    tracing::warn!("http reporting error {}/{}", code.as_u16(), msg);
    (
        code,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        ],
        format!("{}\n", msg),
    )
        .into_response()
}

/// JSON response with caching disabled.
///
/// Serialization failures are logged and leave the body empty; the caller
/// never sees them.
pub fn must_encode<T: Serialize + ?Sized>(payload: &T) -> Response {
    let body = match serde_json::to_vec(payload) {
        Ok(mut bytes) => {
            bytes.push(b'\n');
            Body::from(bytes)
        }
        Err(e) => {
            let e = PurgeError::from(e);
            tracing::warn!("http must_encode error: {}", e);
            Body::empty()
        }
    };

    let mut response = Response::new(body);
    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
