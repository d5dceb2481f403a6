//! Response middleware
//!
//! - [`error_body`] - request-aware JSON body for every failed request
//! - [`with_security_headers`] - hardening headers on every response

use axum::Json;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::header::{self, HeaderName, HeaderValue};
use shared::error::{AppError, ErrorResponse};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::state::AppState;

/// Headers set on every response unless a handler already set them
const SECURITY_HEADERS: [(&str, &str); 5] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "SAMEORIGIN"),
    ("referrer-policy", "no-referrer"),
    ("x-dns-prefetch-control", "off"),
    ("strict-transport-security", "max-age=15552000; includeSubDomains"),
];

/// Log failed requests and give them the JSON error body with `path` and `method`
///
/// Responses produced from an [`AppError`] are rebuilt from it. Other error
/// responses without a JSON body (405 from the router, for instance) get a
/// body with their own status.
pub async fn error_body(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    if status.is_server_error() {
        tracing::error!(method = %method, uri = %uri, status = status.as_u16(), "Request failed");
    } else {
        tracing::warn!(method = %method, uri = %uri, status = status.as_u16(), "Request failed");
    }

    let body = match response.extensions().get::<AppError>() {
        Some(err) => ErrorResponse::from_error(err),
        None if is_json(&response) => return response,
        None => {
            let reason = status.canonical_reason().unwrap_or("Error");
            let mut body = ErrorResponse::from_error(&AppError::invalid_request(reason));
            body.status_code = status.as_u16();
            body.error = reason.to_string();
            body
        }
    };
    let body = body.for_request(&method, &uri);

    let (parts, _) = response.into_parts();
    let mut rebuilt = (parts.status, Json(body)).into_response();
    *rebuilt.extensions_mut() = parts.extensions;
    rebuilt
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

pub fn with_security_headers(
    router: axum::Router<AppState>,
) -> axum::Router<AppState> {
    SECURITY_HEADERS
        .into_iter()
        .fold(router, |router, (name, value)| {
            router.layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            ))
        })
}
