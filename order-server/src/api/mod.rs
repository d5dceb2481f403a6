//! API routes
//!
//! - [`health`] - health check
//! - [`orders`] - order endpoints
//! - [`middleware`] - error bodies and security headers

pub mod extract;
pub mod health;
pub mod middleware;
pub mod orders;

use axum::Router;
use http::{HeaderName, HeaderValue, Method, Uri};
use shared::error::AppError;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::Config;
use crate::state::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID generator (UUID v4)
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(orders::router())
        .merge(health::router())
}

/// Build the fully configured application: routes under the configured
/// prefix, middleware and state
pub fn build_app(state: AppState, config: &Config) -> Router {
    let prefix = config.route_prefix();
    let routes = if prefix.is_empty() {
        build_router()
    } else {
        Router::new().nest(&prefix, build_router())
    };

    let routes = routes
        .fallback(route_not_found)
        // Error body - adds request path and method to every failure
        .layer(axum::middleware::from_fn(middleware::error_body));

    middleware::with_security_headers(routes)
        // CORS - Handle cross-origin requests
        .layer(cors_layer(&config.cors_origin))
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .with_state(state)
}

async fn route_not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("Route {}", uri.path()))
}

/// `*` allows any origin, otherwise a single origin
fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);
    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            tracing::warn!(origin, "Invalid CORS_ORIGIN, allowing any origin");
            layer.allow_origin(Any)
        }
    }
}
