// Cross-origin headers
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Headers attached to every proxy response, errors and preflights included.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    pub allow_origin: HeaderValue,
    pub allow_methods: HeaderValue,
    pub allow_headers: HeaderValue,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self {
            allow_origin: HeaderValue::from_static("*"),
            allow_methods: HeaderValue::from_static("GET, OPTIONS"),
            allow_headers: HeaderValue::from_static("Content-Type"),
        }
    }
}

impl CorsPolicy {
    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            self.allow_origin.clone(),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            self.allow_methods.clone(),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            self.allow_headers.clone(),
        );
    }
}

/// Answers OPTIONS with an empty 200 before any handler runs (the key is
/// not consulted for preflights), and stamps CORS headers on everything else.
pub async fn cors_middleware(
    State(policy): State<Arc<CorsPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::OK.into_response();
        policy.apply(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    policy.apply(response.headers_mut());
    response
}
