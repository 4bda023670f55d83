//! Admin authentication: a shared bearer token on every route that changes content
//! or exposes admin operations. Reads of the public collections stay open.

use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::{Request, State};
use axum::http::{header, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::warn;

fn needs_admin(method: &Method, path: &str) -> bool {
    if path.starts_with("/api/admin/") {
        return true;
    }
    path.starts_with("/api/collections/") && method != Method::GET && method != Method::HEAD
}

fn bearer(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

// Length is not secret; the bytes are compared without an early exit.
fn tokens_match(expected: &str, given: &str) -> bool {
    expected.len() == given.len()
        && expected
            .bytes()
            .zip(given.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer")],
        Json(ApiResponse::err(message)),
    )
        .into_response()
}

pub async fn require_admin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !needs_admin(request.method(), request.uri().path()) {
        return next.run(request).await;
    }
    let Some(expected) = state.admin_token.as_deref() else {
        warn!(path = %request.uri().path(), "admin request refused: ADMIN_TOKEN is not configured");
        return unauthorized("Admin access is disabled: ADMIN_TOKEN is not configured");
    };
    match bearer(&request).map(|given| tokens_match(expected, given)) {
        Some(true) => next.run(request).await,
        Some(false) => unauthorized("Invalid admin token"),
        None => unauthorized("Missing admin token (Authorization: Bearer <token>)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_writes_and_admin_routes_need_the_token() {
        assert!(!needs_admin(&Method::GET, "/health"));
        assert!(!needs_admin(&Method::GET, "/api/collections/cats"));
        assert!(needs_admin(&Method::PUT, "/api/collections/cats"));
        assert!(needs_admin(&Method::DELETE, "/api/collections/cats/records/1"));
        assert!(needs_admin(&Method::GET, "/api/admin/export"));
    }

    #[test]
    fn token_comparison() {
        assert!(tokens_match("s3cret", "s3cret"));
        assert!(!tokens_match("s3cret", "s3cres"));
        assert!(!tokens_match("s3cret", "s3cre"));
    }
}
