//! Admin gate middleware.
//!
//! Applies [`AccessGate::evaluate`] to every request passing through the
//! layer. Denied requests get a `303 See Other` to the login path and never
//! reach the inner service; no return-to location is kept.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::cookies::RequestCookies;
use crate::gate::{AccessGate, GateDecision};

/// Axum middleware that redirects unauthenticated admin requests.
///
/// Install with `axum::middleware::from_fn_with_state(gate, admin_gate_middleware)`.
pub async fn admin_gate_middleware(
    State(gate): State<AccessGate>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let cookies = RequestCookies::from_headers(req.headers());

    match gate.evaluate(req.uri().path(), &cookies) {
        GateDecision::Allowed => next.run(req).await,
        GateDecision::Denied(reason) => {
            tracing::debug!(
                path = %req.uri().path(),
                reason = %reason,
                redirect = %gate.login_path(),
                "Admin access denied"
            );
            Redirect::to(gate.login_path()).into_response()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GateConfig;
    use axum::{
        Router,
        http::{StatusCode, header::COOKIE, header::LOCATION},
        middleware,
        routing::get,
    };
    use tower::ServiceExt;

    fn app() -> Router {
        let gate = AccessGate::new(GateConfig::default()).unwrap();
        Router::new()
            .route("/", get(|| async { "home" }))
            .route("/admin", get(|| async { "dashboard" }))
            .route("/admin/jobs", get(|| async { "jobs" }))
            .route("/admin/login", get(|| async { "login" }))
            .layer(middleware::from_fn_with_state(gate, admin_gate_middleware))
    }

    fn request(path: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_redirects_without_marker() {
        let response = app().oneshot(request("/admin/jobs", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/admin/login");
    }

    #[tokio::test]
    async fn test_forwards_with_marker() {
        let response = app()
            .oneshot(request("/admin", Some("admin_auth=x")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_forwards_with_marker_beside_non_ascii_cookie() {
        let req = Request::builder()
            .uri("/admin/jobs")
            .header(
                COOKIE,
                axum::http::HeaderValue::from_bytes(b"admin_auth=x; name=Jos\xc3\xa9").unwrap(),
            )
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_and_public_paths_pass() {
        let response = app().oneshot(request("/admin/login", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app().oneshot(request("/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
