//! CORS for browser clients of the gated routes.
//!
//! Browsers send two credential headers here: `Authorization` for the principal and
//! `Visitor` for the visitor slot. Both must be listed or the preflight drops them and
//! every browser request looks anonymous to the no-throw gates.
//!
//! - development: any origin
//! - production: exact match against `CORS_ALLOWED_ORIGINS`; an empty list allows none
//!
//! Credentials mode (cookies) is never enabled; tokens travel in headers only.

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::{AppEnv, Config};
use crate::services::auth::extract::{AUTHORIZATION_HEADER, VISITOR_HEADER};

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(600);

pub fn apply(router: Router, config: &Config) -> Router {
    router.layer(layer(config.app_env, &config.cors_allowed_origins))
}

fn layer(app_env: AppEnv, allowed_origins: &[String]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allow_origin(app_env, allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(request_headers())
        .expose_headers([HeaderName::from_static("x-request-id")])
        .max_age(PREFLIGHT_MAX_AGE)
}

fn allow_origin(app_env: AppEnv, allowed_origins: &[String]) -> AllowOrigin {
    if !app_env.is_production() {
        return Any.into();
    }

    let allowed: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin.trim()).ok())
        .collect();
    AllowOrigin::predicate(move |origin: &HeaderValue, _| allowed.contains(origin))
}

fn request_headers() -> [HeaderName; 5] {
    [
        AUTHORIZATION_HEADER,
        VISITOR_HEADER,
        header::CONTENT_TYPE,
        header::ACCEPT,
        HeaderName::from_static("x-request-id"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,visitor")
            .body(Body::empty())
            .unwrap()
    }

    fn router(app_env: AppEnv, origins: &[&str]) -> Router {
        let origins: Vec<String> = origins.iter().map(|s| s.to_string()).collect();
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(layer(app_env, &origins))
    }

    #[tokio::test]
    async fn preflight_allows_both_credential_headers() {
        let res = router(AppEnv::Development, &[])
            .oneshot(preflight("http://localhost:5173"))
            .await
            .unwrap();

        let allowed = res.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS]
            .to_str()
            .unwrap()
            .to_ascii_lowercase();
        assert!(allowed.contains("authorization"));
        assert!(allowed.contains("visitor"));
        assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn production_only_echoes_listed_origins() {
        let app = router(AppEnv::Production, &["https://app.example.com"]);

        let listed = app
            .clone()
            .oneshot(preflight("https://app.example.com"))
            .await
            .unwrap();
        assert_eq!(
            listed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://app.example.com"
        );

        let other = app.oneshot(preflight("https://evil.example")).await.unwrap();
        assert!(!other
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }
}
