use axum::Router;
use axum::http::{Method, header};
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};

use crate::routes;
use crate::state::AppState;

pub(crate) fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = Router::new()
        .route(
            "/api/user/profile",
            get(routes::profile::get_profile).put(routes::profile::put_profile),
        )
        .route("/api/tables", get(routes::calc::get_tables))
        .route("/api/calc/yield", get(routes::calc::get_yield))
        .route("/api/calc/portfolio", post(routes::calc::post_portfolio))
        .route(
            "/api/portfolio/export",
            post(routes::calc::post_portfolio_export),
        )
        .route(
            "/api/badges/recommend",
            get(routes::calc::get_badge_recommendation),
        )
        .route("/api/badges/upgrade", get(routes::calc::get_badge_upgrade))
        .route(
            "/api/badges/progress",
            get(routes::calc::get_badge_progress),
        )
        .route("/api/strategies", get(routes::calc::get_strategies))
        .route(
            "/api/analytics/mock",
            get(routes::calc::get_mock_analytics),
        )
        .route("/api/health", get(routes::api::health))
        .route("/api/metrics", get(routes::api::metrics));

    app.layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn unknown_routes_are_not_found() {
        let response = build_app(AppState::for_tests())
            .oneshot(
                Request::get("/api/parcels/live")
                    .body(Body::empty())
                    .expect("build request"),
            )
            .await
            .expect("request should complete");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cors_preflight_allows_profile_updates() {
        let response = build_app(AppState::for_tests())
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/user/profile")
                    .header(header::ORIGIN, "https://atlas.example")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
                    .body(Body::empty())
                    .expect("build request"),
            )
            .await
            .expect("preflight should complete");
        assert!(response.status().is_success());
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|value| value.to_str().ok()),
            Some("*")
        );
    }

    #[tokio::test]
    async fn cors_preflight_does_not_allow_identity_header() {
        let response = build_app(AppState::for_tests())
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/strategies")
                    .header(header::ORIGIN, "https://atlas.example")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                    .header(
                        header::ACCESS_CONTROL_REQUEST_HEADERS,
                        crate::config::DEFAULT_AUTH_USER_HEADER,
                    )
                    .body(Body::empty())
                    .expect("build request"),
            )
            .await
            .expect("preflight should complete");
        let allowed = response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
            .and_then(|value| value.to_str().ok())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        assert!(allowed.contains("content-type"));
        assert!(!allowed.contains(crate::config::DEFAULT_AUTH_USER_HEADER));
    }

    #[tokio::test]
    async fn large_responses_are_compressed_when_accepted() {
        let response = build_app(AppState::for_tests())
            .oneshot(
                Request::get("/api/analytics/mock?days=120&seed=5")
                    .header(header::ACCEPT_ENCODING, "gzip")
                    .body(Body::empty())
                    .expect("build request"),
            )
            .await
            .expect("request should complete");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_ENCODING)
                .and_then(|value| value.to_str().ok()),
            Some("gzip")
        );
    }
}
