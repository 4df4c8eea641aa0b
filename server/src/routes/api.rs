use std::fmt::Write as _;

use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use crate::state::{AppState, ObservabilitySnapshot};

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let observability = state.observability.snapshot();
    Json(serde_json::json!({
        "status": "ok",
        "profile_store": state.profiles.backend(),
        "observability": {
            "calc_requests_total": observability.calc_requests_total,
            "profile_reads_total": observability.profile_reads_total,
            "profile_writes_total": observability.profile_writes_total,
            "unauthorized_total": observability.unauthorized_total,
            "store_failures_total": observability.store_failures_total,
        }
    }))
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let persistent_store = state.profiles.backend() == "postgres";
    let body = render_prometheus_metrics(persistent_store, state.observability.snapshot());

    (
        [
            (header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-store"),
        ],
        body,
    )
}

fn write_metric(body: &mut String, name: &str, kind: &str, help: &str, value: u64) {
    let _ = writeln!(body, "# HELP {name} {help}");
    let _ = writeln!(body, "# TYPE {name} {kind}");
    let _ = writeln!(body, "{name} {value}");
}

fn render_prometheus_metrics(persistent_store: bool, observability: ObservabilitySnapshot) -> String {
    let mut body = String::new();
    write_metric(
        &mut body,
        "atlas_profile_store_persistent",
        "gauge",
        "Whether profiles are stored in PostgreSQL (1) or process memory (0).",
        u64::from(persistent_store),
    );
    write_metric(
        &mut body,
        "atlas_calc_requests_total",
        "counter",
        "Total calculator, badge, strategy and analytics requests.",
        observability.calc_requests_total,
    );
    write_metric(
        &mut body,
        "atlas_profile_reads_total",
        "counter",
        "Total profile reads.",
        observability.profile_reads_total,
    );
    write_metric(
        &mut body,
        "atlas_profile_writes_total",
        "counter",
        "Total profile writes.",
        observability.profile_writes_total,
    );
    write_metric(
        &mut body,
        "atlas_unauthorized_total",
        "counter",
        "Total requests rejected for a missing or invalid identity.",
        observability.unauthorized_total,
    );
    write_metric(
        &mut body,
        "atlas_store_failures_total",
        "counter",
        "Total profile store errors.",
        observability.store_failures_total,
    );
    body
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use super::render_prometheus_metrics;
    use crate::config::DEFAULT_AUTH_USER_HEADER;
    use crate::state::{AppState, ObservabilitySnapshot};

    async fn spawn_test_server(state: AppState) -> (SocketAddr, tokio::task::JoinHandle<()>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");
        let app = crate::app::build_app(state);
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve test app");
        });
        (addr, handle)
    }

    #[test]
    fn metrics_output_contains_prometheus_help_type_and_values() {
        let observability = ObservabilitySnapshot {
            calc_requests_total: 12,
            profile_reads_total: 4,
            profile_writes_total: 2,
            unauthorized_total: 7,
            store_failures_total: 1,
        };

        let metrics = render_prometheus_metrics(true, observability);

        assert!(metrics.contains("# HELP atlas_calc_requests_total"));
        assert!(metrics.contains("# TYPE atlas_profile_store_persistent gauge"));
        assert!(metrics.contains("# TYPE atlas_unauthorized_total counter"));
        assert!(metrics.contains("atlas_profile_store_persistent 1"));
        assert!(metrics.contains("atlas_calc_requests_total 12"));
        assert!(metrics.contains("atlas_profile_reads_total 4"));
        assert!(metrics.contains("atlas_profile_writes_total 2"));
        assert!(metrics.contains("atlas_unauthorized_total 7"));
        assert!(metrics.contains("atlas_store_failures_total 1"));
    }

    #[tokio::test]
    async fn health_and_metrics_expose_expected_contract() {
        let (addr, server_handle) = spawn_test_server(AppState::for_tests()).await;
        let base_url = format!("http://{addr}");
        let client = reqwest::Client::new();

        client
            .get(format!("{base_url}/api/calc/yield?tier=epic&quantity=3"))
            .send()
            .await
            .expect("yield request")
            .error_for_status()
            .expect("yield status");

        let unauthorized = client
            .get(format!("{base_url}/api/user/profile"))
            .send()
            .await
            .expect("anonymous profile request");
        assert_eq!(unauthorized.status(), reqwest::StatusCode::UNAUTHORIZED);

        client
            .get(format!("{base_url}/api/user/profile"))
            .header(DEFAULT_AUTH_USER_HEADER, "metrics-user")
            .send()
            .await
            .expect("profile request")
            .error_for_status()
            .expect("profile status");

        let health = client
            .get(format!("{base_url}/api/health"))
            .send()
            .await
            .expect("health request")
            .error_for_status()
            .expect("health status")
            .json::<serde_json::Value>()
            .await
            .expect("parse health");

        assert_eq!(health.get("status").and_then(|v| v.as_str()), Some("ok"));
        assert_eq!(
            health.get("profile_store").and_then(|v| v.as_str()),
            Some("memory")
        );
        assert_eq!(
            health
                .get("observability")
                .and_then(|v| v.get("calc_requests_total"))
                .and_then(|v| v.as_u64()),
            Some(1)
        );

        let metrics = client
            .get(format!("{base_url}/api/metrics"))
            .send()
            .await
            .expect("metrics request")
            .error_for_status()
            .expect("metrics status")
            .text()
            .await
            .expect("parse metrics text");

        assert!(metrics.contains("# TYPE atlas_calc_requests_total counter"));
        assert!(metrics.contains("atlas_profile_store_persistent 0"));
        assert!(metrics.contains("atlas_calc_requests_total 1"));
        assert!(metrics.contains("atlas_profile_reads_total 1"));
        assert!(metrics.contains("atlas_unauthorized_total 1"));
        assert!(metrics.contains("atlas_store_failures_total 0"));

        server_handle.abort();
        let _ = server_handle.await;
    }
}
