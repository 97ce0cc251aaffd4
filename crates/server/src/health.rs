use std::time::Duration;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info};

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Clone)]
pub struct HealthState {
    client: reqwest::Client,
    sales_base_url: String,
    deal_store_base_url: String,
}

impl HealthState {
    pub fn new(
        client: reqwest::Client,
        sales_base_url: impl Into<String>,
        deal_store_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            sales_base_url: sales_base_url.into(),
            deal_store_base_url: deal_store_base_url.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub sales: HealthCheck,
    pub deal_store: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: HealthState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

pub async fn spawn(bind_address: &str, port: u16, state: HealthState) -> std::io::Result<()> {
    let address = format!("{bind_address}:{port}");
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(
        event_name = "system.health.start",
        bind_address = %address,
        "health endpoint started"
    );

    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, router(state)).await {
            error!(
                event_name = "system.health.error",
                error = %err,
                "health endpoint server terminated unexpectedly"
            );
        }
    });

    Ok(())
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let sales = probe(&state.client, "sales service", &state.sales_base_url).await;
    let deal_store = probe(&state.client, "deal store", &state.deal_store_base_url).await;
    let ready = sales.status == "ready" && deal_store.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "dealdesk-server runtime initialized".to_string(),
        },
        sales,
        deal_store,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

/// Any HTTP answer counts as reachable; the deal server responds 404 on `/`
/// and that still proves the process is up. Only transport-level failure
/// degrades the check.
async fn probe(client: &reqwest::Client, name: &str, base_url: &str) -> HealthCheck {
    match client.get(base_url).timeout(PROBE_TIMEOUT).send().await {
        Ok(response) => HealthCheck {
            status: "ready",
            detail: format!("{name} answered HTTP {}", response.status().as_u16()),
        },
        Err(err) => HealthCheck { status: "degraded", detail: format!("{name} unreachable: {err}") },
    }
}
