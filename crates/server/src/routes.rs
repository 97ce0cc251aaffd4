//! Public JSON API for the deal-lookup service.
//!
//! Endpoints:
//! - `GET  /`                    — service banner listing the endpoints
//! - `POST /query`               — run a query through the delegation facade
//! - `GET  /deal/{customer_id}`  — fetch a deal record verbatim
//! - `POST /deal`                — persist a new deal record
//!
//! Upstream failures never surface as HTTP error statuses here: every outcome
//! travels in-band as an envelope in a 200 body, which is what downstream
//! consumers of the original service pattern-match on.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use dealdesk_agent::DealStoreClient;
use dealdesk_core::{deal_error_envelope, error_envelope, ErrorField};

use crate::bootstrap::Facade;

#[derive(Clone)]
pub struct ApiState {
    facade: Arc<Facade>,
    deal_store: DealStoreClient,
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct DealDataRequest {
    pub deal_data: Value,
}

pub fn router(facade: Arc<Facade>, deal_store: DealStoreClient) -> Router {
    let state = ApiState { facade, deal_store };

    Router::new()
        .route("/", get(root))
        .route("/query", post(handle_query))
        .route("/deal/{customer_id}", get(get_deal))
        .route("/deal", post(add_deal))
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "dealdesk server is running",
        "endpoints": {
            "POST /query": "Resolve a query to a deal",
            "GET /deal/{customer_id}": "Get deal by customer ID",
            "POST /deal": "Add new deal"
        }
    }))
}

async fn handle_query(
    State(state): State<ApiState>,
    Json(request): Json<QueryRequest>,
) -> Json<Value> {
    info!(event_name = "api.query.received", query = %request.query, "query received");
    Json(state.facade.forward(&request.query).await)
}

async fn get_deal(
    State(state): State<ApiState>,
    Path(customer_id): Path<i64>,
) -> Json<Value> {
    match state.deal_store.fetch_by_customer(customer_id).await {
        Ok(deal) => Json(deal),
        Err(error) => Json(deal_error_envelope(&error, customer_id)),
    }
}

async fn add_deal(
    State(state): State<ApiState>,
    Json(request): Json<DealDataRequest>,
) -> Json<Value> {
    match state.deal_store.save(&request.deal_data).await {
        Ok(ack) => Json(ack),
        Err(error) => Json(error_envelope(ErrorField::Error, &error)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use dealdesk_agent::{
        DealStoreClient, DelegationFacade, QueryResolutionPipeline, SalesLookupClient,
    };

    use super::router;

    fn clients(
        sales_url: &str,
        deal_url: &str,
    ) -> (SalesLookupClient, DealStoreClient) {
        let http = reqwest::Client::new();
        (
            SalesLookupClient::new(http.clone(), sales_url, Duration::from_secs(2)),
            DealStoreClient::new(
                http,
                deal_url,
                Duration::from_secs(2),
                Duration::from_secs(2),
            ),
        )
    }

    fn app(sales_url: &str, deal_url: &str) -> axum::Router {
        let (sales, deals) = clients(sales_url, deal_url);
        let facade = Arc::new(DelegationFacade::new(QueryResolutionPipeline::new(
            sales,
            deals.clone(),
        )));
        router(facade, deals)
    }

    async fn body_value(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        serde_json::from_slice(&bytes).expect("body should be JSON")
    }

    fn json_request(uri: &str, payload: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request should build")
    }

    fn bid_record() -> Value {
        json!({"bidStart": {"bidHead": {"bidNum": "D001149727"}, "bidAcct": [{"acctId": 42}]}})
    }

    #[tokio::test]
    async fn query_resolves_and_wraps_the_deal() {
        let sales = MockServer::start().await;
        let deals = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("search", "Get customer ID for CompanyABC"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "customer_id": 1,
                "company_name": "CompanyABC"
            })))
            .mount(&sales)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/getdeal/customer/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(bid_record()))
            .mount(&deals)
            .await;

        let response = app(&sales.uri(), &deals.uri())
            .oneshot(json_request("/query", json!({"query": "Find CompanyABC's deal"})))
            .await
            .expect("request should be served");

        assert_eq!(response.status(), StatusCode::OK);
        let envelope = body_value(response).await;
        assert_eq!(
            envelope,
            json!({
                "status": "success",
                "customer_id": 1,
                "company_name": "CompanyABC",
                "deal": bid_record(),
            })
        );
    }

    #[tokio::test]
    async fn query_reports_lookup_failures_under_the_response_key() {
        // Nothing listens on the discard port.
        let deals = MockServer::start().await;
        let response = app("http://127.0.0.1:9", &deals.uri())
            .oneshot(json_request("/query", json!({"query": "Find CompanyABC's deal"})))
            .await
            .expect("request should be served");

        assert_eq!(response.status(), StatusCode::OK);
        let envelope = body_value(response).await;
        assert_eq!(envelope["status"], "error");
        assert!(envelope["response"].as_str().is_some_and(|m| m.starts_with("Request failed: ")));
        assert!(envelope.get("error").is_none());
    }

    #[tokio::test]
    async fn get_deal_returns_the_record_verbatim() {
        let sales = MockServer::start().await;
        let deals = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/getdeal/customer/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(bid_record()))
            .mount(&deals)
            .await;

        let response = app(&sales.uri(), &deals.uri())
            .oneshot(Request::get("/deal/1").body(Body::empty()).expect("request should build"))
            .await
            .expect("request should be served");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_value(response).await, bid_record());
    }

    #[tokio::test]
    async fn get_deal_failure_uses_the_error_key_and_carries_the_customer_id() {
        let sales = MockServer::start().await;
        let deals = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/getdeal/customer/99"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no deal"))
            .mount(&deals)
            .await;

        let response = app(&sales.uri(), &deals.uri())
            .oneshot(Request::get("/deal/99").body(Body::empty()).expect("request should build"))
            .await
            .expect("request should be served");

        assert_eq!(response.status(), StatusCode::OK);
        let envelope = body_value(response).await;
        assert_eq!(
            envelope,
            json!({"status": "error", "error": "HTTP 404: no deal", "customer_id": 99})
        );
        assert!(envelope.get("response").is_none());
    }

    #[tokio::test]
    async fn add_deal_forwards_the_acknowledgment_verbatim() {
        let sales = MockServer::start().await;
        let deals = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/adddeal"))
            .and(body_json(bid_record()))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "message": "Deal saved successfully",
                "file": "D001149727.json"
            })))
            .mount(&deals)
            .await;

        let response = app(&sales.uri(), &deals.uri())
            .oneshot(json_request("/deal", json!({"deal_data": bid_record()})))
            .await
            .expect("request should be served");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_value(response).await,
            json!({"message": "Deal saved successfully", "file": "D001149727.json"})
        );
    }

    #[tokio::test]
    async fn add_deal_failure_uses_the_error_key() {
        let sales = MockServer::start().await;
        let deals = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/adddeal"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bidNum not found in JSON"))
            .mount(&deals)
            .await;

        let response = app(&sales.uri(), &deals.uri())
            .oneshot(json_request("/deal", json!({"deal_data": {"unexpected": true}})))
            .await
            .expect("request should be served");

        let envelope = body_value(response).await;
        assert_eq!(
            envelope,
            json!({"status": "error", "error": "HTTP 400: bidNum not found in JSON"})
        );
        assert!(envelope.get("response").is_none());
    }

    #[tokio::test]
    async fn root_lists_the_endpoints() {
        let sales = MockServer::start().await;
        let deals = MockServer::start().await;

        let response = app(&sales.uri(), &deals.uri())
            .oneshot(Request::get("/").body(Body::empty()).expect("request should build"))
            .await
            .expect("request should be served");

        assert_eq!(response.status(), StatusCode::OK);
        let banner = body_value(response).await;
        assert!(banner["endpoints"].get("POST /query").is_some());
    }
}
