//! Client for the external sales-lookup service.
//!
//! The primary capability is `GET /search?search=<query>`. Older deployments
//! only expose `POST /query`, so a 404 from the primary endpoint triggers one
//! fallback attempt before the lookup is reported as failed.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, warn};

use dealdesk_core::UpstreamError;

use crate::http::{json_or_status, transport_error};

/// Outcome of a successful customer resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedCustomer {
    pub customer_id: i64,
    pub company_name: Option<String>,
}

#[derive(Clone, Debug)]
pub struct SalesLookupClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl SalesLookupClient {
    pub fn new(client: Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url, timeout }
    }

    /// Raw lookup: returns whatever JSON the sales service answered with.
    pub async fn lookup(&self, query: &str) -> Result<Value, UpstreamError> {
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("search", query)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(
                event_name = "sales.lookup.fallback",
                "primary search endpoint answered 404, trying legacy query endpoint"
            );
            let fallback = self
                .client
                .post(format!("{}/query", self.base_url))
                .json(&json!({ "query": query }))
                .timeout(self.timeout)
                .send()
                .await
                .map_err(transport_error)?;
            return json_or_status(fallback).await;
        }

        json_or_status(response).await
    }

    /// Run a lookup and pull the customer id out of the answer.
    ///
    /// The sales service's response shape is not under our control: the id is
    /// accepted at the top level or nested one level under `response`,
    /// `result`, or `data`. A response without a usable id is a failure, not a
    /// partial success.
    pub async fn resolve_customer(&self, query: &str) -> Result<ResolvedCustomer, UpstreamError> {
        let body = self.lookup(query).await?;

        let Some(customer_id) = extract_customer_id(&body) else {
            warn!(
                event_name = "sales.lookup.no_customer_id",
                "sales service answered without a usable customer_id"
            );
            return Err(UpstreamError::Other {
                message: format!("no customer_id in sales response: {body}"),
            });
        };

        Ok(ResolvedCustomer { customer_id, company_name: extract_company_name(&body) })
    }
}

#[async_trait::async_trait]
impl crate::pipeline::CustomerResolver for SalesLookupClient {
    async fn resolve_customer(&self, query: &str) -> Result<ResolvedCustomer, UpstreamError> {
        SalesLookupClient::resolve_customer(self, query).await
    }
}

const NESTED_KEYS: [&str; 3] = ["response", "result", "data"];

fn extract_customer_id(body: &Value) -> Option<i64> {
    candidate_objects(body).find_map(|object| {
        object.get("customer_id").and_then(Value::as_i64).filter(|id| *id > 0)
    })
}

fn extract_company_name(body: &Value) -> Option<String> {
    candidate_objects(body).find_map(|object| {
        object.get("company_name").and_then(Value::as_str).map(str::to_string)
    })
}

fn candidate_objects(body: &Value) -> impl Iterator<Item = &Value> {
    std::iter::once(body)
        .chain(NESTED_KEYS.iter().filter_map(|key| body.get(key)).filter(|value| value.is_object()))
}
