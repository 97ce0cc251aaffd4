//! Client for the external deal-storage service.
//!
//! Deal records are opaque JSON owned by the storage service. This client is
//! pure transport: it never inspects a record beyond serializing it, and it
//! surfaces the service's answers verbatim. On save, the service itself
//! derives the storage key from a field inside the record.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::warn;

use dealdesk_core::UpstreamError;

use crate::http::{json_or_status, transport_error};
use crate::pipeline::DealStore;

#[derive(Clone, Debug)]
pub struct DealStoreClient {
    client: Client,
    base_url: String,
    fetch_timeout: Duration,
    save_timeout: Duration,
}

impl DealStoreClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        fetch_timeout: Duration,
        save_timeout: Duration,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url, fetch_timeout, save_timeout }
    }

    /// Fetch the deal record for a customer. Pure read, no side effect.
    pub async fn fetch_by_customer(&self, customer_id: i64) -> Result<Value, UpstreamError> {
        let response = self
            .client
            .get(format!("{}/api/getdeal/customer/{customer_id}", self.base_url))
            .timeout(self.fetch_timeout)
            .send()
            .await
            .map_err(transport_error)?;

        json_or_status(response).await.map_err(|error| {
            warn!(
                event_name = "deal.fetch.failed",
                customer_id,
                error = %error,
                "deal fetch failed"
            );
            error
        })
    }

    /// Persist a deal record. Non-idempotent: the storage service creates or
    /// overwrites a file keyed by the record's own bid number. The
    /// acknowledgment (`{"message": ..., "file": ...}`) is returned verbatim.
    pub async fn save(&self, record: &Value) -> Result<Value, UpstreamError> {
        let response = self
            .client
            .post(format!("{}/api/adddeal", self.base_url))
            .json(record)
            .timeout(self.save_timeout)
            .send()
            .await
            .map_err(transport_error)?;

        json_or_status(response).await.map_err(|error| {
            warn!(event_name = "deal.save.failed", error = %error, "deal save failed");
            error
        })
    }
}

#[async_trait]
impl DealStore for DealStoreClient {
    async fn fetch_by_customer(&self, customer_id: i64) -> Result<Value, UpstreamError> {
        DealStoreClient::fetch_by_customer(self, customer_id).await
    }
}
