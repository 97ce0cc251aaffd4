//! The two-step query-resolution pipeline.
//!
//! Step 1 resolves the customer id through the sales service; a failure there
//! terminates the run and the deal store is never contacted. Step 2 fetches
//! the deal and embeds whatever came back, record or rendered error object,
//! verbatim under `deal` in a `status:"success"` envelope. That
//! outer-success/inner-error nesting is the observed production contract;
//! downstream consumers key off the outer status, so it is preserved here
//! rather than flattened.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use dealdesk_core::{
    deal_error_envelope, error_envelope, success_envelope, ErrorField, UpstreamError,
};

use crate::intent;
use crate::sales::ResolvedCustomer;

#[async_trait]
pub trait CustomerResolver: Send + Sync {
    async fn resolve_customer(&self, query: &str) -> Result<ResolvedCustomer, UpstreamError>;
}

#[async_trait]
pub trait DealStore: Send + Sync {
    async fn fetch_by_customer(&self, customer_id: i64) -> Result<Value, UpstreamError>;
}

pub struct QueryResolutionPipeline<R, S> {
    resolver: R,
    store: S,
}

impl<R, S> QueryResolutionPipeline<R, S>
where
    R: CustomerResolver,
    S: DealStore,
{
    pub fn new(resolver: R, store: S) -> Self {
        Self { resolver, store }
    }

    /// Resolve a free-text query into the final result envelope.
    pub async fn run(&self, query: &str) -> Value {
        let lookup_query = intent::lookup_query_for(query);
        debug!(event_name = "deal.pipeline.resolve", lookup_query = %lookup_query, "resolving customer");

        let resolved = match self.resolver.resolve_customer(&lookup_query).await {
            Ok(resolved) => resolved,
            Err(error) => {
                warn!(
                    event_name = "deal.pipeline.resolve_failed",
                    error = %error,
                    "customer resolution failed, terminating pipeline"
                );
                return error_envelope(ErrorField::Response, &error);
            }
        };

        let company_name = resolved
            .company_name
            .or_else(|| intent::extract_company(query))
            .unwrap_or_else(|| query.trim().to_string());

        let deal = match self.store.fetch_by_customer(resolved.customer_id).await {
            Ok(record) => record,
            Err(error) => deal_error_envelope(&error, resolved.customer_id),
        };

        info!(
            event_name = "deal.pipeline.completed",
            customer_id = resolved.customer_id,
            company_name = %company_name,
            "pipeline completed"
        );
        success_envelope(resolved.customer_id, &company_name, deal)
    }
}
