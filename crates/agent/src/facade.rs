//! The orchestrator role: a contractual pass-through.
//!
//! `forward` hands the query to the pipeline and returns its result unchanged.
//! No field renaming, no additional wrapping, no interpretation. The guarantee
//! is structural: callers of the facade see exactly what the pipeline emitted.

use serde_json::Value;

use crate::pipeline::{CustomerResolver, DealStore, QueryResolutionPipeline};

pub struct DelegationFacade<R, S> {
    pipeline: QueryResolutionPipeline<R, S>,
}

impl<R, S> DelegationFacade<R, S>
where
    R: CustomerResolver,
    S: DealStore,
{
    pub fn new(pipeline: QueryResolutionPipeline<R, S>) -> Self {
        Self { pipeline }
    }

    pub async fn forward(&self, query: &str) -> Value {
        self.pipeline.run(query).await
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::{json, Value};

    use dealdesk_core::UpstreamError;

    use super::DelegationFacade;
    use crate::pipeline::{CustomerResolver, DealStore, QueryResolutionPipeline};
    use crate::sales::ResolvedCustomer;

    struct FixedResolver;

    #[async_trait]
    impl CustomerResolver for FixedResolver {
        async fn resolve_customer(
            &self,
            _query: &str,
        ) -> Result<ResolvedCustomer, UpstreamError> {
            Ok(ResolvedCustomer { customer_id: 1, company_name: Some("CompanyABC".into()) })
        }
    }

    struct FixedStore;

    #[async_trait]
    impl DealStore for FixedStore {
        async fn fetch_by_customer(&self, _customer_id: i64) -> Result<Value, UpstreamError> {
            Ok(json!({"bidStart": {"bidHead": {"bidNum": "D001149727"}, "bidAcct": []}}))
        }
    }

    #[tokio::test]
    async fn forward_returns_the_pipeline_result_unchanged() {
        let pipeline = QueryResolutionPipeline::new(FixedResolver, FixedStore);
        let expected = pipeline.run("Find CompanyABC's deal").await;

        let facade =
            DelegationFacade::new(QueryResolutionPipeline::new(FixedResolver, FixedStore));
        let forwarded = facade.forward("Find CompanyABC's deal").await;

        assert_eq!(forwarded, expected);
    }
}
