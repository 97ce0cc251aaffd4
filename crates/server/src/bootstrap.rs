use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use dealdesk_agent::{
    DealStoreClient, DelegationFacade, QueryResolutionPipeline, SalesLookupClient,
};
use dealdesk_core::config::{AppConfig, ConfigError, LoadOptions};

/// Concrete facade wired to the HTTP clients.
pub type Facade = DelegationFacade<SalesLookupClient, DealStoreClient>;

pub struct Application {
    pub config: AppConfig,
    pub http_client: reqwest::Client,
    pub facade: Arc<Facade>,
    pub deal_store: DealStoreClient,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("http client construction failed: {0}")]
    HttpClient(#[source] reqwest::Error),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        sales_base_url = %config.sales.base_url,
        deal_store_base_url = %config.deal_store.base_url,
        "starting application bootstrap"
    );

    // One connection pool shared by every upstream client; per-call timeouts
    // come from the config sections.
    let http_client = reqwest::Client::builder().build().map_err(BootstrapError::HttpClient)?;

    let sales = SalesLookupClient::new(
        http_client.clone(),
        &config.sales.base_url,
        Duration::from_secs(config.sales.timeout_secs),
    );
    let deal_store = DealStoreClient::new(
        http_client.clone(),
        &config.deal_store.base_url,
        Duration::from_secs(config.deal_store.fetch_timeout_secs),
        Duration::from_secs(config.deal_store.save_timeout_secs),
    );

    let facade = Arc::new(DelegationFacade::new(QueryResolutionPipeline::new(
        sales,
        deal_store.clone(),
    )));

    info!(
        event_name = "system.bootstrap.clients_ready",
        "upstream clients constructed"
    );

    Ok(Application { config, http_client, facade, deal_store })
}
