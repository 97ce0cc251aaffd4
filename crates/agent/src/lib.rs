//! Query resolution for dealdesk - the two-step resolve-and-fetch workflow.
//!
//! This crate holds the deterministic core of the deal-lookup service:
//!
//! 1. **Intent front-end** (`intent`) - extract a company name from free text
//! 2. **Customer resolution** (`sales`) - ask the sales service for the
//!    customer id, with a legacy fallback endpoint
//! 3. **Deal transport** (`deals`) - fetch or persist deal records against the
//!    deal-storage service, payloads passed through untouched
//! 4. **Pipeline** (`pipeline`) - the resolve -> fetch sequence and the final
//!    envelope shape
//! 5. **Facade** (`facade`) - the orchestrator pass-through
//!
//! # Contract
//!
//! Every upstream failure is caught here and converted into an in-band error
//! envelope. Deal records are opaque: nothing in this crate parses, trims, or
//! reshapes them.

pub mod deals;
pub mod facade;
pub mod intent;
pub mod pipeline;
pub mod sales;

mod http;

pub use deals::DealStoreClient;
pub use facade::DelegationFacade;
pub use pipeline::{CustomerResolver, DealStore, QueryResolutionPipeline};
pub use sales::{ResolvedCustomer, SalesLookupClient};
