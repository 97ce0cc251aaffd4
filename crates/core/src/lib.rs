pub mod config;
pub mod envelope;

pub use envelope::{
    deal_error_envelope, error_envelope, success_envelope, ErrorField, UpstreamError,
};
