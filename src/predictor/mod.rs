//! Remote loan-approval predictor.
//!
//! The model is an external HTTP service; this module only knows its wire
//! contract (`POST /predict`, `{"features": [...]}` in, `{"loan_approval": ...}`
//! out). The wizard talks to it through the `Predictor` trait.

use thiserror::Error;

use crate::domain::FeatureVector;

pub mod client;
pub mod config;

pub use client::PredictorClient;
pub use config::PredictorConfig;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to parse predictor response: {0}")]
    Decode(String),
}

/// Something that turns a feature vector into a verdict.
///
/// `Ok(None)` means the service answered but gave no verdict.
pub trait Predictor {
    fn predict(&self, features: &FeatureVector) -> Result<Option<String>, PredictError>;
}
