//! Blocking HTTP client for the predictor service.

use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::FeatureVector;
use crate::predictor::{PredictError, Predictor, PredictorConfig};

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    features: &'a FeatureVector,
}

pub struct PredictorClient {
    client: Client,
    url: String,
}

impl PredictorClient {
    pub fn new(config: &PredictorConfig) -> Self {
        Self {
            client: Client::new(),
            url: config.predict_url(),
        }
    }
}

impl Predictor for PredictorClient {
    fn predict(&self, features: &FeatureVector) -> Result<Option<String>, PredictError> {
        debug!(url = %self.url, features = ?features.values(), "posting features");

        let resp = self
            .client
            .post(&self.url)
            .json(&PredictRequest { features })
            .send()
            .map_err(|source| {
                warn!(url = %self.url, error = %source, "predictor request failed");
                PredictError::Transport {
                    url: self.url.clone(),
                    source,
                }
            })?;

        // The body is read whatever the status; an error payload simply has
        // no verdict.
        let status = resp.status();
        if !status.is_success() {
            warn!(%status, "predictor returned an error status");
        }

        let body = resp.text().map_err(|e| PredictError::Decode(e.to_string()))?;
        let verdict = parse_verdict(&body)?;
        info!(verdict = verdict.as_deref().unwrap_or("<none>"), "prediction received");
        Ok(verdict)
    }
}

/// Extract the verdict from a response body.
///
/// Only a string `loan_approval` field of a JSON object is a verdict. Any other
/// JSON shape is a response with no verdict; a body that is not JSON at all is
/// a decode failure.
fn parse_verdict(body: &str) -> Result<Option<String>, PredictError> {
    let parsed: Value =
        serde_json::from_str(body).map_err(|e| PredictError::Decode(e.to_string()))?;
    Ok(parsed
        .as_object()
        .and_then(|obj| obj.get("loan_approval"))
        .and_then(Value::as_str)
        .map(str::to_string))
}
