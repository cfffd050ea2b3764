//! Predictor endpoint configuration.
//!
//! Resolution order: explicit `--predictor-url`, then `PREDICTOR_URL` from the
//! environment (a `.env` file is loaded first), then the local default.

use tracing::debug;

use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const ENV_BASE_URL: &str = "PREDICTOR_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictorConfig {
    pub base_url: String,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl PredictorConfig {
    pub fn from_env(override_url: Option<&str>) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let env_url = std::env::var(ENV_BASE_URL).ok();
        Self::resolve(override_url, env_url.as_deref())
    }

    fn resolve(override_url: Option<&str>, env_url: Option<&str>) -> Result<Self, AppError> {
        let raw = override_url
            .or(env_url)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_BASE_URL);

        if !(raw.starts_with("http://") || raw.starts_with("https://")) {
            return Err(AppError::usage(format!(
                "Predictor URL must start with http:// or https:// (got: {raw})."
            )));
        }

        let base_url = raw.trim_end_matches('/').to_string();
        debug!(%base_url, "resolved predictor endpoint");
        Ok(Self { base_url })
    }

    /// Full URL of the prediction route.
    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_over_env() {
        let cfg = PredictorConfig::resolve(Some("http://a:1/"), Some("http://b:2")).unwrap();
        assert_eq!(cfg.base_url, "http://a:1");
        assert_eq!(cfg.predict_url(), "http://a:1/predict");
    }

    #[test]
    fn falls_back_to_default() {
        let cfg = PredictorConfig::resolve(None, Some("  ")).unwrap();
        assert_eq!(cfg, PredictorConfig::default());
        assert_eq!(cfg.predict_url(), "http://localhost:8080/predict");
    }

    #[test]
    fn rejects_non_http_urls() {
        let err = PredictorConfig::resolve(Some("localhost:8080"), None).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
