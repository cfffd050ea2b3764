//! Application-level error carried up to `main`.
//!
//! Library modules return their own typed errors (`FeatureError`,
//! `PredictError`); the CLI and TUI fold them into an `AppError` with the
//! process exit code attached.
//!
//! Exit codes:
//! - `2`: bad input (invalid answers, unreadable answers file, bad flags)
//! - `4`: runtime failures (terminal setup, predictor transport)

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Bad user input.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Failure while talking to the terminal or the predictor.
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<crate::domain::FeatureError> for AppError {
    fn from(err: crate::domain::FeatureError) -> Self {
        Self::usage(err.to_string())
    }
}

impl From<crate::predictor::PredictError> for AppError {
    fn from(err: crate::predictor::PredictError) -> Self {
        Self::runtime(format!("Prediction failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_pick_exit_codes() {
        assert_eq!(AppError::usage("x").exit_code(), 2);
        assert_eq!(AppError::runtime("x").exit_code(), 4);
        assert_eq!(AppError::new(7, "boom").to_string(), "boom");
    }
}
