//! Terminal output for the scripting commands.

use serde_json::json;

use crate::domain::FeatureVector;
use crate::error::AppError;
use crate::wizard::WizardState;

/// The verdict line, followed by the derived ratios when available.
pub fn format_verdict(state: &WizardState) -> String {
    let mut out = String::new();
    out.push_str(&format!("Loan approval: {}\n", state.result_text()));
    if let Some(f) = state.submitted_features() {
        out.push_str(&format!(
            "total_assets={:.0} | debt_to_income={:.10} | loan_to_assets={:.10} | cibil_bucket={}",
            f.total_assets(),
            f.debt_to_income(),
            f.loan_to_assets(),
            f.cibil_bucket(),
        ));
    }
    out.trim_end().to_string()
}

/// One `name value` row per feature, in vector order.
pub fn format_features(features: &FeatureVector) -> String {
    features
        .named()
        .enumerate()
        .map(|(i, (name, value))| format!("{:>2}  {:<26} {}", i, name, value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The exact request body sent to the predictor.
pub fn format_request_json(features: &FeatureVector) -> Result<String, AppError> {
    serde_json::to_string(&json!({ "features": features }))
        .map_err(|e| AppError::runtime(format!("Failed to encode features: {e}")))
}
