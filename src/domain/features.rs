//! Feature derivation for the predictor payload.
//!
//! The vector layout is owned by the remote model and must not change:
//!
//! ```text
//! [dependents, education, self_employed, income_annum, loan_amount,
//!  loan_term, cibil_score, residential, commercial, luxury, bank,
//!  total_assets, debt_to_income, loan_to_assets, cibil_bucket]
//! ```

use serde::Serialize;
use thiserror::Error;

use crate::domain::answers::Answers;
use crate::domain::steps::{Field, ParsedValue};

pub const FEATURE_COUNT: usize = 15;

/// Column labels, in vector order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "no_of_dependents",
    "education",
    "self_employed",
    "income_annum",
    "loan_amount",
    "loan_term",
    "cibil_score",
    "residential_assets_value",
    "commercial_assets_value",
    "luxury_assets_value",
    "bank_asset_value",
    "total_assets",
    "debt_to_income",
    "loan_to_assets",
    "cibil_bucket",
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("Missing answer for '{0}'.")]
    Missing(Field),
    #[error("Invalid answer for '{field}': {message}")]
    Invalid {
        field: Field,
        message: &'static str,
    },
}

/// Fixed-order numeric payload. Serializes as a bare JSON array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Derive the vector from a complete answer set.
    pub fn from_answers(answers: &Answers) -> Result<Self, FeatureError> {
        let num = |field: Field| -> Result<f64, FeatureError> {
            match validated(answers, field)? {
                ParsedValue::Number(v) => Ok(v),
                ParsedValue::Choice(_) => Err(FeatureError::Invalid {
                    field,
                    message: "expected a number",
                }),
            }
        };
        let choice = |field: Field, yes: &str| -> Result<f64, FeatureError> {
            match validated(answers, field)? {
                ParsedValue::Choice(c) if c.eq_ignore_ascii_case(yes) => Ok(1.0),
                ParsedValue::Choice(_) => Ok(0.0),
                ParsedValue::Number(_) => Err(FeatureError::Invalid {
                    field,
                    message: "expected a choice",
                }),
            }
        };

        let dependents = num(Field::NoOfDependents)?;
        let education = choice(Field::Education, "graduate")?;
        let self_employed = choice(Field::SelfEmployed, "yes")?;
        let income = num(Field::IncomeAnnum)?;
        let loan_amount = num(Field::LoanAmount)?;
        let loan_term = num(Field::LoanTerm)?;
        let cibil = num(Field::CibilScore)?;
        let residential = num(Field::ResidentialAssetsValue)?;
        let commercial = num(Field::CommercialAssetsValue)?;
        let luxury = num(Field::LuxuryAssetsValue)?;
        let bank = num(Field::BankAssetValue)?;

        let total_assets = residential + commercial + luxury + bank;
        let debt_to_income = round10(loan_amount / (income + 1.0));
        let loan_to_assets = round10(loan_amount / (total_assets + 1.0));

        Ok(Self([
            dependents,
            education,
            self_employed,
            income,
            loan_amount,
            loan_term,
            cibil,
            residential,
            commercial,
            luxury,
            bank,
            total_assets,
            debt_to_income,
            loan_to_assets,
            cibil_bucket(cibil),
        ]))
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub fn total_assets(&self) -> f64 {
        self.0[11]
    }

    pub fn debt_to_income(&self) -> f64 {
        self.0[12]
    }

    pub fn loan_to_assets(&self) -> f64 {
        self.0[13]
    }

    pub fn cibil_bucket(&self) -> f64 {
        self.0[14]
    }

    /// `(name, value)` pairs in vector order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

fn validated(answers: &Answers, field: Field) -> Result<ParsedValue, FeatureError> {
    match answers.parsed(field) {
        None => Err(FeatureError::Missing(field)),
        Some(Err(message)) => Err(FeatureError::Invalid { field, message }),
        Some(Ok(v)) => Ok(v),
    }
}

/// Risk tier: 0 for scores up to 500, 1 up to 700, 2 above.
pub fn cibil_bucket(score: f64) -> f64 {
    if score <= 500.0 {
        0.0
    } else if score <= 700.0 {
        1.0
    } else {
        2.0
    }
}

/// Round to 10 decimal places. Magnitudes that have no fractional digits left
/// to round (or would overflow when scaled) are returned unchanged.
pub fn round10(v: f64) -> f64 {
    if v.abs() >= 1e21 {
        return v;
    }
    let scaled = v * 1e10;
    if !scaled.is_finite() {
        return v;
    }
    scaled.round() / 1e10
}
