//! The wizard's question table.
//!
//! Each step is either numeric (parsed to `f64`, then checked by a range
//! predicate) or a single choice from a short list of options (compared
//! case-insensitively after trimming). The table order is the order the
//! questions are asked in, and also the order of the first eleven feature
//! slots.

use serde::{Deserialize, Serialize};

/// Answer keys, one per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    NoOfDependents,
    Education,
    SelfEmployed,
    IncomeAnnum,
    LoanAmount,
    LoanTerm,
    CibilScore,
    ResidentialAssetsValue,
    CommercialAssetsValue,
    LuxuryAssetsValue,
    BankAssetValue,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::NoOfDependents,
        Field::Education,
        Field::SelfEmployed,
        Field::IncomeAnnum,
        Field::LoanAmount,
        Field::LoanTerm,
        Field::CibilScore,
        Field::ResidentialAssetsValue,
        Field::CommercialAssetsValue,
        Field::LuxuryAssetsValue,
        Field::BankAssetValue,
    ];

    /// Wire/config key (`no_of_dependents`, `education`, ...).
    pub fn key(self) -> &'static str {
        match self {
            Field::NoOfDependents => "no_of_dependents",
            Field::Education => "education",
            Field::SelfEmployed => "self_employed",
            Field::IncomeAnnum => "income_annum",
            Field::LoanAmount => "loan_amount",
            Field::LoanTerm => "loan_term",
            Field::CibilScore => "cibil_score",
            Field::ResidentialAssetsValue => "residential_assets_value",
            Field::CommercialAssetsValue => "commercial_assets_value",
            Field::LuxuryAssetsValue => "luxury_assets_value",
            Field::BankAssetValue => "bank_asset_value",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        let key = key.trim();
        Field::ALL.into_iter().find(|f| f.key().eq_ignore_ascii_case(key))
    }

    /// The step that asks for this field.
    pub fn step(self) -> &'static StepDefinition {
        // `STEPS` is declared in `Field::ALL` order.
        &STEPS[self as usize]
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// How a step's raw text is interpreted and checked.
#[derive(Debug, Clone, Copy)]
pub enum StepKind {
    /// Parsed as a finite number, then passed to the predicate.
    Numeric(fn(f64) -> bool),
    /// One of the listed options, compared case-insensitively.
    Choice(&'static [&'static str]),
}

/// A validated answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedValue {
    Number(f64),
    /// The canonical (lowercase) option that matched.
    Choice(&'static str),
}

/// One question in the wizard.
#[derive(Debug, Clone, Copy)]
pub struct StepDefinition {
    pub name: &'static str,
    pub field: Field,
    pub kind: StepKind,
    pub placeholder: &'static str,
    pub error_message: &'static str,
}

impl StepDefinition {
    /// Parse and check raw input. On failure returns the step's error message.
    pub fn validate(&self, raw: &str) -> Result<ParsedValue, &'static str> {
        let trimmed = raw.trim();
        match self.kind {
            StepKind::Numeric(accepts) => {
                let value = parse_number(trimmed).ok_or(self.error_message)?;
                if accepts(value) {
                    Ok(ParsedValue::Number(value))
                } else {
                    Err(self.error_message)
                }
            }
            StepKind::Choice(options) => options
                .iter()
                .copied()
                .find(|opt| opt.eq_ignore_ascii_case(trimmed))
                .map(ParsedValue::Choice)
                .ok_or(self.error_message),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, StepKind::Numeric(_))
    }

    /// Options for choice steps (empty for numeric steps).
    pub fn options(&self) -> &'static [&'static str] {
        match self.kind {
            StepKind::Numeric(_) => &[],
            StepKind::Choice(options) => options,
        }
    }
}

/// Parse a trimmed numeric answer. Empty, unparsable and non-finite text is
/// rejected.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

pub const EDUCATION_OPTIONS: &[&str] = &["graduate", "not graduate"];
pub const SELF_EMPLOYED_OPTIONS: &[&str] = &["yes", "no"];

fn zero_to_five(v: f64) -> bool {
    (0.0..=5.0).contains(&v)
}

fn positive(v: f64) -> bool {
    v > 0.0
}

fn term_years(v: f64) -> bool {
    v > 0.0 && v <= 20.0
}

fn cibil_range(v: f64) -> bool {
    (0.0..=900.0).contains(&v)
}

// Residential assets may be negative (net of outstanding mortgage).
fn any_number(_: f64) -> bool {
    true
}

fn non_negative(v: f64) -> bool {
    v >= 0.0
}

/// Number of answering steps.
pub const STEP_COUNT: usize = 11;

/// The ordered question table.
pub static STEPS: [StepDefinition; STEP_COUNT] = [
    StepDefinition {
        name: "No of Dependents",
        field: Field::NoOfDependents,
        kind: StepKind::Numeric(zero_to_five),
        placeholder: "Enter number of dependents (0-5)",
        error_message: "Please enter a number between 0 and 5",
    },
    StepDefinition {
        name: "Education",
        field: Field::Education,
        kind: StepKind::Choice(EDUCATION_OPTIONS),
        placeholder: "Enter 'graduate' or 'not graduate'",
        error_message: "Please enter either 'graduate' or 'not graduate'",
    },
    StepDefinition {
        name: "Self Employed",
        field: Field::SelfEmployed,
        kind: StepKind::Choice(SELF_EMPLOYED_OPTIONS),
        placeholder: "Enter 'yes' or 'no'",
        error_message: "Please enter either 'yes' or 'no'",
    },
    StepDefinition {
        name: "Income Annum",
        field: Field::IncomeAnnum,
        kind: StepKind::Numeric(positive),
        placeholder: "Enter your annual income",
        error_message: "Please enter a positive integer",
    },
    StepDefinition {
        name: "Loan Amount",
        field: Field::LoanAmount,
        kind: StepKind::Numeric(positive),
        placeholder: "Enter the loan amount",
        error_message: "Please enter a positive integer",
    },
    StepDefinition {
        name: "Loan Term",
        field: Field::LoanTerm,
        kind: StepKind::Numeric(term_years),
        placeholder: "Enter loan term in years (1-20)",
        error_message: "Please enter a positive integer between 1 and 20",
    },
    StepDefinition {
        name: "Cibil Score",
        field: Field::CibilScore,
        kind: StepKind::Numeric(cibil_range),
        placeholder: "Enter your CIBIL score (0-900)",
        error_message: "Please enter a number between 0 and 900",
    },
    StepDefinition {
        name: "Residential Assets Value",
        field: Field::ResidentialAssetsValue,
        kind: StepKind::Numeric(any_number),
        placeholder: "Enter residential assets value (can be negative)",
        error_message: "Please enter a number",
    },
    StepDefinition {
        name: "Commercial Assets Value",
        field: Field::CommercialAssetsValue,
        kind: StepKind::Numeric(non_negative),
        placeholder: "Enter commercial assets value (non-negative)",
        error_message: "Please enter a non-negative integer",
    },
    StepDefinition {
        name: "Luxury Assets Value",
        field: Field::LuxuryAssetsValue,
        kind: StepKind::Numeric(non_negative),
        placeholder: "Enter luxury assets value (non-negative)",
        error_message: "Please enter a non-negative integer",
    },
    StepDefinition {
        name: "Bank Asset Value",
        field: Field::BankAssetValue,
        kind: StepKind::Numeric(non_negative),
        placeholder: "Enter bank asset value (non-negative)",
        error_message: "Please enter a non-negative integer",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_order_matches_field_order() {
        for (i, step) in STEPS.iter().enumerate() {
            assert_eq!(step.field, Field::ALL[i]);
            assert_eq!(step.field.step().name, step.name);
        }
    }

    #[test]
    fn dependents_boundaries() {
        let step = Field::NoOfDependents.step();
        assert_eq!(step.validate("0"), Ok(ParsedValue::Number(0.0)));
        assert_eq!(step.validate("5"), Ok(ParsedValue::Number(5.0)));
        assert_eq!(step.validate("-1"), Err("Please enter a number between 0 and 5"));
        assert_eq!(step.validate("6"), Err("Please enter a number between 0 and 5"));
    }

    #[test]
    fn numeric_boundaries_for_every_ranged_step() {
        let cases: &[(Field, &str, &str, &str)] = &[
            // (field, passes, passes, fails)
            (Field::LoanTerm, "1", "20", "21"),
            (Field::LoanTerm, "0.5", "20", "0"),
            (Field::CibilScore, "0", "900", "901"),
            (Field::CibilScore, "0", "900", "-1"),
            (Field::IncomeAnnum, "1", "1000000", "0"),
            (Field::LoanAmount, "1", "1000000", "-5"),
            (Field::CommercialAssetsValue, "0", "10", "-1"),
            (Field::LuxuryAssetsValue, "0", "10", "-1"),
            (Field::BankAssetValue, "0", "10", "-1"),
        ];
        for &(field, ok_a, ok_b, bad) in cases {
            let step = field.step();
            assert!(step.validate(ok_a).is_ok(), "{field} should accept {ok_a}");
            assert!(step.validate(ok_b).is_ok(), "{field} should accept {ok_b}");
            assert_eq!(step.validate(bad), Err(step.error_message), "{field} should reject {bad}");
        }
    }

    #[test]
    fn residential_accepts_negative_but_not_garbage() {
        let step = Field::ResidentialAssetsValue.step();
        assert_eq!(step.validate("-250000"), Ok(ParsedValue::Number(-250000.0)));
        assert!(step.validate("1e6").is_ok());
        assert!(step.validate("abc").is_err());
        assert!(step.validate("").is_err());
        assert!(step.validate("inf").is_err());
    }

    #[test]
    fn choice_steps_are_case_insensitive() {
        let edu = Field::Education.step();
        assert_eq!(edu.validate("Graduate"), Ok(ParsedValue::Choice("graduate")));
        assert_eq!(edu.validate("graduate"), Ok(ParsedValue::Choice("graduate")));
        assert_eq!(edu.validate("  NOT GRADUATE "), Ok(ParsedValue::Choice("not graduate")));
        assert_eq!(edu.validate("phd"), Err(edu.error_message));

        let se = Field::SelfEmployed.step();
        assert!(se.validate("YES").is_ok());
        assert!(se.validate("No").is_ok());
        assert!(se.validate("maybe").is_err());
        assert!(se.validate("").is_err());
    }

    #[test]
    fn field_keys_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_key(field.key()), Some(field));
        }
        assert_eq!(Field::from_key("unknown"), None);
    }
}
