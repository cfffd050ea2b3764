//! Raw answers keyed by field.
//!
//! The wizard stores exactly what the user typed; parsing happens on
//! validation and again at feature derivation. Answers can also be loaded
//! from a JSON object or `key=value` pairs for the non-interactive commands.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::steps::{Field, ParsedValue};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers {
    raw: BTreeMap<Field, String>,
}

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.raw.get(&field).map(String::as_str)
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.raw.insert(field, value.into());
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.raw.iter().map(|(f, v)| (*f, v.as_str()))
    }

    /// Validate a single answer with its step definition.
    pub fn parsed(&self, field: Field) -> Option<Result<ParsedValue, &'static str>> {
        self.get(field).map(|raw| field.step().validate(raw))
    }

    /// Build answers from `key=value` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = &'a str>) -> Result<Self, String> {
        let mut answers = Answers::new();
        for pair in pairs {
            let Some((key, value)) = pair.split_once('=') else {
                return Err(format!("Expected key=value, got '{pair}'."));
            };
            let field = Field::from_key(key)
                .ok_or_else(|| format!("Unknown field '{}'.", key.trim()))?;
            answers.set(field, value.trim());
        }
        Ok(answers)
    }

    /// Build answers from a JSON object. Numbers and strings are both accepted
    /// as values; unknown keys are rejected.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| format!("Invalid answers JSON: {e}"))?;
        let obj = value
            .as_object()
            .ok_or_else(|| "Answers JSON must be an object.".to_string())?;

        let mut answers = Answers::new();
        for (key, v) in obj {
            let field = Field::from_key(key).ok_or_else(|| format!("Unknown field '{key}'."))?;
            let raw = match v {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                other => return Err(format!("Field '{key}' has unsupported value {other}.")),
            };
            answers.set(field, raw);
        }
        Ok(answers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pairs_parses_keys_case_insensitively() {
        let answers = Answers::from_pairs(["EDUCATION=Graduate", "loan_term = 10"]).unwrap();
        assert_eq!(answers.get(Field::Education), Some("Graduate"));
        assert_eq!(answers.get(Field::LoanTerm), Some("10"));
        assert_eq!(answers.len(), 2);
    }

    #[test]
    fn from_pairs_rejects_unknown_and_malformed() {
        assert!(Answers::from_pairs(["salary=10"]).is_err());
        assert!(Answers::from_pairs(["loan_term"]).is_err());
    }

    #[test]
    fn from_json_accepts_numbers_and_strings() {
        let answers =
            Answers::from_json(r#"{"no_of_dependents": 2, "education": "graduate"}"#).unwrap();
        assert_eq!(answers.get(Field::NoOfDependents), Some("2"));
        assert_eq!(
            answers.parsed(Field::Education),
            Some(Ok(ParsedValue::Choice("graduate")))
        );
        assert!(Answers::from_json(r#"{"education": true}"#).is_err());
        assert!(Answers::from_json("[1, 2]").is_err());
    }
}
