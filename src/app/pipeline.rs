//! Shared answer handling for the non-interactive commands.
//!
//! `predict` replays the answers through the same `WizardState` the TUI
//! uses, so validation, feature derivation and submission behave identically:
//! answers -> step-by-step validation -> review -> submit -> verdict

use std::fs;

use tracing::debug;

use crate::cli::AnswerArgs;
use crate::domain::{Answers, FeatureVector, STEPS};
use crate::error::AppError;
use crate::predictor::Predictor;
use crate::wizard::{Phase, WizardState};

/// Read answers from `--answers` (if given), then apply `--set` overrides.
pub fn load_answers(args: &AnswerArgs) -> Result<Answers, AppError> {
    let mut answers = match &args.answers {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|e| {
                AppError::usage(format!("Failed to read answers '{}': {e}", path.display()))
            })?;
            Answers::from_json(&json).map_err(AppError::usage)?
        }
        None => Answers::new(),
    };

    let overrides = Answers::from_pairs(args.set.iter().map(String::as_str)).map_err(AppError::usage)?;
    for (field, value) in overrides.iter() {
        answers.set(field, value);
    }

    debug!(count = answers.len(), "loaded answers");
    Ok(answers)
}

/// Validate every step, reporting all problems at once.
pub fn check_answers(answers: &Answers) -> Result<(), AppError> {
    let problems: Vec<String> = STEPS
        .iter()
        .filter_map(|step| match answers.get(step.field) {
            None => Some(format!("- {}: missing ({})", step.field, step.placeholder)),
            Some(raw) => step
                .validate(raw)
                .err()
                .map(|msg| format!("- {}: '{}': {msg}", step.field, raw.trim())),
        })
        .collect();

    if problems.is_empty() {
        Ok(())
    } else {
        Err(AppError::usage(format!("Invalid answers:\n{}", problems.join("\n"))))
    }
}

pub fn derive_features(answers: &Answers) -> Result<FeatureVector, AppError> {
    check_answers(answers)?;
    Ok(FeatureVector::from_answers(answers)?)
}

/// Drive a fresh wizard through every step and submit it.
///
/// Returns the finished state (at `Phase::Result`); submission failures are
/// returned as runtime errors carrying the wizard's error text.
pub fn run_wizard<P: Predictor + ?Sized>(
    answers: &Answers,
    predictor: &P,
) -> Result<WizardState, AppError> {
    check_answers(answers)?;

    let mut state = WizardState::new();
    for step in &STEPS {
        state.set_input(answers.get(step.field).unwrap_or(""));
        if !state.next() {
            let msg = state.error().unwrap_or(step.error_message);
            return Err(AppError::usage(format!("{}: {msg}", step.field)));
        }
    }

    state
        .submit(predictor)
        .map_err(|e| AppError::usage(e.to_string()))?;

    if state.phase() != Phase::Result {
        let msg = state.error().unwrap_or("Error: submission failed");
        return Err(AppError::runtime(msg.to_string()));
    }
    Ok(state)
}
