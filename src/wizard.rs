//! Wizard controller: a linear step machine over the question table.
//!
//! ```text
//! Answering(0) -> ... -> Answering(N-1) -> Review -> (submitting) -> Result
//! ```
//!
//! `next` is guarded by the current step's validation; `back` never loses
//! answers. Submission is split into `begin_submit` / `finish_submit` so the
//! prediction call can run off the UI thread. Only one submission may be in
//! flight: `begin_submit` hands out a ticket and refuses while one is
//! outstanding, and `finish_submit` ignores tickets it did not issue last.

use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{Answers, FeatureError, FeatureVector, STEP_COUNT, STEPS, StepDefinition};
use crate::predictor::{PredictError, Predictor};

/// Shown on the result view when the service gave no verdict.
pub const NO_RESULT: &str = "No result found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Answering(usize),
    Review,
    Result,
}

impl Phase {
    /// Position in `[0, N + 1]`; `N` is review and `N + 1` is result.
    pub fn index(self) -> usize {
        match self {
            Phase::Answering(i) => i,
            Phase::Review => STEP_COUNT,
            Phase::Result => STEP_COUNT + 1,
        }
    }
}

/// Proof of an in-flight submission. Not `Clone`: each ticket is finished
/// at most once.
#[derive(Debug, PartialEq, Eq)]
pub struct SubmitTicket(u64);

/// Everything a caller needs to perform the prediction call.
#[derive(Debug)]
pub struct Submission {
    pub ticket: SubmitTicket,
    pub features: FeatureVector,
}

#[derive(Debug, Error, PartialEq)]
pub enum SubmitRejected {
    #[error("submit is only available from the review step")]
    NotAtReview,
    #[error("a submission is already in flight")]
    InFlight,
    #[error(transparent)]
    Incomplete(#[from] FeatureError),
}

#[derive(Debug, Clone, Default)]
pub struct WizardState {
    phase: PhaseSlot,
    answers: Answers,
    error: Option<String>,
    in_flight: Option<u64>,
    issued: u64,
    result: Option<String>,
    submitted: Option<FeatureVector>,
    completed_at: Option<DateTime<Local>>,
}

// `Phase` has no natural default; keep `WizardState: Default` readable.
#[derive(Debug, Clone, Copy)]
struct PhaseSlot(Phase);

impl Default for PhaseSlot {
    fn default() -> Self {
        Self(Phase::Answering(0))
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase.0
    }

    pub fn step_index(&self) -> usize {
        self.phase().index()
    }

    /// The step being answered, if any.
    pub fn current_step(&self) -> Option<&'static StepDefinition> {
        match self.phase() {
            Phase::Answering(i) => STEPS.get(i),
            _ => None,
        }
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Verdict from the last successful submission (`None` if the service
    /// answered without one).
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// Text for the result view.
    pub fn result_text(&self) -> &str {
        self.result.as_deref().unwrap_or(NO_RESULT)
    }

    pub fn submitted_features(&self) -> Option<&FeatureVector> {
        self.submitted.as_ref()
    }

    pub fn completed_at(&self) -> Option<DateTime<Local>> {
        self.completed_at
    }

    /// Raw text currently stored for the active step.
    pub fn current_input(&self) -> &str {
        self.current_step()
            .and_then(|s| self.answers.get(s.field))
            .unwrap_or("")
    }

    /// Replace the raw text of the active step. Ignored outside answering.
    pub fn set_input(&mut self, text: impl Into<String>) {
        if let Some(step) = self.current_step() {
            self.answers.set(step.field, text);
        }
    }

    /// Validate the active step and advance. Returns whether the phase changed.
    pub fn next(&mut self) -> bool {
        let Some(step) = self.current_step() else {
            return false;
        };
        let Phase::Answering(i) = self.phase() else {
            return false;
        };

        let raw = self.answers.get(step.field).unwrap_or("");
        if let Err(message) = step.validate(raw) {
            debug!(field = %step.field, "validation failed");
            self.error = Some(message.to_string());
            return false;
        }

        self.error = None;
        self.phase.0 = if i + 1 < STEP_COUNT {
            Phase::Answering(i + 1)
        } else {
            Phase::Review
        };
        debug!(step = self.step_index(), "advanced");
        true
    }

    /// Go back one step. Not available at the first step, while submitting,
    /// or from the result view. Any error belongs to the step being left and
    /// is cleared.
    pub fn back(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        let target = match self.phase() {
            Phase::Answering(0) | Phase::Result => return false,
            Phase::Answering(i) => Phase::Answering(i - 1),
            Phase::Review => Phase::Answering(STEP_COUNT - 1),
        };
        self.phase.0 = target;
        self.error = None;
        debug!(step = self.step_index(), "went back");
        true
    }

    /// Start a submission: derive the features and mark the state as in flight.
    pub fn begin_submit(&mut self) -> Result<Submission, SubmitRejected> {
        if self.phase() != Phase::Review {
            return Err(SubmitRejected::NotAtReview);
        }
        if self.is_submitting() {
            warn!("submit pressed while a submission is in flight");
            return Err(SubmitRejected::InFlight);
        }

        let features = match FeatureVector::from_answers(&self.answers) {
            Ok(f) => f,
            Err(err) => {
                self.error = Some(format!("Error: {err}"));
                return Err(err.into());
            }
        };

        self.issued += 1;
        self.in_flight = Some(self.issued);
        self.error = None;
        info!(ticket = self.issued, "submission started");
        Ok(Submission {
            ticket: SubmitTicket(self.issued),
            features,
        })
    }

    /// Apply the outcome of a submission. Returns `false` for stale tickets.
    pub fn finish_submit(
        &mut self,
        ticket: SubmitTicket,
        features: FeatureVector,
        outcome: Result<Option<String>, PredictError>,
    ) -> bool {
        if self.in_flight != Some(ticket.0) || self.phase() != Phase::Review {
            debug!(ticket = ticket.0, "ignoring stale submission outcome");
            return false;
        }
        self.in_flight = None;

        match outcome {
            Ok(verdict) => {
                info!(verdict = verdict.as_deref().unwrap_or("<none>"), "submission finished");
                self.result = verdict;
                self.submitted = Some(features);
                self.completed_at = Some(Local::now());
                self.error = None;
                self.phase.0 = Phase::Result;
            }
            Err(err) => {
                warn!(error = %err, "submission failed");
                self.error = Some(format!("Error: {err}"));
            }
        }
        true
    }

    /// Begin, call and finish in one go on the current thread.
    pub fn submit<P: Predictor + ?Sized>(&mut self, predictor: &P) -> Result<(), SubmitRejected> {
        let Submission { ticket, features } = self.begin_submit()?;
        let outcome = predictor.predict(&features);
        self.finish_submit(ticket, features, outcome);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Field;
    use std::cell::Cell;

    const SAMPLE: [&str; STEP_COUNT] = [
        "2", "graduate", "no", "100000", "50000", "10", "750", "20000", "0", "10000", "5000",
    ];

    struct Fixed(Option<&'static str>);

    impl Predictor for Fixed {
        fn predict(&self, _: &FeatureVector) -> Result<Option<String>, PredictError> {
            Ok(self.0.map(str::to_string))
        }
    }

    struct Failing;

    impl Predictor for Failing {
        fn predict(&self, _: &FeatureVector) -> Result<Option<String>, PredictError> {
            Err(PredictError::Decode("connection reset".to_string()))
        }
    }

    struct Counting(Cell<usize>);

    impl Predictor for Counting {
        fn predict(&self, _: &FeatureVector) -> Result<Option<String>, PredictError> {
            self.0.set(self.0.get() + 1);
            Ok(Some("Approved".to_string()))
        }
    }

    fn at_review() -> WizardState {
        let mut w = WizardState::new();
        for value in SAMPLE {
            w.set_input(value);
            assert!(w.next(), "step {} rejected {value}", w.step_index());
        }
        assert_eq!(w.phase(), Phase::Review);
        w
    }

    #[test]
    fn starts_fresh() {
        let w = WizardState::new();
        assert_eq!(w.phase(), Phase::Answering(0));
        assert!(w.answers().is_empty());
        assert_eq!(w.error(), None);
        assert!(!w.is_submitting());
        assert_eq!(w.result(), None);
    }

    #[test]
    fn invalid_answer_blocks_and_sets_message() {
        let mut w = WizardState::new();
        w.set_input("6");
        assert!(!w.next());
        assert_eq!(w.phase(), Phase::Answering(0));
        assert_eq!(w.error(), Some("Please enter a number between 0 and 5"));

        w.set_input("5");
        assert!(w.next());
        assert_eq!(w.phase(), Phase::Answering(1));
        assert_eq!(w.error(), None);
    }

    #[test]
    fn empty_answer_is_rejected() {
        let mut w = WizardState::new();
        assert!(!w.next());
        assert!(w.error().is_some());
    }

    #[test]
    fn back_preserves_answers() {
        let mut w = WizardState::new();
        w.set_input("3");
        assert!(w.next());
        w.set_input("Graduate");
        assert!(w.next());
        assert!(w.back());
        assert_eq!(w.current_input(), "Graduate");
        assert!(w.back());
        assert_eq!(w.current_input(), "3");
        assert!(!w.back(), "no step before the first");
    }

    #[test]
    fn back_clears_the_error_of_the_step_left() {
        let mut w = WizardState::new();
        w.set_input("1");
        assert!(w.next());
        w.set_input("phd");
        assert!(!w.next());
        assert!(w.error().is_some());
        assert!(w.back());
        assert_eq!(w.error(), None);
        assert_eq!(w.current_input(), "1");
    }

    #[test]
    fn back_from_review_returns_to_last_step() {
        let mut w = at_review();
        assert!(w.back());
        assert_eq!(w.phase(), Phase::Answering(STEP_COUNT - 1));
        assert_eq!(w.current_input(), "5000");
        assert!(w.next());
        assert_eq!(w.phase(), Phase::Review);
    }

    #[test]
    fn success_advances_one_past_review() {
        let mut w = at_review();
        w.submit(&Fixed(Some("Approved"))).unwrap();
        assert_eq!(w.step_index(), STEP_COUNT + 1);
        assert_eq!(w.phase(), Phase::Result);
        assert_eq!(w.result_text(), "Approved");
        assert!(!w.is_submitting());
        assert!(w.completed_at().is_some());
        assert_eq!(w.submitted_features().unwrap().cibil_bucket(), 2.0);
        assert!(!w.back(), "result is terminal");
    }

    #[test]
    fn missing_verdict_renders_fallback() {
        let mut w = at_review();
        w.submit(&Fixed(None)).unwrap();
        assert_eq!(w.phase(), Phase::Result);
        assert_eq!(w.result_text(), NO_RESULT);
    }

    #[test]
    fn failure_stays_at_review_with_error() {
        let mut w = at_review();
        w.submit(&Failing).unwrap();
        assert_eq!(w.phase(), Phase::Review);
        assert!(!w.is_submitting());
        let err = w.error().unwrap();
        assert!(err.starts_with("Error: "), "{err}");
        assert!(err.contains("connection reset"), "{err}");

        // Manual retry succeeds.
        w.submit(&Fixed(Some("Rejected"))).unwrap();
        assert_eq!(w.result_text(), "Rejected");
        assert_eq!(w.error(), None);
    }

    #[test]
    fn second_submit_while_in_flight_is_rejected() {
        let mut w = at_review();
        let first = w.begin_submit().unwrap();
        assert!(w.is_submitting());
        assert_eq!(w.begin_submit().unwrap_err(), SubmitRejected::InFlight);
        assert!(!w.back(), "back is disabled while submitting");

        let counting = Counting(Cell::new(0));
        assert_eq!(w.submit(&counting), Err(SubmitRejected::InFlight));
        assert_eq!(counting.0.get(), 0);

        let outcome = Fixed(Some("Approved")).predict(&first.features);
        assert!(w.finish_submit(first.ticket, first.features, outcome));
        assert_eq!(w.phase(), Phase::Result);
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let mut w = at_review();
        let first = w.begin_submit().unwrap();
        let features = first.features;
        assert!(w.finish_submit(first.ticket, features, Err(PredictError::Decode("x".into()))));

        let second = w.begin_submit().unwrap();
        assert!(!w.finish_submit(SubmitTicket(1), features, Ok(Some("Approved".into()))));
        assert!(w.is_submitting());
        assert!(w.finish_submit(second.ticket, features, Ok(Some("Rejected".into()))));
        assert_eq!(w.result_text(), "Rejected");
    }

    #[test]
    fn submit_outside_review_is_rejected() {
        let mut w = WizardState::new();
        assert_eq!(w.begin_submit().unwrap_err(), SubmitRejected::NotAtReview);
    }

    #[test]
    fn input_is_ignored_outside_answering() {
        let mut w = at_review();
        w.set_input("junk");
        assert_eq!(w.answers().len(), STEP_COUNT);
        assert_eq!(w.answers().get(Field::BankAssetValue), Some("5000"));
        assert!(!w.next());
    }
}
