//! Domain types for the loan application.
//!
//! This module defines:
//!
//! - the fixed question table (`Field`, `StepDefinition`, `STEPS`)
//! - the raw answer map collected by the wizard (`Answers`)
//! - the derived payload sent to the predictor (`FeatureVector`)

pub mod answers;
pub mod features;
pub mod steps;

pub use answers::*;
pub use features::*;
pub use steps::*;
