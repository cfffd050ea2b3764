//! `loan-wizard` library crate.
//!
//! The binary (`loan`) is a thin wrapper around this library so that:
//!
//! - the step machine and feature derivation are testable without a terminal
//! - the predictor client can be swapped for a stub behind `Predictor`

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod predictor;
pub mod report;
pub mod tui;
pub mod wizard;
