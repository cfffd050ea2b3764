//! Command-line parsing for the loan approval wizard.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! wizard and the predictor client.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "loan", version, about = "Loan approval wizard backed by a remote predictor")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive wizard (default).
    Wizard(WizardArgs),
    /// Validate answers, call the predictor, and print the verdict.
    Predict(PredictArgs),
    /// Validate answers and print the derived feature vector (no network).
    Features(FeaturesArgs),
}

#[derive(Debug, Args, Clone, Default)]
pub struct EndpointArgs {
    /// Predictor base URL (overrides PREDICTOR_URL).
    #[arg(long, value_name = "URL")]
    pub predictor_url: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct WizardArgs {
    #[command(flatten)]
    pub endpoint: EndpointArgs,
}

/// Where non-interactive answers come from.
#[derive(Debug, Args, Clone, Default)]
pub struct AnswerArgs {
    /// JSON object of answers, e.g. `{"no_of_dependents": 2, "education": "graduate"}`.
    #[arg(long, value_name = "JSON")]
    pub answers: Option<PathBuf>,

    /// Set a single answer (`key=value`); repeatable, applied after `--answers`.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,
}

#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub answers: AnswerArgs,

    #[command(flatten)]
    pub endpoint: EndpointArgs,
}

#[derive(Debug, Args, Clone)]
pub struct FeaturesArgs {
    #[command(flatten)]
    pub answers: AnswerArgs,

    /// Print the request body (`{"features": [...]}`) instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_repeated_set_flags() {
        let cli = Cli::parse_from([
            "loan",
            "predict",
            "--set",
            "loan_term=10",
            "--set",
            "education=graduate",
            "--predictor-url",
            "http://127.0.0.1:9000",
        ]);
        let Command::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        assert_eq!(args.answers.set, vec!["loan_term=10", "education=graduate"]);
        assert_eq!(args.endpoint.predictor_url.as_deref(), Some("http://127.0.0.1:9000"));
    }
}
