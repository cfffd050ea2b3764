//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - initializes logging
//! - resolves the predictor endpoint
//! - runs the TUI or one of the scripting commands

use clap::Parser;
use tracing::info;

use crate::cli::{Command, FeaturesArgs, PredictArgs, WizardArgs};
use crate::error::AppError;
use crate::predictor::{PredictorClient, PredictorConfig};

pub mod logging;
pub mod pipeline;

/// Entry point for the `loan` binary.
pub fn run() -> Result<(), AppError> {
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let interactive = matches!(cli.command, Command::Wizard(_));
    logging::init(interactive)?;

    match cli.command {
        Command::Wizard(args) => handle_wizard(args),
        Command::Predict(args) => handle_predict(args),
        Command::Features(args) => handle_features(args),
    }
}

fn handle_wizard(args: WizardArgs) -> Result<(), AppError> {
    let config = PredictorConfig::from_env(args.endpoint.predictor_url.as_deref())?;
    info!(url = %config.predict_url(), "launching wizard");
    crate::tui::run(config)
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let answers = pipeline::load_answers(&args.answers)?;
    let config = PredictorConfig::from_env(args.endpoint.predictor_url.as_deref())?;
    let client = PredictorClient::new(&config);

    let state = pipeline::run_wizard(&answers, &client)?;
    println!("{}", crate::report::format_verdict(&state));
    Ok(())
}

fn handle_features(args: FeaturesArgs) -> Result<(), AppError> {
    let answers = pipeline::load_answers(&args.answers)?;
    let features = pipeline::derive_features(&answers)?;

    if args.json {
        println!("{}", crate::report::format_request_json(&features)?);
    } else {
        println!("{}", crate::report::format_features(&features));
    }
    Ok(())
}

/// Rewrite argv so `loan` defaults to `loan wizard`.
///
/// Rules:
/// - `loan`                        -> `loan wizard`
/// - `loan --predictor-url URL`    -> `loan wizard --predictor-url URL`
/// - `loan --help/--version/-h`    -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("wizard".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "wizard" | "predict" | "features");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "wizard".to_string());
        return argv;
    }

    argv
}
