use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod catalog;
mod cli;
mod commands;
mod domain;
mod services;

pub use catalog::Catalog;
pub use cli::{CatalogCommands, Cli, Commands, ReportInput};
pub use commands::{handle_catalog_commands, handle_runtime_commands, Context};
pub use domain::models::{CatalogIssue, CatalogReport, InvalidInput, SavedSession, SessionView};
pub use services::config::{catalog_path, confusion_path, load_config, pass_policy};
pub use services::confusion::ConfusionMap;
pub use services::engine::{AnswerMode, ClassificationState, Session, SessionError, Step};
pub use services::output::{print_error, print_one, print_out};
pub use services::provider::{drive, ScriptedProvider, TerminalProvider};
pub use services::questions::{hazards_by_code, keyword_questions, upstream_questions};
pub use services::reporter::{build_report, export, import, parse_export, render_text};
pub use services::storage::{audit, load_session, new_session_id, save_session};
pub use services::tokenizer::tokenize;

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("HAZID_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let ctx = Context {
        json: cli.json,
        catalog_path: catalog_path(&config, cli.catalog.as_deref()),
        confusion_path: confusion_path(&config, cli.confusion.as_deref()),
        config,
    };
    handle_runtime_commands(&ctx, &cli.command)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            print_error(cli.json, &e);
            ExitCode::FAILURE
        }
    }
}
