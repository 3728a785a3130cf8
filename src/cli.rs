use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hazid", version, about = "Rules-based hazard identification for event reports")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        env = "HAZID_CATALOG",
        help = "Hazard definitions JSON (default: config or ./hazard_definitions.json)"
    )]
    pub catalog: Option<PathBuf>,
    #[arg(long, global = true, help = "Often-confused-with pairs JSON ({code: [codes]})")]
    pub confusion: Option<PathBuf>,
    #[arg(long, global = true, help = "Config file (default: ~/.config/hazid/config.toml)")]
    pub config: Option<PathBuf>,
    #[arg(short, long, global = true, help = "Debug logging on stderr")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ReportInput {
    #[arg(long, help = "Read the event report from a file")]
    pub report: Option<PathBuf>,
    #[arg(long, help = "Event report text")]
    pub text: Option<String>,
}

#[derive(Args, Debug)]
pub struct EngineArgs {
    #[arg(long, help = "Number of passes over the catalog (default 3)")]
    pub passes: Option<u32>,
    #[arg(long, conflicts_with = "passes", help = "Repeat passes until nothing changes")]
    pub until_stable: bool,
    #[arg(long, help = "Start from a previous JSON export of confirmed/rejected hazards")]
    pub seed: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a report interactively (prompts on stderr, answers on stdin)
    Run {
        #[command(flatten)]
        input: ReportInput,
        #[command(flatten)]
        engine: EngineArgs,
        #[arg(
            long,
            value_delimiter = ',',
            help = "Answer from this list instead of stdin, e.g. y,n,d,y"
        )]
        answers: Option<Vec<String>>,
        #[arg(
            long = "export",
            value_name = "PATH",
            help = "Also write confirmed/rejected hazards to a JSON file usable as --seed"
        )]
        export_to: Option<PathBuf>,
    },
    /// Start a resumable session and print its first question
    Start {
        #[command(flatten)]
        input: ReportInput,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Answer the pending question of a session
    Answer { session: String, answer: String },
    /// Show the pending question or final report of a session
    Status { session: String },
    /// List questions for every keyword hit in a report
    Questions {
        #[command(flatten)]
        input: ReportInput,
    },
    /// List follow-up questions implied by confirmed upstream hazards
    Refine {
        #[arg(long, value_delimiter = ',')]
        confirmed: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        rejected: Vec<String>,
    },
    /// Print the tokens a report text is split into
    Tokens { text: String },
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    List,
    Show {
        #[arg(required = true)]
        codes: Vec<String>,
    },
    Validate,
}
