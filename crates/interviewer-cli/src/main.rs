//! interviewer CLI — an interactive, LLM-graded Excel mock interview.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod console;

#[derive(Parser)]
#[command(name = "interviewer", version, about = "LLM-graded Excel mock interviewer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    interview: InterviewArgs,
}

#[derive(clap::Args)]
struct InterviewArgs {
    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory transcripts are written to (overrides config)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Seed for question selection, for reproducible sessions
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interview (the default)
    Interview {
        #[command(flatten)]
        args: InterviewArgs,
    },

    /// List the question bank
    Questions {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and secrets files
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        None => commands::interview::execute(cli.interview.into()).await,
        Some(Commands::Interview { args }) => commands::interview::execute(args.into()).await,
        Some(Commands::Questions { config }) => commands::questions::execute(config),
        Some(Commands::Init) => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

impl From<InterviewArgs> for commands::interview::Options {
    fn from(args: InterviewArgs) -> Self {
        Self {
            config: args.config,
            output: args.output,
            seed: args.seed,
        }
    }
}
