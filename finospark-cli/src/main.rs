//! Finospark CLI - receipts to ledger drafts, and goal planning

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{analyze, drafts, import, logs, plan};

/// Finospark - receipt imports and savings goals in your terminal
#[derive(Parser)]
#[command(name = "fsp", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract receipt fields from OCR text
    Analyze {
        /// Text file with the receipt's OCR output (reads stdin if omitted)
        file: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import a receipt payload as a transaction draft
    Import {
        /// JSON payload file (reads stdin if omitted)
        file: Option<PathBuf>,
        /// Preview without saving
        #[arg(long)]
        preview: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Plan the monthly SIP for a savings goal
    Plan {
        /// Target amount in rupees
        #[arg(long)]
        amount: Option<f64>,
        /// Horizon in years
        #[arg(long)]
        years: Option<f64>,
        /// Expected annual return in percent
        #[arg(long = "return")]
        expected_return: Option<f64>,
        /// Start from a preset goal (gadget, wedding, house)
        #[arg(long)]
        preset: Option<String>,
        /// List preset goals
        #[arg(long)]
        list_presets: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List stored transaction drafts
    Drafts {
        /// Include drafts of every user
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze { file, json } => analyze::run(file.as_deref(), json),
        Commands::Import { file, preview, json } => import::run(file.as_deref(), preview, json),
        Commands::Plan {
            amount,
            years,
            expected_return,
            preset,
            list_presets,
            json,
        } => plan::run(plan::PlanArgs {
            amount,
            years,
            expected_return,
            preset,
            list_presets,
            json,
        }),
        Commands::Drafts { all, json } => drafts::run(all, json),
        Commands::Logs { command } => logs::run(command),
    }
}
