//! # drep - Service Delivery Task Report
//!
//! A command-line reporting tool for CSV exports of completed service-delivery tasks.
//! It filters the export by year, month, day and owner and summarises the result per
//! team member, including escalation metrics.
//!
//! ## Key Features
//!
//! - **Per-owner grouping**: task-type breakdown, completed totals and a grand total
//! - **Escalation metrics**: escalated tasks, and escalated tasks only picked up after
//!   the escalation
//! - **Calendar filters**: year, month and day options derived from the export itself
//! - **Team roster**: the "All" owner view only lists recognised team members
//! - **Multiple outputs**: text, JSON, CSV summary export, and an interactive TUI with
//!   collapsible owner groups
//!
//! ## Quick Start
//!
//! ```bash
//! # Latest month of the current year, all rostered owners
//! drep report tasks.csv
//!
//! # A specific day with task rows expanded
//! drep report tasks.csv --year 2024 --month "March 2024" --day 05 --expand
//!
//! # What can be selected
//! drep options tasks.csv
//!
//! # Browse interactively
//! drep ui tasks.csv
//! ```
//!
//! Rows without a parseable `Actual Complete Date` or a `Task Owner` are skipped.
//! Run with `-v` to see how many.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub mod cli;
pub mod cmd;
pub mod config;
pub mod dataset;
pub mod error;
pub mod fields;
pub mod filter;
pub mod render;
pub mod report;
pub mod session;
pub mod source;
pub mod task;
pub mod temporal;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod run;
}

use cli::Cli;
use cmd::*;

/// Log filter: a valid `RUST_LOG` wins, otherwise the `-v` count picks a level.
fn log_filter(verbose: u8) -> EnvFilter {
    std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| {
            let level = match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            };
            EnvFilter::new(format!("drep={level}"))
        })
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_filter(cli.verbose))
        .init();

    let roster = cli.roster.as_deref();
    let result = match &cli.command {
        Commands::Report { input, selection, expand, no_escalation, format } =>
            cmd_report(roster, input, selection, *expand, *no_escalation, *format),

        Commands::Options { input, selection } => cmd_options(roster, input, selection),

        Commands::Export { input, output, selection } =>
            cmd_export(roster, input, output.clone(), selection),

        Commands::Ui { input, selection } => cmd_ui(roster, input, selection),

        Commands::Completions { shell } => {
            cmd_completions(*shell);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
