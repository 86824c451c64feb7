use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Summarise a completed-task export per owner.
/// The owner roster defaults to the built-in team list or a JSON file passed via --roster.
#[derive(Parser)]
#[command(name = "drep", version, about = "Service delivery task report CLI")]
pub struct Cli {
    /// JSON roster file replacing the built-in team list.
    #[arg(long, global = true)]
    pub roster: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}
