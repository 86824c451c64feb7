//! Command implementations for the CLI interface.
//!
//! Each handler loads the export into a [`Session`], applies the selection flags on top
//! of the default selection, and hands the resulting report to a renderer.

use std::io;
use std::path::{Path, PathBuf};

use clap::{Args, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use serde::Serialize;
use tracing::info;

use crate::cli::Cli;
use crate::config::Roster;
use crate::dataset::LoadSummary;
use crate::error::{Error, Result};
use crate::fields::OutputFormat;
use crate::filter::{DayFilter, MonthFilter, OwnerFilter, Selection};
use crate::render::{format_options, format_report, summary_csv, TextView};
use crate::report::Report;
use crate::session::Session;
use crate::tui::run::run_report_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Print the per-owner report for a task export.
    Report {
        /// CSV export to read.
        input: PathBuf,
        #[command(flatten)]
        selection: SelectionArgs,
        /// Show type breakdown and task rows under each owner.
        #[arg(long)]
        expand: bool,
        /// Leave out escalation metrics.
        #[arg(long)]
        no_escalation: bool,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List the selectable years, months, days and owners.
    Options {
        /// CSV export to read.
        input: PathBuf,
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Write the per-owner summary to a CSV file.
    Export {
        /// CSV export to read.
        input: PathBuf,
        /// Output file path (default: delivery_summary.csv)
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Browse the report interactively.
    Ui {
        /// CSV export to read.
        input: PathBuf,
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Selection overrides shared by the data commands.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Year; defaults to the current year when the export has it.
    #[arg(long)]
    pub year: Option<i32>,
    /// Month label such as "March 2024", or All; defaults to the latest month.
    #[arg(long)]
    pub month: Option<MonthFilter>,
    /// Day of month, or All.
    #[arg(long)]
    pub day: Option<DayFilter>,
    /// Owner name, or All for every rostered owner.
    #[arg(long)]
    pub owner: Option<OwnerFilter>,
    /// Ignore the day dimension entirely.
    #[arg(long)]
    pub no_day_filter: bool,
}

impl SelectionArgs {
    /// Apply overrides in dependency order: year and month reset the day.
    pub fn apply(&self, session: &mut Session) {
        if let Some(year) = self.year {
            session.set_year(Some(year));
        }
        if let Some(month) = &self.month {
            session.set_month(month.clone());
        }
        if let Some(day) = &self.day {
            session.set_day(day.clone());
        }
        if let Some(owner) = &self.owner {
            session.set_owner(owner.clone());
        }
        session.filter_options.day_filter = !self.no_day_filter;
    }
}

/// Build a session from the roster option and an export.
pub fn open_session(
    roster: Option<&Path>,
    input: &Path,
    selection: &SelectionArgs,
) -> Result<(Session, LoadSummary)> {
    let mut session = Session::new(Roster::load_or_default(roster)?);
    let summary = session.load_file(input)?;
    if summary.rows_dropped > 0 {
        info!(dropped = summary.rows_dropped, "rows without a complete date or owner were skipped");
    }
    selection.apply(&mut session);
    Ok((session, summary))
}

#[derive(Serialize)]
struct JsonReport<'a> {
    selection: &'a Selection,
    load: LoadSummary,
    report: &'a Report,
}

/// Print the grouped report.
pub fn cmd_report(
    roster: Option<&Path>,
    input: &Path,
    selection: &SelectionArgs,
    expand: bool,
    no_escalation: bool,
    format: OutputFormat,
) -> Result<()> {
    let (mut session, load) = open_session(roster, input, selection)?;
    session.aggregate_options.escalation_metrics = !no_escalation;
    session.aggregate_options.task_details = expand || format == OutputFormat::Json;

    let report = session.report();
    match format {
        OutputFormat::Text => {
            let view = TextView { expand, escalation: !no_escalation };
            print!("{}", format_report(&report, session.selection(), view));
        }
        OutputFormat::Json => {
            let doc = JsonReport { selection: session.selection(), load, report: &report };
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }
    Ok(())
}

/// Print the option lists a user can choose from.
pub fn cmd_options(roster: Option<&Path>, input: &Path, selection: &SelectionArgs) -> Result<()> {
    let (session, _) = open_session(roster, input, selection)?;
    print!("{}", format_options(&session));
    Ok(())
}

/// Export the per-owner summary for the selection to CSV.
pub fn cmd_export(
    roster: Option<&Path>,
    input: &Path,
    output: Option<PathBuf>,
    selection: &SelectionArgs,
) -> Result<()> {
    let output_path = output.unwrap_or_else(|| PathBuf::from("delivery_summary.csv"));
    let (mut session, _) = open_session(roster, input, selection)?;
    session.aggregate_options.task_details = false;
    let report = session.report();

    std::fs::write(&output_path, summary_csv(&report)).map_err(|source| Error::Write {
        path: output_path.clone(),
        source,
    })?;
    println!("Exported {} owner(s), {} task(s) to {}", report.owners.len(), report.total_tasks, output_path.display());
    Ok(())
}

/// Launch the terminal user interface.
pub fn cmd_ui(roster: Option<&Path>, input: &Path, selection: &SelectionArgs) -> Result<()> {
    let (session, _) = open_session(roster, input, selection)?;
    run_report_tui(session)?;
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "drep", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parses_selection_flags() {
        let cli = Cli::try_parse_from([
            "drep", "report", "tasks.csv", "--year", "2024", "--month", "March 2024", "--day", "5",
            "--owner", "All", "--expand", "--format", "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Report { input, selection, expand, format, .. } => {
                assert_eq!(input, PathBuf::from("tasks.csv"));
                assert_eq!(selection.year, Some(2024));
                assert_eq!(selection.month, Some(MonthFilter::Label("March 2024".to_string())));
                assert_eq!(selection.day, Some(DayFilter::Day("05".to_string())));
                assert_eq!(selection.owner, Some(OwnerFilter::All));
                assert!(expand);
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected report command"),
        }
    }

    #[test]
    fn test_cli_rejects_bad_day() {
        assert!(Cli::try_parse_from(["drep", "report", "tasks.csv", "--day", "40"]).is_err());
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_export_writes_summary() {
        let dir = std::env::temp_dir().join(format!("drep_export_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("tasks.csv");
        let output = dir.join("summary.csv");
        std::fs::write(
            &input,
            "Actual Complete Date,Task Owner,Service Delivery Order - Customer PON,Task Type,Escalated Task?\n\
             2024-03-05,Tim Corey,PON-1,Install,Yes\n\
             2024-03-06,Tim Corey,PON-2,Repair,No\n",
        )
        .unwrap();

        let selection = SelectionArgs { year: Some(2024), ..SelectionArgs::default() };
        cmd_export(None, &input, Some(output.clone()), &selection).unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.contains("Tim Corey,2,1,0,Install: 1; Repair: 1"));
        assert!(written.contains("Total,2,,,"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_open_session_reports_load_summary() {
        let dir = std::env::temp_dir().join(format!("drep_open_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("tasks.csv");
        std::fs::write(
            &input,
            "Actual Complete Date,Task Owner,Service Delivery Order - Customer PON\n\
             2024-03-05,Tim Corey,\n\
             ,Tim Corey,PON-2\n",
        )
        .unwrap();

        let selection = SelectionArgs { year: Some(2024), ..SelectionArgs::default() };
        let (session, load) = open_session(None, &input, &selection).unwrap();
        assert_eq!(load, LoadSummary { rows_read: 2, rows_kept: 1, rows_dropped: 1 });
        assert_eq!(session.selection().year, Some(2024));
        assert_eq!(session.tasks().len(), 1);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_input_is_read_error() {
        let err = cmd_options(None, Path::new("/nonexistent/drep/tasks.csv"), &SelectionArgs::default()).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }
}
