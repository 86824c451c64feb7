//! Plain-text and CSV rendering of reports.
//!
//! Nothing here computes statistics; it only lays out what the aggregation produced.

use crate::filter::{DayFilter, Selection};
use crate::report::{OwnerReport, Report};
use crate::session::Session;
use crate::task::Task;

/// What the text report shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextView {
    /// Show each owner's type breakdown and task rows, not just the header line.
    pub expand: bool,
    pub escalation: bool,
}

impl Default for TextView {
    fn default() -> Self {
        TextView { expand: false, escalation: true }
    }
}

/// One-line description of a selection, as shown above a report.
pub fn describe_selection(selection: &Selection) -> String {
    let year = selection.year.map_or_else(|| "No year".to_string(), |y| y.to_string());
    let day = match &selection.day {
        DayFilter::All => "All Days".to_string(),
        DayFilter::Day(d) => format!("Day {d}"),
    };
    format!("{year} | {} | {day} | {}", selection.month, selection.owner)
}

/// Header line for an owner group.
pub fn owner_heading(owner: &OwnerReport, escalation: bool) -> String {
    if escalation {
        format!(
            "{} ({} completed | {} escalated | {} picked up after escalation)",
            owner.owner, owner.total_count, owner.escalated_count, owner.picked_after_escalation_count
        )
    } else {
        format!("{} ({} completed)", owner.owner, owner.total_count)
    }
}

/// Render the report as text, one group per owner, with a grand total footer.
pub fn format_report(report: &Report, selection: &Selection, view: TextView) -> String {
    let mut lines = vec![format!("Selection: {}", describe_selection(selection)), String::new()];

    if report.owners.is_empty() {
        lines.push("No tasks match the current selection.".to_string());
    }

    for owner in &report.owners {
        let marker = if view.expand { "[-]" } else { "[+]" };
        lines.push(format!("{marker} {}", owner_heading(owner, view.escalation)));
        if view.expand {
            lines.extend(owner_detail(owner, view.escalation));
        }
    }

    lines.push(String::new());
    lines.push(format!("Total Tasks: {}", report.total_tasks));
    finish(lines)
}

fn owner_detail(owner: &OwnerReport, escalation: bool) -> Vec<String> {
    let mut lines = vec![format!("    {:<30} {:>5}", "Task Type", "Count")];
    for entry in &owner.task_type_counts {
        lines.push(format!("    {:<30} {:>5}", truncate(&entry.task_type, 30), entry.count));
    }
    lines.push(format!("    {:<30} {:>5}", "Total Completed", owner.total_count));

    if escalation {
        lines.push(String::new());
        lines.push("    Escalation Orders".to_string());
        lines.push(format!("    {:<30} {:>5}", "Picked up after escalation", owner.picked_after_escalation_count));
        lines.push(format!("    {:<30} {:>5}", "Total escalation completed", owner.escalated_count));
    }

    if !owner.tasks.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "    {:<2} {:<18} {:<16} {:<20} {:<9} {:<20} {}",
            "", "Order Name", "Task Type", "Complete Date", "Escalated", "Escalation Time", "Assignment Date"
        ));
        lines.extend(owner.tasks.iter().map(|task| format!("    {}", task_row(task))));
    }
    lines.push(String::new());
    lines
}

/// Join lines, ending with a newline.
fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Detail row for one task. Late pickups are flagged with `!`.
pub fn task_row(task: &Task) -> String {
    let flag = if task.picked_after_escalation() { "!" } else { "" };
    format!(
        "{:<2} {:<18} {:<16} {:<20} {:<9} {:<20} {}",
        flag,
        truncate(&task.order_name, 18),
        truncate(&task.task_type, 16),
        truncate(&task.raw.complete_date, 20),
        truncate(&task.raw.escalated, 9),
        truncate(&task.raw.escalation_time, 20),
        task.raw.assignment_date
    )
}

/// The selectable values for the session's current state.
pub fn format_options(session: &Session) -> String {
    let index = session.index();
    let years: Vec<String> = index.years.iter().map(|y| y.to_string()).collect();
    finish(vec![
        format!("Years:  {}", join_or_dash(&years)),
        format!("Months: All, {}", join_or_dash(&index.month_labels)),
        format!("Days:   All, {}", join_or_dash(session.days())),
        format!("Owners: All, {}", join_or_dash(&session.roster().members)),
        String::new(),
        format!("Selection: {}", describe_selection(session.selection())),
    ])
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

/// Per-owner summary as CSV, followed by a total row.
pub fn summary_csv(report: &Report) -> String {
    let mut csv = String::new();
    csv.push_str("Owner,Total Completed,Escalated,Picked Up After Escalation,Task Types\n");
    for owner in &report.owners {
        let types: Vec<String> = owner
            .task_type_counts
            .iter()
            .map(|c| format!("{}: {}", c.task_type, c.count))
            .collect();
        csv.push_str(&format!(
            "{},{},{},{},{}\n",
            escape_csv(&owner.owner),
            owner.total_count,
            owner.escalated_count,
            owner.picked_after_escalation_count,
            escape_csv(&types.join("; "))
        ));
    }
    csv.push_str(&format!("Total,{},,,\n", report.total_tasks));
    csv
}

/// Quote a CSV field when it contains a separator, quote or line break.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
