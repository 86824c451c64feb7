//! Task records and row normalisation.
//!
//! This module defines the `Task` struct, one completed service-delivery task, and the
//! rules that turn a raw CSV row into one: date parsing, owner cleaning and the
//! escalation flag.

use std::sync::OnceLock;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::fields::*;
use crate::source::RawRow;

/// A completed task as it appears in the loaded dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub order_name: String,
    pub task_type: String,
    pub complete_date: NaiveDateTime,
    pub owner: String,
    pub escalated: bool,
    pub escalation_time: Option<NaiveDateTime>,
    pub assignment_date: Option<NaiveDateTime>,
    /// Source text of the date and escalation columns, for detail rows.
    pub raw: RawDates,
}

/// Cell text exactly as exported, before parsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDates {
    pub complete_date: String,
    pub escalated: String,
    pub escalation_time: String,
    pub assignment_date: String,
}

impl Task {
    /// True when the task was escalated and only assigned after the escalation.
    /// Both timestamps must be present.
    pub fn picked_after_escalation(&self) -> bool {
        match (self.escalation_time, self.assignment_date) {
            (Some(escalated_at), Some(assigned_at)) => self.escalated && assigned_at > escalated_at,
            _ => false,
        }
    }
}

/// Why a row was left out of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    MissingCompleteDate,
    InvalidCompleteDate,
    MissingOwner,
}

/// Normalise one raw row, or explain why it is excluded.
pub fn normalize_row(row: &RawRow) -> Result<Task, DropReason> {
    let raw_complete = non_blank(row.get(COL_COMPLETE_DATE)).ok_or(DropReason::MissingCompleteDate)?;
    let complete_date = parse_timestamp(raw_complete).ok_or(DropReason::InvalidCompleteDate)?;
    let raw_owner = non_blank(row.get(COL_OWNER)).ok_or(DropReason::MissingOwner)?;

    let raw_escalated = row.get(COL_ESCALATED).unwrap_or_default();
    let raw_escalation_time = row.get(COL_ESCALATION_TIME).unwrap_or_default();
    let raw_assignment = row.get(COL_ASSIGNMENT_DATE).unwrap_or_default();

    Ok(Task {
        order_name: row.get(COL_ORDER).unwrap_or_default().trim().to_string(),
        task_type: row.get(COL_TASK_TYPE).unwrap_or_default().trim().to_string(),
        complete_date,
        owner: clean_owner(raw_owner),
        escalated: raw_escalated.trim().eq_ignore_ascii_case("yes"),
        escalation_time: parse_timestamp(raw_escalation_time),
        assignment_date: parse_timestamp(raw_assignment),
        raw: RawDates {
            complete_date: raw_complete.to_string(),
            escalated: raw_escalated.to_string(),
            escalation_time: raw_escalation_time.to_string(),
            assignment_date: raw_assignment.to_string(),
        },
    })
}

/// Normalise one raw row; `None` when it cannot be part of the dataset.
pub fn normalize(row: &RawRow) -> Option<Task> {
    match normalize_row(row) {
        Ok(task) => Some(task),
        Err(reason) => {
            trace!(?reason, "dropping row");
            None
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern compiles"))
}

/// Strip `<...>` tags from an owner name and trim it.
/// Falls back to `Unassigned` when nothing is left.
pub fn clean_owner(raw: &str) -> String {
    let stripped = tag_re().replace_all(raw, "");
    let owner = stripped.trim();
    if owner.is_empty() {
        UNASSIGNED.to_string()
    } else {
        owner.to_string()
    }
}

/// ISO layouts with an offset but no seconds, which RFC 3339 requires.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M%#z", "%Y-%m-%d %H:%M%#z"];

/// Date-time layouts without an offset, most specific first.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Date-only layouts, read as midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"];

/// Parse a timestamp as exported by common tools.
///
/// Values carrying an offset (RFC 3339 or RFC 2822) are converted to local time; all
/// other layouts are taken as local time already. Blank or unknown text yields `None`.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Local).naive_local());
        }
    }

    let upper = s.to_uppercase();
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&upper, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}
