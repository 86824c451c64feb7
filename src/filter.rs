//! Selection state and the task filter predicate.
//!
//! A [`Selection`] holds the year, month, day and owner the user picked. [`matches`]
//! decides whether a task belongs to the filtered view for that selection.

use std::fmt;
use std::str::FromStr;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::config::Roster;
use crate::fields::ALL;
use crate::task::Task;
use crate::temporal::{day_label, month_label};

/// Month dimension: everything, or one `"<MonthName> <Year>"` label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonthFilter {
    #[default]
    All,
    Label(String),
}

/// Day dimension: everything, or one two-digit day of month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayFilter {
    #[default]
    All,
    Day(String),
}

/// Owner dimension: every rostered owner, or one owner by exact name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OwnerFilter {
    #[default]
    All,
    Named(String),
}

impl FromStr for MonthFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(if s.eq_ignore_ascii_case(ALL) { MonthFilter::All } else { MonthFilter::Label(s.to_string()) })
    }
}

impl FromStr for DayFilter {
    type Err = String;

    /// Accepts `All` or a day of month, padding single digits (`"5"` becomes `"05"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ALL) {
            return Ok(DayFilter::All);
        }
        match s.parse::<u32>() {
            Ok(day) if (1..=31).contains(&day) => Ok(DayFilter::Day(format!("{day:02}"))),
            _ => Err(format!("invalid day '{s}', expected 1-31 or All")),
        }
    }
}

impl FromStr for OwnerFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(if s.eq_ignore_ascii_case(ALL) { OwnerFilter::All } else { OwnerFilter::Named(s.to_string()) })
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("All Months"),
            MonthFilter::Label(label) => f.write_str(label),
        }
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str("All Days"),
            DayFilter::Day(day) => f.write_str(day),
        }
    }
}

impl fmt::Display for OwnerFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerFilter::All => f.write_str("Show All"),
            OwnerFilter::Named(name) => f.write_str(name),
        }
    }
}

/// The user's current choice on every filter dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// `None` until a year is chosen. Nothing matches without one.
    pub year: Option<i32>,
    pub month: MonthFilter,
    pub day: DayFilter,
    pub owner: OwnerFilter,
}

/// Which filter dimensions are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOptions {
    pub day_filter: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        FilterOptions { day_filter: true }
    }
}

/// Decide whether a task belongs to the selection.
pub fn matches(task: &Task, selection: &Selection, roster: &Roster, options: FilterOptions) -> bool {
    let date = task.complete_date;

    if selection.year != Some(date.year()) {
        return false;
    }

    if let MonthFilter::Label(label) = &selection.month {
        if month_label(&date) != *label {
            return false;
        }
    }

    if options.day_filter {
        if let DayFilter::Day(day) = &selection.day {
            if day_label(&date) != *day {
                return false;
            }
        }
    }

    match &selection.owner {
        OwnerFilter::All => roster.contains(&task.owner),
        OwnerFilter::Named(name) => task.owner == *name,
    }
}

/// Tasks matching the selection, in dataset order.
pub fn filter_tasks<'a>(
    tasks: &'a [Task],
    selection: &Selection,
    roster: &Roster,
    options: FilterOptions,
) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| matches(t, selection, roster, options))
        .collect()
}
