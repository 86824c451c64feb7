//! Temporal index over the loaded dataset.
//!
//! Derives the years, month labels and days that can be selected. Months are keyed by
//! their English `"<MonthName> <Year>"` label, which already embeds the year, and are
//! ordered by calendar date rather than by text.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::filter::MonthFilter;
use crate::task::Task;

/// `"March 2024"` style label for the month containing `date`.
pub fn month_label(date: &NaiveDateTime) -> String {
    date.format("%B %Y").to_string()
}

/// Two-digit day of month.
pub fn day_label(date: &NaiveDateTime) -> String {
    format!("{:02}", date.day())
}

/// First day of the month a label names, if it is a valid label.
pub fn parse_month_label(label: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("1 {}", label.trim()), "%d %B %Y").ok()
}

/// Order month labels chronologically. Unparseable labels sort last, by text.
pub fn sort_month_labels(labels: &mut [String]) {
    labels.sort_by(|a, b| {
        let key = |l: &str| parse_month_label(l).map_or((1, NaiveDate::MAX), |d| (0, d));
        key(a.as_str()).cmp(&key(b.as_str())).then_with(|| a.cmp(b))
    });
}

/// Distinct completion years, newest first.
pub fn years(tasks: &[Task]) -> Vec<i32> {
    let set: BTreeSet<i32> = tasks.iter().map(|t| t.complete_date.year()).collect();
    set.into_iter().rev().collect()
}

/// Distinct month labels, oldest first.
pub fn month_labels(tasks: &[Task]) -> Vec<String> {
    let set: BTreeSet<String> = tasks.iter().map(|t| month_label(&t.complete_date)).collect();
    let mut labels: Vec<String> = set.into_iter().collect();
    sort_month_labels(&mut labels);
    labels
}

/// Distinct days within the selected year and month label, ascending.
///
/// Only a concrete label can match, so `MonthFilter::All` yields no days.
pub fn days(tasks: &[Task], year: Option<i32>, month: &MonthFilter) -> Vec<String> {
    let (Some(year), MonthFilter::Label(label)) = (year, month) else {
        return Vec::new();
    };
    let set: BTreeSet<u32> = tasks
        .iter()
        .filter(|t| t.complete_date.year() == year && month_label(&t.complete_date) == *label)
        .map(|t| t.complete_date.day())
        .collect();
    set.into_iter().map(|d| format!("{d:02}")).collect()
}

/// Selectable years and months for one dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemporalIndex {
    pub years: Vec<i32>,
    pub month_labels: Vec<String>,
}

impl TemporalIndex {
    pub fn build(tasks: &[Task]) -> Self {
        TemporalIndex {
            years: years(tasks),
            month_labels: month_labels(tasks),
        }
    }

    /// The current year when the data has it, otherwise no year.
    pub fn default_year(&self, current_year: i32) -> Option<i32> {
        self.years.contains(&current_year).then_some(current_year)
    }

    /// The latest month present, or `All` for an empty dataset.
    pub fn default_month(&self) -> MonthFilter {
        self.month_labels
            .last()
            .map_or(MonthFilter::All, |label| MonthFilter::Label(label.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::RawDates;

    fn task_on(y: i32, m: u32, d: u32) -> Task {
        Task {
            order_name: "PON".to_string(),
            task_type: String::new(),
            complete_date: NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(8, 0, 0).unwrap(),
            owner: "Tim Corey".to_string(),
            escalated: false,
            escalation_time: None,
            assignment_date: None,
            raw: RawDates::default(),
        }
    }

    #[test]
    fn test_years_descending_distinct() {
        let tasks = vec![task_on(2023, 1, 1), task_on(2025, 6, 1), task_on(2023, 2, 1), task_on(2024, 1, 1)];
        assert_eq!(years(&tasks), vec![2025, 2024, 2023]);
    }

    #[test]
    fn test_month_labels_chronological() {
        let tasks = vec![task_on(2025, 1, 10), task_on(2024, 2, 3), task_on(2024, 2, 20)];
        assert_eq!(month_labels(&tasks), vec!["February 2024", "January 2025"]);

        let mut labels = vec!["January 2025".to_string(), "February 2024".to_string()];
        sort_month_labels(&mut labels);
        assert_eq!(labels, vec!["February 2024", "January 2025"]);
    }

    #[test]
    fn test_days_scoped_to_year_and_month() {
        let tasks = vec![
            task_on(2024, 3, 15),
            task_on(2024, 3, 5),
            task_on(2024, 3, 15),
            task_on(2024, 4, 1),
            task_on(2023, 3, 9),
        ];
        let march = MonthFilter::Label("March 2024".to_string());
        assert_eq!(days(&tasks, Some(2024), &march), vec!["05", "15"]);
        assert!(days(&tasks, Some(2023), &march).is_empty());
        assert!(days(&tasks, None, &march).is_empty());
        assert!(days(&tasks, Some(2024), &MonthFilter::All).is_empty());
    }

    #[test]
    fn test_defaults() {
        let index = TemporalIndex::build(&[task_on(2024, 11, 2), task_on(2025, 2, 1)]);
        assert_eq!(index.default_year(2025), Some(2025));
        assert_eq!(index.default_year(2026), None);
        assert_eq!(index.default_month(), MonthFilter::Label("February 2025".to_string()));
        assert_eq!(TemporalIndex::default().default_month(), MonthFilter::All);
    }

    #[test]
    fn test_parse_month_label() {
        assert_eq!(parse_month_label("March 2024"), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(parse_month_label("Smarch 2024"), None);
    }
}
