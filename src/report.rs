//! Per-owner grouping and escalation metrics.
//!
//! [`aggregate`] partitions a filtered task list by owner, keeping first-seen owner order
//! and each owner's task order, and computes the counts shown in the summary.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::task::Task;

/// Number of tasks of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    pub task_type: String,
    pub count: usize,
}

/// Statistics for one owner in the filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerReport {
    pub owner: String,
    /// Empty when task details are not kept.
    pub tasks: Vec<Task>,
    /// First-seen order; blank types are not counted.
    pub task_type_counts: Vec<TypeCount>,
    pub total_count: usize,
    pub escalated_count: usize,
    pub picked_after_escalation_count: usize,
}

/// The grouped report plus its grand total.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub owners: Vec<OwnerReport>,
    pub total_tasks: usize,
}

impl Report {
    pub fn owner(&self, name: &str) -> Option<&OwnerReport> {
        self.owners.iter().find(|o| o.owner == name)
    }
}

/// What the aggregation computes and keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Count escalated and picked-after-escalation tasks.
    pub escalation_metrics: bool,
    /// Keep each owner's task rows.
    pub task_details: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        AggregateOptions { escalation_metrics: true, task_details: true }
    }
}

/// Group tasks by owner and compute per-owner counts.
pub fn aggregate(tasks: &[&Task], options: AggregateOptions) -> Report {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&Task>)> = Vec::new();
    for &task in tasks {
        let slot = *index.entry(task.owner.as_str()).or_insert_with(|| {
            groups.push((task.owner.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(task);
    }

    let owners: Vec<OwnerReport> = groups
        .into_iter()
        .map(|(owner, owned)| summarise_owner(owner, &owned, options))
        .collect();
    let total_tasks = owners.iter().map(|o| o.total_count).sum();

    debug!(owners = owners.len(), total_tasks, "aggregated report");
    Report { owners, total_tasks }
}

fn summarise_owner(owner: &str, tasks: &[&Task], options: AggregateOptions) -> OwnerReport {
    let mut task_type_counts: Vec<TypeCount> = Vec::new();
    for task in tasks {
        let task_type = task.task_type.trim();
        if task_type.is_empty() {
            continue;
        }
        match task_type_counts.iter_mut().find(|c| c.task_type == task_type) {
            Some(entry) => entry.count += 1,
            None => task_type_counts.push(TypeCount { task_type: task_type.to_string(), count: 1 }),
        }
    }

    let (escalated_count, picked_after_escalation_count) = if options.escalation_metrics {
        (
            tasks.iter().filter(|t| t.escalated).count(),
            tasks.iter().filter(|t| t.picked_after_escalation()).count(),
        )
    } else {
        (0, 0)
    };

    OwnerReport {
        owner: owner.to_string(),
        tasks: if options.task_details { tasks.iter().map(|&t| t.clone()).collect() } else { Vec::new() },
        task_type_counts,
        total_count: tasks.len(),
        escalated_count,
        picked_after_escalation_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::RawDates;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    fn task(owner: &str, task_type: &str, escalated: bool, esc: Option<NaiveDateTime>, assigned: Option<NaiveDateTime>) -> Task {
        Task {
            order_name: format!("PON-{owner}-{task_type}"),
            task_type: task_type.to_string(),
            complete_date: at(5, 9),
            owner: owner.to_string(),
            escalated,
            escalation_time: esc,
            assignment_date: assigned,
            raw: RawDates::default(),
        }
    }

    #[test]
    fn test_scenario_single_owner() {
        let tasks = vec![
            task("Tim Corey", "Install", true, Some(at(4, 10)), Some(at(4, 12))),
            task("Tim Corey", "Install", false, None, None),
        ];
        let refs: Vec<&Task> = tasks.iter().collect();
        let report = aggregate(&refs, AggregateOptions::default());

        assert_eq!(report.owners.len(), 1);
        let tim = report.owner("Tim Corey").unwrap();
        assert_eq!(tim.total_count, 2);
        assert_eq!(tim.escalated_count, 1);
        assert_eq!(tim.picked_after_escalation_count, 1);
        assert_eq!(tim.task_type_counts, vec![TypeCount { task_type: "Install".to_string(), count: 2 }]);
        assert_eq!(report.total_tasks, 2);
    }

    #[test]
    fn test_first_seen_order_and_partition() {
        let tasks = vec![
            task("B", "Repair", false, None, None),
            task("A", "Install", false, None, None),
            task("B", "", false, None, None),
            task("B", "Install", false, None, None),
            task("A", "Install", false, None, None),
        ];
        let refs: Vec<&Task> = tasks.iter().collect();
        let report = aggregate(&refs, AggregateOptions::default());

        let names: Vec<&str> = report.owners.iter().map(|o| o.owner.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        let sum: usize = report.owners.iter().map(|o| o.total_count).sum();
        assert_eq!(sum, refs.len());
        assert_eq!(report.total_tasks, refs.len());

        let b = report.owner("B").unwrap();
        let types: Vec<(&str, usize)> = b.task_type_counts.iter().map(|c| (c.task_type.as_str(), c.count)).collect();
        assert_eq!(types, vec![("Repair", 1), ("Install", 1)]);
        assert_eq!(b.tasks[1].task_type, "");
    }

    #[test]
    fn test_picked_after_escalation_needs_both_timestamps() {
        let tasks = vec![
            task("A", "X", true, Some(at(4, 10)), None),
            task("A", "X", true, None, Some(at(4, 12))),
            task("A", "X", true, Some(at(4, 12)), Some(at(4, 12))),
            task("A", "X", true, Some(at(4, 12)), Some(at(4, 10))),
            task("A", "X", false, Some(at(4, 10)), Some(at(4, 12))),
        ];
        let refs: Vec<&Task> = tasks.iter().collect();
        let a = aggregate(&refs, AggregateOptions::default()).owners.remove(0);
        assert_eq!(a.escalated_count, 4);
        assert_eq!(a.picked_after_escalation_count, 0);
        assert!(a.picked_after_escalation_count <= a.escalated_count);
        assert!(a.escalated_count <= a.total_count);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let tasks = vec![
            task("A", "Install", true, Some(at(4, 10)), Some(at(4, 11))),
            task("B", "Repair", false, None, None),
        ];
        let refs: Vec<&Task> = tasks.iter().collect();
        let first = aggregate(&refs, AggregateOptions::default());
        let second = aggregate(&refs, AggregateOptions::default());
        assert_eq!(first, second);
        assert_eq!(tasks[0].owner, "A");
    }

    #[test]
    fn test_options_switch_off_metrics_and_details() {
        let tasks = vec![task("A", "Install", true, Some(at(4, 10)), Some(at(4, 11)))];
        let refs: Vec<&Task> = tasks.iter().collect();
        let report = aggregate(&refs, AggregateOptions { escalation_metrics: false, task_details: false });
        let a = &report.owners[0];
        assert_eq!((a.total_count, a.escalated_count, a.picked_after_escalation_count), (1, 0, 0));
        assert!(a.tasks.is_empty());
        assert_eq!(a.task_type_counts.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let report = aggregate(&[], AggregateOptions::default());
        assert!(report.owners.is_empty());
        assert_eq!(report.total_tasks, 0);
    }
}
