//! Column names and field-level enumerations.
//!
//! This module names the columns recognised in a task export and defines the small
//! enumerations used on the command line.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Completion timestamp; rows without a parseable value are dropped.
pub const COL_COMPLETE_DATE: &str = "Actual Complete Date";
/// Task owner, possibly wrapped in HTML markup.
pub const COL_OWNER: &str = "Task Owner";
/// Customer order identifier.
pub const COL_ORDER: &str = "Service Delivery Order - Customer PON";
pub const COL_TASK_TYPE: &str = "Task Type";
pub const COL_ESCALATED: &str = "Escalated Task?";
pub const COL_ESCALATION_TIME: &str = "Task Escalation Time";
pub const COL_ASSIGNMENT_DATE: &str = "Task Assignment Date";

/// Owner substituted when cleaning leaves nothing behind.
pub const UNASSIGNED: &str = "Unassigned";

/// Sentinel used on the command line for an unrestricted month, day or owner.
pub const ALL: &str = "All";

/// Output format for the report command.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
