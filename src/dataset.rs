//! The in-memory task dataset.
//!
//! A `Dataset` is built wholesale from decoded CSV rows and never edited afterwards;
//! loading a new export replaces it.

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::source::{read_rows, RawRow};
use crate::task::{normalize, Task};

/// Normalised tasks in source row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub tasks: Vec<Task>,
}

/// Row counts from one load. Dropped rows are otherwise invisible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_dropped: usize,
}

impl Dataset {
    /// Normalise rows, silently dropping the ones that cannot be tasks.
    pub fn from_rows(rows: &[RawRow]) -> (Self, LoadSummary) {
        let tasks: Vec<Task> = rows.iter().filter_map(normalize).collect();
        let summary = LoadSummary {
            rows_read: rows.len(),
            rows_kept: tasks.len(),
            rows_dropped: rows.len() - tasks.len(),
        };
        debug!(
            read = summary.rows_read,
            kept = summary.rows_kept,
            dropped = summary.rows_dropped,
            "built dataset"
        );
        (Dataset { tasks }, summary)
    }

    pub fn load(path: &Path) -> Result<(Self, LoadSummary)> {
        Ok(Self::from_rows(&read_rows(path)?))
    }
}
