//! Session state: the loaded dataset, the current selection and the roster.
//!
//! Every change goes through the session, which recomputes the derived option lists
//! and applies the default selection policy. Reports are computed on demand from the
//! current state and are never cached.

use std::path::Path;

use chrono::{Datelike, Local};
use tracing::{debug, info};

use crate::config::Roster;
use crate::dataset::{Dataset, LoadSummary};
use crate::error::Result;
use crate::filter::{filter_tasks, DayFilter, FilterOptions, MonthFilter, OwnerFilter, Selection};
use crate::report::{aggregate, AggregateOptions, Report};
use crate::source::RawRow;
use crate::task::Task;
use crate::temporal::{days, TemporalIndex};

#[derive(Debug, Clone)]
pub struct Session {
    dataset: Dataset,
    index: TemporalIndex,
    days: Vec<String>,
    selection: Selection,
    roster: Roster,
    pub filter_options: FilterOptions,
    pub aggregate_options: AggregateOptions,
}

impl Session {
    pub fn new(roster: Roster) -> Self {
        Session {
            dataset: Dataset::default(),
            index: TemporalIndex::default(),
            days: Vec::new(),
            selection: Selection::default(),
            roster,
            filter_options: FilterOptions::default(),
            aggregate_options: AggregateOptions::default(),
        }
    }

    /// Read an export from disk. On error the previous dataset is kept.
    pub fn load_file(&mut self, path: &Path) -> Result<LoadSummary> {
        let (dataset, summary) = Dataset::load(path)?;
        info!(path = %path.display(), kept = summary.rows_kept, dropped = summary.rows_dropped, "loaded export");
        self.replace_dataset(dataset, Local::now().year());
        Ok(summary)
    }

    /// Replace the dataset with decoded rows, defaulting the year to the current one.
    pub fn load_rows(&mut self, rows: &[RawRow]) -> LoadSummary {
        self.load_rows_at(rows, Local::now().year())
    }

    /// Replace the dataset, treating `current_year` as "this year" for the defaults.
    pub fn load_rows_at(&mut self, rows: &[RawRow], current_year: i32) -> LoadSummary {
        let (dataset, summary) = Dataset::from_rows(rows);
        self.replace_dataset(dataset, current_year);
        summary
    }

    fn replace_dataset(&mut self, dataset: Dataset, current_year: i32) {
        self.dataset = dataset;
        self.index = TemporalIndex::build(&self.dataset.tasks);
        self.selection = Selection {
            year: self.index.default_year(current_year),
            month: self.index.default_month(),
            day: DayFilter::All,
            owner: OwnerFilter::All,
        };
        self.refresh_days();
        debug!(selection = ?self.selection, "applied default selection");
    }

    fn refresh_days(&mut self) {
        self.days = days(&self.dataset.tasks, self.selection.year, &self.selection.month);
        self.selection.day = DayFilter::All;
    }

    /// Changing the year rebuilds the day options and resets the day.
    pub fn set_year(&mut self, year: Option<i32>) {
        self.selection.year = year;
        self.refresh_days();
    }

    /// Changing the month rebuilds the day options and resets the day.
    pub fn set_month(&mut self, month: MonthFilter) {
        self.selection.month = month;
        self.refresh_days();
    }

    pub fn set_day(&mut self, day: DayFilter) {
        self.selection.day = day;
    }

    pub fn set_owner(&mut self, owner: OwnerFilter) {
        self.selection.owner = owner;
    }

    pub fn tasks(&self) -> &[Task] {
        &self.dataset.tasks
    }

    pub fn index(&self) -> &TemporalIndex {
        &self.index
    }

    /// Days selectable under the current year and month.
    pub fn days(&self) -> &[String] {
        &self.days
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Owner choices offered for selection: `All`, then the roster.
    pub fn owner_choices(&self) -> Vec<OwnerFilter> {
        std::iter::once(OwnerFilter::All)
            .chain(self.roster.members.iter().cloned().map(OwnerFilter::Named))
            .collect()
    }

    /// Tasks matching the current selection.
    pub fn filtered(&self) -> Vec<&Task> {
        filter_tasks(&self.dataset.tasks, &self.selection, &self.roster, self.filter_options)
    }

    pub fn report(&self) -> Report {
        let filtered = self.filtered();
        debug!(matched = filtered.len(), "filtered dataset");
        aggregate(&filtered, self.aggregate_options)
    }
}
