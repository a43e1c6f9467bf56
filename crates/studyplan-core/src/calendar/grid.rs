//! Month grid construction.
//!
//! A grid is always 6 weeks x 7 days, Sunday in column 0, starting on the
//! Sunday on or before the 1st of the reference month.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

use crate::task::Task;

pub const GRID_CELLS: usize = 42;
pub const DAYS_PER_WEEK: usize = 7;

/// Tasks keyed by the calendar day they fall on.
pub type TasksByDay = BTreeMap<NaiveDate, Vec<Task>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionStatus {
    None,
    Partial,
    All,
}

impl CompletionStatus {
    pub fn of(tasks: &[Task]) -> Self {
        if tasks.is_empty() {
            CompletionStatus::None
        } else if tasks.iter().all(Task::is_completed) {
            CompletionStatus::All
        } else {
            CompletionStatus::Partial
        }
    }
}

/// Colour of the per-day dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub in_current_month: bool,
    pub is_today: bool,
    pub tasks: Vec<Task>,
    pub completion: CompletionStatus,
}

impl CalendarCell {
    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_completed()).count()
    }

    /// Success when everything is done, warning when some is, danger when
    /// nothing is. Empty days get no dot.
    pub fn indicator(&self) -> Option<Indicator> {
        match self.completion {
            CompletionStatus::None => None,
            CompletionStatus::All => Some(Indicator::Success),
            CompletionStatus::Partial if self.completed_count() > 0 => Some(Indicator::Warning),
            CompletionStatus::Partial => Some(Indicator::Danger),
        }
    }
}

/// Group tasks by [`Task::calendar_day`], keeping input order within a day.
/// Tasks without a usable date are left out.
pub fn group_by_day(tasks: impl IntoIterator<Item = Task>) -> TasksByDay {
    let mut by_day = TasksByDay::new();
    for task in tasks {
        if let Some(day) = task.calendar_day() {
            by_day.entry(day).or_default().push(task);
        }
    }
    by_day
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First cell of the grid for `reference`'s month.
pub fn grid_start(reference: NaiveDate) -> NaiveDate {
    let first = first_of_month(reference);
    let lead = u64::from(first.weekday().num_days_from_sunday());
    first.checked_sub_days(Days::new(lead)).unwrap_or(first)
}

fn grid_fits(reference: NaiveDate) -> bool {
    let first = first_of_month(reference);
    let lead = u64::from(first.weekday().num_days_from_sunday());
    first
        .checked_sub_days(Days::new(lead))
        .and_then(|start| start.checked_add_days(Days::new(GRID_CELLS as u64 - 1)))
        .is_some()
}

/// Month the grid for `reference` shows. The first and last months chrono
/// can represent have no full 42-day grid and move one month inward.
pub fn grid_month(reference: NaiveDate) -> NaiveDate {
    if grid_fits(reference) {
        reference
    } else if reference.year() > 0 {
        advance_month(reference, -1)
    } else {
        advance_month(reference, 1)
    }
}

pub fn build_grid(reference: NaiveDate, tasks: &TasksByDay, today: NaiveDate) -> Vec<CalendarCell> {
    let reference = grid_month(reference);
    let start = grid_start(reference);
    let (year, month) = (reference.year(), reference.month());

    (0..GRID_CELLS as u64)
        .filter_map(|offset| start.checked_add_days(Days::new(offset)))
        .map(|date| {
            let tasks = tasks.get(&date).cloned().unwrap_or_default();
            CalendarCell {
                date,
                in_current_month: date.year() == year && date.month() == month,
                is_today: date == today,
                completion: CompletionStatus::of(&tasks),
                tasks,
            }
        })
        .collect()
}

/// Shift by whole months. The day is clamped to the target month's length,
/// so Jan 31 + 1 lands on the last day of February.
pub fn advance_month(reference: NaiveDate, delta: i32) -> NaiveDate {
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        reference.checked_add_months(months)
    } else {
        reference.checked_sub_months(months)
    };
    shifted.unwrap_or(reference)
}
