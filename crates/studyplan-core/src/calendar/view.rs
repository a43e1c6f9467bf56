use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;

use super::grid::{
    advance_month, build_grid, grid_month, group_by_day, CalendarCell, TasksByDay, DAYS_PER_WEEK,
};
use crate::task::Task;

pub const WEEKDAY_HEADERS: [&str; DAYS_PER_WEEK] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Display payload for one rendered month.
#[derive(Debug, Clone, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// e.g. "March 2024"
    pub title: String,
    pub cells: Vec<CalendarCell>,
}

impl MonthGrid {
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarCell]> {
        self.cells.chunks(DAYS_PER_WEEK)
    }

    /// Tasks on the 42 visible days, padding days included.
    pub fn task_count(&self) -> usize {
        self.cells.iter().map(|cell| cell.tasks.len()).sum()
    }
}

/// The calendar tab's state: which month is shown and the fetched tasks.
#[derive(Debug, Clone)]
pub struct CalendarView {
    reference: NaiveDate,
    tasks: TasksByDay,
}

impl CalendarView {
    pub fn new(reference: NaiveDate) -> Self {
        Self {
            reference,
            tasks: TasksByDay::new(),
        }
    }

    /// Centred on the current local date.
    pub fn today() -> Self {
        Self::new(local_today())
    }

    pub fn reference(&self) -> NaiveDate {
        self.reference
    }

    /// Replace the task collection; previous tasks are dropped.
    pub fn set_tasks(&mut self, tasks: impl IntoIterator<Item = Task>) {
        self.tasks = group_by_day(tasks);
    }

    pub fn advance(&mut self, delta: i32) {
        self.reference = advance_month(self.reference, delta);
    }

    pub fn previous_month(&mut self) {
        self.advance(-1);
    }

    pub fn next_month(&mut self) {
        self.advance(1);
    }

    pub fn reset_to_today(&mut self) {
        self.reference = local_today();
    }

    /// Tasks for a single day (the day-detail popup).
    pub fn tasks_on(&self, date: NaiveDate) -> &[Task] {
        self.tasks.get(&date).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn render(&self) -> MonthGrid {
        self.render_on(local_today())
    }

    /// Render with an explicit "today", for deterministic output.
    pub fn render_on(&self, today: NaiveDate) -> MonthGrid {
        let shown = grid_month(self.reference);
        MonthGrid {
            year: shown.year(),
            month: shown.month(),
            title: shown.format("%B %Y").to_string(),
            cells: build_grid(shown, &self.tasks, today),
        }
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}
