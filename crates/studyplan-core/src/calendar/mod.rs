//! Month calendar of tasks.

mod grid;
mod view;

pub use grid::{
    advance_month, build_grid, first_of_month, grid_month, grid_start, group_by_day, CalendarCell,
    CompletionStatus, Indicator, TasksByDay, DAYS_PER_WEEK, GRID_CELLS,
};
pub use view::{CalendarView, MonthGrid, WEEKDAY_HEADERS};
