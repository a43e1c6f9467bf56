//! Month grid properties across a wide range of months.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use proptest::prelude::*;
use studyplan_core::calendar::{
    advance_month, build_grid, group_by_day, CalendarView, CompletionStatus, Indicator, GRID_CELLS,
};
use studyplan_core::{Task, TaskStatus};

fn task(id: i64, day: &str, status: TaskStatus) -> Task {
    let mut task = Task::new(id, format!("task {id}"));
    task.scheduled_date = Some(day.to_string());
    task.status = status;
    task
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
    let next = advance_month(first, 1);
    (next - first).num_days() as u32
}

proptest! {
    #[test]
    fn every_month_has_42_cells_starting_on_sunday(
        year in 1900i32..=2200,
        month in 1u32..=12,
        day_seed in 0u32..31,
    ) {
        let len = days_in_month(year, month);
        let reference = NaiveDate::from_ymd_opt(year, month, 1 + day_seed % len).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let cells = build_grid(reference, &Default::default(), today);

        prop_assert_eq!(cells.len(), GRID_CELLS);
        prop_assert_eq!(cells[0].date.weekday(), Weekday::Sun);
        prop_assert!(cells[0].date <= NaiveDate::from_ymd_opt(year, month, 1).unwrap());

        for pair in cells.windows(2) {
            prop_assert_eq!(pair[0].date + Days::new(1), pair[1].date);
        }

        let in_month: Vec<_> = cells.iter().filter(|c| c.in_current_month).collect();
        prop_assert_eq!(in_month.len() as u32, len);
        for (i, cell) in in_month.iter().enumerate() {
            prop_assert_eq!(cell.date.day(), i as u32 + 1);
            prop_assert_eq!(cell.date.month(), month);
        }
        prop_assert!(cells.iter().all(|c| c.completion == CompletionStatus::None));
    }

    #[test]
    fn advance_month_stays_in_target_month(
        year in 1900i32..=2200,
        month in 1u32..=12,
        day in 1u32..=28,
        extra in 0u32..=3,
        delta in -36i32..=36,
    ) {
        let len = days_in_month(year, month);
        let day = (day + extra).min(len);
        let start = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        let moved = advance_month(start, delta);

        let months = |d: NaiveDate| d.year() * 12 + d.month0() as i32;
        prop_assert_eq!(months(moved) - months(start), delta);
        prop_assert!(moved.day() <= day);
    }
}

#[test]
fn leap_february_grid() {
    let reference = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
    let cells = build_grid(reference, &Default::default(), reference);
    assert_eq!(cells[0].date, NaiveDate::from_ymd_opt(2024, 1, 28).unwrap());
    assert_eq!(cells.iter().filter(|c| c.in_current_month).count(), 29);
    assert!(cells.iter().any(|c| c.is_today));
}

#[test]
fn february_2015_fills_exactly_four_weeks_then_pads() {
    // Feb 2015 starts on a Sunday and has 28 days.
    let reference = NaiveDate::from_ymd_opt(2015, 2, 1).unwrap();
    let cells = build_grid(reference, &Default::default(), reference);
    assert_eq!(cells[0].date, reference);
    assert!(cells[28..].iter().all(|c| !c.in_current_month));
    assert_eq!(cells[41].date, NaiveDate::from_ymd_opt(2015, 3, 14).unwrap());
}

#[test]
fn completion_statuses_per_day() {
    let tasks = group_by_day([
        task(1, "2024-03-04", TaskStatus::Completed),
        task(2, "2024-03-04", TaskStatus::Completed),
        task(3, "2024-03-05", TaskStatus::Completed),
        task(4, "2024-03-05", TaskStatus::Pending),
        task(5, "2024-03-06", TaskStatus::Pending),
    ]);
    let reference = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let cells = build_grid(reference, &tasks, reference);
    let cell = |d: u32| {
        cells
            .iter()
            .find(|c| c.in_current_month && c.date.day() == d)
            .unwrap()
    };

    assert_eq!(cell(4).completion, CompletionStatus::All);
    assert_eq!(cell(4).indicator(), Some(Indicator::Success));
    assert_eq!(cell(5).completion, CompletionStatus::Partial);
    assert_eq!(cell(5).indicator(), Some(Indicator::Warning));
    assert_eq!(cell(5).completed_count(), 1);
    assert_eq!(cell(6).completion, CompletionStatus::Partial);
    assert_eq!(cell(6).indicator(), Some(Indicator::Danger));
    assert_eq!(cell(7).completion, CompletionStatus::None);
    assert_eq!(cell(7).indicator(), None);
}

#[test]
fn view_navigation_across_year_boundary() {
    let mut view = CalendarView::new(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    view.previous_month();
    assert_eq!(view.reference(), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    view.next_month();
    view.next_month();
    assert_eq!(view.reference(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

    let grid = view.render_on(NaiveDate::from_ymd_opt(2024, 2, 14).unwrap());
    assert_eq!(grid.title, "February 2024");
    assert_eq!(grid.weeks().count(), 6);
}
