//! Month calendar of tasks.

use chrono::{Datelike, Local, NaiveDate};
use clap::Args;
use studyplan_core::api::TaskFilter;
use studyplan_core::calendar::{CalendarCell, Indicator, WEEKDAY_HEADERS};
use studyplan_core::CalendarView;

use super::task::print_task;
use super::{parse_date, print_json, CmdResult, Context};

#[derive(Args)]
pub struct CalendarArgs {
    /// Month to show (YYYY-MM, default current month)
    #[arg(long, value_parser = parse_month)]
    month: Option<NaiveDate>,
    /// Months to move from the shown month (e.g. -1 for previous)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    offset: i32,
    /// Also list the tasks of one day (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    day: Option<NaiveDate>,
    /// Print the grid as JSON
    #[arg(long)]
    json: bool,
    /// Skip fetching tasks from the backend
    #[arg(long)]
    offline: bool,
}

fn parse_month(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
        .map_err(|_| format!("invalid month '{raw}' (expected YYYY-MM)"))
}

pub async fn run(args: CalendarArgs) -> CmdResult {
    let today = Local::now().date_naive();
    let reference = args.month.or(args.day).unwrap_or(today);
    let mut view = CalendarView::new(reference);
    view.advance(args.offset);

    if !args.offline {
        let ctx = Context::open()?;
        let (session, client) = ctx.authed()?;
        let tasks = ctx.check(
            client
                .list_tasks(session.user_id(), &TaskFilter::default())
                .await,
        )?;
        view.set_tasks(tasks);
    }

    let grid = view.render_on(today);
    if args.json {
        return print_json(&grid);
    }

    println!("{:^35}", grid.title);
    println!(
        "{}",
        WEEKDAY_HEADERS
            .iter()
            .map(|h| format!("{h:>4} "))
            .collect::<String>()
    );
    for week in grid.weeks() {
        println!("{}", week.iter().map(render_cell).collect::<String>());
    }
    println!(
        "{} tasks this view  (✓ all done, ~ some done, ! none done)",
        grid.task_count()
    );

    if let Some(day) = args.day {
        println!();
        let tasks = view.tasks_on(day);
        println!("{} ({} tasks)", day.format("%A, %B %-d, %Y"), tasks.len());
        for task in tasks {
            print_task(task);
        }
    }
    Ok(())
}

fn render_cell(cell: &CalendarCell) -> String {
    let marker = match cell.indicator() {
        Some(Indicator::Success) => '✓',
        Some(Indicator::Warning) => '~',
        Some(Indicator::Danger) => '!',
        None => ' ',
    };
    let day = if cell.in_current_month {
        format!("{:>2}", cell.date.day())
    } else {
        " .".to_string()
    };
    if cell.is_today {
        format!("[{day}]{marker}")
    } else {
        format!(" {day} {marker}")
    }
}
