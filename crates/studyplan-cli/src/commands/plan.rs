use chrono::{Local, NaiveDate};
use clap::Subcommand;
use studyplan_core::storage::{cache_plan, cached_plan};
use studyplan_core::Plan;

use super::{parse_date, print_json, CmdResult, Context};

#[derive(Subcommand)]
pub enum PlanAction {
    /// Ask the backend for a fresh schedule and cache it
    Generate {
        /// Print the whole schedule as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the last generated schedule
    Show {
        /// Day to show (YYYY-MM-DD, default today)
        #[arg(long, value_parser = parse_date)]
        day: Option<NaiveDate>,
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(action: PlanAction) -> CmdResult {
    let ctx = Context::open()?;
    let today = Local::now().date_naive();
    match action {
        PlanAction::Generate { json } => {
            let (session, client) = ctx.authed()?;
            let plan = ctx.check(client.fetch_plan(session.user_id()).await)?;
            cache_plan(&ctx.store, &plan)?;
            if json {
                print_json(&plan)?;
            } else {
                println!("Plan generated ({} days)", plan.schedule.len());
                print_day(&plan, today);
            }
        }
        PlanAction::Show { day, json } => {
            let plan = cached_plan(&ctx.store)?
                .ok_or("no plan cached yet; run `studyplan plan generate`")?;
            if json {
                print_json(&plan)?;
            } else {
                print_day(&plan, day.unwrap_or(today));
            }
        }
    }
    Ok(())
}

pub fn print_day(plan: &Plan, day: NaiveDate) {
    let items = plan.for_day(day);
    if items.is_empty() {
        println!("Nothing planned for {day}");
        return;
    }
    println!("Plan for {day} ({:.1}h)", plan.total_hours(day));
    for item in items {
        println!(
            "  [{}] {} ({}, {:.1}h)",
            item.priority.label(),
            item.title,
            item.subject_label(),
            item.hours()
        );
    }
}
