use chrono::Local;
use clap::Args;
use serde_json::json;
use studyplan_core::storage::cached_plan;

use super::plan::print_day;
use super::{print_json, CmdResult, Context};

#[derive(Args)]
pub struct HomeArgs {
    #[arg(long)]
    json: bool,
}

pub async fn run(args: HomeArgs) -> CmdResult {
    let ctx = Context::open()?;
    let (session, client) = ctx.authed()?;
    let subjects = ctx.check(client.list_subjects(session.user_id()).await)?;
    let stats = ctx.store.stats_today()?;
    let plan = cached_plan(&ctx.store)?;
    let today = Local::now().date_naive();

    if args.json {
        return print_json(&json!({
            "user": session.user,
            "subjects": subjects.len(),
            "today": stats,
            "plan": plan.as_ref().map(|p| p.for_day(today)),
        }));
    }

    println!("Welcome back, {}!", session.user.display_name());
    println!("Subjects: {}", subjects.len());
    println!(
        "Today: {} focus sessions, {} focused",
        stats.focus_sessions,
        stats.focus_hours_label()
    );
    match plan {
        Some(plan) => print_day(&plan, today),
        None => println!("No plan yet; run `studyplan plan generate`"),
    }
    Ok(())
}
