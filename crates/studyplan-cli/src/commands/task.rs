//! Task listing and status changes.

use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};
use studyplan_core::api::TaskFilter;
use studyplan_core::{Priority, Task, TaskStatus};

use super::{parse_date, print_json, CmdResult, Context};

#[derive(Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Pending,
    Completed,
}

impl From<StatusArg> for TaskStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Pending => TaskStatus::Pending,
            StatusArg::Completed => TaskStatus::Completed,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(value: PriorityArg) -> Self {
        match value {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
        }
    }
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// List tasks
    List {
        /// Text search in title and description
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        #[arg(long, value_enum)]
        priority: Option<PriorityArg>,
        /// Filter by subject ID
        #[arg(long)]
        subject: Option<i64>,
        /// Earliest date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        from: Option<NaiveDate>,
        /// Latest date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        to: Option<NaiveDate>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        json: bool,
    },
    /// Mark a task as completed
    Complete { id: i64 },
    /// Mark a task as pending again
    Reopen { id: i64 },
}

pub async fn run(action: TaskAction) -> CmdResult {
    let ctx = Context::open()?;
    let (session, client) = ctx.authed()?;

    match action {
        TaskAction::List {
            search,
            status,
            priority,
            subject,
            from,
            to,
            limit,
            json,
        } => {
            let filter = TaskFilter {
                search,
                status: status.map(Into::into),
                priority: priority.map(Into::into),
                subject_id: subject,
                date_from: from,
                date_to: to,
                limit,
            };
            let tasks = ctx.check(client.list_tasks(session.user_id(), &filter).await)?;
            if json {
                print_json(&tasks)?;
            } else if tasks.is_empty() {
                println!("No tasks");
            } else {
                for task in &tasks {
                    print_task(task);
                }
            }
        }
        TaskAction::Complete { id } => {
            let task = ctx.check(client.update_task_status(id, TaskStatus::Completed).await)?;
            println!("Task completed: #{} {}", task.task_id, task.title);
        }
        TaskAction::Reopen { id } => {
            let task = ctx.check(client.update_task_status(id, TaskStatus::Pending).await)?;
            println!("Task reopened: #{} {}", task.task_id, task.title);
        }
    }
    Ok(())
}

pub fn print_task(task: &Task) {
    let mark = if task.is_completed() { "[x]" } else { "[ ]" };
    let day = task
        .calendar_day()
        .map(|d| d.to_string())
        .unwrap_or_else(|| "unscheduled".into());
    println!(
        "{mark} #{:<5} {:<32} {:<8} {:<14} {:>4.1}h  {day}",
        task.task_id,
        task.title,
        task.priority.label(),
        task.subject_label(),
        task.hours()
    );
}
