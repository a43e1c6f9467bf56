//! Subject and chapter management.

use clap::{Subcommand, ValueEnum};
use studyplan_core::api::{NewChapter, NewSubject, SubjectUpdate};
use studyplan_core::Subject;

use super::{print_json, CmdResult, Context};

#[derive(Clone, Copy, ValueEnum)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    fn priority(self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

#[derive(Subcommand)]
pub enum SubjectAction {
    /// List subjects
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show one subject with its chapters
    Show {
        id: i64,
        #[arg(long)]
        json: bool,
    },
    /// Create a subject; each --topic becomes a chapter
    Add {
        /// Subject name
        name: String,
        #[arg(long, value_enum, default_value = "medium")]
        difficulty: Difficulty,
        /// Hex colour, e.g. "#4f46e5"
        #[arg(long)]
        color: Option<String>,
        /// Level (e.g. "A-Level")
        #[arg(long)]
        level: Option<String>,
        #[arg(long)]
        target_grade: Option<String>,
        #[arg(long)]
        current_topic: Option<String>,
        /// Topic to add as a chapter (repeatable)
        #[arg(long = "topic")]
        topics: Vec<String>,
    },
    /// Rename a subject or change its difficulty
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_enum)]
        difficulty: Option<Difficulty>,
    },
    /// Delete a subject
    Delete { id: i64 },
    /// List a subject's chapters with progress
    Chapters {
        id: i64,
        #[arg(long)]
        json: bool,
    },
    /// Add one chapter to a subject
    AddChapter {
        /// Subject ID
        subject_id: i64,
        /// Chapter name
        name: String,
        /// Chapter number (default: after the last one)
        #[arg(long)]
        number: Option<u32>,
        /// Estimated hours
        #[arg(long, default_value_t = NewChapter::DEFAULT_HOURS)]
        hours: f64,
        #[arg(long, value_enum)]
        difficulty: Option<Difficulty>,
    },
}

pub async fn run(action: SubjectAction) -> CmdResult {
    let ctx = Context::open()?;
    let (session, client) = ctx.authed()?;

    match action {
        SubjectAction::List { json } => {
            let subjects = ctx.check(client.list_subjects(session.user_id()).await)?;
            if json {
                print_json(&subjects)?;
            } else if subjects.is_empty() {
                println!("No subjects yet");
            } else {
                for subject in &subjects {
                    print_subject(subject);
                }
            }
        }
        SubjectAction::Show { id, json } => {
            let subject = ctx.check(client.get_subject(id).await)?;
            let chapters = ctx.check(client.list_chapters(id).await)?;
            if json {
                print_json(&serde_json::json!({ "subject": subject, "chapters": chapters }))?;
            } else {
                print_subject(&subject);
                for field in [
                    ("level", &subject.level),
                    ("target grade", &subject.target_grade),
                    ("current topic", &subject.current_topic),
                ] {
                    if let (label, Some(value)) = field {
                        println!("  {label}: {value}");
                    }
                }
                println!(
                    "  chapters: {}/{} done ({:.0}%)",
                    chapters.completed, chapters.total, chapters.progress
                );
            }
        }
        SubjectAction::Add {
            name,
            difficulty,
            color,
            level,
            target_grade,
            current_topic,
            topics,
        } => {
            let subject = NewSubject {
                subject_name: name,
                priority: difficulty.priority(),
                color_code: color,
                level,
                target_grade,
                current_topic,
                sub_topics: None,
            };
            let (created, chapters) = ctx.check(
                client
                    .add_subject_with_topics(session.user_id(), subject, &topics)
                    .await,
            )?;
            println!(
                "Subject created: #{} {} ({} chapters)",
                created.subject_id,
                created.subject_name,
                chapters.len()
            );
        }
        SubjectAction::Edit {
            id,
            name,
            difficulty,
        } => {
            let update = SubjectUpdate {
                subject_name: name,
                priority: difficulty.map(Difficulty::priority),
            };
            if update.is_empty() {
                return Err("nothing to update; pass --name or --difficulty".into());
            }
            let subject = ctx.check(client.update_subject(id, &update).await)?;
            println!("Subject updated: #{} {}", subject.subject_id, subject.subject_name);
        }
        SubjectAction::Delete { id } => {
            ctx.check(client.delete_subject(id).await)?;
            println!("Subject #{id} deleted");
        }
        SubjectAction::Chapters { id, json } => {
            let list = ctx.check(client.list_chapters(id).await)?;
            if json {
                print_json(&list)?;
            } else {
                for chapter in &list.chapters {
                    println!(
                        "  {} {:>2}. {}",
                        if chapter.is_completed() { "[x]" } else { "[ ]" },
                        chapter.chapter_number,
                        chapter.chapter_name
                    );
                }
                println!("{}/{} completed", list.completed, list.total);
            }
        }
        SubjectAction::AddChapter {
            subject_id,
            name,
            number,
            hours,
            difficulty,
        } => {
            let number = match number {
                Some(n) => n,
                None => {
                    let list = ctx.check(client.list_chapters(subject_id).await)?;
                    let last = list.chapters.iter().map(|c| c.chapter_number).max();
                    last.unwrap_or(0) + 1
                }
            };
            let chapter = NewChapter {
                chapter_name: name,
                chapter_number: number,
                estimated_hours: hours,
                difficulty: difficulty.map(|d| d.name().to_string()),
            };
            let id = ctx.check(client.create_chapter(subject_id, &chapter).await)?;
            println!("Chapter created: #{id} {}. {}", chapter.chapter_number, chapter.chapter_name);
        }
    }
    Ok(())
}

fn print_subject(subject: &Subject) {
    println!(
        "#{:<4} {:<30} {}",
        subject.subject_id,
        subject.subject_name,
        subject.difficulty()
    );
}
