use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{Priority, Task, TaskStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }

    /// Avatar letter.
    pub fn initial(&self) -> Option<char> {
        self.display_name()
            .chars()
            .next()
            .map(|c| c.to_uppercase().next().unwrap_or(c))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(alias = "id")]
    pub subject_id: i64,
    pub subject_name: String,
    #[serde(default = "default_subject_priority")]
    pub priority: u8,
    #[serde(default)]
    pub color_code: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub target_grade: Option<String>,
    #[serde(default)]
    pub current_topic: Option<String>,
    #[serde(default)]
    pub sub_topics: Option<String>,
}

fn default_subject_priority() -> u8 {
    1
}

impl Subject {
    pub fn difficulty(&self) -> &'static str {
        match self.priority {
            1 => "easy",
            3 => "hard",
            _ => "medium",
        }
    }
}

/// Body for creating a subject.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewSubject {
    pub subject_name: String,
    pub priority: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_topic: Option<String>,
    /// Comma-joined topic list, mirrored into chapters on creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_topics: Option<String>,
}

/// Partial update; only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SubjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
}

impl SubjectUpdate {
    pub fn is_empty(&self) -> bool {
        self.subject_name.is_none() && self.priority.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    #[serde(alias = "id")]
    pub chapter_id: i64,
    #[serde(default)]
    pub subject_id: Option<i64>,
    pub chapter_name: String,
    pub chapter_number: u32,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Chapter {
    pub fn is_completed(&self) -> bool {
        self.status.as_deref() == Some("completed")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewChapter {
    pub chapter_name: String,
    pub chapter_number: u32,
    pub estimated_hours: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

impl NewChapter {
    /// Default estimate for chapters created from topic names.
    pub const DEFAULT_HOURS: f64 = 2.0;

    pub fn from_topic(topic: &str, chapter_number: u32) -> Self {
        Self {
            chapter_name: topic.trim().to_string(),
            chapter_number,
            estimated_hours: Self::DEFAULT_HOURS,
            difficulty: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterList {
    pub chapters: Vec<Chapter>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub completed: usize,
    #[serde(default)]
    pub progress: f64,
}

/// Query parameters accepted by the task listing endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// One entry of a generated plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanItem {
    #[serde(default)]
    pub task_id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub subject_name: Option<String>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub deadline: Option<String>,
}

impl PlanItem {
    pub fn hours(&self) -> f64 {
        self.estimated_hours.unwrap_or(1.0)
    }

    pub fn subject_label(&self) -> &str {
        self.subject_name.as_deref().unwrap_or("General")
    }
}

impl From<Task> for PlanItem {
    fn from(task: Task) -> Self {
        Self {
            task_id: Some(task.task_id),
            title: task.title,
            subject_name: task.subject_name,
            estimated_hours: task.estimated_hours,
            priority: task.priority,
            deadline: task.deadline,
        }
    }
}

/// Backend-generated schedule: ISO date to the items planned that day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub schedule: BTreeMap<String, Vec<PlanItem>>,
}

impl Plan {
    pub fn for_day(&self, day: NaiveDate) -> &[PlanItem] {
        self.schedule
            .get(&day.format("%Y-%m-%d").to_string())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn total_hours(&self, day: NaiveDate) -> f64 {
        self.for_day(day).iter().map(PlanItem::hours).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Work,
    Break,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewStudySession {
    pub session_type: SessionKind,
    /// Minutes.
    pub duration: u32,
    pub completed_at: DateTime<Utc>,
}
