//! Task records as served by the backend.
//!
//! Read-only from the dashboard's point of view, apart from status flips.

use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
    /// Any status this client does not model (e.g. `in_progress`).
    Other(String),
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
            TaskStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for TaskStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => TaskStatus::Pending,
            "completed" => TaskStatus::Completed,
            _ => TaskStatus::Other(raw),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend priority 1..=3. Anything that isn't 2 or 3 reads as Low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "Option<u8>", into = "u8")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl From<Option<u8>> for Priority {
    fn from(value: Option<u8>) -> Self {
        match value {
            Some(3) => Priority::High,
            Some(2) => Priority::Medium,
            _ => Priority::Low,
        }
    }
}

impl From<Priority> for u8 {
    fn from(value: Priority) -> Self {
        match value {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(alias = "id")]
    pub task_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub scheduled_date: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub subject_id: Option<i64>,
    #[serde(default)]
    pub subject_name: Option<String>,
}

impl Task {
    pub fn new(task_id: i64, title: impl Into<String>) -> Self {
        Self {
            task_id,
            title: title.into(),
            description: None,
            estimated_hours: None,
            priority: Priority::default(),
            status: TaskStatus::Pending,
            scheduled_date: None,
            deadline: None,
            subject_id: None,
            subject_name: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Calendar day this task belongs to: scheduled date, else deadline.
    pub fn calendar_day(&self) -> Option<NaiveDate> {
        self.scheduled_date
            .as_deref()
            .and_then(parse_day)
            .or_else(|| self.deadline.as_deref().and_then(parse_day))
    }

    pub fn hours(&self) -> f64 {
        self.estimated_hours.unwrap_or(1.0)
    }

    pub fn subject_label(&self) -> &str {
        self.subject_name.as_deref().unwrap_or("General")
    }
}

/// Day part of an ISO date/datetime or an RFC 2822 timestamp, time ignored.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Some(prefix) = raw.get(..10) {
        if let Ok(day) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Some(day);
        }
    }
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|dt| dt.date_naive())
}
