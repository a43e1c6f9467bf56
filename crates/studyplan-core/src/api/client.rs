//! Thin async client for the study planner REST backend.

use chrono::{DateTime, Utc};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};
use url::Url;

use super::models::{
    Chapter, ChapterList, LoginResponse, NewChapter, NewStudySession, NewSubject, Plan,
    SessionKind, Subject, SubjectUpdate, TaskFilter,
};
use crate::error::{AuthError, CoreError, Result};
use crate::task::{Task, TaskStatus};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct SubjectsEnvelope {
    #[serde(default)]
    subjects: Vec<Subject>,
}

#[derive(Deserialize)]
struct SubjectEnvelope {
    subject: Subject,
}

#[derive(Deserialize)]
struct TasksEnvelope {
    #[serde(default)]
    tasks: Vec<Task>,
}

#[derive(Deserialize)]
struct TaskEnvelope {
    task: Task,
}

/// Chapter creation answers with whatever the backend chose to echo; only
/// the id matters.
#[derive(Deserialize)]
struct CreatedChapter {
    #[serde(alias = "chapter_id")]
    id: Option<i64>,
    #[serde(default)]
    chapter: Option<Chapter>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: Url::parse(&base)?,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Auth ─────────────────────────────────────────────────────────

    pub async fn login(&self, identifier: &str, password: &str) -> Result<LoginResponse> {
        let req = self
            .http
            .post(self.endpoint("auth/login")?)
            .json(&json!({ "identifier": identifier, "password": password }));
        debug!(%identifier, "POST auth/login");
        let response = req.send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            let message = error_message(response).await;
            return Err(AuthError::InvalidCredentials(message).into());
        }
        self.decode(response).await
    }

    // ── Subjects & chapters ──────────────────────────────────────────

    pub async fn list_subjects(&self, user_id: i64) -> Result<Vec<Subject>> {
        let path = format!("users/{user_id}/subjects");
        let body: SubjectsEnvelope = self.send(self.request(Method::GET, &path)?).await?;
        Ok(body.subjects)
    }

    pub async fn get_subject(&self, subject_id: i64) -> Result<Subject> {
        let path = format!("subjects/{subject_id}");
        let body: SubjectEnvelope = self.send(self.request(Method::GET, &path)?).await?;
        Ok(body.subject)
    }

    pub async fn create_subject(&self, user_id: i64, subject: &NewSubject) -> Result<Subject> {
        let path = format!("users/{user_id}/subjects");
        let req = self.request(Method::POST, &path)?.json(subject);
        let body: SubjectEnvelope = self.send(req).await?;
        Ok(body.subject)
    }

    /// Create a subject, then one chapter per non-empty topic (numbered from 1).
    pub async fn add_subject_with_topics(
        &self,
        user_id: i64,
        mut subject: NewSubject,
        topics: &[String],
    ) -> Result<(Subject, Vec<i64>)> {
        let topics: Vec<&str> = topics
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if !topics.is_empty() && subject.sub_topics.is_none() {
            subject.sub_topics = Some(topics.join(", "));
        }

        let created = self.create_subject(user_id, &subject).await?;
        let mut chapter_ids = Vec::with_capacity(topics.len());
        for (number, topic) in (1u32..).zip(topics) {
            let chapter = NewChapter::from_topic(topic, number);
            chapter_ids.push(self.create_chapter(created.subject_id, &chapter).await?);
        }
        Ok((created, chapter_ids))
    }

    pub async fn update_subject(&self, subject_id: i64, update: &SubjectUpdate) -> Result<Subject> {
        let path = format!("subjects/{subject_id}");
        let req = self.request(Method::PUT, &path)?.json(update);
        let body: SubjectEnvelope = self.send(req).await?;
        Ok(body.subject)
    }

    pub async fn delete_subject(&self, subject_id: i64) -> Result<()> {
        let path = format!("subjects/{subject_id}");
        let _: serde_json::Value = self.send(self.request(Method::DELETE, &path)?).await?;
        Ok(())
    }

    pub async fn list_chapters(&self, subject_id: i64) -> Result<ChapterList> {
        let path = format!("subjects/{subject_id}/chapters");
        self.send(self.request(Method::GET, &path)?).await
    }

    /// Returns the new chapter's id.
    pub async fn create_chapter(&self, subject_id: i64, chapter: &NewChapter) -> Result<i64> {
        let path = format!("subjects/{subject_id}/chapters");
        let req = self.request(Method::POST, &path)?.json(chapter);
        let body: CreatedChapter = self.send(req).await?;
        body.id
            .or_else(|| body.chapter.map(|c| c.chapter_id))
            .ok_or_else(|| CoreError::Custom("chapter created without an id".into()))
    }

    // ── Tasks & plan ─────────────────────────────────────────────────

    pub async fn list_tasks(&self, user_id: i64, filter: &TaskFilter) -> Result<Vec<Task>> {
        let path = format!("users/{user_id}/tasks");
        let req = self.request(Method::GET, &path)?.query(filter);
        let body: TasksEnvelope = self.send(req).await?;
        Ok(body.tasks)
    }

    pub async fn update_task_status(&self, task_id: i64, status: TaskStatus) -> Result<Task> {
        let path = format!("tasks/{task_id}");
        let req = self
            .request(Method::PUT, &path)?
            .json(&json!({ "status": status }));
        let body: TaskEnvelope = self.send(req).await?;
        Ok(body.task)
    }

    pub async fn fetch_plan(&self, user_id: i64) -> Result<Plan> {
        let path = format!("users/{user_id}/planner/schedule");
        self.send(self.request(Method::GET, &path)?).await
    }

    pub async fn record_session(
        &self,
        kind: SessionKind,
        minutes: u32,
        completed_at: DateTime<Utc>,
    ) -> Result<()> {
        let body = NewStudySession {
            session_type: kind,
            duration: minutes,
            completed_at,
        };
        let req = self.request(Method::POST, "sessions")?.json(&body);
        let _: serde_json::Value = self.send(req).await?;
        Ok(())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Authenticated request; fails early when no token is set.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = self.token.as_deref().ok_or(AuthError::NotAuthenticated)?;
        debug!(%method, path, "api request");
        Ok(self
            .http
            .request(method, self.endpoint(path)?)
            .bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let response = req.send().await?;
        self.decode(response).await
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }
        let url = response.url().path().to_string();
        let message = error_message(response).await;
        warn!(status = status.as_u16(), %url, %message, "api request failed");
        if status == StatusCode::UNAUTHORIZED {
            return Err(AuthError::TokenExpired.into());
        }
        Err(CoreError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => parsed.error,
        Err(_) if !body.trim().is_empty() => body,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    }
}
