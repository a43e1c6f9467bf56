//! REST backend client and wire models.

mod client;
mod models;

pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use models::{
    Chapter, ChapterList, LoginResponse, NewChapter, NewStudySession, NewSubject, Plan, PlanItem,
    SessionKind, Subject, SubjectUpdate, TaskFilter, User,
};
