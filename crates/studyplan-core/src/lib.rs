//! # Study Planner Core Library
//!
//! Business logic behind the study planner dashboard. Every tab of the
//! dashboard is available through the `studyplan` CLI, which is a thin
//! layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a Pomodoro countdown state machine. The caller (or the
//!   [`TimerDriver`]) invokes `tick()` once per elapsed second
//! - **Calendar**: builds the 42-cell month grid with per-day task completion
//! - **API**: async client for the REST backend (subjects, chapters, tasks, plan)
//! - **Storage**: SQLite key-value store for the session and TOML configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`CalendarView`]: Month navigation and grid rendering
//! - [`ApiClient`]: REST backend client
//! - [`LocalStore`]: Session, notepad and local study statistics
//! - [`Config`]: Application configuration management

pub mod api;
pub mod calendar;
pub mod error;
pub mod events;
pub mod storage;
pub mod task;
pub mod timer;

pub use api::{ApiClient, Plan, PlanItem, Subject, User};
pub use calendar::{build_grid, CalendarCell, CalendarView, CompletionStatus, MonthGrid};
pub use error::{AuthError, ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use storage::{Config, LocalStore, Session, StudyStats};
pub use task::{Priority, Task, TaskStatus};
pub use timer::{Phase, Preset, TimerDriver, TimerEngine, TimerSettings, TimerState};
