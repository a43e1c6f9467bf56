pub mod auth;
pub mod calendar;
pub mod config;
pub mod home;
pub mod notes;
pub mod plan;
pub mod subject;
pub mod task;
pub mod timer;

use serde::Serialize;
use chrono::NaiveDate;
use studyplan_core::error::{AuthError, CoreError, ValidationError};
use studyplan_core::{ApiClient, Config, LocalStore, Session};
use tracing::info;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// `YYYY-MM-DD` argument parser.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

/// Config and local store, opened once per invocation.
pub struct Context {
    pub config: Config,
    pub store: LocalStore,
}

impl Context {
    pub fn open() -> Result<Self, CoreError> {
        Ok(Self {
            config: Config::load()?,
            store: LocalStore::open()?,
        })
    }

    /// Client without credentials (login only).
    pub fn client(&self) -> Result<ApiClient, CoreError> {
        ApiClient::new(&self.config.api.base_url)
    }

    /// Stored session plus a client carrying its token.
    pub fn authed(&self) -> Result<(Session, ApiClient), CoreError> {
        let session = Session::load(&self.store)?;
        let client = self.client()?.with_token(session.token.clone());
        Ok((session, client))
    }

    /// Drop the stored session when the backend rejected its token.
    pub fn check<T>(&self, result: Result<T, CoreError>) -> Result<T, CoreError> {
        if let Err(CoreError::Auth(AuthError::TokenExpired)) = &result {
            info!("token rejected; clearing session");
            Session::clear(&self.store)?;
        }
        result
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
