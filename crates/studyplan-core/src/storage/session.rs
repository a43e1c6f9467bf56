//! Logged-in user session and per-user cached state.
//!
//! Keys match the ones the web dashboard kept in browser storage.

use tracing::debug;

use super::database::LocalStore;
use crate::api::{Plan, User};
use crate::error::{AuthError, Result};

const USER_KEY: &str = "user";
const TOKEN_KEY: &str = "token";
const USER_ID_KEY: &str = "userId";
const PLAN_KEY: &str = "todaysPlan";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub token: String,
}

impl Session {
    pub fn new(user: User, token: impl Into<String>) -> Self {
        Self {
            user,
            token: token.into(),
        }
    }

    /// Restore the session, or fail with `NotAuthenticated` when the user or
    /// the token is missing.
    pub fn load(store: &LocalStore) -> Result<Self> {
        let (Some(user), Some(token)) = (store.get(USER_KEY)?, store.get(TOKEN_KEY)?) else {
            return Err(AuthError::NotAuthenticated.into());
        };
        let user: User = serde_json::from_str(&user)?;
        Ok(Self { user, token })
    }

    pub fn save(&self, store: &LocalStore) -> Result<()> {
        store.set(USER_KEY, &serde_json::to_string(&self.user)?)?;
        store.set(TOKEN_KEY, &self.token)?;
        store.set(USER_ID_KEY, &self.user.user_id.to_string())?;
        debug!(user_id = self.user.user_id, "session saved");
        Ok(())
    }

    /// Logout.
    pub fn clear(store: &LocalStore) -> Result<()> {
        for key in [USER_KEY, TOKEN_KEY, USER_ID_KEY] {
            store.remove(key)?;
        }
        Ok(())
    }

    pub fn user_id(&self) -> i64 {
        self.user.user_id
    }

    fn notepad_key(&self) -> String {
        format!("notepad_{}", self.user.user_id)
    }

    pub fn load_notes(&self, store: &LocalStore) -> Result<Option<String>> {
        store.get(&self.notepad_key())
    }

    pub fn save_notes(&self, store: &LocalStore, content: &str) -> Result<()> {
        store.set(&self.notepad_key(), content)
    }
}

pub fn cache_plan(store: &LocalStore, plan: &Plan) -> Result<()> {
    store.set(PLAN_KEY, &serde_json::to_string(plan)?)
}

pub fn cached_plan(store: &LocalStore) -> Result<Option<Plan>> {
    store
        .get(PLAN_KEY)?
        .map(|json| serde_json::from_str(&json))
        .transpose()
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    fn user(id: i64) -> User {
        User {
            user_id: id,
            username: format!("user{id}"),
            email: None,
            full_name: None,
            profile_image_url: None,
        }
    }

    #[test]
    fn missing_token_is_not_authenticated() {
        let store = LocalStore::open_memory().unwrap();
        store.set(USER_KEY, &serde_json::to_string(&user(1)).unwrap()).unwrap();
        let err = Session::load(&store).unwrap_err();
        assert!(matches!(err, CoreError::Auth(AuthError::NotAuthenticated)));
    }

    #[test]
    fn save_load_clear() {
        let store = LocalStore::open_memory().unwrap();
        let session = Session::new(user(7), "jwt");
        session.save(&store).unwrap();
        assert_eq!(store.get(USER_ID_KEY).unwrap().as_deref(), Some("7"));
        assert_eq!(Session::load(&store).unwrap(), session);

        Session::clear(&store).unwrap();
        assert!(Session::load(&store).is_err());
    }

    #[test]
    fn notes_are_per_user() {
        let store = LocalStore::open_memory().unwrap();
        let a = Session::new(user(1), "a");
        let b = Session::new(user(2), "b");
        a.save_notes(&store, "chapter 3 recap").unwrap();
        assert_eq!(a.load_notes(&store).unwrap().as_deref(), Some("chapter 3 recap"));
        assert!(b.load_notes(&store).unwrap().is_none());
    }

    #[test]
    fn plan_cache_roundtrip() {
        let store = LocalStore::open_memory().unwrap();
        assert!(cached_plan(&store).unwrap().is_none());
        let plan: Plan =
            serde_json::from_str(r#"{"schedule": {"2024-03-01": [{"title": "Limits"}]}}"#).unwrap();
        cache_plan(&store, &plan).unwrap();
        assert_eq!(cached_plan(&store).unwrap(), Some(plan));
    }
}
