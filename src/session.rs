//! Officer sessions and the account endpoints of the central registry.
//!
//! The logged-in officer is an explicitly passed context value, persisted
//! in the field store between launches. Backend failures surface as one
//! generic error to the user; nothing here retries.

use thiserror::Error;

use crate::config;
use crate::models::{Officer, Role};
use crate::store::{ns, FieldStore, StoreError};

const SESSION_KEY: &str = "logged_user";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid PIN")]
    InvalidPin,

    #[error("could not reach the server: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server error: HTTP {0}")]
    Backend(reqwest::StatusCode),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One authenticated reporting session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub officer: Officer,
}

impl Session {
    pub fn is_superuser(&self) -> bool {
        self.officer.role == Role::Superuser
    }
}

/// HTTP client for login and officer provisioning.
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    pub fn new() -> Self {
        Self::with_base_url(config::api_base())
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Look up the officer account matching a PIN.
    ///
    /// The registry answers with a (possibly empty) list of matches; an
    /// empty list is an invalid PIN, not a transport failure.
    pub async fn login(&self, pin: &str) -> Result<Officer, AuthError> {
        let url = format!("{}/api/users", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("pin", pin)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::Backend(response.status()));
        }

        let mut matches: Vec<Officer> = response.json().await?;
        match matches.is_empty() {
            true => Err(AuthError::InvalidPin),
            false => Ok(matches.remove(0)),
        }
    }

    /// Provision a new officer account. Superuser only; the registry does
    /// not re-check the caller's role, the client gates the screen.
    pub async fn create_officer(&self, officer: &Officer) -> Result<(), AuthError> {
        let url = format!("{}/api/users", self.base_url);
        let response = self.http.post(&url).json(officer).send().await?;

        if !response.status().is_success() {
            return Err(AuthError::Backend(response.status()));
        }
        Ok(())
    }
}

impl Default for AuthClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Persist the logged-in officer so the next launch can restore it.
pub fn persist_session<S: FieldStore + ?Sized>(
    store: &mut S,
    session: &Session,
) -> Result<(), StoreError> {
    let value = serde_json::to_value(&session.officer)?;
    store.put(ns::SESSION, SESSION_KEY, &value)
}

/// Restore the previously logged-in officer, if any.
pub fn restore_session<S: FieldStore + ?Sized>(
    store: &S,
) -> Result<Option<Session>, StoreError> {
    let Some(value) = store.get(ns::SESSION, SESSION_KEY)? else {
        return Ok(None);
    };
    let officer: Officer = serde_json::from_value(value)?;
    Ok(Some(Session { officer }))
}

/// Forget the logged-in officer.
pub fn clear_session<S: FieldStore + ?Sized>(store: &mut S) -> Result<(), StoreError> {
    store.remove(ns::SESSION, SESSION_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryFieldStore;

    fn officer(role: Role) -> Officer {
        Officer {
            staff_id: "VO-0042".into(),
            name: "Ama Mensah".into(),
            job_description: "District Vet Officer".into(),
            contact_number: "+233200000000".into(),
            pin: "4321".into(),
            role,
        }
    }

    #[test]
    fn session_round_trips_through_store() {
        let mut store = MemoryFieldStore::new();
        let session = Session { officer: officer(Role::Officer) };

        persist_session(&mut store, &session).unwrap();
        let restored = restore_session(&store).unwrap().unwrap();
        assert_eq!(restored, session);

        clear_session(&mut store).unwrap();
        assert!(restore_session(&store).unwrap().is_none());
    }

    #[test]
    fn superuser_flag_follows_role() {
        assert!(Session { officer: officer(Role::Superuser) }.is_superuser());
        assert!(!Session { officer: officer(Role::Officer) }.is_superuser());
    }
}
