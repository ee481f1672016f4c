//! Admin session holder.
//!
//! The only writer of the session: `login` establishes it, `logout` tears it
//! down. Both the in-memory copy and the durable store are kept in step so a
//! restart rehydrates the same login state.

use buildsite_core::session::{LoginRequest, Session};

use crate::api::BackendApi;
use crate::error::ClientResult;
use crate::storage::{KeyValueStore, StorageError};

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "admin_token";

/// Storage key for the logged-in username.
pub const USERNAME_KEY: &str = "admin_username";

#[derive(Debug)]
pub struct SessionHolder<S: KeyValueStore> {
    store: S,
    session: Option<Session>,
}

impl<S: KeyValueStore> SessionHolder<S> {
    /// Rehydrate from `store`. A half-written session (token without
    /// username or vice versa) is discarded.
    pub fn init(mut store: S) -> Result<Self, StorageError> {
        let session = match (store.get(TOKEN_KEY), store.get(USERNAME_KEY)) {
            (Some(token), Some(username)) if !token.is_empty() => Some(Session { token, username }),
            (None, None) => None,
            _ => {
                tracing::warn!("Discarding incomplete persisted session");
                store.remove(TOKEN_KEY)?;
                store.remove(USERNAME_KEY)?;
                None
            }
        };
        if let Some(session) = &session {
            tracing::debug!(username = %session.username, "Restored persisted session");
        }
        Ok(Self { store, session })
    }

    /// Authenticate against the backend and persist the issued session.
    ///
    /// On failure the held session is left as it was.
    pub async fn login(
        &mut self,
        api: &BackendApi,
        username: &str,
        password: &str,
    ) -> ClientResult<&Session> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let session = api.login(&request).await.map_err(|e| {
            tracing::warn!(username, error = %e, "Login failed");
            e
        })?;

        self.store.set(TOKEN_KEY, &session.token)?;
        self.store.set(USERNAME_KEY, &session.username)?;
        tracing::info!(username = %session.username, "Logged in");
        Ok(self.session.insert(session))
    }

    /// Clear the session locally. Memory is cleared even if the store fails.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        if let Some(session) = self.session.take() {
            tracing::info!(username = %session.username, "Logged out");
        }
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USERNAME_KEY)
    }

    pub fn current_token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn username(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.username.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
