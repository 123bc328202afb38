//! UI-facing vault handle
//!
//! Wraps a [`VaultSession`] and records the outcome of every operation as
//! a last-error string the front end can display. Nothing escapes uncaught.

use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::error::{Result, VaultError};
use crate::session::VaultSession;
use crate::settings::VaultSettings;
use crate::storage::PersistentStore;

/// Vault as seen by the UI: boolean/timestamp outcomes plus a last error
#[derive(Debug)]
pub struct Vault {
    session: VaultSession,
    last_error: Option<String>,
}

impl Vault {
    /// Create a locked vault over `store` using `settings`
    pub fn new(store: Arc<dyn PersistentStore>, settings: &VaultSettings) -> Self {
        Self::with_session(VaultSession::from_settings(store, settings))
    }

    /// Wrap an existing session
    pub fn with_session(session: VaultSession) -> Self {
        Self {
            session,
            last_error: None,
        }
    }

    /// Unlock with a password; `false` means see [`Vault::last_error`]
    pub async fn unlock(&mut self, password: &str) -> bool {
        let result = self.session.unlock(password).await;
        self.record(result).is_ok()
    }

    /// Lock the vault, wiping key material
    pub fn lock(&mut self) {
        self.session.lock();
    }

    /// Encrypt and persist `payload`, returning the save timestamp
    pub async fn save<T: Serialize + ?Sized>(&mut self, payload: &T) -> Result<i64> {
        let result = self.session.save(payload).await;
        self.record(result)
    }

    /// Load and decrypt the persisted payload
    pub async fn load<T: DeserializeOwned>(&mut self) -> Result<T> {
        let result = self.session.load().await;
        self.record(result)
    }

    /// Whether an envelope has been persisted
    ///
    /// Read-only: leaves [`Vault::last_error`] untouched so a pending failure
    /// stays visible.
    pub async fn has_saved_data(&self) -> Result<bool> {
        self.session.has_saved_data().await
    }

    pub fn is_locked(&self) -> bool {
        self.session.is_locked()
    }

    /// Message of the most recent failed operation, cleared on success
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_saved_at(&self) -> Option<i64> {
        self.session.last_saved_at()
    }

    pub fn session(&self) -> &VaultSession {
        &self.session
    }

    /// Whether a failure calls for re-entering the password
    pub fn needs_password(error: &VaultError) -> bool {
        error.requires_password()
    }

    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.last_error = None,
            Err(e) => {
                debug!("Vault operation failed: {}", e);
                self.last_error = Some(e.to_string());
            }
        }
        result
    }
}
