//! Vault session: in-memory key material and the lock/unlock state machine
//!
//! The session derives its key once per unlock and keeps the salt fixed
//! across saves. Loading an envelope written under a different salt
//! re-derives from the retained password and adopts that key and salt.

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tokio::task;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::crypto::{
    Aead, AesGcmCipher, Kdf, KdfParams, Nonce, OsRandom, Pbkdf2Sha256, RandomBytes, Salt,
    SecretString, VaultKey,
};
use crate::envelope::Envelope;
use crate::error::{Result, VaultError};
use crate::settings::VaultSettings;
use crate::storage::PersistentStore;

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No key material in memory (initial state)
    Locked,
    /// Key, salt and password held in memory
    Unlocked,
}

/// Material held while unlocked; key and password are zeroed on drop
struct UnlockedKeys {
    key: VaultKey,
    salt: Salt,
    /// Retained to re-derive against a persisted salt that differs from `salt`
    password: SecretString,
}

/// A vault session bound to one storage key
///
/// Operations take `&mut self`, so a single session cannot run two of them
/// at once. Two sessions sharing a store are not coordinated: the last save wins.
pub struct VaultSession {
    store: Arc<dyn PersistentStore>,
    storage_key: String,
    params: KdfParams,
    kdf: Arc<dyn Kdf>,
    cipher: Arc<dyn Aead>,
    rng: Arc<dyn RandomBytes>,
    keys: Option<UnlockedKeys>,
    last_saved_at: Option<i64>,
}

impl VaultSession {
    /// Create a locked session using PBKDF2, AES-256-GCM and the OS RNG
    pub fn new(store: Arc<dyn PersistentStore>, storage_key: impl Into<String>) -> Self {
        Self {
            store,
            storage_key: storage_key.into(),
            params: KdfParams::default(),
            kdf: Arc::new(Pbkdf2Sha256),
            cipher: Arc::new(AesGcmCipher),
            rng: Arc::new(OsRandom),
            keys: None,
            last_saved_at: None,
        }
    }

    /// Create a locked session configured from settings
    pub fn from_settings(store: Arc<dyn PersistentStore>, settings: &VaultSettings) -> Self {
        Self::new(store, settings.storage_key.clone()).with_kdf_params(settings.kdf_params())
    }

    pub fn with_kdf_params(mut self, params: KdfParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_kdf(mut self, kdf: Arc<dyn Kdf>) -> Self {
        self.kdf = kdf;
        self
    }

    pub fn with_cipher(mut self, cipher: Arc<dyn Aead>) -> Self {
        self.cipher = cipher;
        self
    }

    pub fn with_random(mut self, rng: Arc<dyn RandomBytes>) -> Self {
        self.rng = rng;
        self
    }

    pub fn state(&self) -> SessionState {
        if self.keys.is_some() {
            SessionState::Unlocked
        } else {
            SessionState::Locked
        }
    }

    pub fn is_locked(&self) -> bool {
        self.keys.is_none()
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Timestamp (epoch ms) of the last successful save by this session
    pub fn last_saved_at(&self) -> Option<i64> {
        self.last_saved_at
    }

    /// Unlock with a password, deriving a key under a fresh salt
    ///
    /// Replaces any previously unlocked state. On failure the session is locked.
    pub async fn unlock(&mut self, password: &str) -> Result<()> {
        let password = SecretString::new(password);
        let salt = Salt::generate(self.rng.as_ref());

        match self.derive(&password, salt).await {
            Ok(key) => {
                self.keys = Some(UnlockedKeys {
                    key,
                    salt,
                    password,
                });
                info!("Vault unlocked");
                Ok(())
            }
            Err(e) => {
                self.keys = None;
                warn!("Vault unlock failed: {}", e);
                Err(e)
            }
        }
    }

    /// Lock the session, dropping key, salt and password from memory
    pub fn lock(&mut self) {
        if self.keys.take().is_some() {
            info!("Vault locked");
        }
    }

    /// Whether an envelope exists under this session's storage key
    pub async fn has_saved_data(&self) -> Result<bool> {
        Ok(self.store.get(&self.storage_key).await?.is_some())
    }

    /// Encrypt `plaintext` under the session key and persist it
    ///
    /// Returns the save timestamp in epoch milliseconds.
    pub async fn save_bytes(&mut self, plaintext: &[u8]) -> Result<i64> {
        let keys = self.keys.as_ref().ok_or(VaultError::Locked)?;

        let iv = Nonce::generate(self.rng.as_ref());
        let cipher = self.cipher.encrypt(&keys.key, &iv, plaintext)?;
        let envelope = Envelope {
            cipher,
            salt: keys.salt,
            iv,
            ts: Utc::now().timestamp_millis(),
        };

        self.store
            .set(&self.storage_key, &envelope.to_json()?)
            .await?;

        self.last_saved_at = Some(envelope.ts);
        debug!(
            "Saved {} encrypted bytes under {}",
            envelope.cipher.len(),
            self.storage_key
        );
        Ok(envelope.ts)
    }

    /// Read and decrypt the persisted envelope
    ///
    /// A wrong password and a tampered envelope both yield
    /// [`VaultError::DecryptionAuth`] and leave the session unchanged.
    pub async fn load_bytes(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        let keys = self.keys.as_ref().ok_or(VaultError::Locked)?;

        let raw = self
            .store
            .get(&self.storage_key)
            .await?
            .ok_or_else(|| {
                VaultError::Storage(format!("No saved data under {}", self.storage_key))
            })?;
        let envelope = Envelope::from_json(&raw)?;

        if envelope.salt == keys.salt {
            return self
                .cipher
                .decrypt(&keys.key, &envelope.iv, &envelope.cipher);
        }

        debug!("Persisted salt differs from session salt, re-deriving key");
        let key = self.derive(&keys.password, envelope.salt).await?;
        let plaintext = self.cipher.decrypt(&key, &envelope.iv, &envelope.cipher)?;

        // Keep the session key aligned with the persisted salt for later saves
        if let Some(keys) = self.keys.as_mut() {
            keys.key = key;
            keys.salt = envelope.salt;
        }

        Ok(plaintext)
    }

    /// Serialize `payload` as JSON, encrypt and persist it
    pub async fn save<T: Serialize + ?Sized>(&mut self, payload: &T) -> Result<i64> {
        if self.is_locked() {
            return Err(VaultError::Locked);
        }

        let bytes = Zeroizing::new(
            serde_json::to_vec(payload).map_err(|e| VaultError::Payload(e.to_string()))?,
        );
        self.save_bytes(&bytes).await
    }

    /// Load, decrypt and deserialize the persisted payload
    pub async fn load<T: DeserializeOwned>(&mut self) -> Result<T> {
        let bytes = self.load_bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| VaultError::Payload(e.to_string()))
    }

    /// Run the KDF on the blocking pool; it is deliberately slow
    async fn derive(&self, password: &SecretString, salt: Salt) -> Result<VaultKey> {
        let kdf = Arc::clone(&self.kdf);
        let params = self.params.clone();
        let password = SecretString::new(password.expose());

        task::spawn_blocking(move || kdf.derive(password.expose(), salt.as_bytes(), &params))
            .await
            .map_err(|e| VaultError::Derivation(e.to_string()))?
    }
}

impl std::fmt::Debug for VaultSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSession")
            .field("storage_key", &self.storage_key)
            .field("backend", &self.store.backend_name())
            .field("state", &self.state())
            .field("last_saved_at", &self.last_saved_at)
            .finish()
    }
}
