//! # vault-core
//!
//! Local encrypted vault for application state:
//! - PBKDF2-HMAC-SHA256 key derivation from a password
//! - AES-256-GCM authenticated encryption
//! - A text envelope (`cipher`, `salt`, `iv`, `ts`) in any string key-value store
//! - A lock/unlock session that zeroizes key material on lock

pub mod crypto;
pub mod envelope;
pub mod error;
pub mod session;
pub mod settings;
pub mod storage;
mod vault;

pub use crypto::{Aead, Kdf, KdfParams, RandomBytes, SecretString, VaultKey};
pub use envelope::Envelope;
pub use error::{Result, VaultError};
pub use session::{SessionState, VaultSession};
pub use settings::{SettingsManager, VaultSettings};
pub use storage::{FileStore, MemoryStore, PersistentStore};
pub use vault::Vault;
