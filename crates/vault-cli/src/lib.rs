//! # vault-cli
//!
//! Command handlers behind the `task-vault` binary. Each run opens the vault
//! over a file store, unlocks it, performs one operation and exits.
//!
//! Layout of a data directory: `settings.json` at the top, envelopes under
//! `data/`, so no storage key can overwrite the settings file.

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use zeroize::Zeroizing;

use vault_core::{FileStore, SettingsManager, Vault, VaultError};

/// Subdirectory of the data directory that holds envelope files
pub const ENVELOPE_DIR: &str = "data";

/// CLI error types
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error("Unlock failed: {0}")]
    Unlock(String),

    #[error("Invalid JSON payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("Could not read payload file {path:?}: {source}")]
    ReadPayload {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not read password: {0}")]
    Password(std::io::Error),
}

/// Status of the vault's storage, available without a password
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub storage_key: String,
    pub has_data: bool,
    pub data_dir: PathBuf,
}

/// Open the vault stored in `data_dir`, or in the default data directory
pub fn open_vault(data_dir: Option<PathBuf>) -> Result<(Vault, PathBuf), CliError> {
    let dir = match data_dir {
        Some(dir) => dir,
        None => FileStore::default_dir()?,
    };

    let store = FileStore::with_dir(dir.join(ENVELOPE_DIR))?;
    let settings = SettingsManager::new(&dir);
    debug!(
        "Opening vault {:?} in {:?}",
        settings.get().storage_key,
        dir
    );

    Ok((Vault::new(Arc::new(store), settings.get()), dir))
}

/// Take the password given on the command line, or ask `prompt` for one
///
/// Both paths end up in a buffer that is wiped when dropped.
pub fn resolve_password<F>(
    given: Option<String>,
    prompt: F,
) -> Result<Zeroizing<String>, CliError>
where
    F: FnOnce() -> std::io::Result<String>,
{
    match given {
        Some(password) => Ok(Zeroizing::new(password)),
        None => prompt().map(Zeroizing::new).map_err(CliError::Password),
    }
}

/// Parse a payload argument: inline JSON, or `@path` to read JSON from a file
pub fn parse_payload(arg: &str) -> Result<Value, CliError> {
    match arg.strip_prefix('@') {
        Some(path) => {
            let path = Path::new(path);
            let contents =
                std::fs::read_to_string(path).map_err(|source| CliError::ReadPayload {
                    path: path.to_path_buf(),
                    source,
                })?;
            Ok(serde_json::from_str(&contents)?)
        }
        None => Ok(serde_json::from_str(arg)?),
    }
}

/// Unlock and save `payload`, returning the save timestamp
pub async fn save(vault: &mut Vault, password: &str, payload: &Value) -> Result<i64, CliError> {
    unlock(vault, password).await?;
    let ts = vault.save(payload).await;
    vault.lock();
    Ok(ts?)
}

/// Unlock and load the stored payload
pub async fn load(vault: &mut Vault, password: &str) -> Result<Value, CliError> {
    unlock(vault, password).await?;
    let payload: vault_core::Result<Value> = vault.load().await;
    vault.lock();
    Ok(payload?)
}

/// Report whether data exists, without unlocking
pub async fn status(vault: &Vault, data_dir: &Path) -> Result<Status, CliError> {
    Ok(Status {
        storage_key: vault.session().storage_key().to_string(),
        has_data: vault.has_saved_data().await?,
        data_dir: data_dir.to_path_buf(),
    })
}

async fn unlock(vault: &mut Vault, password: &str) -> Result<(), CliError> {
    if vault.unlock(password).await {
        return Ok(());
    }
    let message = vault.last_error().unwrap_or("unlock failed").to_string();
    Err(CliError::Unlock(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fast_dir() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("settings.json"),
            r#"{"version":1,"storageKey":"tasks","kdfIterations":10000}"#,
        )
        .unwrap();
        temp_dir
    }

    #[test]
    fn test_parse_inline_payload() {
        let value = parse_payload(r#"{"taskCount":3}"#).unwrap();
        assert_eq!(value["taskCount"], 3);

        assert!(matches!(
            parse_payload("{oops"),
            Err(CliError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_parse_file_payload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");
        std::fs::write(&path, r#"["a","b"]"#).unwrap();

        let value = parse_payload(&format!("@{}", path.display())).unwrap();
        assert_eq!(value, serde_json::json!(["a", "b"]));

        let missing = parse_payload(&format!("@{}", temp_dir.path().join("nope").display()));
        assert!(matches!(missing, Err(CliError::ReadPayload { .. })));
    }

    #[tokio::test]
    async fn test_save_then_load_across_runs() {
        let temp_dir = fast_dir();
        let payload = serde_json::json!({ "taskCount": 3 });

        {
            let (mut vault, _) = open_vault(Some(temp_dir.path().to_path_buf())).unwrap();
            save(&mut vault, "correct-horse", &payload).await.unwrap();
            assert!(vault.is_locked());
        }

        assert!(temp_dir.path().join("data").join("tasks.json").exists());

        let (mut vault, _) = open_vault(Some(temp_dir.path().to_path_buf())).unwrap();
        let loaded = load(&mut vault, "correct-horse").await.unwrap();
        assert_eq!(loaded, payload);
        assert!(vault.is_locked());
    }

    #[tokio::test]
    async fn test_load_wrong_password() {
        let temp_dir = fast_dir();
        let (mut vault, _) = open_vault(Some(temp_dir.path().to_path_buf())).unwrap();
        save(&mut vault, "correct-horse", &serde_json::json!(1))
            .await
            .unwrap();

        let err = load(&mut vault, "wrong-pw").await.unwrap_err();
        assert!(matches!(err, CliError::Vault(VaultError::DecryptionAuth)));
        assert!(vault.last_error().is_some());
    }

    #[tokio::test]
    async fn test_status() {
        let temp_dir = fast_dir();
        let (mut vault, dir) = open_vault(Some(temp_dir.path().to_path_buf())).unwrap();

        let before = status(&vault, &dir).await.unwrap();
        assert_eq!(before.storage_key, "tasks");
        assert!(!before.has_data);

        save(&mut vault, "correct-horse", &serde_json::json!({}))
            .await
            .unwrap();
        assert!(status(&vault, &dir).await.unwrap().has_data);
    }

    #[tokio::test]
    async fn test_status_reports_invalid_storage_key() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("settings.json"),
            r#"{"version":1,"storageKey":"../outside","kdfIterations":10000}"#,
        )
        .unwrap();
        let (vault, dir) = open_vault(Some(temp_dir.path().to_path_buf())).unwrap();

        let result = status(&vault, &dir).await;
        assert!(matches!(
            result,
            Err(CliError::Vault(VaultError::Storage(_)))
        ));
    }

    #[tokio::test]
    async fn test_storage_key_named_settings_keeps_settings_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("settings.json"),
            r#"{"version":1,"storageKey":"settings","kdfIterations":10000}"#,
        )
        .unwrap();
        let payload = serde_json::json!({ "taskCount": 2 });

        {
            let (mut vault, _) = open_vault(Some(temp_dir.path().to_path_buf())).unwrap();
            save(&mut vault, "correct-horse", &payload).await.unwrap();
        }

        let settings = SettingsManager::new(temp_dir.path());
        assert_eq!(settings.get().storage_key, "settings");
        assert_eq!(settings.get().kdf_iterations, 10000);

        let (mut vault, _) = open_vault(Some(temp_dir.path().to_path_buf())).unwrap();
        assert_eq!(load(&mut vault, "correct-horse").await.unwrap(), payload);
    }

    #[test]
    fn test_resolve_password() {
        let given = resolve_password(Some("correct-horse".to_string()), || {
            panic!("prompted despite a given password")
        })
        .unwrap();
        assert_eq!(given.as_str(), "correct-horse");

        let prompted = resolve_password(None, || Ok("from-tty".to_string())).unwrap();
        assert_eq!(prompted.as_str(), "from-tty");

        let failed = resolve_password(None, || {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "no tty"))
        });
        assert!(matches!(failed, Err(CliError::Password(_))));
    }
}
