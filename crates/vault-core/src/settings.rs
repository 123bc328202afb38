//! Vault settings management
//!
//! Stores non-sensitive configuration in a plain JSON file.
//! Settings are readable while the vault is locked.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::crypto::{KdfParams, DEFAULT_ITERATIONS, MIN_ITERATIONS};
use crate::error::{Result, VaultError};

/// Default storage key the envelope is written under
pub const DEFAULT_STORAGE_KEY: &str = "task-vault";

/// Vault settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VaultSettings {
    /// Settings file version
    pub version: u32,
    /// Key the envelope is stored under
    pub storage_key: String,
    /// PBKDF2 iteration count
    pub kdf_iterations: u32,
}

impl Default for VaultSettings {
    fn default() -> Self {
        Self {
            version: 1,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            kdf_iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl VaultSettings {
    /// Key derivation parameters, never below [`MIN_ITERATIONS`]
    pub fn kdf_params(&self) -> KdfParams {
        if self.kdf_iterations < MIN_ITERATIONS {
            warn!(
                "Configured KDF iterations {} below minimum, using {}",
                self.kdf_iterations, MIN_ITERATIONS
            );
            return KdfParams::with_iterations(MIN_ITERATIONS);
        }
        KdfParams::with_iterations(self.kdf_iterations)
    }
}

/// Settings manager
pub struct SettingsManager {
    settings_file: PathBuf,
    settings: VaultSettings,
}

impl SettingsManager {
    /// Create a new settings manager
    pub fn new(storage_dir: &Path) -> Self {
        let settings_file = storage_dir.join("settings.json");
        let settings = Self::load_from_file(&settings_file).unwrap_or_else(|e| {
            warn!("Ignoring unreadable settings file: {}", e);
            VaultSettings::default()
        });

        Self {
            settings_file,
            settings,
        }
    }

    /// Load settings from file
    fn load_from_file(path: &Path) -> Result<VaultSettings> {
        if !path.exists() {
            debug!("No settings file found, using defaults");
            return Ok(VaultSettings::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: VaultSettings = serde_json::from_str(&contents)
            .map_err(|e| VaultError::Storage(e.to_string()))?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to file
    pub async fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.settings)
            .map_err(|e| VaultError::Storage(e.to_string()))?;

        // Write atomically using temp file
        let temp_path = self.settings_file.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, &self.settings_file).await?;

        debug!("Saved settings to {:?}", self.settings_file);
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &VaultSettings {
        &self.settings
    }

    /// Get mutable settings
    pub fn get_mut(&mut self) -> &mut VaultSettings {
        &mut self.settings
    }

    /// Reset settings to defaults and delete settings file
    pub async fn reset(&mut self) -> Result<()> {
        self.settings = VaultSettings::default();

        if self.settings_file.exists() {
            tokio::fs::remove_file(&self.settings_file).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_settings_default() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SettingsManager::new(temp_dir.path());

        let settings = manager.get();
        assert_eq!(settings.storage_key, "task-vault");
        assert_eq!(settings.kdf_iterations, 150_000);
        assert_eq!(settings.kdf_params(), KdfParams::default());
    }

    #[tokio::test]
    async fn test_settings_persistence() {
        let temp_dir = TempDir::new().unwrap();

        {
            let mut manager = SettingsManager::new(temp_dir.path());
            manager.get_mut().storage_key = "dashboard-state".to_string();
            manager.get_mut().kdf_iterations = 200_000;
            manager.save().await.unwrap();
        }

        {
            let manager = SettingsManager::new(temp_dir.path());
            assert_eq!(manager.get().storage_key, "dashboard-state");
            assert_eq!(manager.get().kdf_iterations, 200_000);
        }
    }

    #[tokio::test]
    async fn test_camel_case_and_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("settings.json"),
            r#"{"storageKey":"other"}"#,
        )
        .unwrap();

        let manager = SettingsManager::new(temp_dir.path());
        assert_eq!(manager.get().storage_key, "other");
        assert_eq!(manager.get().kdf_iterations, DEFAULT_ITERATIONS);
    }

    #[tokio::test]
    async fn test_corrupt_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("settings.json"), "{not json").unwrap();

        let manager = SettingsManager::new(temp_dir.path());
        assert_eq!(manager.get(), &VaultSettings::default());
    }

    #[tokio::test]
    async fn test_reset() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path());
        manager.get_mut().kdf_iterations = 300_000;
        manager.save().await.unwrap();

        manager.reset().await.unwrap();
        assert_eq!(manager.get(), &VaultSettings::default());
        assert!(!temp_dir.path().join("settings.json").exists());
    }

    #[test]
    fn test_iteration_floor() {
        let settings = VaultSettings {
            kdf_iterations: 1_000,
            ..VaultSettings::default()
        };
        assert_eq!(settings.kdf_params().iterations, MIN_ITERATIONS);
    }
}
