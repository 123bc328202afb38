//! Error types for vault-core

use thiserror::Error;

/// Result type alias for vault operations
pub type Result<T> = std::result::Result<T, VaultError>;

/// Vault error types
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Key derivation failed: {0}")]
    Derivation(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Wrong password and tampered data are reported identically.
    #[error("Decryption failed: wrong password or corrupted data")]
    DecryptionAuth,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Vault is locked - unlock with password first")]
    Locked,

    #[error("Payload error: {0}")]
    Payload(String),
}

impl VaultError {
    /// Whether the caller should prompt for the password again
    pub fn requires_password(&self) -> bool {
        matches!(self, VaultError::DecryptionAuth | VaultError::Locked)
    }
}

impl From<std::io::Error> for VaultError {
    fn from(e: std::io::Error) -> Self {
        VaultError::Storage(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_password() {
        assert!(VaultError::DecryptionAuth.requires_password());
        assert!(VaultError::Locked.requires_password());
        assert!(!VaultError::Storage("missing".to_string()).requires_password());
        assert!(!VaultError::Derivation("empty salt".to_string()).requires_password());
    }

    #[test]
    fn test_decryption_message_does_not_leak_cause() {
        let msg = VaultError::DecryptionAuth.to_string();
        assert!(msg.contains("wrong password or corrupted data"));
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(VaultError::from(io), VaultError::Storage(_)));
    }
}
