//! Password-based key derivation using PBKDF2-HMAC-SHA256

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

use super::secure_memory::KEY_LENGTH;
use super::VaultKey;
use crate::error::{Result, VaultError};

/// Default PBKDF2 iteration count
pub const DEFAULT_ITERATIONS: u32 = 150_000;

/// Lowest iteration count accepted from configuration
pub const MIN_ITERATIONS: u32 = 10_000;

/// Hash function driving the PBKDF2 HMAC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    #[default]
    Sha256,
}

/// Parameters for PBKDF2 key derivation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KdfParams {
    /// Iteration count (default: 150000)
    pub iterations: u32,
    /// HMAC hash (default: SHA-256)
    pub hash: HashAlgorithm,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            hash: HashAlgorithm::Sha256,
        }
    }
}

impl KdfParams {
    pub fn with_iterations(iterations: u32) -> Self {
        Self {
            iterations,
            ..Self::default()
        }
    }
}

/// Turns a password and salt into a 256-bit key
pub trait Kdf: Send + Sync {
    /// Derive a key. Equal inputs always yield an identical key.
    fn derive(&self, password: &str, salt: &[u8], params: &KdfParams) -> Result<VaultKey>;
}

/// PBKDF2 key derivation
#[derive(Debug, Default, Clone, Copy)]
pub struct Pbkdf2Sha256;

impl Kdf for Pbkdf2Sha256 {
    fn derive(&self, password: &str, salt: &[u8], params: &KdfParams) -> Result<VaultKey> {
        derive_key(password, salt, params)
    }
}

/// Derive a 256-bit key from a password using PBKDF2
///
/// # Arguments
/// * `password` - The user's password
/// * `salt` - Random salt bytes, must not be empty
/// * `params` - Iteration count and hash
///
/// # Returns
/// A 32-byte key suitable for AES-256-GCM
pub fn derive_key(password: &str, salt: &[u8], params: &KdfParams) -> Result<VaultKey> {
    if salt.is_empty() {
        return Err(VaultError::Derivation("Salt must not be empty".to_string()));
    }
    if params.iterations == 0 {
        return Err(VaultError::Derivation(
            "Iteration count must be positive".to_string(),
        ));
    }

    let mut key_bytes = [0u8; KEY_LENGTH];
    match params.hash {
        HashAlgorithm::Sha256 => {
            pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, params.iterations, &mut key_bytes)
        }
    }

    let key = VaultKey::new(key_bytes);
    zeroize::Zeroize::zeroize(&mut key_bytes);
    Ok(key)
}
