//! AES-256-GCM authenticated encryption
//!
//! Ciphertext layout matches WebCrypto: `ciphertext || auth_tag`
//! - Nonce: 12 bytes (96 bits), supplied by the caller
//! - Auth tag: 16 bytes (128 bits), appended

use aes_gcm::{
    aead::{Aead as _, KeyInit},
    Aes256Gcm,
};
use zeroize::Zeroizing;

use super::{Nonce, VaultKey};
use crate::error::{Result, VaultError};

/// Authentication tag length in bytes
pub const TAG_LENGTH: usize = 16;

/// Authenticated encryption with associated tag
pub trait Aead: Send + Sync {
    /// Encrypt `plaintext`, returning ciphertext with the tag appended
    fn encrypt(&self, key: &VaultKey, nonce: &Nonce, plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt and authenticate; any mismatch is [`VaultError::DecryptionAuth`]
    fn decrypt(&self, key: &VaultKey, nonce: &Nonce, ciphertext: &[u8])
        -> Result<Zeroizing<Vec<u8>>>;
}

/// AES-256-GCM cipher engine
#[derive(Debug, Default, Clone, Copy)]
pub struct AesGcmCipher;

impl Aead for AesGcmCipher {
    fn encrypt(&self, key: &VaultKey, nonce: &Nonce, plaintext: &[u8]) -> Result<Vec<u8>> {
        encrypt(key, nonce, plaintext)
    }

    fn decrypt(
        &self,
        key: &VaultKey,
        nonce: &Nonce,
        ciphertext: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>> {
        decrypt(key, nonce, ciphertext)
    }
}

/// Encrypt plaintext using AES-256-GCM
///
/// # Arguments
/// * `key` - The 256-bit encryption key
/// * `nonce` - A nonce never used before with this key
/// * `plaintext` - The data to encrypt
pub fn encrypt(key: &VaultKey, nonce: &Nonce, plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::Encryption(e.to_string()))?;

    cipher
        .encrypt(aes_gcm::Nonce::from_slice(nonce.as_bytes()), plaintext)
        .map_err(|e| VaultError::Encryption(e.to_string()))
}

/// Decrypt ciphertext (with appended tag) using AES-256-GCM
///
/// The returned plaintext is zeroed when dropped.
pub fn decrypt(key: &VaultKey, nonce: &Nonce, ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| VaultError::DecryptionAuth)?;

    cipher
        .decrypt(aes_gcm::Nonce::from_slice(nonce.as_bytes()), ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| VaultError::DecryptionAuth)
}
