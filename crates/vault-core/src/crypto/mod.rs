//! Cryptographic primitives for the vault
//!
//! This module provides:
//! - AES-256-GCM authenticated encryption
//! - PBKDF2-HMAC-SHA256 key derivation from passwords
//! - Random salts and nonces
//! - Secure memory handling with zeroize

mod encryption;
mod key_derivation;
mod random;
mod secure_memory;

pub use encryption::{decrypt, encrypt, Aead, AesGcmCipher, TAG_LENGTH};
pub use key_derivation::{
    derive_key, HashAlgorithm, Kdf, KdfParams, Pbkdf2Sha256, DEFAULT_ITERATIONS, MIN_ITERATIONS,
};
pub use random::{Nonce, OsRandom, RandomBytes, Salt, NONCE_LENGTH, SALT_LENGTH};
pub use secure_memory::{SecretString, VaultKey, KEY_LENGTH};
