//! Random salts and nonces

use rand::RngCore;

/// Salt length in bytes
pub const SALT_LENGTH: usize = 16;

/// AES-GCM nonce length in bytes
pub const NONCE_LENGTH: usize = 12;

/// Source of cryptographically secure random bytes
pub trait RandomBytes: Send + Sync {
    /// Fill `buf` entirely with random bytes
    fn fill(&self, buf: &mut [u8]);
}

/// Operating system CSPRNG
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomBytes for OsRandom {
    fn fill(&self, buf: &mut [u8]) {
        rand::rngs::OsRng.fill_bytes(buf);
    }
}

/// Key derivation salt, persisted next to the ciphertext
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Salt([u8; SALT_LENGTH]);

impl Salt {
    pub fn new(bytes: [u8; SALT_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Generate a fresh random salt
    pub fn generate(rng: &dyn RandomBytes) -> Self {
        let mut bytes = [0u8; SALT_LENGTH];
        rng.fill(&mut bytes);
        Self(bytes)
    }

    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        slice.try_into().ok().map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LENGTH] {
        &self.0
    }
}

/// Per-encryption nonce (IV); never reused under the same key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nonce([u8; NONCE_LENGTH]);

impl Nonce {
    pub fn new(bytes: [u8; NONCE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Generate a fresh random nonce
    pub fn generate(rng: &dyn RandomBytes) -> Self {
        let mut bytes = [0u8; NONCE_LENGTH];
        rng.fill(&mut bytes);
        Self(bytes)
    }

    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        slice.try_into().ok().map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; NONCE_LENGTH] {
        &self.0
    }
}
