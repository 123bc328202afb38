//! Persisted envelope format
//!
//! One envelope is stored per storage key and replaced wholesale on every save:
//!
//! ```json
//! { "cipher": "<base64>", "salt": "<base64>", "iv": "<base64>", "ts": 1700000000000 }
//! ```

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use crate::crypto::{Nonce, Salt, NONCE_LENGTH, SALT_LENGTH, TAG_LENGTH};
use crate::error::{Result, VaultError};

/// Text form of the envelope as written to the store
#[derive(Debug, Serialize, Deserialize)]
struct EnvelopeRecord {
    cipher: String,
    salt: String,
    iv: String,
    ts: i64,
}

/// Decoded envelope: ciphertext plus what is needed to decrypt it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Ciphertext with the GCM tag appended
    pub cipher: Vec<u8>,
    /// Salt the encryption key was derived with
    pub salt: Salt,
    /// Nonce used for this encryption
    pub iv: Nonce,
    /// Save time, Unix epoch milliseconds
    pub ts: i64,
}

impl Envelope {
    /// Serialize to the persisted JSON record
    pub fn to_json(&self) -> Result<String> {
        let record = EnvelopeRecord {
            cipher: BASE64.encode(&self.cipher),
            salt: BASE64.encode(self.salt.as_bytes()),
            iv: BASE64.encode(self.iv.as_bytes()),
            ts: self.ts,
        };

        serde_json::to_string(&record).map_err(|e| VaultError::Storage(e.to_string()))
    }

    /// Parse a persisted JSON record; any missing or malformed field is rejected
    pub fn from_json(text: &str) -> Result<Self> {
        let record: EnvelopeRecord = serde_json::from_str(text)
            .map_err(|e| VaultError::Storage(format!("Malformed envelope: {}", e)))?;

        let cipher = decode_field("cipher", &record.cipher)?;
        if cipher.len() < TAG_LENGTH {
            return Err(VaultError::Storage(format!(
                "Invalid cipher length: expected at least {}, got {}",
                TAG_LENGTH,
                cipher.len()
            )));
        }

        let salt_bytes = decode_field("salt", &record.salt)?;
        let salt = Salt::from_slice(&salt_bytes).ok_or_else(|| {
            VaultError::Storage(format!(
                "Invalid salt length: expected {}, got {}",
                SALT_LENGTH,
                salt_bytes.len()
            ))
        })?;

        let iv_bytes = decode_field("iv", &record.iv)?;
        let iv = Nonce::from_slice(&iv_bytes).ok_or_else(|| {
            VaultError::Storage(format!(
                "Invalid IV length: expected {}, got {}",
                NONCE_LENGTH,
                iv_bytes.len()
            ))
        })?;

        Ok(Self {
            cipher,
            salt,
            iv,
            ts: record.ts,
        })
    }
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(value)
        .map_err(|e| VaultError::Storage(format!("Invalid {} base64: {}", name, e)))
}
