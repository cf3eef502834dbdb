use std::fmt;

use rand::{rngs::OsRng, TryRngCore};
use thiserror::Error;
use zeroize::Zeroize;

/// Identity a field key is bound to (profile or account label).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyScope {
    pub profile_id: String,
}

impl KeyScope {
    pub fn new(profile_id: impl Into<String>) -> Self {
        Self {
            profile_id: profile_id.into(),
        }
    }

    /// Name of the secure-storage entry holding this scope's field key.
    pub fn storage_key(&self) -> String {
        format!("settings-field-key:v1:{}", self.profile_id)
    }
}

impl Default for KeyScope {
    fn default() -> Self {
        Self::new("default")
    }
}

/// 32-byte symmetric key used to protect settings fields.
///
/// - Never serialized.
/// - Wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct FieldKey([u8; FieldKey::LEN]);

impl FieldKey {
    pub const LEN: usize = 32;

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn generate() -> Result<Self, KeyMaterialError> {
        let mut buf = [0u8; Self::LEN];
        OsRng
            .try_fill_bytes(&mut buf)
            .map_err(|_| KeyMaterialError::RandomUnavailable)?;
        let key = Self(buf);
        buf.zeroize();
        Ok(key)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyMaterialError> {
        if bytes.len() != Self::LEN {
            return Err(KeyMaterialError::Corrupt(format!(
                "invalid field key length: expected {}, got {}",
                Self::LEN,
                bytes.len()
            )));
        }
        let mut key = [0u8; Self::LEN];
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }
}

impl Drop for FieldKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldKey([REDACTED])")
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldCipherError {
    #[error("value is not valid base64")]
    NotBase64,

    #[error("unsupported ciphertext format version {0}")]
    UnsupportedVersion(u8),

    #[error("ciphertext is truncated")]
    Truncated,

    #[error("ciphertext failed authentication")]
    Tampered,

    #[error("decrypted value is not valid UTF-8")]
    NotUtf8,

    #[error("encryption failed")]
    EncryptFailed,

    #[error("invalid key")]
    InvalidKey,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyMaterialError {
    #[error("field key is corrupt: {0}")]
    Corrupt(String),

    #[error("secure storage failed: {0}")]
    Storage(String),

    #[error("operating system randomness is unavailable")]
    RandomUnavailable,
}
