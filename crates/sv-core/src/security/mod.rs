//! Field-encryption domain types.
//!
//! Pure models only: the cipher itself lives in infrastructure and the key is
//! kept in platform secure storage.

mod model;

use base64::{engine::general_purpose::STANDARD, Engine as _};

pub use model::{FieldCipherError, FieldKey, KeyMaterialError, KeyScope};

/// Whether `value` is well-formed standard base64, the envelope every
/// encrypted field value uses.
pub fn looks_like_ciphertext(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.len() % 4 != 0 {
        return false;
    }
    STANDARD.decode(trimmed).is_ok()
}
