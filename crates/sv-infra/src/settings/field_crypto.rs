//! Encrypt/decrypt passes over a model's declared encrypted fields.

use sv_core::ports::FieldCipherPort;
use sv_core::{EncryptedField, ObservableModel};
use tracing::warn;

/// Replace every non-empty encrypted field with its ciphertext.
///
/// A field that fails to encrypt keeps its plaintext; the failure is logged and
/// the save carries on.
pub(crate) fn encrypt_fields<T: ObservableModel>(
    model: &mut T,
    fields: &[EncryptedField<T>],
    cipher: &dyn FieldCipherPort,
) {
    for field in fields {
        let plain = field.get(model);
        if plain.is_empty() {
            continue;
        }

        match cipher.encrypt(plain) {
            Ok(ciphertext) => {
                field.set(model, ciphertext);
            }
            Err(e) => {
                warn!(
                    field = field.name(),
                    error = %e,
                    "failed to encrypt settings field; storing plaintext"
                );
            }
        }
    }
}

/// Restore plaintext for every encrypted field that holds recognizable
/// ciphertext. Values that are not ciphertext are left as they are.
pub(crate) fn decrypt_fields<T: ObservableModel>(
    model: &mut T,
    fields: &[EncryptedField<T>],
    cipher: &dyn FieldCipherPort,
) {
    for field in fields {
        let stored = field.get(model);
        if stored.is_empty() {
            continue;
        }

        let plain = cipher.try_decrypt(stored);
        field.set(model, plain);
    }
}
