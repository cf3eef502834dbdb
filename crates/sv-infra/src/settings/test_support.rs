//! Settings types shared by the engine's unit tests.

use serde::{Deserialize, Serialize};
use sv_core::{ChangeNotifier, EncryptedField, ObservableModel};

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct Profile {
    #[serde(default)]
    version: Option<u32>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    secret: String,
    #[serde(skip)]
    notifier: ChangeNotifier,
}

impl Profile {
    pub(crate) fn with_version(version: Option<u32>) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, value: String) -> bool {
        self.notifier.set_field(&mut self.name, value, "name")
    }

    pub(crate) fn secret(&self) -> &str {
        &self.secret
    }

    pub(crate) fn set_secret(&mut self, value: String) -> bool {
        self.notifier.set_field(&mut self.secret, value, "secret")
    }
}

impl ObservableModel for Profile {
    fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    fn notifier_mut(&mut self) -> &mut ChangeNotifier {
        &mut self.notifier
    }

    fn version(&self) -> Option<u32> {
        self.version
    }

    fn set_version(&mut self, version: Option<u32>) -> bool {
        self.notifier.set_field(&mut self.version, version, "version")
    }

    fn encrypted_fields() -> Vec<EncryptedField<Self>> {
        vec![EncryptedField::new(
            "secret",
            Self::secret,
            Self::set_secret,
        )]
    }
}

/// Reversible stand-in cipher: base64 of the reversed plaintext behind a marker.
pub(crate) struct ReversingCipher;

impl sv_core::ports::FieldCipherPort for ReversingCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String, sv_core::security::FieldCipherError> {
        use base64::{engine::general_purpose::STANDARD, Engine as _};
        let reversed: String = plaintext.chars().rev().collect();
        Ok(STANDARD.encode(format!("enc:{reversed}")))
    }

    fn decrypt(&self, ciphertext: &str) -> Result<String, sv_core::security::FieldCipherError> {
        use base64::{engine::general_purpose::STANDARD, Engine as _};
        use sv_core::security::FieldCipherError;
        let bytes = STANDARD
            .decode(ciphertext)
            .map_err(|_| FieldCipherError::NotBase64)?;
        let text = String::from_utf8(bytes).map_err(|_| FieldCipherError::NotUtf8)?;
        let reversed = text.strip_prefix("enc:").ok_or(FieldCipherError::Tampered)?;
        Ok(reversed.chars().rev().collect())
    }
}
