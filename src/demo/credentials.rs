use serde::{Deserialize, Serialize};
use sv_core::{ChangeNotifier, EncryptedField, ObservableModel};

pub const CREDENTIALS_FILE: &str = "credentials.json";
pub const CREDENTIALS_VERSION: u32 = 1;

/// Secrets stored encrypted at rest.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsSettings {
    version: Option<u32>,
    api_key: String,
    #[serde(skip)]
    notifier: ChangeNotifier,
}

impl CredentialsSettings {
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn set_api_key(&mut self, api_key: String) -> bool {
        self.notifier.set_field(&mut self.api_key, api_key, "api_key")
    }
}

impl ObservableModel for CredentialsSettings {
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
            "api_key",
            Self::api_key,
            Self::set_api_key,
        )]
    }
}
