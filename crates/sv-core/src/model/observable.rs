use serde::{de::DeserializeOwned, Serialize};

use super::{ChangeNotifier, EncryptedField};
use crate::settings::LEGACY_SCHEMA_VERSION;

/// Capability implemented by every settings type a store can persist.
///
/// Implementors keep their fields private, expose setters routed through
/// [`ChangeNotifier::set_field`], and mark the notifier `#[serde(skip)]`.
/// `Default` is the fresh instance used when nothing usable is on disk.
pub trait ObservableModel: Serialize + DeserializeOwned + Default + Send + 'static {
    fn notifier(&self) -> &ChangeNotifier;

    fn notifier_mut(&mut self) -> &mut ChangeNotifier;

    /// Stored schema version; `None` for legacy files written without one.
    fn version(&self) -> Option<u32>;

    /// Update the schema version through the notifying path.
    fn set_version(&mut self, version: Option<u32>) -> bool;

    /// String fields stored encrypted at rest.
    fn encrypted_fields() -> Vec<EncryptedField<Self>> {
        Vec::new()
    }

    /// Version used for migration selection. Absent versions count as 1.
    fn schema_version(&self) -> u32 {
        self.version().unwrap_or(LEGACY_SCHEMA_VERSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Legacy {
        #[serde(default)]
        version: Option<u32>,
        #[serde(skip)]
        notifier: ChangeNotifier,
    }

    impl ObservableModel for Legacy {
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
    }

    #[test]
    fn missing_version_is_treated_as_legacy_v1() {
        let model: Legacy = serde_json::from_str("{}").unwrap();
        assert_eq!(model.version(), None);
        assert_eq!(model.schema_version(), 1);

        let model: Legacy = serde_json::from_str(r#"{"version":null}"#).unwrap();
        assert_eq!(model.schema_version(), 1);
    }

    #[test]
    fn explicit_version_wins() {
        let model: Legacy = serde_json::from_str(r#"{"version":3}"#).unwrap();
        assert_eq!(model.schema_version(), 3);
    }

    #[test]
    fn no_encrypted_fields_by_default() {
        assert!(Legacy::encrypted_fields().is_empty());
    }
}
