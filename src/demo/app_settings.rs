use serde::{Deserialize, Serialize};
use sv_core::{migration_fn, ChangeNotifier, FnMigration, ObservableModel};

pub const APP_SETTINGS_FILE: &str = "app.json";
pub const APP_SETTINGS_VERSION: u32 = 2;

const DEFAULT_THEME: &str = "Light";

/// General application preferences.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    version: Option<u32>,
    theme: String,
    launch_count: i64,
    #[serde(skip)]
    notifier: ChangeNotifier,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            version: None,
            theme: DEFAULT_THEME.to_string(),
            launch_count: 0,
            notifier: ChangeNotifier::new(),
        }
    }
}

impl AppSettings {
    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: impl Into<String>) -> bool {
        self.notifier.set_field(&mut self.theme, theme.into(), "theme")
    }

    /// Switch between the light and dark theme.
    pub fn toggle_theme(&mut self) -> bool {
        let next = if self.theme == DEFAULT_THEME { "Dark" } else { DEFAULT_THEME };
        self.set_theme(next)
    }

    pub fn launch_count(&self) -> i64 {
        self.launch_count
    }

    /// Negative counts are rejected.
    pub fn set_launch_count(&mut self, count: i64) -> bool {
        self.notifier
            .set_field_with(&mut self.launch_count, count, "launch_count", |_, new| *new >= 0)
    }

    pub fn record_launch(&mut self) -> bool {
        self.set_launch_count(self.launch_count.saturating_add(1))
    }
}

impl ObservableModel for AppSettings {
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

/// v1 files could hold a negative launch count or a blank theme.
pub fn app_settings_v1_to_v2() -> FnMigration<AppSettings> {
    migration_fn(1, 2, |mut settings: AppSettings| {
        if settings.launch_count < 0 {
            settings.set_launch_count(0);
        }
        if settings.theme.trim().is_empty() {
            settings.set_theme(DEFAULT_THEME);
        }
        settings
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sv_core::MigrationStep;

    #[test]
    fn migration_repairs_v1_values() {
        let legacy: AppSettings =
            serde_json::from_str(r#"{"version":1,"theme":"  ","launch_count":-4}"#).unwrap();

        let migrated = app_settings_v1_to_v2().migrate(legacy);

        assert_eq!(migrated.theme(), "Light");
        assert_eq!(migrated.launch_count(), 0);
    }

    #[test]
    fn negative_launch_count_is_rejected() {
        let mut settings = AppSettings::default();

        assert!(!settings.set_launch_count(-1));
        assert!(settings.record_launch());
        assert_eq!(settings.launch_count(), 1);
    }

    #[test]
    fn toggle_theme_alternates() {
        let mut settings = AppSettings::default();

        settings.toggle_theme();
        assert_eq!(settings.theme(), "Dark");
        settings.toggle_theme();
        assert_eq!(settings.theme(), "Light");
    }

    #[test]
    fn missing_keys_take_defaults() {
        let settings: AppSettings = serde_json::from_str("{}").unwrap();

        assert_eq!(settings.theme(), "Light");
        assert_eq!(settings.version(), None);
    }
}
