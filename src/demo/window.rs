use serde::{Deserialize, Serialize};
use sv_core::{migration_fn, ChangeNotifier, FnMigration, ObservableModel};

pub const WINDOW_SETTINGS_FILE: &str = "window.json";
pub const WINDOW_SETTINGS_VERSION: u32 = 2;

const DEFAULT_WIDTH: f64 = 800.0;
const DEFAULT_HEIGHT: f64 = 600.0;

/// Main window geometry.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    version: Option<u32>,
    width: f64,
    height: f64,
    top: f64,
    left: f64,
    #[serde(skip)]
    notifier: ChangeNotifier,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            version: None,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            top: 0.0,
            left: 0.0,
            notifier: ChangeNotifier::new(),
        }
    }
}

impl WindowSettings {
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn position(&self) -> (f64, f64) {
        (self.left, self.top)
    }

    pub fn set_width(&mut self, width: f64) -> bool {
        self.notifier.set_field(&mut self.width, width, "width")
    }

    pub fn set_height(&mut self, height: f64) -> bool {
        self.notifier.set_field(&mut self.height, height, "height")
    }

    pub fn set_top(&mut self, top: f64) -> bool {
        self.notifier.set_field(&mut self.top, top, "top")
    }

    pub fn set_left(&mut self, left: f64) -> bool {
        self.notifier.set_field(&mut self.left, left, "left")
    }
}

impl ObservableModel for WindowSettings {
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

/// v1 could persist a collapsed window.
pub fn window_settings_v1_to_v2() -> FnMigration<WindowSettings> {
    migration_fn(1, 2, |mut settings: WindowSettings| {
        if settings.height <= 0.0 {
            settings.set_height(DEFAULT_HEIGHT);
        }
        settings
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sv_core::MigrationStep;

    #[test]
    fn migration_restores_collapsed_height() {
        let legacy: WindowSettings =
            serde_json::from_str(r#"{"width":1024.0,"height":0.0}"#).unwrap();

        let migrated = window_settings_v1_to_v2().migrate(legacy);

        assert_eq!(migrated.size(), (1024.0, 600.0));
    }

    #[test]
    fn migration_keeps_valid_height() {
        let legacy: WindowSettings = serde_json::from_str(r#"{"height":720.0}"#).unwrap();

        assert_eq!(window_settings_v1_to_v2().migrate(legacy).size(), (800.0, 720.0));
    }
}
