//! Demo settings types and the stores the console binary opens.

mod app_settings;
mod credentials;
mod window;

pub use app_settings::{
    app_settings_v1_to_v2, AppSettings, APP_SETTINGS_FILE, APP_SETTINGS_VERSION,
};
pub use credentials::{CredentialsSettings, CREDENTIALS_FILE, CREDENTIALS_VERSION};
pub use window::{
    window_settings_v1_to_v2, WindowSettings, WINDOW_SETTINGS_FILE, WINDOW_SETTINGS_VERSION,
};

use crate::bootstrap::SettingsContext;

/// Open and register the demo stores.
pub async fn open_demo_stores(context: &mut SettingsContext) -> anyhow::Result<()> {
    let app = context
        .store_builder::<AppSettings>(APP_SETTINGS_FILE, APP_SETTINGS_VERSION)
        .migration(app_settings_v1_to_v2())
        .build()
        .await?;
    context.register(app)?;

    let credentials = context
        .store_builder::<CredentialsSettings>(CREDENTIALS_FILE, CREDENTIALS_VERSION)
        .build()
        .await?;
    context.register(credentials)?;

    let window = context
        .store_builder::<WindowSettings>(WINDOW_SETTINGS_FILE, WINDOW_SETTINGS_VERSION)
        .migration(window_settings_v1_to_v2())
        .build()
        .await?;
    context.register(window)?;

    Ok(())
}
