//! Application wiring: configuration, paths, logging and the settings context.

pub mod config;
pub mod context;
pub mod init;
pub mod paths;
pub mod tracing;

pub use config::load_config;
pub use context::SettingsContext;
pub use init::bootstrap;
pub use paths::AppPaths;
