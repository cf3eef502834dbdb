use std::io;

use thiserror::Error;

/// Failures inside the save path. Logged by the engine, never returned to callers.
#[derive(Debug, Error)]
pub(crate) enum SettingsFileError {
    #[error("failed to serialize settings: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to replace settings file: {0}")]
    Write(#[source] io::Error),

    #[error("write job was dropped before it completed")]
    Dispatch,
}
