//! Store-level vocabulary shared by the engine and its callers.

mod error;
mod policy;

use std::time::Duration;

pub use error::StoreError;
pub use policy::MigrationPolicy;

/// Schema version assumed for files written without one.
pub const LEGACY_SCHEMA_VERSION: u32 = 1;

/// Quiet interval before a burst of changes is written.
pub const DEFAULT_SAVE_DEBOUNCE: Duration = Duration::from_millis(200);

/// Suffix of the single-generation backup file.
pub const BACKUP_SUFFIX: &str = "bak";

/// Suffix of the transient write target.
pub const TEMP_SUFFIX: &str = "tmp";
