use thiserror::Error;

/// Store configuration errors.
///
/// Storage failures (missing, corrupt or unwritable files) are never reported
/// through this type; the engine recovers from them on its own.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("migration from version {from} registered more than once")]
    DuplicateMigration { from: u32 },

    #[error("migration {from} -> {to} does not advance the schema version")]
    NonAdvancingMigration { from: u32, to: u32 },

    #[error("settings type declares encrypted fields but no field cipher is configured")]
    CipherRequired,

    #[error("migration chain stopped at version {reached}, target is {target}")]
    IncompleteMigration { reached: u32, target: u32 },

    #[error("a store for {type_name} is already registered")]
    AlreadyRegistered { type_name: &'static str },

    #[error("settings load task failed: {0}")]
    LoadTask(String),
}
