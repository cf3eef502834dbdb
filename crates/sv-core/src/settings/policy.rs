/// What the engine does when the migration chain cannot reach the target version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MigrationPolicy {
    /// Keep the instance at the version the chain reached. The next save
    /// re-stamps it to the target version.
    #[default]
    Lenient,
    /// Refuse to build the store.
    Strict,
}

impl MigrationPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::Lenient
        }
    }
}
