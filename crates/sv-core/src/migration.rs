//! Schema migration steps.

use std::fmt;

/// One schema upgrade for a settings type.
///
/// The engine sets the instance's version to [`to_version`](Self::to_version)
/// before calling [`migrate`](Self::migrate), so a step that inspects the
/// version sees the destination value.
pub trait MigrationStep<T>: Send + Sync {
    fn from_version(&self) -> u32;
    fn to_version(&self) -> u32;
    fn migrate(&self, settings: T) -> T;
}

/// A migration step backed by a closure.
pub struct FnMigration<T> {
    from: u32,
    to: u32,
    transform: Box<dyn Fn(T) -> T + Send + Sync>,
}

/// Build a [`MigrationStep`] from a closure.
///
/// ```
/// use sv_core::migration_fn;
///
/// let step = migration_fn(1, 2, |count: u32| count.max(1));
/// # use sv_core::MigrationStep;
/// assert_eq!(step.from_version(), 1);
/// ```
pub fn migration_fn<T, F>(from: u32, to: u32, transform: F) -> FnMigration<T>
where
    F: Fn(T) -> T + Send + Sync + 'static,
{
    FnMigration {
        from,
        to,
        transform: Box::new(transform),
    }
}

impl<T> MigrationStep<T> for FnMigration<T> {
    fn from_version(&self) -> u32 {
        self.from
    }

    fn to_version(&self) -> u32 {
        self.to
    }

    fn migrate(&self, settings: T) -> T {
        (self.transform)(settings)
    }
}

impl<T> fmt::Debug for FnMigration<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMigration")
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}
