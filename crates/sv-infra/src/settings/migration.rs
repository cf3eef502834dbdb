use std::fmt;

use sv_core::{MigrationStep, ObservableModel, StoreError};
use tracing::{debug, warn};

/// Ordered set of migration steps for one settings type.
///
/// Steps are selected by matching their source version against the instance's
/// current version, so registration order does not matter. Registration rejects
/// a second step for the same source version and steps that do not advance the
/// version.
pub struct MigrationChain<T> {
    steps: Vec<Box<dyn MigrationStep<T>>>,
}

/// Result of running a chain against one instance.
pub struct MigrationOutcome<T> {
    pub settings: T,
    pub from: u32,
    pub reached: u32,
    pub applied: usize,
}

impl<T> MigrationOutcome<T> {
    pub fn reached_target(&self, target: u32) -> bool {
        self.reached >= target
    }
}

impl<T: ObservableModel> MigrationChain<T> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Add a step to the chain.
    ///
    /// # Errors
    ///
    /// [`StoreError::DuplicateMigration`] when a step for the same source version
    /// is already registered, [`StoreError::NonAdvancingMigration`] when the step
    /// does not move to a higher version.
    pub fn register(&mut self, step: Box<dyn MigrationStep<T>>) -> Result<(), StoreError> {
        let (from, to) = (step.from_version(), step.to_version());

        if to <= from {
            return Err(StoreError::NonAdvancingMigration { from, to });
        }

        if self.steps.iter().any(|s| s.from_version() == from) {
            return Err(StoreError::DuplicateMigration { from });
        }

        self.steps.push(step);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Upgrade `settings` towards `target`.
    ///
    /// The version is stamped to the step's destination before the step runs.
    /// The chain stops at the target or at the first version no step starts
    /// from; it never fails.
    pub fn migrate(&self, mut settings: T, target: u32) -> MigrationOutcome<T> {
        let from = settings.schema_version();
        let mut applied = 0;

        while settings.schema_version() < target {
            let current = settings.schema_version();
            let Some(step) = self.steps.iter().find(|s| s.from_version() == current) else {
                break;
            };

            // Each registered step advances the version, so a well-formed chain
            // visits every step at most once.
            if applied == self.steps.len() {
                warn!(current, "migration chain did not converge; stopping");
                break;
            }

            settings.set_version(Some(step.to_version()));
            settings = step.migrate(settings);
            applied += 1;

            debug!(
                from = current,
                to = step.to_version(),
                "applied settings migration"
            );
        }

        MigrationOutcome {
            reached: settings.schema_version(),
            settings,
            from,
            applied,
        }
    }
}

impl<T: ObservableModel> Default for MigrationChain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for MigrationChain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edges: Vec<(u32, u32)> = self
            .steps
            .iter()
            .map(|s| (s.from_version(), s.to_version()))
            .collect();
        f.debug_struct("MigrationChain").field("steps", &edges).finish()
    }
}
