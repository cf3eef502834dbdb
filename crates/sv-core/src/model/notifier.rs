use std::fmt;
use std::sync::Arc;

use tracing::trace;

/// An accepted field mutation on an observable model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldChange {
    pub field: &'static str,
}

type Listener = Arc<dyn Fn(FieldChange) + Send + Sync>;

/// Change-notification path shared by every field of a settings model.
///
/// Models keep their fields private and expose setters that call
/// [`ChangeNotifier::set_field`]; that is the only way a field value changes,
/// so every listener observes every accepted write.
///
/// Cloning a notifier yields a detached notifier with no listeners: a cloned
/// model is a snapshot and must not trigger saves of the original store.
#[derive(Default)]
pub struct ChangeNotifier {
    listeners: Vec<Listener>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener called after every accepted field write.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(FieldChange) + Send + Sync + 'static,
    {
        self.listeners.push(Arc::new(listener));
    }

    #[cfg(test)]
    fn has_listeners(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Emit a change notification for `field`.
    pub fn notify(&self, field: &'static str) {
        trace!(field, listeners = self.listeners.len(), "field changed");
        let change = FieldChange { field };
        for listener in &self.listeners {
            listener(change);
        }
    }

    /// Write `value` into `slot` and notify, unless the value is unchanged.
    ///
    /// Returns `true` when the slot was updated.
    pub fn set_field<V>(&self, slot: &mut V, value: V, field: &'static str) -> bool
    where
        V: PartialEq,
    {
        self.set_field_with(slot, value, field, |_, _| true)
    }

    /// Like [`set_field`](Self::set_field), but the write is only accepted when
    /// `validate(current, new)` returns `true`.
    pub fn set_field_with<V, F>(
        &self,
        slot: &mut V,
        value: V,
        field: &'static str,
        validate: F,
    ) -> bool
    where
        V: PartialEq,
        F: FnOnce(&V, &V) -> bool,
    {
        if *slot == value {
            return false;
        }

        if !validate(slot, &value) {
            return false;
        }

        *slot = value;
        self.notify(field);
        true
    }
}

impl Clone for ChangeNotifier {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
