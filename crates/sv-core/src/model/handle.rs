use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Stable, shared handle to the single live settings instance of a store.
///
/// Every clone points at the same instance. Field writes go through the model's
/// own notifying setters, reached via [`update`](Self::update) or
/// [`lock`](Self::lock).
pub struct Settings<T> {
    inner: Arc<Mutex<T>>,
}

impl<T> Settings<T> {
    pub fn new(model: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(model)),
        }
    }

    /// Run `f` with shared access to the model.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.lock();
        f(&*guard)
    }

    /// Run `f` with exclusive access to the model.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.lock();
        f(&mut *guard)
    }

    /// Lock the model. A poisoned lock is recovered: a panic in application
    /// code must not take persistence down with it.
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether both handles refer to the same live instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Clone for Settings<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Settings<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Settings").field(&*self.lock()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_instance() {
        let settings = Settings::new(1u32);
        let other = settings.clone();

        other.update(|v| *v = 7);

        assert_eq!(settings.read(|v| *v), 7);
        assert!(settings.ptr_eq(&other));
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let settings = Settings::new(String::from("ok"));
        let poisoner = settings.clone();

        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock();
            panic!("boom");
        })
        .join();

        assert_eq!(settings.read(|s| s.clone()), "ok");
    }
}
