//! The single current settings object of a running application.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Lock-guarded slot holding at most one settings object.
///
/// Created empty by application start-up code and shared by reference (or in
/// an `Arc`) with whatever needs settings. Readers get an `Arc` clone, so a
/// later [`set`](SettingsStore::set) never changes an object a reader already
/// holds.
///
/// ```
/// use setkit::SettingsStore;
///
/// let store = SettingsStore::new();
/// assert!(store.get().is_none());
///
/// store.set(String::from("v1"));
/// assert_eq!(store.get().as_deref().map(String::as_str), Some("v1"));
/// ```
#[derive(Debug)]
pub struct SettingsStore<T> {
    slot: Mutex<Option<Arc<T>>>,
}

impl<T> SettingsStore<T> {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Publishes `settings`, replacing whatever was stored.
    pub fn set(&self, settings: T) {
        self.set_arc(Arc::new(settings));
    }

    /// Publishes an already shared settings object.
    pub fn set_arc(&self, settings: Arc<T>) {
        *self.lock() = Some(settings);
        tracing::debug!(
            settings = std::any::type_name::<T>(),
            "published settings"
        );
    }

    /// Returns the current settings, or `None` if nothing was published yet.
    ///
    /// Reading an empty store usually means settings were used before
    /// start-up finished, so it is logged at `warn`.
    pub fn get(&self) -> Option<Arc<T>> {
        let current = self.lock().clone();
        if current.is_none() {
            tracing::warn!(
                settings = std::any::type_name::<T>(),
                "settings read before any were published"
            );
        }
        current
    }

    pub fn is_set(&self) -> bool {
        self.lock().is_some()
    }

    // The slot is only ever assigned whole, so a poisoned lock still guards
    // a consistent value.
    fn lock(&self) -> MutexGuard<'_, Option<Arc<T>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for SettingsStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Settings {
        port: u16,
    }

    #[test]
    fn test_get_before_set_is_none() {
        let store: SettingsStore<Settings> = SettingsStore::new();

        assert!(store.get().is_none());
        assert!(!store.is_set());
    }

    #[test]
    fn test_set_then_get() {
        let store = SettingsStore::new();
        store.set(Settings { port: 80 });

        assert_eq!(*store.get().unwrap(), Settings { port: 80 });
        assert!(store.is_set());
    }

    #[test]
    fn test_set_overwrites() {
        let store = SettingsStore::new();
        store.set(Settings { port: 80 });
        let held = store.get().unwrap();

        store.set(Settings { port: 443 });

        assert_eq!(store.get().unwrap().port, 443);
        assert_eq!(held.port, 80);
    }

    #[test]
    fn test_set_arc_shares_object() {
        let store = SettingsStore::new();
        let settings = Arc::new(Settings { port: 1 });
        store.set_arc(Arc::clone(&settings));

        assert!(Arc::ptr_eq(&store.get().unwrap(), &settings));
    }

    #[test]
    fn test_poisoned_lock_still_readable() {
        let store = Arc::new(SettingsStore::new());
        store.set(Settings { port: 8 });

        let poisoner = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.slot.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert_eq!(store.get().unwrap().port, 8);
    }
}
