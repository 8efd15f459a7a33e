//! Per-image mutual exclusion for annotation writes.
//!
//! Locks are keyed by the resolved annotation file path, so every store
//! pointed at the same directory shares them within the process. Entries are weak and are
//! pruned once no writer holds them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, Weak};

/// A registry of mutexes keyed by path.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    slots: Mutex<HashMap<PathBuf, Weak<Mutex<()>>>>,
}

impl KeyedLocks {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by annotation stores.
    pub fn global() -> &'static KeyedLocks {
        static GLOBAL: OnceLock<KeyedLocks> = OnceLock::new();
        GLOBAL.get_or_init(KeyedLocks::new)
    }

    /// Returns the mutex for `key`, creating it if no one holds it.
    ///
    /// Callers lock the returned mutex for the duration of their write.
    pub fn slot(&self, key: &Path) -> Arc<Mutex<()>> {
        // The map only holds weak handles, so a poisoned map is still sound.
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = slots.get(key).and_then(Weak::upgrade) {
            return existing;
        }

        slots.retain(|_, slot| slot.strong_count() > 0);
        let slot = Arc::new(Mutex::new(()));
        slots.insert(key.to_path_buf(), Arc::downgrade(&slot));
        slot
    }

    /// Number of keys currently held by at least one caller.
    #[cfg(test)]
    fn active(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.values().filter(|slot| slot.strong_count() > 0).count()
    }
}
