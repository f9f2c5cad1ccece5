//! Process-wide singleton registry: share one ByteMap/`Hash` instance
//! across consumers keyed by `(seed, map_size_bits, hash_size_bits,
//! passes)`, so multiple packages don't each pay for their own copy of a
//! potentially gigabyte-sized table.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::HashConfig;
use crate::error::LxrError;
use crate::hash::Hash;

struct Entry {
    hash: Arc<Hash>,
    ref_count: usize,
}

/// A process-wide registry of shared `Hash` instances.
///
/// The mutex only guards the acquire/release bookkeeping; it is never
/// held while hashing, since `Hash` itself needs no synchronization on its
/// hot path.
pub struct SingletonRegistry {
    entries: Mutex<HashMap<String, Entry>>,
}

impl SingletonRegistry {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the shared instance for `config`, constructing it (via
    /// `build`) on first acquire and incrementing its reference count on
    /// every subsequent call with the same parameters.
    ///
    /// `build` is only invoked when no entry exists yet for this key.
    pub fn acquire(
        &self,
        config: HashConfig,
        build: impl FnOnce(HashConfig) -> Hash,
    ) -> Arc<Hash> {
        let key = config.registry_key();
        let mut entries = self.entries.lock();
        if let Some(entry) = entries.get_mut(&key) {
            entry.ref_count += 1;
            return Arc::clone(&entry.hash);
        }

        let hash = Arc::new(build(config));
        entries.insert(
            key,
            Entry {
                hash: Arc::clone(&hash),
                ref_count: 1,
            },
        );
        hash
    }

    /// Releases a handle previously obtained from `acquire`. When the
    /// reference count reaches zero the entry (and its ByteMap) is
    /// dropped.
    ///
    /// Returns `LxrError::RegistryMisuse` if `handle` is not the currently
    /// registered instance for its own config's key; releasing a handle
    /// that isn't the registry's singleton is a programmer error.
    pub fn release(&self, handle: &Arc<Hash>) -> Result<(), LxrError> {
        let key = handle.config().registry_key();
        let mut entries = self.entries.lock();
        match entries.get_mut(&key) {
            Some(entry) if Arc::ptr_eq(&entry.hash, handle) => {
                entry.ref_count -= 1;
                if entry.ref_count == 0 {
                    entries.remove(&key);
                }
                Ok(())
            }
            _ => Err(LxrError::RegistryMisuse { key }),
        }
    }

    /// Number of live entries, for diagnostics/tests.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

impl Default for SingletonRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> HashConfig {
        HashConfig::new(0xABCD, 10, 256, 1).unwrap()
    }

    #[test]
    fn identical_params_share_one_instance() {
        let registry = SingletonRegistry::new();
        let a = registry.acquire(cfg(), Hash::new);
        let b = registry.acquire(cfg(), Hash::new);
        assert!(Arc::ptr_eq(&a, &b));
        registry.release(&a).unwrap();
        registry.release(&b).unwrap();
    }

    #[test]
    fn releasing_to_zero_frees_and_next_acquire_is_fresh() {
        let registry = SingletonRegistry::new();
        let a = registry.acquire(cfg(), Hash::new);
        registry.release(&a).unwrap();
        assert_eq!(registry.len(), 0);

        let b = registry.acquire(cfg(), Hash::new);
        assert!(!Arc::ptr_eq(&a, &b));
        registry.release(&b).unwrap();
    }

    #[test]
    fn releasing_unregistered_handle_is_an_error() {
        let registry = SingletonRegistry::new();
        let rogue = Arc::new(Hash::new(cfg()));
        assert!(registry.release(&rogue).is_err());
    }
}
