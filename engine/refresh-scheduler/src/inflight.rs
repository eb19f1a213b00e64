//! In-flight markers
//!
//! A marker is held for as long as its guard lives. Dropping the guard (on
//! success, error, timeout or task cancellation) releases the marker.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

pub struct InFlightRegistry<K: Eq + Hash + Clone> {
    active: Mutex<HashSet<K>>,
}

impl<K: Eq + Hash + Clone> InFlightRegistry<K> {
    pub fn new() -> Self {
        Self { active: Mutex::new(HashSet::new()) }
    }

    /// Mark `key` as in flight, or return `None` if it already is
    pub fn try_acquire(self: &Arc<Self>, key: K) -> Option<InFlightGuard<K>> {
        let mut active = self.active.lock();
        if active.insert(key.clone()) {
            Some(InFlightGuard { registry: Arc::clone(self), key })
        } else {
            None
        }
    }

    pub fn is_active(&self, key: &K) -> bool {
        self.active.lock().contains(key)
    }

    pub fn active_count(&self) -> usize {
        self.active.lock().len()
    }
}

impl<K: Eq + Hash + Clone> Default for InFlightRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Holds an in-flight marker until dropped
pub struct InFlightGuard<K: Eq + Hash + Clone> {
    registry: Arc<InFlightRegistry<K>>,
    key: K,
}

impl<K: Eq + Hash + Clone> InFlightGuard<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

impl<K: Eq + Hash + Clone> Drop for InFlightGuard<K> {
    fn drop(&mut self) {
        self.registry.active.lock().remove(&self.key);
    }
}
