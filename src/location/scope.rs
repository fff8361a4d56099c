//! City-scoped sub-caches.
//!
//! Streets and buildings are always fetched a whole city at a time. Each
//! fetched city occupies one slot; when every slot is taken, loading another
//! city evicts the least recently used one. With a capacity of one this keeps
//! exactly one city resident, which is the default.

use lru::LruCache;
use nohash_hasher::BuildNoHashHasher;
use std::num::NonZeroUsize;

pub struct ScopedSlots<V> {
    slots: LruCache<i64, V, BuildNoHashHasher<i64>>,
}

impl<V> ScopedSlots<V> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            slots: LruCache::with_hasher(capacity, BuildNoHashHasher::default()),
        }
    }

    /// Returns the sub-cache for `scope`, marking it most recently used.
    pub fn get(&mut self, scope: i64) -> Option<&V> {
        self.slots.get(&scope)
    }

    /// Installs `value` as the sub-cache for `scope`, replacing any previous
    /// content for that scope.
    ///
    /// Returns the scope evicted to make room, if any.
    pub fn replace(&mut self, scope: i64, value: V) -> Option<i64> {
        match self.slots.push(scope, value) {
            Some((evicted, _)) if evicted != scope => Some(evicted),
            _ => None,
        }
    }

    /// Resident scopes, most recently used first.
    pub fn scopes(&self) -> Vec<i64> {
        self.slots.iter().map(|(scope, _)| *scope).collect()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
