use dashmap::DashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Short-lived cache for backend query results.
///
/// Several modules in one frame tend to ask a backend the same question
/// (workspace list, active workspace, window title all read the root window
/// properties); a TTL shorter than the tick keeps them to one query per frame.
pub struct TtlCache<K, V> {
    entries: Arc<DashMap<K, CachedValue<V>>>,
    ttl: Duration,
}

struct CachedValue<V> {
    value: V,
    stored_at: Instant,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let fresh = {
            let entry = self.entries.get(key)?;
            if entry.stored_at.elapsed() <= self.ttl {
                Some(entry.value.clone())
            } else {
                None
            }
        };
        if fresh.is_none() {
            self.entries.remove(key);
        }
        fresh
    }

    pub fn insert(&self, key: K, value: V) {
        self.entries.insert(
            key,
            CachedValue {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn invalidate(&self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|(_, cached)| cached.value)
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> Clone for TtlCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            ttl: self.ttl,
        }
    }
}
