//! A map split into independently locked shards.
//!
//! Keys are assigned to a shard by `key mod shard_count`. Writers touching
//! different shards never contend; writers on the same shard serialize on
//! that shard's mutex.

use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::collections::BTreeMap;

pub struct ConcurrentMap<K, V> {
    shards: Vec<Mutex<BTreeMap<K, V>>>,
}

impl<K, V> ConcurrentMap<K, V>
where
    K: Copy + Ord + Into<i64>,
    V: Default,
{
    /// Create a map with `shard_count` shards (at least one).
    pub fn new(shard_count: usize) -> Self {
        let shards = (0..shard_count.max(1)).map(|_| Mutex::new(BTreeMap::new())).collect();
        Self { shards }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard_of(&self, key: K) -> &Mutex<BTreeMap<K, V>> {
        // Negative keys wrap like an unsigned cast; ids are non-negative in practice.
        let key: i64 = key.into();
        let index = (key as u64 % self.shards.len() as u64) as usize;
        &self.shards[index]
    }

    /// Lock the key's shard and return a guard to its value, inserting
    /// `V::default()` first if the key is absent. The shard stays locked
    /// until the guard is dropped.
    pub fn access(&self, key: K) -> MappedMutexGuard<'_, V> {
        let guard = self.shard_of(key).lock();
        MutexGuard::map(guard, |map| map.entry(key).or_default())
    }

    /// Remove the key under its shard's lock.
    pub fn erase(&self, key: K) -> Option<V> {
        self.shard_of(key).lock().remove(&key)
    }

    /// Merge every shard into one ordered map.
    ///
    /// Shards are locked one at a time, so the result is only a consistent
    /// view if no writer is active. Call after all writers have joined.
    pub fn snapshot(&self) -> BTreeMap<K, V>
    where
        V: Clone,
    {
        let mut merged = BTreeMap::new();
        for shard in &self.shards {
            let shard = shard.lock();
            merged.extend(shard.iter().map(|(k, v)| (*k, v.clone())));
        }
        merged
    }
}
