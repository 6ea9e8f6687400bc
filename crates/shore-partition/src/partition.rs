//! The keyed partition container.

use crate::bucket::Bucket;
use shore_core::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Pure, total key function shared by a partition and its `empty_like` siblings
pub type KeyFn<V, K> = Arc<dyn Fn(&V) -> K + Send + Sync>;

/// Values grouped into buckets by `key_fn(value)`.
///
/// Invariants:
/// - no bucket is ever empty
/// - `len()` equals the sum of bucket lengths
pub struct KeyedPartition<V, K, B = Vec<V>> {
    buckets: BTreeMap<K, B>,
    key_fn: KeyFn<V, K>,
    len: usize,
}

impl<V, K, B> KeyedPartition<V, K, B>
where
    K: Ord,
    B: Bucket<V>,
{
    pub fn new<F>(key_fn: F) -> Self
    where
        F: Fn(&V) -> K + Send + Sync + 'static,
    {
        Self::with_key_fn(Arc::new(key_fn))
    }

    pub fn with_key_fn(key_fn: KeyFn<V, K>) -> Self {
        Self {
            buckets: BTreeMap::new(),
            key_fn,
            len: 0,
        }
    }

    /// A fresh, empty partition sharing this partition's key function
    pub fn empty_like(&self) -> Self {
        Self::with_key_fn(Arc::clone(&self.key_fn))
    }

    /// Build a partition by inserting every value in order
    pub fn from_values<I, F>(values: I, key_fn: F) -> Self
    where
        I: IntoIterator<Item = V>,
        F: Fn(&V) -> K + Send + Sync + 'static,
    {
        let mut partition = Self::new(key_fn);
        partition.extend(values);
        partition
    }

    pub fn key_fn(&self) -> &KeyFn<V, K> {
        &self.key_fn
    }

    pub fn key_of(&self, value: &V) -> K {
        (self.key_fn)(value)
    }

    pub fn insert(&mut self, value: V) {
        let key = self.key_of(&value);
        let bucket = self.buckets.entry(key).or_default();
        let before = bucket.len();
        bucket.put(value);
        self.len += bucket.len() - before;
    }

    /// Remove every element equal to `value` from its bucket.
    /// Returns the number of elements removed; absent values are a no-op.
    pub fn remove(&mut self, value: &V) -> usize {
        let key = self.key_of(value);
        let Some(bucket) = self.buckets.get_mut(&key) else {
            return 0;
        };

        let removed = bucket.remove_matching(value);
        if bucket.is_empty() {
            self.buckets.remove(&key);
        }
        self.len -= removed;
        removed
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Sum of bucket sizes, recomputed from scratch
    pub fn recount(&self) -> usize {
        self.buckets.values().map(|b| b.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.buckets.keys()
    }

    pub fn bucket(&self, key: &K) -> Option<&B> {
        self.buckets.get(key)
    }

    /// Every `(key, value)` pair in key order, then bucket order
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)> + 'a
    where
        V: 'a,
        B: 'a,
    {
        self.buckets
            .iter()
            .flat_map(|(key, bucket)| bucket.iter().map(move |value| (key, value)))
    }

    pub fn values<'a>(&'a self) -> impl Iterator<Item = &'a V> + 'a
    where
        V: 'a,
        B: 'a,
    {
        self.iter().map(|(_, value)| value)
    }

    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        for (key, value) in self.iter() {
            f(key, value);
        }
    }

    /// Visit the `n`-th element of every bucket, calling `missing` for
    /// buckets with `n` or fewer elements.
    pub fn for_each_nth<F, G>(&self, n: usize, mut present: F, mut missing: G)
    where
        F: FnMut(&K, &V),
        G: FnMut(&K),
    {
        for (key, bucket) in &self.buckets {
            match bucket.nth(n) {
                Some(value) => present(key, value),
                None => missing(key),
            }
        }
    }

    /// Strict form of [`for_each_nth`](Self::for_each_nth). Fails with
    /// `IndexOutOfRange` before visiting anything if a bucket is too short.
    pub fn try_for_each_nth<F>(&self, n: usize, mut present: F) -> Result<()>
    where
        K: fmt::Debug,
        F: FnMut(&K, &V),
    {
        if let Some(key) = self
            .buckets
            .iter()
            .find(|(_, bucket)| bucket.len() <= n)
            .map(|(key, _)| key)
        {
            return Err(Error::IndexOutOfRange {
                index: n,
                key: format!("{:?}", key),
            });
        }

        for (key, bucket) in &self.buckets {
            if let Some(value) = bucket.nth(n) {
                present(key, value);
            }
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
        self.len = 0;
    }

    /// Move every value out, in enumeration order
    pub fn into_values(self) -> impl Iterator<Item = V>
    where
        B: IntoIterator<Item = V>,
    {
        self.buckets.into_values().flatten()
    }
}

impl<V, K, B> Extend<V> for KeyedPartition<V, K, B>
where
    K: Ord,
    B: Bucket<V>,
{
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<V, K: Clone, B: Clone> Clone for KeyedPartition<V, K, B> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            key_fn: Arc::clone(&self.key_fn),
            len: self.len,
        }
    }
}

impl<V, K: fmt::Debug, B: fmt::Debug> fmt::Debug for KeyedPartition<V, K, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedPartition")
            .field("buckets", &self.buckets)
            .field("len", &self.len)
            .finish()
    }
}

impl<V, K, B> fmt::Display for KeyedPartition<V, K, B>
where
    V: fmt::Display,
    K: Ord + fmt::Display,
    B: Bucket<V>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-- Partitions --")?;
        for (key, bucket) in &self.buckets {
            write!(f, "{}:", key)?;
            for value in bucket.iter() {
                write!(f, " {}", value)?;
            }
            writeln!(f)?;
        }
        write!(f, "Total size: {}", self.len)
    }
}
