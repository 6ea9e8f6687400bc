//! Bucket collection policies.

use std::collections::{btree_set, BTreeSet};

/// A collection holding the values that share one partition key.
pub trait Bucket<V>: Default {
    type Iter<'a>: Iterator<Item = &'a V>
    where
        Self: 'a,
        V: 'a;

    /// Add a value according to the bucket's ordering policy
    fn put(&mut self, value: V);

    /// Remove every element equal to `value`, returning how many went away
    fn remove_matching(&mut self, value: &V) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn iter(&self) -> Self::Iter<'_>;

    /// The element at `n` in bucket order
    fn nth(&self, n: usize) -> Option<&V> {
        self.iter().nth(n)
    }
}

impl<V: PartialEq> Bucket<V> for Vec<V> {
    type Iter<'a> = std::slice::Iter<'a, V>
    where
        Self: 'a,
        V: 'a;

    fn put(&mut self, value: V) {
        self.push(value);
    }

    fn remove_matching(&mut self, value: &V) -> usize {
        let before = Vec::len(self);
        self.retain(|v| v != value);
        before - Vec::len(self)
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.as_slice().iter()
    }

    fn nth(&self, n: usize) -> Option<&V> {
        self.get(n)
    }
}

impl<V: Ord> Bucket<V> for BTreeSet<V> {
    type Iter<'a> = btree_set::Iter<'a, V>
    where
        Self: 'a,
        V: 'a;

    fn put(&mut self, value: V) {
        self.insert(value);
    }

    fn remove_matching(&mut self, value: &V) -> usize {
        usize::from(self.remove(value))
    }

    fn len(&self) -> usize {
        BTreeSet::len(self)
    }

    fn iter(&self) -> Self::Iter<'_> {
        BTreeSet::iter(self)
    }
}

/// Value-ordered multiset. Equal values keep their insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedBucket<V> {
    items: Vec<V>,
}

impl<V> Default for SortedBucket<V> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<V> SortedBucket<V> {
    pub fn as_slice(&self) -> &[V] {
        &self.items
    }
}

impl<V: Ord> Bucket<V> for SortedBucket<V> {
    type Iter<'a> = std::slice::Iter<'a, V>
    where
        Self: 'a,
        V: 'a;

    fn put(&mut self, value: V) {
        let idx = self.items.partition_point(|v| v <= &value);
        self.items.insert(idx, value);
    }

    fn remove_matching(&mut self, value: &V) -> usize {
        let before = self.items.len();
        self.items.retain(|v| v != value);
        before - self.items.len()
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.items.iter()
    }

    fn nth(&self, n: usize) -> Option<&V> {
        self.items.get(n)
    }
}

impl<V> IntoIterator for SortedBucket<V> {
    type Item = V;
    type IntoIter = std::vec::IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
