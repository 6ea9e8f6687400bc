//! Keyed partitions: values grouped into ordered buckets by a derived key.
//!
//! A [`KeyedPartition`] owns every value it holds. Buckets are never empty,
//! the total length is tracked incrementally, and enumeration is
//! deterministic (key order, then bucket order). The bucket collection is a
//! policy chosen through the [`Bucket`] trait:
//! - `Vec<V>`: insertion order, duplicates kept
//! - [`SortedBucket<V>`]: value order, duplicates kept
//! - `BTreeSet<V>`: value order, duplicates collapse

pub mod bucket;
pub mod partition;

pub use bucket::{Bucket, SortedBucket};
pub use partition::{KeyFn, KeyedPartition};
