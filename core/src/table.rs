//! String-keyed hash table with per-bucket chains.
//!
//! Each bucket owns its chain as a `Vec<Entry>`; new keys are appended at the
//! chain tail. The bucket of a key is `djb2(key) % capacity`, so the layout and
//! the iteration order of [`BucketIter`] are reproducible across runs.

use std::iter::FusedIterator;

use crate::error::{Error, Result};

/// Returned by [`HashTable::get_int`] when the key is absent.
pub const MISS_INT: i32 = -1;
/// Returned by [`HashTable::get_float`] when the key is absent.
pub const MISS_FLOAT: f32 = -1.0;

/// One key with its two payload fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    key: Box<str>,
    pub int_value: i32,
    pub float_value: f32,
}

impl Entry {
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// `hash = hash * 33 + byte`, seeded with 5381.
#[inline]
pub fn djb2(key: &str) -> u64 {
    key.bytes().fold(5381u64, |hash, b| {
        (hash << 5).wrapping_add(hash).wrapping_add(b as u64)
    })
}

#[derive(Debug, Clone)]
pub struct HashTable {
    buckets: Vec<Vec<Entry>>,
    size: usize,
    /// `None` keeps the capacity fixed for the table's lifetime.
    max_load_factor: Option<f32>,
}

impl HashTable {
    /// Create a table with `capacity` empty buckets.
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            buckets: alloc_buckets(capacity)?,
            size: 0,
            max_load_factor: None,
        })
    }

    /// Create a table that doubles its bucket array whenever a new key would
    /// push `len / capacity` above `max_load_factor`.
    pub fn with_max_load_factor(capacity: usize, max_load_factor: f32) -> Result<Self> {
        if !max_load_factor.is_finite() || max_load_factor <= 0.0 {
            return Err(Error::InvalidLoadFactor(max_load_factor));
        }
        let mut table = Self::new(capacity)?;
        table.max_load_factor = Some(max_load_factor);
        Ok(table)
    }

    #[inline]
    fn bucket_index(&self, key: &str) -> usize {
        (djb2(key) % self.buckets.len() as u64) as usize
    }

    /// Insert `key`, or overwrite both payload fields if it is already present.
    pub fn insert(&mut self, key: &str, int_value: i32, float_value: f32) -> Result<()> {
        let mut idx = self.bucket_index(key);
        if let Some(entry) = self.buckets[idx].iter_mut().find(|e| &*e.key == key) {
            entry.int_value = int_value;
            entry.float_value = float_value;
            return Ok(());
        }

        if self.over_threshold(self.size + 1) {
            self.grow()?;
            idx = self.bucket_index(key);
        }
        let chain = &mut self.buckets[idx];
        chain
            .try_reserve(1)
            .map_err(|_| Error::Allocation { what: "chain slots", requested: chain.len() + 1 })?;
        chain.push(Entry { key: key.into(), int_value, float_value });
        self.size += 1;
        Ok(())
    }

    /// Presence-checked lookup.
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.buckets[self.bucket_index(key)]
            .iter()
            .find(|e| &*e.key == key)
    }

    /// Integer field of `key`, or [`MISS_INT`].
    pub fn get_int(&self, key: &str) -> i32 {
        self.get(key).map_or(MISS_INT, |e| e.int_value)
    }

    /// Float field of `key`, or [`MISS_FLOAT`].
    pub fn get_float(&self, key: &str) -> f32 {
        self.get(key).map_or(MISS_FLOAT, |e| e.float_value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Current number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f32 {
        self.size as f32 / self.buckets.len() as f32
    }

    /// Length of the longest chain, 0 for an empty table.
    pub fn longest_chain(&self) -> usize {
        self.buckets.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Entries in bucket order, then chain order.
    pub fn iter(&self) -> BucketIter<'_> {
        BucketIter {
            buckets: &self.buckets,
            bucket: 0,
            slot: 0,
            remaining: self.size,
        }
    }

    fn over_threshold(&self, size: usize) -> bool {
        match self.max_load_factor {
            Some(max) => size as f32 / self.buckets.len() as f32 > max,
            None => false,
        }
    }

    /// Double the bucket array. Old buckets are drained in order and entries
    /// appended to the new chain tails, so the new layout is deterministic too.
    /// Every new chain is reserved before any entry moves, so the pushes below
    /// never allocate.
    fn grow(&mut self) -> Result<()> {
        let old_capacity = self.buckets.len();
        let new_capacity = old_capacity
            .checked_mul(2)
            .ok_or(Error::Allocation { what: "buckets", requested: usize::MAX })?;
        let mut buckets = alloc_buckets(new_capacity)?;
        let mut lengths = vec![0usize; new_capacity];
        for entry in self.buckets.iter().flatten() {
            lengths[(djb2(&entry.key) % new_capacity as u64) as usize] += 1;
        }
        // reserve everything up front; on failure the old layout is untouched
        for (chain, &len) in buckets.iter_mut().zip(&lengths) {
            chain
                .try_reserve_exact(len)
                .map_err(|_| Error::Allocation { what: "chain slots", requested: len })?;
        }
        for chain in std::mem::take(&mut self.buckets) {
            for entry in chain {
                let idx = (djb2(&entry.key) % new_capacity as u64) as usize;
                buckets[idx].push(entry);
            }
        }
        self.buckets = buckets;
        tracing::debug!(old_capacity, new_capacity, size = self.size, "rehashed table");
        Ok(())
    }
}

fn alloc_buckets(capacity: usize) -> Result<Vec<Vec<Entry>>> {
    if capacity == 0 {
        return Err(Error::InvalidCapacity(capacity));
    }
    let mut buckets = Vec::new();
    buckets
        .try_reserve_exact(capacity)
        .map_err(|_| Error::Allocation { what: "buckets", requested: capacity })?;
    buckets.resize_with(capacity, Vec::new);
    Ok(buckets)
}

impl<'a> IntoIterator for &'a HashTable {
    type Item = &'a Entry;
    type IntoIter = BucketIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Single-pass cursor over a [`HashTable`].
///
/// Holds a shared borrow of the table, so the table cannot be mutated while
/// the cursor is alive. Once exhausted it keeps returning `None`.
#[derive(Debug, Clone)]
pub struct BucketIter<'a> {
    buckets: &'a [Vec<Entry>],
    bucket: usize,
    slot: usize,
    remaining: usize,
}

impl<'a> Iterator for BucketIter<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<Self::Item> {
        let buckets = self.buckets;
        while self.bucket < buckets.len() {
            if let Some(entry) = buckets[self.bucket].get(self.slot) {
                self.slot += 1;
                self.remaining -= 1;
                return Some(entry);
            }
            // chain exhausted, move on
            self.bucket += 1;
            self.slot = 0;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for BucketIter<'_> {}

impl FusedIterator for BucketIter<'_> {}
