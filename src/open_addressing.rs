use std::{fmt, iter, mem};

use tracing::{debug, error, trace};

use crate::{
    error::{MapError, Result},
    hashing::HashFn,
    prime::next_prime,
    table::HashTable,
};

/// Load factor the table never exceeds once a `put` returns
pub const OPEN_ADDRESSING_MAX_LOAD: f64 = 0.5;

/// A key-value pair stored in an occupied slot
#[derive(Debug, Clone)]
struct Entry<V> {
    /// The key in the key-value pair
    key: String,
    /// The value associated with the key
    value: V,
}

/// State of a single bucket
#[derive(Debug, Clone)]
enum Slot<V> {
    /// Never written since the last rehash or clear; terminates probe walks
    Empty,
    /// Holds a live entry
    Occupied(Entry<V>),
    /// Held an entry that was removed; probe walks pass over it
    Tombstone,
}

/// Outcome of walking a key's probe sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    /// A live slot holding the key
    Found(usize),
    /// The key is absent; this is the first reusable slot on its sequence
    Vacant(usize),
    /// The key is absent and no reusable slot was visited
    Exhausted,
}

/// Quadratic probe sequence `(home + j * j) mod capacity` for `j` in `0..capacity`.
///
/// Consecutive squares differ by `2j + 1`, so the sequence is advanced by addition only.
#[derive(Debug, Clone)]
struct QuadraticProbe {
    /// Index yielded next
    index: usize,
    /// Distance from the next index to the one after it
    offset: usize,
    /// Modulus of the sequence
    capacity: usize,
    /// Probes left before the walk gives up
    remaining: usize,
}

impl Iterator for QuadraticProbe {
    type Item = usize;

    #[allow(clippy::arithmetic_side_effects)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let current = self.index;
        // index and offset are both < capacity, so neither sum can overflow
        self.index = (self.index + self.offset) % self.capacity;
        self.offset = (self.offset + 2) % self.capacity;
        Some(current)
    }
}

/// A string-keyed hash table resolving collisions with quadratic probing.
///
/// Removal leaves a tombstone so that probe sequences running through the removed slot stay
/// intact. Tombstones are reused by later insertions and dropped entirely on rehash. The
/// bucket count is always prime and the load factor never exceeds
/// [`OPEN_ADDRESSING_MAX_LOAD`] after an insertion.
///
/// Note: This implementation is not thread-safe. Wrap it in a `Mutex` for shared access.
#[derive(Debug, Clone)]
pub struct OpenAddressingMap<V> {
    /// The bucket array; its length is the table capacity
    buckets: Box<[Slot<V>]>,
    /// Current number of live entries in the hash table
    size: usize,
    /// Hash function supplied at construction
    hash_fn: HashFn,
}

impl<V> OpenAddressingMap<V> {
    /// Creates an empty map with at least `capacity` buckets, rounded up to a prime
    #[must_use]
    pub fn new(capacity: usize, hash_fn: HashFn) -> Self {
        Self { buckets: empty_buckets(next_prime(capacity.max(1))), size: 0, hash_fn }
    }

    /// Returns the number of elements in the hash table
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the hash table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of slots examined to locate `key`, or `None` if it is absent
    #[must_use]
    pub fn probe_len(&self, key: &str) -> Option<usize> {
        match self.walk(key) {
            (Probe::Found(_), probes) => Some(probes),
            _ => None,
        }
    }

    /// Home bucket of `key`
    #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
    fn home_index(&self, key: &str) -> usize {
        // Capacity is a prime >= 3, so never zero; the remainder is below it and fits a usize
        ((self.hash_fn)(key) % self.buckets.len() as u64) as usize
    }

    /// Probe sequence of `key` over the current bucket array
    fn probe(&self, key: &str) -> QuadraticProbe {
        let capacity = self.buckets.len();
        QuadraticProbe { index: self.home_index(key), offset: 1, capacity, remaining: capacity }
    }

    /// Walks the probe sequence of `key`, returning the outcome and the number of slots examined.
    ///
    /// Tombstones never stop the walk; the first one seen is remembered as the reusable
    /// slot for an absent key.
    fn walk(&self, key: &str) -> (Probe, usize) {
        let mut first_tombstone = None;
        let mut probes: usize = 0;

        for index in self.probe(key) {
            probes = probes.saturating_add(1);
            match self.buckets.get(index) {
                None => break,
                Some(Slot::Empty) => {
                    return (Probe::Vacant(first_tombstone.unwrap_or(index)), probes);
                }
                Some(Slot::Tombstone) => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(index);
                    }
                }
                Some(Slot::Occupied(entry)) => {
                    if entry.key == key {
                        return (Probe::Found(index), probes);
                    }
                }
            }
        }

        (first_tombstone.map_or(Probe::Exhausted, Probe::Vacant), probes)
    }

    /// Returns true if holding `size` live entries would exceed the load limit
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    fn over_max_load(&self, size: usize) -> bool {
        size as f64 / self.buckets.len() as f64 > OPEN_ADDRESSING_MAX_LOAD
    }

    /// Places an entry whose key is not yet live, growing the table first if needed.
    ///
    /// `probe` is the outcome of walking the key's sequence over the current buckets; it is
    /// only walked again when the table grows.
    fn insert_new(&mut self, entry: Entry<V>, probe: Probe) -> Result<()> {
        let probe = if self.over_max_load(self.size.saturating_add(1)) {
            let target = next_prime(self.buckets.len().saturating_mul(2));
            self.resize_table(target)?;
            self.walk(&entry.key).0
        } else {
            probe
        };

        let capacity = self.buckets.len();
        let slot = match probe {
            Probe::Vacant(index) => self.buckets.get_mut(index),
            // A live copy of the key here means the caller's walk was stale
            Probe::Found(_) | Probe::Exhausted => None,
        };

        if let Some(slot) = slot {
            *slot = Slot::Occupied(entry);
            self.size = self.size.saturating_add(1);
            return Ok(());
        }

        error!(key = %entry.key, capacity, size = self.size, ?probe, "no vacant slot for new key");
        Err(MapError::ProbeExhausted { key: entry.key, capacity })
    }
}

/// Allocates `capacity` empty slots
fn empty_buckets<V>(capacity: usize) -> Box<[Slot<V>]> {
    iter::repeat_with(|| Slot::Empty).take(capacity).collect()
}

impl<V> HashTable<V> for OpenAddressingMap<V> {
    type Iter<'a>
        = Iter<'a, V>
    where
        Self: 'a,
        V: 'a;

    fn put(&mut self, key: &str, value: V) -> Result<Option<V>> {
        let probe = self.walk(key).0;
        if let Probe::Found(index) = probe {
            if let Some(Slot::Occupied(entry)) = self.buckets.get_mut(index) {
                return Ok(Some(mem::replace(&mut entry.value, value)));
            }
        }

        self.insert_new(Entry { key: key.to_owned(), value }, probe)?;
        Ok(None)
    }

    fn get(&self, key: &str) -> Option<&V> {
        match self.walk(key).0 {
            Probe::Found(index) => match self.buckets.get(index) {
                Some(Slot::Occupied(entry)) => Some(&entry.value),
                _ => None,
            },
            Probe::Vacant(_) | Probe::Exhausted => None,
        }
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        match self.walk(key).0 {
            Probe::Found(index) => match self.buckets.get_mut(index) {
                Some(Slot::Occupied(entry)) => Some(&mut entry.value),
                _ => None,
            },
            Probe::Vacant(_) | Probe::Exhausted => None,
        }
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        let Probe::Found(index) = self.walk(key).0 else {
            return None;
        };

        let slot = self.buckets.get_mut(index)?;
        match mem::replace(slot, Slot::Tombstone) {
            Slot::Occupied(entry) => {
                self.size = self.size.saturating_sub(1);
                Some(entry.value)
            }
            other => {
                *slot = other;
                None
            }
        }
    }

    fn resize_table(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity < self.size {
            trace!(new_capacity, size = self.size, "ignoring resize below occupancy");
            return Ok(());
        }

        let new_capacity = next_prime(new_capacity);
        let old_buckets = mem::replace(&mut self.buckets, empty_buckets(new_capacity));
        debug!(
            old_capacity = old_buckets.len(),
            new_capacity,
            live = self.size,
            "rehashing open addressing table"
        );
        self.size = 0;

        // Tombstones are dropped here
        for slot in old_buckets.into_vec() {
            if let Slot::Occupied(entry) = slot {
                let probe = self.walk(&entry.key).0;
                self.insert_new(entry, probe)?;
            }
        }

        Ok(())
    }

    fn clear(&mut self) {
        for slot in self.buckets.iter_mut() {
            *slot = Slot::Empty;
        }
        self.size = 0;
    }

    fn size(&self) -> usize {
        self.size
    }

    fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Tombstoned slots count as empty, since they hold no live entry
    fn empty_buckets(&self) -> usize {
        self.buckets.len().saturating_sub(self.size)
    }

    fn iter(&self) -> Iter<'_, V> {
        Iter { buckets: &self.buckets, index: 0 }
    }
}

impl<'a, V> IntoIterator for &'a OpenAddressingMap<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: fmt::Display> fmt::Display for OpenAddressingMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, slot) in self.buckets.iter().enumerate() {
            match slot {
                Slot::Empty => writeln!(f, "{index}: None")?,
                Slot::Tombstone => writeln!(f, "{index}: TS")?,
                Slot::Occupied(entry) => writeln!(f, "{index}: K: {} V: {}", entry.key, entry.value)?,
            }
        }
        Ok(())
    }
}

/// Iterator over the live entries of an [`OpenAddressingMap`], in bucket order
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    /// Reference to the buckets in the hash map
    buckets: &'a [Slot<V>],
    /// Current position in the iteration
    index: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(slot) = self.buckets.get(self.index) {
            self.index = self.index.saturating_add(1);
            if let Slot::Occupied(entry) = slot {
                return Some((entry.key.as_str(), &entry.value));
            }
        }
        None
    }
}
