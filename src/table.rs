//! The operation set shared by [`OpenAddressingMap`](crate::OpenAddressingMap) and
//! [`ChainingMap`](crate::ChainingMap).

use crate::error::Result;

/// A string-keyed hash table with explicit, caller-visible capacity management.
///
/// Implementations differ only in how they resolve collisions. Capacity is always prime,
/// and `size` always equals the number of keys for which [`contains_key`] is true.
///
/// [`contains_key`]: HashTable::contains_key
pub trait HashTable<V> {
    /// Iterator over live `(key, value)` pairs in bucket order
    type Iter<'a>: Iterator<Item = (&'a str, &'a V)>
    where
        Self: 'a,
        V: 'a;

    /// Inserts or overwrites `key`, returning the previous value if there was one.
    ///
    /// May rehash the whole table before inserting a new key.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::ProbeExhausted`](crate::MapError::ProbeExhausted) if the table
    /// has no room for the key along its probe sequence, which only happens when the
    /// table's invariants are broken.
    fn put(&mut self, key: &str, value: V) -> Result<Option<V>>;

    /// Returns a reference to the value stored for `key`
    fn get(&self, key: &str) -> Option<&V>;

    /// Returns a mutable reference to the value stored for `key`
    fn get_mut(&mut self, key: &str) -> Option<&mut V>;

    /// Removes `key`, returning its value. Absent keys are a no-op.
    fn remove(&mut self, key: &str) -> Option<V>;

    /// Rebuilds the table with `next_prime(new_capacity)` buckets.
    ///
    /// Requests the implementation cannot honor are silently ignored.
    ///
    /// # Errors
    ///
    /// Propagates errors from reinserting the surviving entries.
    fn resize_table(&mut self, new_capacity: usize) -> Result<()>;

    /// Removes every entry, keeping the current capacity
    fn clear(&mut self);

    /// Number of live entries
    fn size(&self) -> usize;

    /// Number of buckets
    fn capacity(&self) -> usize;

    /// Number of buckets that hold no live entry
    fn empty_buckets(&self) -> usize;

    /// Returns an iterator over the live entries
    fn iter(&self) -> Self::Iter<'_>;

    /// Returns true if `key` is present
    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Ratio of live entries to buckets
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    fn table_load(&self) -> f64 {
        self.size() as f64 / self.capacity() as f64
    }
}
