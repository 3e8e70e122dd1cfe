use std::{fmt, iter, mem, slice};

use tracing::{debug, error, trace};

use crate::{
    chain::{ChainIter, EntryChain},
    error::{MapError, Result},
    hashing::{HashFn, additive_hash},
    prime::next_prime,
    table::HashTable,
};

/// Bucket count used by [`ChainingMap::default`]
pub const DEFAULT_CAPACITY: usize = 11;

/// Load factor the table always stays below once a `put` returns
pub const CHAINING_MAX_LOAD: f64 = 1.0;

/// A string-keyed hash table resolving collisions with separate chaining.
///
/// Every bucket owns an [`EntryChain`]; colliding keys are prepended to it. The bucket
/// count is always prime and the table grows before the average chain length reaches
/// [`CHAINING_MAX_LOAD`].
///
/// Note: This implementation is not thread-safe. Wrap it in a `Mutex` for shared access.
#[derive(Debug)]
pub struct ChainingMap<V> {
    /// One chain per bucket; the slice length is the table capacity
    buckets: Box<[EntryChain<V>]>,
    /// Current number of entries across all chains
    size: usize,
    /// Hash function supplied at construction
    hash_fn: HashFn,
}

impl<V> Default for ChainingMap<V> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, additive_hash)
    }
}

impl<V> ChainingMap<V> {
    /// Creates an empty map with at least `capacity` buckets, rounded up to a prime
    #[must_use]
    pub fn new(capacity: usize, hash_fn: HashFn) -> Self {
        Self { buckets: empty_chains(next_prime(capacity.max(1))), size: 0, hash_fn }
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

    /// Returns the number of chain nodes examined to locate `key`, or `None` if it is absent
    #[must_use]
    pub fn probe_len(&self, key: &str) -> Option<usize> {
        self.chain_for(key)?.position(key).map(|position| position.saturating_add(1))
    }

    /// Bucket holding `key`
    #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
    fn bucket_index(&self, key: &str) -> usize {
        // Capacity is a prime >= 3, so never zero; the remainder is below it and fits a usize
        ((self.hash_fn)(key) % self.buckets.len() as u64) as usize
    }

    /// Chain that holds `key`, if present
    fn chain_for(&self, key: &str) -> Option<&EntryChain<V>> {
        self.buckets.get(self.bucket_index(key))
    }

    /// Returns true if holding `size` entries would bring the load to the limit
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    fn reaches_max_load(&self, size: usize) -> bool {
        size as f64 / self.buckets.len() as f64 >= CHAINING_MAX_LOAD
    }

    /// Prepends an entry whose key is absent, growing the table first if needed
    fn insert_new(&mut self, key: String, value: V) -> Result<()> {
        if self.reaches_max_load(self.size.saturating_add(1)) {
            let target = next_prime(self.buckets.len().saturating_mul(2));
            self.resize_table(target)?;
        }

        let index = self.bucket_index(&key);
        self.prepend_at(index, key, value)
    }

    /// Prepends an entry to the chain of bucket `index`
    fn prepend_at(&mut self, index: usize, key: String, value: V) -> Result<()> {
        let capacity = self.buckets.len();
        let Some(chain) = self.buckets.get_mut(index) else {
            error!(%key, index, capacity, "bucket index out of range");
            return Err(MapError::MissingBucket { key, index, capacity });
        };

        chain.insert(key, value);
        self.size = self.size.saturating_add(1);
        Ok(())
    }
}

/// Allocates `capacity` empty chains
fn empty_chains<V>(capacity: usize) -> Box<[EntryChain<V>]> {
    iter::repeat_with(EntryChain::new).take(capacity).collect()
}

impl<V> HashTable<V> for ChainingMap<V> {
    type Iter<'a>
        = Iter<'a, V>
    where
        Self: 'a,
        V: 'a;

    fn put(&mut self, key: &str, value: V) -> Result<Option<V>> {
        let index = self.bucket_index(key);
        if let Some(existing) = self.buckets.get_mut(index).and_then(|chain| chain.find_mut(key)) {
            return Ok(Some(mem::replace(existing, value)));
        }

        self.insert_new(key.to_owned(), value)?;
        Ok(None)
    }

    fn get(&self, key: &str) -> Option<&V> {
        self.chain_for(key)?.find(key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.bucket_index(key);
        self.buckets.get_mut(index)?.find_mut(key)
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.bucket_index(key);
        let value = self.buckets.get_mut(index)?.remove(key)?;
        self.size = self.size.saturating_sub(1);
        Some(value)
    }

    fn resize_table(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity < 1 {
            trace!(new_capacity, "ignoring resize to zero buckets");
            return Ok(());
        }

        let new_capacity = next_prime(new_capacity);
        let old_buckets = mem::replace(&mut self.buckets, empty_chains(new_capacity));
        debug!(
            old_capacity = old_buckets.len(),
            new_capacity,
            live = self.size,
            "rehashing chaining table"
        );
        self.size = 0;

        for chain in old_buckets.into_vec() {
            for (key, value) in chain {
                self.insert_new(key, value)?;
            }
        }

        Ok(())
    }

    fn clear(&mut self) {
        for chain in self.buckets.iter_mut() {
            *chain = EntryChain::new();
        }
        self.size = 0;
    }

    fn size(&self) -> usize {
        self.size
    }

    fn capacity(&self) -> usize {
        self.buckets.len()
    }

    fn empty_buckets(&self) -> usize {
        self.buckets.iter().filter(|chain| chain.is_empty()).count()
    }

    fn iter(&self) -> Iter<'_, V> {
        Iter { buckets: self.buckets.iter(), chain: None }
    }
}

impl<'a, V> IntoIterator for &'a ChainingMap<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: fmt::Display> fmt::Display for ChainingMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, chain) in self.buckets.iter().enumerate() {
            writeln!(f, "{index}: {chain}")?;
        }
        Ok(())
    }
}

/// Iterator over the entries of a [`ChainingMap`]: bucket order, then chain order
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    /// Buckets not yet visited
    buckets: slice::Iter<'a, EntryChain<V>>,
    /// Position inside the bucket being visited
    chain: Option<ChainIter<'a, V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.chain.as_mut().and_then(Iterator::next) {
                return Some(item);
            }
            self.chain = Some(self.buckets.next()?.iter());
        }
    }
}

/// Returns the most frequent items and their frequency.
///
/// Items are counted by their string form in a [`ChainingMap`]. Every item reaching the
/// highest count is returned, in map-iteration order. An empty input yields `([], 0)`.
///
/// # Errors
///
/// Propagates errors from the underlying map, which only occur if its invariants break.
pub fn find_mode<T: fmt::Display>(items: &[T]) -> Result<(Vec<String>, usize)> {
    let mut counts: ChainingMap<usize> = ChainingMap::new(items.len(), additive_hash);
    let mut max_count: usize = 0;

    for item in items {
        let key = item.to_string();
        let count = match counts.get_mut(&key) {
            Some(count) => {
                *count = count.saturating_add(1);
                *count
            }
            None => {
                counts.put(&key, 1)?;
                1
            }
        };
        max_count = max_count.max(count);
    }

    let modes = counts
        .iter()
        .filter(|&(_, &count)| count == max_count)
        .map(|(key, _)| key.to_owned())
        .collect();

    Ok((modes, max_count))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::*;
    use crate::{
        hashing::{positional_hash, sip_hash},
        prime::is_prime,
    };

    fn constant_hash(_key: &str) -> u64 {
        3
    }

    #[test]
    fn test_default_capacity() {
        let map: ChainingMap<i32> = ChainingMap::default();
        assert_eq!(map.capacity(), DEFAULT_CAPACITY);
        assert_eq!(map.empty_buckets(), DEFAULT_CAPACITY);
        assert!(map.is_empty());
    }

    #[test]
    fn test_contains_key_after_remove() {
        let mut map = ChainingMap::new(11, additive_hash);
        assert!(!map.contains_key("key1"));
        map.put("key1", 10).unwrap();
        map.put("key2", 20).unwrap();
        map.put("key3", 30).unwrap();

        assert!(map.contains_key("key1"));
        assert!(!map.contains_key("key4"));
        assert!(map.contains_key("key2"));
        assert!(map.contains_key("key3"));

        assert_eq!(map.remove("key3"), Some(30));
        assert!(!map.contains_key("key3"));
        assert_eq!(map.remove("key3"), None);
        assert_eq!(map.size(), 2);
    }

    #[test]
    fn test_update() {
        let mut map = ChainingMap::new(53, additive_hash);
        assert_eq!(map.put("str14", 1400), Ok(None));
        assert_eq!(map.put("str14", 1500), Ok(Some(1400)));
        assert_eq!(map.get("str14"), Some(&1500));
        assert_eq!(map.size(), 1);
    }

    #[test]
    fn test_resize_table_keeps_entries() {
        let mut map = ChainingMap::new(23, additive_hash);
        map.put("key1", 10).unwrap();
        assert_eq!(map.size(), 1);
        assert_eq!(map.capacity(), 23);

        map.resize_table(30).unwrap();
        assert_eq!(map.size(), 1);
        assert_eq!(map.capacity(), 31);
        assert_eq!(map.get("key1"), Some(&10));
    }

    #[test]
    fn test_resize_to_zero_is_noop() {
        let mut map = ChainingMap::new(11, additive_hash);
        map.put("key1", 10).unwrap();
        map.resize_table(0).unwrap();
        assert_eq!(map.capacity(), 11);
        assert_eq!(map.get("key1"), Some(&10));
    }

    #[test]
    fn test_resize_below_size_grows_back() {
        let mut map = ChainingMap::new(79, positional_hash);
        let keys: Vec<usize> = (1..1000).step_by(13).collect();
        for &key in &keys {
            map.put(&key.to_string(), key * 42).unwrap();
        }

        map.resize_table(1).unwrap();
        assert!(map.table_load() < CHAINING_MAX_LOAD);
        assert!(is_prime(map.capacity()));
        assert_eq!(map.size(), keys.len());
        for &key in &keys {
            assert_eq!(map.get(&key.to_string()), Some(&(key * 42)));
        }
    }

    #[test]
    fn test_automatic_growth() {
        let mut map = ChainingMap::new(3, additive_hash);
        map.put("a", 1).unwrap();
        map.put("b", 2).unwrap();
        assert_eq!(map.capacity(), 3);

        // A third key would bring the load to 1.0
        map.put("c", 3).unwrap();
        assert_eq!(map.capacity(), 7);
        assert_eq!(map.size(), 3);
    }

    #[test]
    fn test_empty_buckets_counts_chains() {
        let mut map = ChainingMap::new(101, constant_hash);
        map.put("key1", 10).unwrap();
        map.put("key2", 20).unwrap();
        map.put("key1", 30).unwrap();
        map.put("key4", 40).unwrap();

        // Every key shares bucket 3
        assert_eq!(map.empty_buckets(), 100);
        assert_eq!(map.probe_len("key4"), Some(1));
        assert_eq!(map.probe_len("key1"), Some(3));
        assert_eq!(map.probe_len("missing"), None);
    }

    #[test]
    fn test_clear() {
        let mut map = ChainingMap::new(53, additive_hash);
        map.put("key1", 10).unwrap();
        map.put("key2", 20).unwrap();
        map.resize_table(100).unwrap();
        assert_eq!(map.capacity(), 101);

        map.clear();
        assert_eq!(map.size(), 0);
        assert_eq!(map.capacity(), 101);
        assert_eq!(map.empty_buckets(), 101);
        assert_eq!(map.get("key2"), None);
    }

    #[test]
    fn test_iter_follows_bucket_then_chain_order() {
        let mut map = ChainingMap::new(5, constant_hash);
        map.put("a", 1).unwrap();
        map.put("b", 2).unwrap();

        let items: Vec<(&str, &i32)> = map.iter().collect();
        assert_eq!(items, vec![("b", &2), ("a", &1)]);
        assert_eq!((&map).into_iter().count(), 2);
    }

    #[test]
    fn test_get_mut() {
        let mut map = ChainingMap::new(11, additive_hash);
        map.put("key1", 1).unwrap();
        if let Some(value) = map.get_mut("key1") {
            *value += 10;
        }
        assert_eq!(map.get("key1"), Some(&11));
        assert_eq!(map.get_mut("key2"), None);
    }

    #[test]
    fn test_display() {
        let mut map = ChainingMap::new(3, constant_hash);
        map.put("a", 1).unwrap();
        map.put("b", 2).unwrap();
        // constant_hash sends everything to bucket 0
        assert_eq!(map.to_string(), "0: [b: 2 -> a: 1]\n1: []\n2: []\n");
    }

    #[test]
    fn test_out_of_range_bucket_is_an_error() {
        let mut map = ChainingMap::new(3, additive_hash);
        map.put("a", 1).unwrap();

        assert_eq!(
            map.prepend_at(3, "b".to_string(), 2),
            Err(MapError::MissingBucket { key: "b".to_string(), index: 3, capacity: 3 })
        );
        assert_eq!(map.size(), 1);
        assert_eq!(map.iter().count(), 1);
        assert!(!map.contains_key("b"));
    }

    #[test]
    fn test_extreme_hash_stays_in_range() {
        let mut map = ChainingMap::new(11, |_| u64::MAX);
        for i in 0..30 {
            map.put(&i.to_string(), i).unwrap();
        }
        assert_eq!(map.size(), 30);
        assert_eq!(map.iter().count(), 30);
        assert_eq!(map.get("29"), Some(&29));
    }

    #[test]
    fn test_find_mode_single() {
        let (modes, count) = find_mode(&[1, 1, 2, 3, 3, 3]).unwrap();
        assert_eq!(modes, vec!["3".to_string()]);
        assert_eq!(count, 3);
    }

    #[test]
    fn test_find_mode_ties() {
        let (mut modes, count) =
            find_mode(&["apple", "apple", "grape", "melon", "peach", "grape"]).unwrap();
        modes.sort();
        assert_eq!(modes, vec!["apple".to_string(), "grape".to_string()]);
        assert_eq!(count, 2);
    }

    #[test]
    fn test_find_mode_all_unique() {
        let (mut modes, count) = find_mode(&["Arch", "Manjaro", "Mint"]).unwrap();
        modes.sort();
        assert_eq!(modes, vec!["Arch", "Manjaro", "Mint"]);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_find_mode_empty() {
        let empty: [u8; 0] = [];
        assert_eq!(find_mode(&empty), Ok((Vec::new(), 0)));
    }

    #[derive(Debug, Clone)]
    enum Operation {
        Put(u8, u16),
        Remove(u8),
        Resize(u16),
    }

    fn operation() -> impl Strategy<Value = Operation> {
        prop_oneof![
            4 => (any::<u8>(), any::<u16>()).prop_map(|(k, v)| Operation::Put(k, v)),
            2 => any::<u8>().prop_map(Operation::Remove),
            1 => (0u16..600).prop_map(Operation::Resize),
        ]
    }

    fn check_against_model(hash_fn: HashFn, capacity: usize, ops: Vec<Operation>) {
        let mut map = ChainingMap::new(capacity, hash_fn);
        let mut model = HashMap::new();

        for op in ops {
            match op {
                Operation::Put(k, v) => {
                    let key = format!("k{k}");
                    assert_eq!(map.put(&key, v), Ok(model.insert(key, v)));
                    assert!(map.table_load() < CHAINING_MAX_LOAD);
                }
                Operation::Remove(k) => {
                    let key = format!("k{k}");
                    assert_eq!(map.remove(&key), model.remove(&key));
                }
                Operation::Resize(capacity) => {
                    map.resize_table(usize::from(capacity)).unwrap();
                }
            }
            assert!(is_prime(map.capacity()));
            assert_eq!(map.size(), model.len());
        }

        for (key, value) in &model {
            assert_eq!(map.get(key), Some(value));
        }
        assert_eq!(map.iter().count(), model.len());
    }

    proptest! {
        #[test]
        fn matches_std_map(capacity in 0usize..40, ops in proptest::collection::vec(operation(), 1..200)) {
            check_against_model(sip_hash, capacity, ops);
        }

        #[test]
        fn matches_std_map_when_every_key_collides(
            capacity in 0usize..40,
            ops in proptest::collection::vec(operation(), 1..120),
        ) {
            check_against_model(constant_hash, capacity, ops);
        }
    }
}
