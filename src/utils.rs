//! Utility functions and traits shared by both map implementations

use crate::{error::Result, table::HashTable};

/// Extension trait for map implementations that provides owned snapshots of their contents
pub trait HashMapExtensions<V> {
    /// Returns the keys of the hash map as a Vec
    fn keys(&self) -> Vec<String>;

    /// Returns the values of the hash map as a Vec
    fn values(&self) -> Vec<V>;

    /// Returns every `(key, value)` pair in bucket order
    fn get_keys_and_values(&self) -> Vec<(String, V)>;
}

impl<V, M> HashMapExtensions<V> for M
where
    M: HashTable<V>,
    V: Clone,
{
    fn keys(&self) -> Vec<String> {
        self.iter().map(|(k, _)| k.to_owned()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }

    fn get_keys_and_values(&self) -> Vec<(String, V)> {
        self.iter().map(|(k, v)| (k.to_owned(), v.clone())).collect()
    }
}

/// Inserts every pair from `pairs` into `map` and returns it
///
/// # Errors
///
/// Stops at the first insertion that fails.
pub fn from_pairs<M, V, K, I>(mut map: M, pairs: I) -> Result<M>
where
    M: HashTable<V>,
    K: AsRef<str>,
    I: IntoIterator<Item = (K, V)>,
{
    for (key, value) in pairs {
        map.put(key.as_ref(), value)?;
    }

    Ok(map)
}
