//! Hash functions accepted by the maps in this crate.
//!
//! The maps make no assumption about distribution; any total `fn(&str) -> u64` works,
//! including one that sends every key to the same bucket.

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

/// A hash function mapping a string key to an unsigned integer
pub type HashFn = fn(&str) -> u64;

/// Sums the code points of the key's characters.
///
/// Anagrams collide, which makes it a good stress input for the collision paths.
#[must_use]
pub fn additive_hash(key: &str) -> u64 {
    key.chars().fold(0u64, |hash, ch| hash.wrapping_add(u64::from(ch)))
}

/// Sums each character's code point weighted by its one-based position.
#[must_use]
pub fn positional_hash(key: &str) -> u64 {
    key.chars()
        .zip(1u64..)
        .fold(0u64, |hash, (ch, position)| hash.wrapping_add(position.wrapping_mul(u64::from(ch))))
}

/// Hashes the key with the standard library's `DefaultHasher`
#[must_use]
pub fn sip_hash(key: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}
