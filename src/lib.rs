//! # Probe Map
//!
//! String-keyed hash tables built two ways, sharing one contract, [`HashTable`]:
//!
//! - `OpenAddressingMap`: quadratic probing over a prime-sized bucket array, with tombstones
//!   for removal and a load factor kept at or below 0.5
//! - `ChainingMap`: one singly-linked chain per bucket, with the load factor kept below 1.0
//!
//! Both take the hash function as a plain `fn(&str) -> u64` and stay correct even when it
//! sends every key to the same bucket.
//!
//! ## Basic Usage
//!
//! ```rust
//! use probemap::{HashTable, OpenAddressingMap, hashing::additive_hash};
//!
//! let mut map = OpenAddressingMap::new(11, additive_hash);
//!
//! // Insert values
//! map.put("apple", 1)?;
//! map.put("banana", 2)?;
//!
//! // Retrieve values
//! assert_eq!(map.get("apple"), Some(&1));
//!
//! // Update values
//! map.put("apple", 10)?;
//! assert_eq!(map.get("apple"), Some(&10));
//!
//! // Remove values
//! map.remove("apple");
//! assert_eq!(map.get("apple"), None);
//! # Ok::<(), probemap::MapError>(())
//! ```
//!
//! ## Separate Chaining
//!
//! ```rust
//! use probemap::{ChainingMap, HashTable, find_mode};
//!
//! let mut map = ChainingMap::default();
//! assert_eq!(map.capacity(), 11);
//!
//! for i in 0..20 {
//!     map.put(&format!("key-{}", i), i)?;
//! }
//!
//! // The table grew to keep chains short, and the capacity is still prime
//! assert!(map.table_load() < 1.0);
//! assert_eq!(map.capacity(), 23);
//!
//! let (modes, count) = find_mode(&[1, 1, 2, 3, 3, 3])?;
//! assert_eq!(modes, vec!["3".to_string()]);
//! assert_eq!(count, 3);
//! # Ok::<(), probemap::MapError>(())
//! ```

/// Singly-linked chain owned by each bucket of a chaining map
pub mod chain;
/// Module implementing a hash map with separate chaining
mod chaining;
/// Error type raised on broken internal invariants
mod error;
/// Hash functions accepted by the maps
pub mod hashing;
/// Module implementing a hash map with quadratic-probing open addressing
mod open_addressing;
/// Prime sizing for bucket arrays
pub mod prime;
/// The operation set shared by both maps
mod table;
/// Utility functions and traits for the hash maps
mod utils;

pub use chaining::{CHAINING_MAX_LOAD, ChainingMap, DEFAULT_CAPACITY, find_mode};
pub use error::{MapError, Result};
pub use open_addressing::{OPEN_ADDRESSING_MAX_LOAD, OpenAddressingMap};
pub use table::HashTable;
pub use utils::{HashMapExtensions, from_pairs};
