//! Singly-linked entry list owned by a single bucket of a [`ChainingMap`](crate::ChainingMap)

use std::fmt;

/// Owning link to the next node
type Link<V> = Option<Box<Node<V>>>;

/// A node of the chain
#[derive(Debug)]
struct Node<V> {
    /// The key in the key-value pair
    key: String,
    /// The value associated with the key
    value: V,
    /// The rest of the chain
    next: Link<V>,
}

/// A singly-linked list of key-value pairs with unique keys.
///
/// New entries go to the head. Every lookup is a linear scan.
#[derive(Debug)]
pub struct EntryChain<V> {
    /// First node, if any
    head: Link<V>,
    /// Number of nodes
    len: usize,
}

impl<V> Default for EntryChain<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> EntryChain<V> {
    /// Creates an empty chain
    #[must_use]
    pub const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// Returns the number of entries in the chain
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the chain has no entries
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Prepends an entry. The caller guarantees `key` is not already in the chain.
    pub fn insert(&mut self, key: String, value: V) {
        let next = self.head.take();
        self.head = Some(Box::new(Node { key, value, next }));
        self.len = self.len.saturating_add(1);
    }

    /// Returns the value stored for `key`
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&V> {
        self.iter().find(|&(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value stored for `key`
    pub fn find_mut(&mut self, key: &str) -> Option<&mut V> {
        let mut link = self.head.as_deref_mut();
        while let Some(node) = link {
            if node.key == key {
                return Some(&mut node.value);
            }
            link = node.next.as_deref_mut();
        }
        None
    }

    /// Zero-based position of `key` in the chain
    #[must_use]
    pub fn position(&self, key: &str) -> Option<usize> {
        self.iter().position(|(k, _)| k == key)
    }

    /// Unlinks the entry for `key` and returns its value
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let mut link = &mut self.head;
        while link.as_ref().is_some_and(|node| node.key != key) {
            link = &mut link.as_mut()?.next;
        }

        let mut removed = link.take()?;
        *link = removed.next.take();
        self.len = self.len.saturating_sub(1);
        Some(removed.value)
    }

    /// Detaches the head entry
    fn pop_front(&mut self) -> Option<(String, V)> {
        let mut node = self.head.take()?;
        self.head = node.next.take();
        self.len = self.len.saturating_sub(1);
        Some((node.key, node.value))
    }

    /// Returns an iterator over the entries, head first
    #[must_use]
    pub fn iter(&self) -> ChainIter<'_, V> {
        ChainIter { next: self.head.as_deref() }
    }
}

impl<V> Drop for EntryChain<V> {
    // Unlink nodes one at a time so a long chain cannot overflow the stack
    fn drop(&mut self) {
        let mut link = self.head.take();
        while let Some(mut node) = link {
            link = node.next.take();
        }
    }
}

impl<V: fmt::Display> fmt::Display for EntryChain<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (position, (key, value)) in self.iter().enumerate() {
            if position > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str("]")
    }
}

/// Borrowing iterator over an [`EntryChain`]
#[derive(Debug, Clone)]
pub struct ChainIter<'a, V> {
    /// Node yielded next
    next: Option<&'a Node<V>>,
}

impl<'a, V> Iterator for ChainIter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.next.as_deref();
        Some((node.key.as_str(), &node.value))
    }
}

impl<'a, V> IntoIterator for &'a EntryChain<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = ChainIter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator that drains an [`EntryChain`], head first
#[derive(Debug)]
pub struct IntoIter<V> {
    /// The chain being drained
    chain: EntryChain<V>,
}

impl<V> Iterator for IntoIter<V> {
    type Item = (String, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.chain.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.chain.len, Some(self.chain.len))
    }
}

impl<V> IntoIterator for EntryChain<V> {
    type Item = (String, V);
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { chain: self }
    }
}
