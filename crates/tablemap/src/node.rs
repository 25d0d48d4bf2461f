//! Detached map entries produced by `extract`.

use crate::iter::RowIter;

/// Optionally-empty holder of one key/value pair detached from the table.
///
/// A node is either empty or holds exactly one pair. The key may be
/// mutated before re-inserting the node under a new key; inserting an
/// empty node is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<K, V> {
    entry: Option<(K, V)>,
}

impl<K, V> Node<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self {
            entry: Some((key, value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }

    pub fn key(&self) -> Option<&K> {
        self.entry.as_ref().map(|(key, _)| key)
    }

    pub fn key_mut(&mut self) -> Option<&mut K> {
        self.entry.as_mut().map(|(key, _)| key)
    }

    pub fn value(&self) -> Option<&V> {
        self.entry.as_ref().map(|(_, value)| value)
    }

    pub fn value_mut(&mut self) -> Option<&mut V> {
        self.entry.as_mut().map(|(_, value)| value)
    }

    pub fn into_pair(self) -> Option<(K, V)> {
        self.entry
    }
}

impl<K, V> Default for Node<K, V> {
    fn default() -> Self {
        Self { entry: None }
    }
}

/// Result of inserting a node.
///
/// When insertion did not happen (empty node or key collision), ownership
/// of the node is handed back and `position` points at the pre-existing
/// entry, or at end for an empty node.
pub struct NodeInsert<'conn, K, V> {
    pub position: RowIter<'conn, K, V>,
    pub inserted: bool,
    pub node: Node<K, V>,
}
