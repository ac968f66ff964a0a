//! Module implement cursors and iterators over [RbTree][crate::RbTree].
//!
//! Cursors walk the tree through parent links, one node at a time, in
//! either direction. Once a cursor falls off either end it becomes
//! invalid and stays invalid, moving it is a no-op.

use std::{fmt, iter::FusedIterator, mem, ptr};

use crate::node::{Handle, Nodes};

/// Read-only cursor over entries, refer [RbTree::iter_first],
/// [RbTree::iter_last] and [RbTree::cursor].
///
/// Two cursors are equal when they point to the same node of the same
/// tree, entries with equal keys are still distinguished.
///
/// [RbTree::iter_first]: crate::RbTree::iter_first
/// [RbTree::iter_last]: crate::RbTree::iter_last
/// [RbTree::cursor]: crate::RbTree::cursor
pub struct Cursor<'a, K, V> {
    nodes: &'a Nodes<K, V>,
    at: Option<usize>,
}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(crate) fn new(nodes: &'a Nodes<K, V>, at: Option<usize>) -> Cursor<'a, K, V> {
        Cursor { nodes, at }
    }

    /// Return whether cursor points to a live node.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.at.is_some()
    }

    /// Move to the next entry in sorted order.
    pub fn move_next(&mut self) {
        if let Some(index) = self.at {
            self.at = self.nodes.successor(index);
        }
    }

    /// Move to the previous entry in sorted order.
    pub fn move_prev(&mut self) {
        if let Some(index) = self.at {
            self.at = self.nodes.predecessor(index);
        }
    }

    pub fn key(&self) -> Option<&'a K> {
        let nodes = self.nodes;
        self.at.map(|index| &nodes[index].key)
    }

    pub fn value(&self) -> Option<&'a V> {
        let nodes = self.nodes;
        self.at.map(|index| &nodes[index].value)
    }

    /// Return the handle to the current node, can be passed to
    /// [RbTree::delete][crate::RbTree::delete] once the cursor is dropped.
    pub fn handle(&self) -> Option<Handle> {
        self.at.map(|index| self.nodes.to_handle(index))
    }
}

impl<'a, K, V> Clone for Cursor<'a, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K, V> Copy for Cursor<'a, K, V> {}

impl<'a, K, V> PartialEq for Cursor<'a, K, V> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.nodes, other.nodes) && self.at == other.at
    }
}

impl<'a, K, V> Eq for Cursor<'a, K, V> {}

impl<'a, K, V> fmt::Debug for Cursor<'a, K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.key(), self.value()) {
            (Some(key), Some(value)) => write!(f, "Cursor<{:?},{:?}>", key, value),
            _ => write!(f, "Cursor<invalid>"),
        }
    }
}

/// Cursor that can update values in place, refer
/// [RbTree::iter_first_mut][crate::RbTree::iter_first_mut].
///
/// Keys are never exposed mutably, changing a key would break the
/// ordering of the tree.
pub struct CursorMut<'a, K, V> {
    nodes: &'a mut Nodes<K, V>,
    at: Option<usize>,
}

impl<'a, K, V> CursorMut<'a, K, V> {
    pub(crate) fn new(nodes: &'a mut Nodes<K, V>, at: Option<usize>) -> CursorMut<'a, K, V> {
        CursorMut { nodes, at }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.at.is_some()
    }

    pub fn move_next(&mut self) {
        if let Some(index) = self.at {
            self.at = self.nodes.successor(index);
        }
    }

    pub fn move_prev(&mut self) {
        if let Some(index) = self.at {
            self.at = self.nodes.predecessor(index);
        }
    }

    pub fn key(&self) -> Option<&K> {
        self.at.map(|index| &self.nodes[index].key)
    }

    pub fn value(&self) -> Option<&V> {
        self.at.map(|index| &self.nodes[index].value)
    }

    pub fn value_mut(&mut self) -> Option<&mut V> {
        let index = self.at?;
        Some(&mut self.nodes[index].value)
    }

    /// Overwrite value at the current node and return the old value.
    /// Return None if cursor is invalid.
    pub fn set_value(&mut self, value: V) -> Option<V> {
        let old = self.value_mut()?;
        Some(mem::replace(old, value))
    }

    pub fn handle(&self) -> Option<Handle> {
        self.at.map(|index| self.nodes.to_handle(index))
    }

    /// Return a read-only cursor at the same position.
    pub fn as_cursor(&self) -> Cursor<'_, K, V> {
        Cursor::new(&*self.nodes, self.at)
    }
}

/// Iterator over entries in sorted order, refer [RbTree::iter].
///
/// [RbTree::iter]: crate::RbTree::iter
pub struct Iter<'a, K, V> {
    nodes: &'a Nodes<K, V>,
    ends: Option<(usize, usize)>, // front and back, inclusive
    len: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(
        nodes: &'a Nodes<K, V>,
        ends: Option<(usize, usize)>,
        len: usize,
    ) -> Iter<'a, K, V> {
        Iter { nodes, ends, len }
    }
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Iter {
            nodes: self.nodes,
            ends: self.ends,
            len: self.len,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let (front, back) = self.ends?;

        self.len -= 1;
        self.ends = match self.nodes.successor(front) {
            Some(next) if self.len > 0 => Some((next, back)),
            _ => None,
        };

        let nodes = self.nodes;
        let node = &nodes[front];
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let (front, back) = self.ends?;

        self.len -= 1;
        self.ends = match self.nodes.predecessor(back) {
            Some(prev) if self.len > 0 => Some((front, prev)),
            _ => None,
        };

        let nodes = self.nodes;
        let node = &nodes[back];
        Some((&node.key, &node.value))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

#[cfg(test)]
#[path = "iter_test.rs"]
mod iter_test;
