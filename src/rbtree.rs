//! Module provide ordered, duplicate tolerant, container implemented by
//! [RbTree] type.
//!
//! RbTree is a classic [red-black][wiki-rbtree] tree with parent links.
//! Every mutation restore the following properties before returning:
//!
//! 1. Every node is either red or black.
//! 2. The root is black.
//! 3. All leaves (null links) are black.
//! 4. If a node is red, then both its children are black.
//! 5. Every path from a given node to any of its descendant leaves
//!    contains the same number of black nodes.
//!
//! Insert and delete first splice the tree like a plain binary search
//! tree and then run a fixup pass that recolors and rotates a bounded
//! number of nodes on the path back to the root.
//!
//! [wiki-rbtree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree

use compare::{natural, Compare, Natural};
use log::trace;

use std::{cmp::Ordering, fmt, iter::FromIterator};

use crate::{
    iter::{Cursor, CursorMut, Iter},
    node::{Dir, Handle, Nodes},
    Error, Result,
};

/// RbTree manage a single instance of in-memory ordered container using
/// [red-black][wiki-rbtree] tree.
///
/// Ordering is decided by the comparator `C`, which must implement a
/// total order over keys. An inconsistent comparator is not detected, it
/// silently produces a tree with wrong ordering that can be spotted with
/// [RbTree::validate].
///
/// [wiki-rbtree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
#[derive(Clone)]
pub struct RbTree<K, V, C = Natural<K>> {
    pub(crate) nodes: Nodes<K, V>,
    pub(crate) root: Option<usize>,
    pub(crate) n_count: usize, // number of entries in the tree.
    cmp: C,
}

impl<K, V> RbTree<K, V>
where
    K: Ord,
{
    /// Create an empty instance ordered by the natural order of its keys.
    pub fn new() -> RbTree<K, V> {
        RbTree::with_cmp(natural())
    }
}

impl<K, V, C> RbTree<K, V, C>
where
    C: Compare<K>,
{
    /// Create an empty instance ordered by the given comparator.
    pub fn with_cmp(cmp: C) -> RbTree<K, V, C> {
        RbTree {
            nodes: Nodes::new(),
            root: None,
            n_count: Default::default(),
            cmp,
        }
    }
}

impl<K, V, C> Default for RbTree<K, V, C>
where
    C: Compare<K> + Default,
{
    fn default() -> RbTree<K, V, C> {
        RbTree::with_cmp(C::default())
    }
}

/// Maintenance API.
impl<K, V, C> RbTree<K, V, C> {
    /// Return number of entries in this instance.
    #[inline]
    pub fn len(&self) -> usize {
        self.n_count
    }

    /// Same as [RbTree::len].
    #[inline]
    pub fn size(&self) -> usize {
        self.n_count
    }

    /// Check whether this instance is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_count == 0
    }

    /// Same as [RbTree::is_empty].
    #[inline]
    pub fn empty(&self) -> bool {
        self.is_empty()
    }

    /// Return a reference to the comparator.
    pub fn cmp(&self) -> &C {
        &self.cmp
    }

    /// Compare two keys with this instance's comparator.
    pub fn compare(&self, a: &K, b: &K) -> Ordering
    where
        C: Compare<K>,
    {
        self.cmp.compare(a, b)
    }

    /// Drop all entries. Handles obtained before the clear no longer
    /// resolve.
    pub fn clear(&mut self) {
        trace!("clear {} entries", self.n_count);
        self.nodes.clear();
        self.root = None;
        self.n_count = 0;
    }
}

/// Handle based API.
impl<K, V, C> RbTree<K, V, C> {
    /// Check whether handle refer to a live node in this instance.
    pub fn contains(&self, handle: Handle) -> bool {
        self.nodes.resolve(handle).is_some()
    }

    /// Return the key of the node pointed by handle.
    pub fn key(&self, handle: Handle) -> Option<&K> {
        let index = self.nodes.resolve(handle)?;
        Some(&self.nodes[index].key)
    }

    /// Return the value of the node pointed by handle.
    pub fn value(&self, handle: Handle) -> Option<&V> {
        let index = self.nodes.resolve(handle)?;
        Some(&self.nodes[index].value)
    }

    /// Return a mutable reference to the value of the node pointed by
    /// handle. Keys are immutable once inserted.
    pub fn value_mut(&mut self, handle: Handle) -> Option<&mut V> {
        let index = self.nodes.resolve(handle)?;
        Some(&mut self.nodes[index].value)
    }

    /// Overwrite the value of the node pointed by handle, return the old
    /// value. Return None, and drop `value`, if handle is stale.
    pub fn set_value(&mut self, handle: Handle, value: V) -> Option<V> {
        let old = self.value_mut(handle)?;
        Some(std::mem::replace(old, value))
    }

    /// Return the handle next to `handle` in sorted order.
    pub fn next(&self, handle: Handle) -> Option<Handle> {
        let index = self.nodes.resolve(handle)?;
        let next = self.nodes.successor(index)?;
        Some(self.nodes.to_handle(next))
    }

    /// Return the handle previous to `handle` in sorted order.
    pub fn prev(&self, handle: Handle) -> Option<Handle> {
        let index = self.nodes.resolve(handle)?;
        let prev = self.nodes.predecessor(index)?;
        Some(self.nodes.to_handle(prev))
    }

    /// Return the node with minimum key.
    pub fn first(&self) -> Option<Handle> {
        let index = self.nodes.minimum(self.root?);
        Some(self.nodes.to_handle(index))
    }

    /// Return the node with maximum key.
    pub fn last(&self) -> Option<Handle> {
        let index = self.nodes.maximum(self.root?);
        Some(self.nodes.to_handle(index))
    }

    /// Same as [RbTree::first].
    #[inline]
    pub fn begin(&self) -> Option<Handle> {
        self.first()
    }

    /// Same as [RbTree::last].
    #[inline]
    pub fn rbegin(&self) -> Option<Handle> {
        self.last()
    }
}

impl<K, V, C> RbTree<K, V, C>
where
    C: Compare<K>,
{
    /// Insert a new entry and return its handle. Always adds a node, an
    /// entry with equal key is never replaced. Relative order among
    /// equal keys is not part of the contract.
    pub fn insert(&mut self, key: K, value: V) -> Handle {
        let (mut parent, mut dir, mut x) = (None, Dir::Left, self.root);
        while let Some(index) = x {
            parent = Some(index);
            dir = match self.cmp.compares_lt(&key, &self.nodes[index].key) {
                true => Dir::Left,
                false => Dir::Right,
            };
            x = self.nodes[index].child(dir);
        }

        let z = self.nodes.alloc(key, value, parent);
        self.n_count += 1;

        match parent {
            None => {
                self.nodes[z].set_black();
                self.root = Some(z);
            }
            Some(parent) => {
                self.nodes[parent].set_child(dir, Some(z));
                self.insert_fixup(z);
            }
        }

        self.nodes.to_handle(z)
    }

    /// Delete the node pointed by handle and return the key and value
    /// it held. If handle is stale, delete is a no-op and return None.
    ///
    /// When the node has two children its successor is unlinked instead,
    /// and the successor's entry moves into this node. In that case
    /// `handle` stays valid and points to the successor's key and value,
    /// while handles to the successor no longer resolve.
    pub fn delete(&mut self, handle: Handle) -> Option<(K, V)> {
        let z = self.nodes.resolve(handle)?;

        let (left, right) = (self.nodes[z].left, self.nodes[z].right);
        let y = match (left, right) {
            (Some(_), Some(right)) => self.nodes.minimum(right),
            _ => z,
        };

        let x = self.nodes[y].left.or(self.nodes[y].right);
        let xparent = self.nodes[y].parent;
        if let Some(x) = x {
            self.nodes[x].parent = xparent;
        }
        self.replace_child(xparent, y, x);

        let mut removed = self.nodes.release(y);
        if y != z {
            trace!("delete relocate successor {} into {}", y, z);
            self.nodes.swap_entry(z, &mut removed);
        }
        if removed.is_black() {
            self.delete_fixup(x, xparent);
        }
        self.n_count -= 1;

        Some((removed.key, removed.value))
    }

    /// Remove the first entry equal to key, return its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        let handle = self.find_node(key)?;
        self.delete(handle).map(|(_, value)| value)
    }
}

/// Search API.
impl<K, V, C> RbTree<K, V, C>
where
    C: Compare<K>,
{
    /// Return the value of the first entry equal to key.
    pub fn find<Q>(&self, key: &Q) -> Result<&V>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        match self.find_index(key) {
            Some(index) => Ok(&self.nodes[index].value),
            None => err_at!(KeyNotFound, msg: "key not found in {} entries", self.n_count),
        }
    }

    /// Return the value of the first entry equal to key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        self.find(key).ok()
    }

    /// Check whether there is an entry equal to key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        self.find_node(key).is_some()
    }

    /// Return the first node whose key is equal to key.
    pub fn find_node<Q>(&self, key: &Q) -> Option<Handle>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        let index = self.find_index(key)?;
        Some(self.nodes.to_handle(index))
    }

    /// Return the first node whose key is equal or greater than key.
    pub fn find_lower_bound_node<Q>(&self, key: &Q) -> Option<Handle>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        let index = self.lower_bound(key)?;
        Some(self.nodes.to_handle(index))
    }

    /// Return the first node whose key is greater than key.
    pub fn find_upper_bound_node<Q>(&self, key: &Q) -> Option<Handle>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        let index = self.upper_bound(key)?;
        Some(self.nodes.to_handle(index))
    }

    fn find_index<Q>(&self, key: &Q) -> Option<usize>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        let index = self.lower_bound(key)?;
        match self.cmp.compares_eq(key, &self.nodes[index].key) {
            true => Some(index),
            false => None,
        }
    }

    // leftmost node with `key <= node.key`, the candidate is recorded on
    // every step to the left.
    fn lower_bound<Q>(&self, key: &Q) -> Option<usize>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        let (mut x, mut candidate) = (self.root, None);
        while let Some(index) = x {
            x = match self.cmp.compares_le(key, &self.nodes[index].key) {
                true => {
                    candidate = Some(index);
                    self.nodes[index].left
                }
                false => self.nodes[index].right,
            };
        }
        candidate
    }

    // leftmost node with `key < node.key`.
    fn upper_bound<Q>(&self, key: &Q) -> Option<usize>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        let (mut x, mut candidate) = (self.root, None);
        while let Some(index) = x {
            x = match self.cmp.compares_lt(key, &self.nodes[index].key) {
                true => {
                    candidate = Some(index);
                    self.nodes[index].left
                }
                false => self.nodes[index].right,
            };
        }
        candidate
    }
}

/// Iteration API.
impl<K, V, C> RbTree<K, V, C> {
    /// Return a cursor at the first node, invalid if tree is empty.
    pub fn iter_first(&self) -> Cursor<'_, K, V> {
        let at = self.root.map(|root| self.nodes.minimum(root));
        Cursor::new(&self.nodes, at)
    }

    /// Return a cursor at the last node, invalid if tree is empty.
    pub fn iter_last(&self) -> Cursor<'_, K, V> {
        let at = self.root.map(|root| self.nodes.maximum(root));
        Cursor::new(&self.nodes, at)
    }

    /// Return a cursor at handle, invalid if handle is stale.
    pub fn cursor(&self, handle: Handle) -> Cursor<'_, K, V> {
        Cursor::new(&self.nodes, self.nodes.resolve(handle))
    }

    /// Mutable flavor of [RbTree::iter_first].
    pub fn iter_first_mut(&mut self) -> CursorMut<'_, K, V> {
        let at = self.root.map(|root| self.nodes.minimum(root));
        CursorMut::new(&mut self.nodes, at)
    }

    /// Mutable flavor of [RbTree::iter_last].
    pub fn iter_last_mut(&mut self) -> CursorMut<'_, K, V> {
        let at = self.root.map(|root| self.nodes.maximum(root));
        CursorMut::new(&mut self.nodes, at)
    }

    /// Mutable flavor of [RbTree::cursor].
    pub fn cursor_mut(&mut self, handle: Handle) -> CursorMut<'_, K, V> {
        let at = self.nodes.resolve(handle);
        CursorMut::new(&mut self.nodes, at)
    }

    /// Return an iterator over all entries in sorted order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        match self.root {
            Some(root) => {
                let front = self.nodes.minimum(root);
                let back = self.nodes.maximum(root);
                Iter::new(&self.nodes, Some((front, back)), self.n_count)
            }
            None => Iter::new(&self.nodes, None, 0),
        }
    }

    /// Visit entries in ascending order, until the end of the tree or
    /// until visitor returns false.
    pub fn traversal<F>(&self, mut visitor: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut x = self.root.map(|root| self.nodes.minimum(root));
        while let Some(index) = x {
            let node = &self.nodes[index];
            if !visitor(&node.key, &node.value) {
                break;
            }
            x = self.nodes.successor(index);
        }
    }

    #[allow(dead_code)]
    #[cfg(test)]
    pub(crate) fn pretty_print(&self)
    where
        K: fmt::Debug,
        V: fmt::Debug,
    {
        fn do_print<K, V>(nodes: &Nodes<K, V>, x: Option<usize>, mut prefix: String)
        where
            K: fmt::Debug,
            V: fmt::Debug,
        {
            if let Some(index) = x {
                let node = &nodes[index];
                match node.is_black() {
                    true => println!("{}(b)<{:?},{:?}>", prefix, node.key, node.value),
                    false => println!("{}(r)<{:?},{:?}>", prefix, node.key, node.value),
                }
                prefix.push_str("  ");
                do_print(nodes, node.left, prefix.clone());
                do_print(nodes, node.right, prefix);
            }
        }
        do_print(&self.nodes, self.root, "".to_string())
    }
}

//--------- rotation routines ----------------

impl<K, V, C> RbTree<K, V, C> {
    // Point the link that referred to `old`, under `parent`, to `new`.
    // A missing parent means `old` was the root.
    fn replace_child(&mut self, parent: Option<usize>, old: usize, new: Option<usize>) {
        match parent {
            None => self.root = new,
            Some(parent) if self.nodes[parent].left == Some(old) => {
                self.nodes[parent].left = new
            }
            Some(parent) => self.nodes[parent].right = new,
        }
    }

    // Rotate `x` down towards `dir`, its child on the opposite side takes
    // its place. Dir::Left is the classic left rotation:
    //
    //              (i)                       (i)
    //               |                         |
    //               x                         y
    //              / \                       / \
    //             /   \                     /   \
    //            /     \                   /     \
    //          left     y                 x       yr
    //                  / \               / \
    //                yl   yr          left  yl
    //
    pub(crate) fn rotate(&mut self, x: usize, dir: Dir) {
        let y = self.nodes.child_of(x, dir.flip());

        let inner = self.nodes[y].child(dir);
        self.nodes[x].set_child(dir.flip(), inner);
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(x);
        }

        let parent = self.nodes[x].parent;
        self.nodes[y].parent = parent;
        self.replace_child(parent, x, Some(y));

        self.nodes[y].set_child(dir, Some(x));
        self.nodes[x].parent = Some(y);
    }
}

//--------- fixup routines ----------------

impl<K, V, C> RbTree<K, V, C> {
    // Only a red parent can break property 4 after linking a red leaf.
    fn insert_fixup(&mut self, mut z: usize) {
        while let Some(parent) = self.nodes[z].parent.filter(|p| self.nodes[*p].is_red()) {
            // a red node is never the root, so grandparent exists.
            let grand = self.nodes.parent_of(parent);
            let side = self.nodes.side_of(grand, Some(parent));
            let uncle = self.nodes[grand].child(side.flip());

            if self.nodes.is_red(uncle) {
                // push the red up, black-height is unchanged.
                self.nodes[parent].set_black();
                if let Some(uncle) = uncle {
                    self.nodes[uncle].set_black();
                }
                self.nodes[grand].set_red();
                z = grand;
                continue;
            }

            if self.nodes[parent].child(side.flip()) == Some(z) {
                // inner grandchild, make it outer.
                z = parent;
                self.rotate(z, side);
            }

            let parent = self.nodes.parent_of(z);
            let grand = self.nodes.parent_of(parent);
            self.nodes[parent].set_black();
            self.nodes[grand].set_red();
            self.rotate(grand, side.flip());
        }

        if let Some(root) = self.root {
            self.nodes[root].set_black();
        }
    }

    // `x` carries an extra black, it may be a null link in which case
    // `parent` locates it.
    fn delete_fixup(&mut self, mut x: Option<usize>, mut parent: Option<usize>) {
        while x != self.root && self.nodes.is_black(x) {
            if let Some(index) = x {
                parent = self.nodes[index].parent;
            }
            let parent = match parent {
                Some(parent) => parent,
                None => break,
            };
            let side = self.nodes.side_of(parent, x);

            // sibling can't be null, its subtree has black-height >= 1.
            let mut w = self.nodes.child_of(parent, side.flip());
            if self.nodes[w].is_red() {
                self.nodes[w].set_black();
                self.nodes[parent].set_red();
                self.rotate(parent, side);
                w = self.nodes.child_of(parent, side.flip());
            }

            let near = self.nodes[w].child(side);
            let far = self.nodes[w].child(side.flip());
            if self.nodes.is_black(near) && self.nodes.is_black(far) {
                self.nodes[w].set_red();
                x = Some(parent);
                continue;
            }

            if self.nodes.is_black(far) {
                if let Some(near) = near {
                    self.nodes[near].set_black();
                }
                self.nodes[w].set_red();
                self.rotate(w, side.flip());
                w = self.nodes.child_of(parent, side.flip());
            }

            self.nodes[w].color = self.nodes[parent].color;
            self.nodes[parent].set_black();
            if let Some(far) = self.nodes[w].child(side.flip()) {
                self.nodes[far].set_black();
            }
            self.rotate(parent, side);
            x = self.root;
        }

        if let Some(x) = x {
            self.nodes[x].set_black();
        }
    }
}

impl<K, V, C> Extend<(K, V)> for RbTree<K, V, C>
where
    C: Compare<K>,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        iter.into_iter().for_each(|(key, value)| {
            self.insert(key, value);
        });
    }
}

impl<K, V, C> FromIterator<(K, V)> for RbTree<K, V, C>
where
    C: Compare<K> + Default,
{
    fn from_iter<I>(iter: I) -> RbTree<K, V, C>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut tree = RbTree::default();
        tree.extend(iter);
        tree
    }
}

impl<'a, K, V, C> IntoIterator for &'a RbTree<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V, C> fmt::Debug for RbTree<K, V, C>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
#[path = "rbtree_test.rs"]
mod rbtree_test;
