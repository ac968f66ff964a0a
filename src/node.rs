//! Module implement the link structure for [RbTree][crate::RbTree].
//!
//! Nodes are stored in slots owned by the tree. A node owns its children
//! through slot indices, its parent index is a back-link used only for
//! navigation and rebalancing.

use std::{fmt, mem, ops};

/// Color of a tree node. Missing children are implicit black leaves.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Color {
    Red,
    Black,
}

/// Handle to a node in a [RbTree][crate::RbTree].
///
/// Handles are cheap to copy and compare by identity, two handles are
/// equal only when they refer to the same node, even if the keys are
/// equal. A handle to a node that was removed from the tree, or cleared
/// away, no longer resolves and is treated as the null handle by every
/// api that accepts one.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct Handle {
    index: usize,
    generation: u64,
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Handle<{}@{}>", self.index, self.generation)
    }
}

/// Side of a parent node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Dir {
    Left,
    Right,
}

impl Dir {
    #[inline]
    pub(crate) fn flip(self) -> Dir {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// Node corresponds to a single entry in RbTree instance.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) color: Color,
    pub(crate) parent: Option<usize>, // navigation only, never owning
    pub(crate) left: Option<usize>,
    pub(crate) right: Option<usize>,
    generation: u64,
}

impl<K, V> Node<K, V> {
    #[inline]
    pub(crate) fn child(&self, dir: Dir) -> Option<usize> {
        match dir {
            Dir::Left => self.left,
            Dir::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, dir: Dir, child: Option<usize>) {
        match dir {
            Dir::Left => self.left = child,
            Dir::Right => self.right = child,
        }
    }

    #[inline]
    pub(crate) fn set_red(&mut self) {
        self.color = Color::Red
    }

    #[inline]
    pub(crate) fn set_black(&mut self) {
        self.color = Color::Black
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    #[inline]
    pub(crate) fn is_black(&self) -> bool {
        self.color == Color::Black
    }
}

/// Slot storage for tree nodes, with a free list of vacant slots.
///
/// Every node gets a fresh generation number when it is allocated,
/// generations are never reused, not even across `clear`.
#[derive(Clone)]
pub(crate) struct Nodes<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    next_generation: u64,
}

impl<K, V> Nodes<K, V> {
    pub(crate) fn new() -> Nodes<K, V> {
        Nodes {
            slots: Vec::default(),
            free: Vec::default(),
            next_generation: 0,
        }
    }

    /// Allocate a detached red node under `parent`.
    pub(crate) fn alloc(&mut self, key: K, value: V, parent: Option<usize>) -> usize {
        let generation = self.next_generation;
        self.next_generation += 1;

        let node = Node {
            key,
            value,
            color: Color::Red,
            parent,
            left: None,
            right: None,
            generation,
        };

        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                index
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    /// Release the slot at `index`, caller must have unlinked the node.
    pub(crate) fn release(&mut self, index: usize) -> Node<K, V> {
        match self.slots[index].take() {
            Some(node) => {
                self.free.push(index);
                node
            }
            None => panic!("release(): vacant slot {}, call the programmer", index),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    /// Return the slot index for handle, if it still refer to a live node.
    pub(crate) fn resolve(&self, handle: Handle) -> Option<usize> {
        match self.slots.get(handle.index) {
            Some(Some(node)) if node.generation == handle.generation => Some(handle.index),
            _ => None,
        }
    }

    pub(crate) fn to_handle(&self, index: usize) -> Handle {
        Handle {
            index,
            generation: self[index].generation,
        }
    }

    /// Swap key and value between the node at `index` and the detached
    /// `node`, links and color stay in place.
    pub(crate) fn swap_entry(&mut self, index: usize, node: &mut Node<K, V>) {
        let target = &mut self[index];
        mem::swap(&mut target.key, &mut node.key);
        mem::swap(&mut target.value, &mut node.value);
    }

    #[inline]
    pub(crate) fn is_red(&self, index: Option<usize>) -> bool {
        index.map_or(false, |i| self[i].is_red())
    }

    #[inline]
    pub(crate) fn is_black(&self, index: Option<usize>) -> bool {
        index.map_or(true, |i| self[i].is_black())
    }

    /// Parent of a node known to have one.
    pub(crate) fn parent_of(&self, index: usize) -> usize {
        match self[index].parent {
            Some(parent) => parent,
            None => panic!("parent_of(): orphan node {}, call the programmer", index),
        }
    }

    /// Child of a node known to have one on side `dir`.
    pub(crate) fn child_of(&self, index: usize, dir: Dir) -> usize {
        match self[index].child(dir) {
            Some(child) => child,
            None => panic!("child_of(): missing {:?} child, call the programmer", dir),
        }
    }

    /// Side on which `child` hangs under `parent`.
    #[inline]
    pub(crate) fn side_of(&self, parent: usize, child: Option<usize>) -> Dir {
        if self[parent].left == child {
            Dir::Left
        } else {
            Dir::Right
        }
    }
}

/// Navigation over the link structure, never touches colors.
impl<K, V> Nodes<K, V> {
    /// Walk towards `dir` until there is no child on that side.
    pub(crate) fn extreme(&self, mut index: usize, dir: Dir) -> usize {
        while let Some(child) = self[index].child(dir) {
            index = child;
        }
        index
    }

    #[inline]
    pub(crate) fn minimum(&self, index: usize) -> usize {
        self.extreme(index, Dir::Left)
    }

    #[inline]
    pub(crate) fn maximum(&self, index: usize) -> usize {
        self.extreme(index, Dir::Right)
    }

    /// Neighbour of `index` in sorted order, towards `dir`. Return None
    /// at the boundary of the sequence.
    pub(crate) fn step(&self, index: usize, dir: Dir) -> Option<usize> {
        if let Some(child) = self[index].child(dir) {
            return Some(self.extreme(child, dir.flip()));
        }

        let (mut x, mut y) = (index, self[index].parent);
        while let Some(parent) = y {
            if self[parent].child(dir) != Some(x) {
                break;
            }
            x = parent;
            y = self[parent].parent;
        }
        y
    }

    #[inline]
    pub(crate) fn successor(&self, index: usize) -> Option<usize> {
        self.step(index, Dir::Right)
    }

    #[inline]
    pub(crate) fn predecessor(&self, index: usize) -> Option<usize> {
        self.step(index, Dir::Left)
    }
}

impl<K, V> ops::Index<usize> for Nodes<K, V> {
    type Output = Node<K, V>;

    fn index(&self, index: usize) -> &Node<K, V> {
        match &self.slots[index] {
            Some(node) => node,
            None => panic!("index(): dangling link {}, call the programmer", index),
        }
    }
}

impl<K, V> ops::IndexMut<usize> for Nodes<K, V> {
    fn index_mut(&mut self, index: usize) -> &mut Node<K, V> {
        match &mut self.slots[index] {
            Some(node) => node,
            None => panic!("index_mut(): dangling link {}, call the programmer", index),
        }
    }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
