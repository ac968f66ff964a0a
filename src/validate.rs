//! Module implement the invariant checker for [RbTree].
//!
//! Properties 1 and 3 hold by construction, [Color] has two variants and
//! null links are black. The checker verifies properties 2, 4 and 5.
//!
//! [Color]: crate::Color

use compare::Compare;
use log::debug;

use std::{fmt, result};

use crate::{Error, RbTree, Result};

/// Red-black property violated by a tree, refer [RbTree::violation].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Property {
    /// Property 2, the root is black.
    RootBlack,
    /// Property 4, a red node has two black children.
    RedChildren,
    /// Property 5, same number of blacks on every path to a leaf.
    BlackHeight,
}

impl Property {
    /// Return the classic property number.
    pub fn to_number(&self) -> usize {
        match self {
            Property::RootBlack => 2,
            Property::RedChildren => 4,
            Property::BlackHeight => 5,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "property {}", self.to_number())
    }
}

impl<K, V, C> RbTree<K, V, C> {
    /// Verify the red-black properties and return the first violation,
    /// scanning bottom-up, left subtree before right subtree.
    pub fn violation(&self) -> Option<Property> {
        match self.black_height(self.root) {
            Ok(_) => None,
            Err(property) => {
                debug!("rbtree violate {}", property);
                Some(property)
            }
        }
    }

    /// Same as [RbTree::violation], reporting the violated property as
    /// [Error::InvalidTree].
    pub fn is_rb_tree(&self) -> Result<()> {
        match self.violation() {
            None => Ok(()),
            Some(property) => err_at!(InvalidTree, msg: "violate {}", property),
        }
    }

    // Return black-height of the subtree, counting the null leaf.
    fn black_height(&self, x: Option<usize>) -> result::Result<usize, Property> {
        let index = match x {
            Some(index) => index,
            None => return Ok(1),
        };

        let node = &self.nodes[index];
        if x == self.root && node.is_red() {
            return Err(Property::RootBlack);
        }

        let lblacks = self.black_height(node.left)?;
        let rblacks = self.black_height(node.right)?;
        if lblacks != rblacks {
            return Err(Property::BlackHeight);
        }

        match node.is_red() {
            true if self.nodes.is_red(node.left) || self.nodes.is_red(node.right) => {
                Err(Property::RedChildren)
            }
            true => Ok(lblacks),
            false => Ok(lblacks + 1),
        }
    }
}

impl<K, V, C> RbTree<K, V, C>
where
    C: Compare<K>,
{
    /// Validate tree with following rules:
    ///
    /// * Red-black properties, refer [RbTree::is_rb_tree].
    /// * Parent link of every child points back to its parent, and the
    ///   root has no parent.
    /// * Keys are in non-decreasing order under the comparator.
    /// * Number of reachable nodes match [RbTree::len].
    pub fn validate(&self) -> Result<()>
    where
        K: fmt::Debug,
    {
        self.is_rb_tree()?;

        if let Some(root) = self.root {
            if let Some(parent) = self.nodes[root].parent {
                return err_at!(Fatal, msg: "root {} has parent {}", root, parent);
            }
        }

        let n_count = self.validate_links(self.root)?;
        if n_count != self.n_count {
            return err_at!(Fatal, msg: "mismatch in count {} != {}", n_count, self.n_count);
        }

        let mut prev: Option<&K> = None;
        for (key, _) in self.iter() {
            if let Some(prev) = prev {
                if self.cmp().compares_gt(prev, key) {
                    return err_at!(Fatal, msg: "sort prev:{:?} key:{:?}", prev, key);
                }
            }
            prev = Some(key);
        }

        Ok(())
    }

    // Return number of nodes in subtree.
    fn validate_links(&self, x: Option<usize>) -> Result<usize> {
        let index = match x {
            Some(index) => index,
            None => return Ok(0),
        };

        let node = &self.nodes[index];
        for child in [node.left, node.right].iter().flatten() {
            if self.nodes[*child].parent != Some(index) {
                return err_at!(Fatal, msg: "broken parent link {} -> {}", child, index);
            }
        }

        let left = self.validate_links(node.left)?;
        let right = self.validate_links(node.right)?;
        Ok(left + right + 1)
    }
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod validate_test;
