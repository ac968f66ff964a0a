//! Package implement an ordered, duplicate tolerant, key/value container
//! using a [red-black][wiki-rbtree] tree with parent links.
//!
//! [RbTree] is the building block for higher level adapters like ordered
//! maps, multi-maps, sets and priority structures:
//!
//! - Each entry in RbTree instance correspond to a {Key, Value} pair.
//! - Parametrised over `key-type`, `value-type` and a comparator.
//! - Duplicate keys are allowed, every insert adds a new entry.
//! - Entries are addressed by [Handle], obtained from insert, find or
//!   a cursor, and removed by handle.
//! - Lower-bound and upper-bound queries.
//! - Bidirectional cursors, [Cursor] and [CursorMut].
//! - Full table scan via [Iter], forward and reverse.
//! - Invariant checker, to verify the red-black properties.
//! - Not thread safe, callers must serialize writers.
//!
//! Constructing a new [RbTree] instance and CRUD operations:
//!
//! ```
//! use rbtree::RbTree;
//!
//! let mut index: RbTree<String, String> = RbTree::new();
//! assert_eq!(index.len(), 0);
//! assert_eq!(index.is_empty(), true);
//!
//! index.insert("key1".to_string(), "value1".to_string());
//! index.insert("key2".to_string(), "value2".to_string());
//! assert_eq!(index.len(), 2);
//!
//! let value = index.find(&"key1".to_string()).unwrap();
//! assert_eq!(value, "value1");
//!
//! let handle = index.find_node(&"key2".to_string()).unwrap();
//! let (key, value) = index.delete(handle).unwrap();
//! assert_eq!(key, "key2");
//! assert_eq!(value, "value2");
//! assert!(index.find(&"key2".to_string()).is_err());
//! ```
//!
//! Custom ordering, using a closure as comparator:
//!
//! ```
//! use rbtree::RbTree;
//!
//! let mut index = RbTree::with_cmp(|a: &u32, b: &u32| b.cmp(a));
//! index.insert(1, "a");
//! index.insert(3, "c");
//! index.insert(2, "b");
//!
//! let keys: Vec<u32> = index.iter().map(|(k, _)| *k).collect();
//! assert_eq!(keys, vec![3, 2, 1]);
//! ```
//!
//! Bound queries and cursors:
//!
//! ```
//! use rbtree::RbTree;
//!
//! let mut index: RbTree<u32, ()> = RbTree::new();
//! for key in [1, 3, 5, 7].iter() {
//!     index.insert(*key, ());
//! }
//!
//! let node = index.find_lower_bound_node(&2).unwrap();
//! assert_eq!(index.key(node), Some(&3));
//! let node = index.find_upper_bound_node(&5).unwrap();
//! assert_eq!(index.key(node), Some(&7));
//! assert!(index.find_upper_bound_node(&7).is_none());
//!
//! let mut cursor = index.iter_last();
//! let mut keys = vec![];
//! while cursor.is_valid() {
//!     keys.push(*cursor.key().unwrap());
//!     cursor.move_prev();
//! }
//! assert_eq!(keys, vec![7, 5, 3, 1]);
//! ```
//!
//! [wiki-rbtree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree

use std::{error, fmt, result};

// Short form to compose Error values, prefixed with the location.
//
// ```ignore
// use crate::Error;
// err_at!(KeyNotFound, msg: "missing key {}", key);
// ```
macro_rules! err_at {
    ($v:ident, msg: $($arg:expr),+) => {{
        let prefix = format!("{}:{}", file!(), line!());
        Err(Error::$v(prefix, format!($($arg),+)))
    }};
}

#[cfg(any(test, feature = "arbitrary"))]
mod fuzz;
mod iter;
mod node;
mod rbtree;
mod validate;

pub use crate::rbtree::RbTree;
pub use iter::{Cursor, CursorMut, Iter};
pub use node::{Color, Handle};
pub use validate::Property;

/// Error variants that are returned by this package's API.
///
/// Each variant carries a prefix, typically identifying the
/// error location.
pub enum Error {
    Fatal(String, String),
    KeyNotFound(String, String),
    InvalidTree(String, String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        use Error::*;

        match self {
            Fatal(p, msg) => write!(f, "{} Fatal: {}", p, msg),
            KeyNotFound(p, msg) => write!(f, "{} KeyNotFound: {}", p, msg),
            InvalidTree(p, msg) => write!(f, "{} InvalidTree: {}", p, msg),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        write!(f, "{}", self)
    }
}

impl error::Error for Error {}

/// Type alias for Result return type, used by this package.
pub type Result<T> = result::Result<T, Error>;
