//! Ordered multi-map backed by a splay tree: a self-adjusting binary search tree where recently
//! accessed keys move to the root.
//!
//! Every key is bound to a list of values kept in insertion order. Nodes live in an
//! [`Arena`](crate::arena::Arena) and link to each other through handles, so each node knows its
//! parent and in-order neighbours can be reached without auxiliary storage.

mod config;
mod map;
mod node;
mod rebuild;
mod splay;
mod traversal;
mod tree;

pub use self::config::{SplayConfig, TraversalOrder};
pub use self::map::{Iter, SplayMultiMap};
pub use self::node::NodeRef;

pub(crate) use self::node::Node;

use std::cmp::Ordering;
use std::error;
use std::fmt;
use std::result;

/// Stable address of a node inside a `SplayMultiMap`.
///
/// Handles are invalidated when their node is removed or the map is cleared.
pub type NodeId = crate::arena::Handle;

pub(crate) type Nodes<T, U> = crate::arena::Arena<Node<T, U>>;

/// Errors returned by key-taking operations.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// A key could not be placed in the total order, either because it does not compare equal to
    /// itself (like `f64::NAN`) or because it is incomparable with a key already in the tree.
    IncomparableKey,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::IncomparableKey => write!(f, "key has no defined order against the tree's keys"),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

pub(crate) fn compare<V>(a: &V, b: &V) -> Result<Ordering>
where
    V: PartialOrd + ?Sized,
{
    a.partial_cmp(b).ok_or(Error::IncomparableKey)
}

/// Rejects keys without a total order before they reach the tree.
pub(crate) fn check_key<V>(key: &V) -> Result<()>
where
    V: PartialOrd + ?Sized,
{
    match compare(key, key)? {
        Ordering::Equal => Ok(()),
        _ => Err(Error::IncomparableKey),
    }
}
