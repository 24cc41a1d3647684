//! An ordered multi-map backed by a splay tree.
//!
//! Keys are kept in a binary search tree whose nodes hold every value inserted under their key,
//! oldest first. Recently inserted or looked-up keys are splayed to the root, and the whole tree
//! can be rebuilt to minimal height on demand.

pub mod arena;
pub mod splay_tree;

pub use crate::splay_tree::{
    Error, NodeId, NodeRef, Result, SplayConfig, SplayMultiMap, TraversalOrder,
};
