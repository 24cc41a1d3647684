use serde_derive::{Deserialize, Serialize};

/// The order in which `SplayMultiMap::to_vec` and `SplayMultiMap::to_node_vec` visit nodes.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum TraversalOrder {
    /// Left subtree, node, right subtree. Keys come out ascending.
    InOrder,
    /// Right subtree, node, left subtree. Keys come out descending.
    ReverseOrder,
    /// Node, left subtree, right subtree.
    PreOrder,
    /// Left subtree, right subtree, node.
    PostOrder,
}

impl Default for TraversalOrder {
    fn default() -> Self {
        TraversalOrder::InOrder
    }
}

/// Per-map behaviour of a `SplayMultiMap`.
///
/// # Examples
///
/// ```
/// use splay_multimap::splay_tree::{SplayConfig, SplayMultiMap};
///
/// let config = SplayConfig::new()
///     .splay_after_insert(false)
///     .remove_empty_nodes(false);
/// let map: SplayMultiMap<u32, u32> = SplayMultiMap::with_config(config);
///
/// assert!(!map.config().splay_after_insert);
/// assert!(map.config().splay_after_search);
/// ```
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct SplayConfig {
    /// Splay the touched node to the root after every insertion.
    pub splay_after_insert: bool,
    /// Splay the found node to the root after every lookup.
    pub splay_after_search: bool,
    /// Remove a node once its last value has been removed.
    pub remove_empty_nodes: bool,
    /// Number of node slots per arena chunk.
    pub chunk_size: usize,
}

impl SplayConfig {
    /// Returns the default configuration: splay after insertions and lookups, prune empty nodes.
    pub fn new() -> Self {
        SplayConfig {
            splay_after_insert: true,
            splay_after_search: true,
            remove_empty_nodes: true,
            chunk_size: 1024,
        }
    }

    /// Sets both splay policies at once.
    pub fn splay(self, splay: bool) -> Self {
        SplayConfig {
            splay_after_insert: splay,
            splay_after_search: splay,
            ..self
        }
    }

    /// Sets whether an inserted key is splayed to the root.
    pub fn splay_after_insert(self, splay_after_insert: bool) -> Self {
        SplayConfig { splay_after_insert, ..self }
    }

    /// Sets whether a key found by a lookup is splayed to the root.
    pub fn splay_after_search(self, splay_after_search: bool) -> Self {
        SplayConfig { splay_after_search, ..self }
    }

    /// Sets whether a key is removed along with its last value. When turned off, emptied keys
    /// stay in the tree and render as their bare key.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_multimap::splay_tree::{SplayConfig, SplayMultiMap};
    ///
    /// let mut map = SplayMultiMap::with_config(SplayConfig::new().remove_empty_nodes(false));
    /// map.insert(1, 'a')?;
    /// map.remove_first_value(&1)?;
    ///
    /// assert_eq!(map.size(), 1);
    /// assert_eq!(map.to_sequenced_string(), "1");
    /// # Ok::<(), splay_multimap::splay_tree::Error>(())
    /// ```
    pub fn remove_empty_nodes(self, remove_empty_nodes: bool) -> Self {
        SplayConfig { remove_empty_nodes, ..self }
    }

    /// Sets the number of node slots the map's arena allocates at a time. Zero is treated as one.
    pub fn chunk_size(self, chunk_size: usize) -> Self {
        SplayConfig { chunk_size, ..self }
    }
}

impl Default for SplayConfig {
    fn default() -> Self {
        Self::new()
    }
}
