use crate::arena::Arena;
use crate::splay_tree::config::{SplayConfig, TraversalOrder};
use crate::splay_tree::node::{Node, NodeRef};
use crate::splay_tree::{check_key, rebuild, splay, traversal, tree};
use crate::splay_tree::{NodeId, Nodes, Result};
use log::debug;
use std::borrow::Borrow;
use std::collections::VecDeque;
use std::fmt;

/// An ordered multi-map implemented using a splay tree.
///
/// Every key maps to a list of values kept in insertion order, so the same key can be inserted
/// many times. After an insertion or a lookup the touched node can be "splayed" to the root of the
/// tree, which keeps recently used keys cheap to reach again. Both behaviours are controlled by the
/// map's [`SplayConfig`]. When splaying is turned off the tree can degrade into a list, and
/// [`optimize`](SplayMultiMap::optimize) rebuilds it into a tree of minimal height.
///
/// Operations that take a key return [`Error::IncomparableKey`](crate::splay_tree::Error) for keys
/// that have no place in the total order, such as `f64::NAN`, and leave the map untouched.
///
/// # Examples
///
/// ```
/// use splay_multimap::splay_tree::SplayMultiMap;
///
/// let mut map = SplayMultiMap::new();
/// map.insert("b", 2)?;
/// map.insert("a", 1)?;
/// map.insert("b", 3)?;
///
/// assert_eq!(map.size(), 2);
/// assert_eq!(map.values_size(), 3);
/// assert_eq!(map.find_first_value("b")?, Some(&2));
/// assert_eq!(map.find_last_value("b")?, Some(&3));
/// assert_eq!(map.to_sequenced_string(), "a: 1; b: 2, 3");
///
/// map.remove_first_value("b")?;
/// assert_eq!(map.find_values_size("b")?, 1);
/// # Ok::<(), splay_multimap::splay_tree::Error>(())
/// ```
pub struct SplayMultiMap<T, U> {
    nodes: Nodes<T, U>,
    root: Option<NodeId>,
    config: SplayConfig,
}

impl<T, U> SplayMultiMap<T, U> {
    /// Constructs a new, empty `SplayMultiMap<T, U>` with the default configuration.
    pub fn new() -> Self {
        Self::with_config(SplayConfig::new())
    }

    /// Constructs a new, empty `SplayMultiMap<T, U>` with a specific configuration.
    pub fn with_config(config: SplayConfig) -> Self {
        SplayMultiMap {
            nodes: Arena::new(config.chunk_size),
            root: None,
            config,
        }
    }

    /// Returns the configuration the map currently runs with.
    pub fn config(&self) -> &SplayConfig {
        &self.config
    }

    /// Sets whether the map splays after insertions and after lookups.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_multimap::splay_tree::SplayMultiMap;
    ///
    /// let mut map: SplayMultiMap<u32, u32> = SplayMultiMap::new();
    /// map.set_splay(false);
    /// map.insert_keys(vec![1, 2, 3])?;
    ///
    /// let one = map.find_node(&1)?;
    /// assert_eq!(map.root(), one);
    /// # Ok::<(), splay_multimap::splay_tree::Error>(())
    /// ```
    pub fn set_splay(&mut self, splay: bool) {
        self.config.splay_after_insert = splay;
        self.config.splay_after_search = splay;
    }

    /// Sets whether an inserted key is splayed to the root.
    pub fn set_splay_after_insert(&mut self, splay: bool) {
        self.config.splay_after_insert = splay;
    }

    /// Sets whether a key found by a lookup is splayed to the root. Removals never splay.
    pub fn set_splay_after_search(&mut self, splay: bool) {
        self.config.splay_after_search = splay;
    }

    /// Sets whether a key is removed once its last value is removed. Keys that are already empty
    /// stay in the tree until the next value removal targets them.
    pub fn set_remove_empty_nodes(&mut self, remove_empty_nodes: bool) {
        self.config.remove_empty_nodes = remove_empty_nodes;
    }

    /// Returns the handle of the root node, or `None` if the map is empty.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns a view of the node behind `id`, or `None` if the handle is stale.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, T, U>> {
        self.nodes.get(&id).map(|_| NodeRef::new(&self.nodes, id))
    }

    /// Returns the node with the smallest key.
    pub fn leftmost(&self) -> Option<NodeId> {
        self.root.map(|root| tree::leftmost(&self.nodes, root))
    }

    /// Returns the node with the largest key.
    pub fn rightmost(&self) -> Option<NodeId> {
        self.root.map(|root| tree::rightmost(&self.nodes, root))
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of keys in the map.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of values in the map, counting every value of every key.
    pub fn values_size(&self) -> usize {
        self.root.map_or(0, |root| tree::values_size(&self.nodes, root))
    }

    /// Returns the height of the tree. An empty map has height 0 and a single key height 1.
    pub fn height(&self) -> usize {
        self.root.map_or(0, |root| tree::height(&self.nodes, root))
    }

    /// Removes every key and value from the map.
    pub fn clear(&mut self) {
        debug!("clearing map of {} nodes", self.nodes.len());
        self.nodes.clear();
        self.root = None;
    }

    /// Empties the value list of every key without removing any key.
    pub fn clear_values(&mut self) {
        if let Some(root) = self.root {
            tree::clear_values(&mut self.nodes, root);
        }
    }

    /// Rebuilds the tree to minimal height and returns the new root. This visits every node and
    /// allocates a buffer of all handles, so it is meant to be called occasionally, for example
    /// after a batch of insertions with splaying turned off.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_multimap::splay_tree::{SplayConfig, SplayMultiMap};
    ///
    /// let mut map: SplayMultiMap<u32, u32> =
    ///     SplayMultiMap::with_config(SplayConfig::new().splay(false));
    /// map.insert_keys(0..8)?;
    /// assert_eq!(map.height(), 8);
    ///
    /// map.optimize();
    /// assert_eq!(map.height(), 4);
    /// # Ok::<(), splay_multimap::splay_tree::Error>(())
    /// ```
    pub fn optimize(&mut self) -> Option<NodeId> {
        if let Some(root) = self.root {
            self.root = Some(rebuild::rebuild(&mut self.nodes, root));
        }
        self.root
    }

    /// Splays the node behind `id` to the root of the tree. Stale handles are ignored.
    pub fn splay(&mut self, id: NodeId) {
        if let Some(root) = self.root {
            if self.nodes.get(&id).is_some() {
                self.root = Some(splay::splay(&mut self.nodes, root, id));
            }
        }
    }

    fn splay_if(&mut self, id: Option<NodeId>, policy: bool) {
        if let (Some(id), true) = (id, policy) {
            self.splay(id);
        }
    }

    /// Unlinks and frees a node, keeping `root` pointed at the top of the tree.
    fn splice(&mut self, id: NodeId) -> Option<NodeId> {
        let replacement = tree::remove(&mut self.nodes, id);
        if self.root == Some(id) {
            self.root = replacement;
        }
        self.nodes.free(&id);
        replacement
    }

    /// Removes a node that has run out of values, if the configuration asks for it.
    fn prune(&mut self, id: NodeId) -> Option<NodeId> {
        if self.config.remove_empty_nodes && self.nodes[id].values.is_empty() {
            self.splice(id)
        } else {
            Some(id)
        }
    }

    /// Checks if a value is bound to any key. Without a key every node has to be visited, so this
    /// runs in linear time.
    pub fn contains_value(&self, value: &U) -> bool
    where
        U: PartialEq,
    {
        self.root
            .map_or(false, |root| tree::subtree_contains(&self.nodes, root, value))
    }

    /// Returns every value in the map in the given traversal order. The values of one key are
    /// adjacent and oldest first.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_multimap::splay_tree::{SplayMultiMap, TraversalOrder};
    ///
    /// let mut map = SplayMultiMap::new();
    /// map.insert_multiple(vec![(2, 'b'), (1, 'a'), (2, 'c')])?;
    ///
    /// assert_eq!(map.to_vec(TraversalOrder::InOrder), vec![&'a', &'b', &'c']);
    /// assert_eq!(map.to_vec(TraversalOrder::ReverseOrder), vec![&'b', &'c', &'a']);
    /// # Ok::<(), splay_multimap::splay_tree::Error>(())
    /// ```
    pub fn to_vec(&self, order: TraversalOrder) -> Vec<&U> {
        match self.root {
            Some(root) => traversal::collect_values(&self.nodes, root, order),
            None => Vec::new(),
        }
    }

    /// Returns the handle of every node in the given traversal order.
    pub fn to_node_vec(&self, order: TraversalOrder) -> Vec<NodeId> {
        match self.root {
            Some(root) => traversal::collect_nodes(&self.nodes, root, order),
            None => Vec::new(),
        }
    }

    /// Returns an iterator over the nodes of the map in key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_multimap::splay_tree::SplayMultiMap;
    ///
    /// let mut map = SplayMultiMap::new();
    /// map.insert(3, "c")?;
    /// map.insert(1, "a")?;
    ///
    /// let keys: Vec<&u32> = map.iter().map(|node| node.key()).collect();
    /// assert_eq!(keys, vec![&1, &3]);
    /// # Ok::<(), splay_multimap::splay_tree::Error>(())
    /// ```
    pub fn iter(&self) -> Iter<'_, T, U> {
        Iter {
            nodes: &self.nodes,
            next: self.leftmost(),
            remaining: self.size(),
        }
    }

    /// Returns a deep copy of the subtree rooted at `id` as a new map with the same
    /// configuration, or `None` if the handle is stale.
    pub fn clone_subtree(&self, id: NodeId) -> Option<Self>
    where
        T: Clone,
        U: Clone,
    {
        self.nodes.get(&id)?;
        let mut nodes = Arena::new(self.config.chunk_size);
        let root = tree::clone_subtree(&self.nodes, id, &mut nodes);
        Some(SplayMultiMap {
            nodes,
            root: Some(root),
            config: self.config,
        })
    }

    /// Returns every node as `key: v1, v2`, joined by `; ` in key order.
    pub fn to_sequenced_string(&self) -> String
    where
        T: fmt::Display,
        U: fmt::Display,
    {
        self.root
            .map_or_else(String::new, |root| traversal::to_sequenced_string(&self.nodes, root))
    }

    /// Returns every key joined by `, ` in key order.
    pub fn keys_to_sequenced_string(&self) -> String
    where
        T: fmt::Display,
    {
        self.root.map_or_else(String::new, |root| {
            traversal::keys_to_sequenced_string(&self.nodes, root)
        })
    }

    /// Returns the values of every key joined by `, `, with keys separated by `; `.
    pub fn values_to_sequenced_string(&self) -> String
    where
        U: fmt::Display,
    {
        self.root.map_or_else(String::new, |root| {
            traversal::values_to_sequenced_string(&self.nodes, root)
        })
    }

    /// Returns the shape of the tree, one node per line. Every line starts with `prefix` followed
    /// by one `L ` or `R ` per step from the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_multimap::splay_tree::{SplayConfig, SplayMultiMap};
    ///
    /// let mut map = SplayMultiMap::with_config(SplayConfig::new().splay(false));
    /// map.insert_multiple(vec![(2, 'b'), (1, 'a'), (3, 'c')])?;
    ///
    /// assert_eq!(map.to_branched_string("> "), "> 2: b\n> L 1: a\n> R 3: c");
    /// # Ok::<(), splay_multimap::splay_tree::Error>(())
    /// ```
    pub fn to_branched_string(&self, prefix: &str) -> String
    where
        T: fmt::Display,
        U: fmt::Display,
    {
        self.root.map_or_else(String::new, |root| {
            traversal::to_branched_string(&self.nodes, root, prefix)
        })
    }
}

impl<T, U> SplayMultiMap<T, U>
where
    T: PartialOrd,
{
    /// Inserts a value under a key and returns the node holding the key. A key that is already
    /// present keeps its node and gets `value` appended to its values.
    pub fn insert(&mut self, key: T, value: U) -> Result<NodeId> {
        check_key(&key)?;
        let id = match self.root {
            Some(root) => tree::insert(&mut self.nodes, root, key, value)?,
            None => {
                let id = self.nodes.allocate(Node::new(key, value));
                self.root = Some(id);
                id
            },
        };
        let policy = self.config.splay_after_insert;
        self.splay_if(Some(id), policy);
        Ok(id)
    }

    /// Inserts key-value pairs one at a time. Stops at the first incomparable key, keeping the
    /// pairs inserted before it.
    pub fn insert_multiple<I>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (T, U)>,
    {
        for (key, value) in pairs {
            self.insert(key, value)?;
        }
        Ok(())
    }

    fn lookup<V>(&mut self, key: &V, splay: bool) -> Result<Option<NodeId>>
    where
        T: Borrow<V>,
        V: PartialOrd + ?Sized,
    {
        check_key(key)?;
        let id = match self.root {
            Some(root) => tree::find_node(&self.nodes, root, key)?,
            None => None,
        };
        self.splay_if(id, splay);
        Ok(id)
    }

    /// Returns the node holding `key`, or `None` if the key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_multimap::splay_tree::SplayMultiMap;
    ///
    /// let mut map: SplayMultiMap<u32, u32> = SplayMultiMap::new();
    /// map.insert_keys(vec![1, 2, 3])?;
    ///
    /// let id = map.find_node(&1)?.unwrap();
    /// assert_eq!(map.root(), Some(id));
    /// assert_eq!(map.find_node(&4)?, None);
    /// # Ok::<(), splay_multimap::splay_tree::Error>(())
    /// ```
    pub fn find_node<V>(&mut self, key: &V) -> Result<Option<NodeId>>
    where
        T: Borrow<V>,
        V: PartialOrd + ?Sized,
    {
        let splay = self.config.splay_after_search;
        self.lookup(key, splay)
    }

    /// Returns the node whose key is closest to `key` along its search path: the exact match if it
    /// exists, otherwise the last node visited before running out of children. Returns `None`
    /// only if the map is empty.
    pub fn find_closest_node<V>(&mut self, key: &V) -> Result<Option<NodeId>>
    where
        T: Borrow<V>,
        V: PartialOrd + ?Sized,
    {
        check_key(key)?;
        let id = match self.root {
            Some(root) => Some(tree::find_closest_node(&self.nodes, root, key)?),
            None => None,
        };
        let policy = self.config.splay_after_search;
        self.splay_if(id, policy);
        Ok(id)
    }

    /// Returns the oldest value bound to `key`.
    pub fn find_first_value<V>(&mut self, key: &V) -> Result<Option<&U>>
    where
        T: Borrow<V>,
        V: PartialOrd + ?Sized,
    {
        Ok(match self.find_node(key)? {
            Some(id) => self.nodes[id].first_value(),
            None => None,
        })
    }

    /// Returns the newest value bound to `key`.
    pub fn find_last_value<V>(&mut self, key: &V) -> Result<Option<&U>>
    where
        T: Borrow<V>,
        V: PartialOrd + ?Sized,
    {
        Ok(match self.find_node(key)? {
            Some(id) => self.nodes[id].last_value(),
            None => None,
        })
    }

    /// Returns every value bound to `key`, oldest first. A key whose values were all removed while
    /// empty nodes are retained yields an empty list.
    pub fn find_all_values<V>(&mut self, key: &V) -> Result<Option<&VecDeque<U>>>
    where
        T: Borrow<V>,
        V: PartialOrd + ?Sized,
    {
        Ok(match self.find_node(key)? {
            Some(id) => Some(&self.nodes[id].values),
            None => None,
        })
    }

    /// Returns the number of values bound to `key`, or 0 if the key does not exist.
    pub fn find_values_size<V>(&mut self, key: &V) -> Result<usize>
    where
        T: Borrow<V>,
        V: PartialOrd + ?Sized,
    {
        Ok(self.find_node(key)?.map_or(0, |id| self.nodes[id].values.len()))
    }

    /// Checks if `value` is bound to `key`.
    pub fn contains<V>(&mut self, key: &V, value: &U) -> Result<bool>
    where
        T: Borrow<V>,
        V: PartialOrd + ?Sized,
        U: PartialEq,
    {
        Ok(self
            .find_node(key)?
            .map_or(false, |id| self.nodes[id].contains(value)))
    }

    /// Checks if `key` exists in the map. Like every lookup, this splays the key to the root when
    /// the map splays after searches.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_multimap::splay_tree::SplayMultiMap;
    ///
    /// let mut map = SplayMultiMap::new();
    /// map.insert("a", 1)?;
    /// assert!(map.contains_key("a")?);
    /// assert!(!map.contains_key("b")?);
    /// # Ok::<(), splay_multimap::splay_tree::Error>(())
    /// ```
    pub fn contains_key<V>(&mut self, key: &V) -> Result<bool>
    where
        T: Borrow<V>,
        V: PartialOrd + ?Sized,
    {
        Ok(self.find_node(key)?.is_some())
    }

    /// Removes every copy of `value` bound to `key`. If that leaves the key without values and the
    /// map removes empty nodes, the key is removed too.
    ///
    /// Returns the node now in the key's position if the key was removed, the key's own node if it
    /// was kept, and `None` if the key does not exist or its removed node had no replacement.
    pub fn remove_value<V>(&mut self, key: &V, value: &U) -> Result<Option<NodeId>>
    where
        T: Borrow<V>,
        V: PartialOrd + ?Sized,
        U: PartialEq,
    {
        Ok(match self.lookup(key, false)? {
            Some(id) => {
                self.nodes[id].remove_value(value);
                self.prune(id)
            },
            None => None,
        })
    }

    /// Removes a key with all of its values and returns the node now in its position.
    ///
    /// The key's left child takes its place, and its right subtree is attached below the largest
    /// key of that left subtree. Without a left child, the right child takes its place.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_multimap::splay_tree::{SplayConfig, SplayMultiMap};
    ///
    /// let mut map: SplayMultiMap<u32, u32> =
    ///     SplayMultiMap::with_config(SplayConfig::new().splay(false));
    /// map.insert_keys(vec![2, 1, 3])?;
    ///
    /// let replacement = map.remove(&2)?.unwrap();
    /// assert_eq!(map.root(), Some(replacement));
    /// assert_eq!(map.to_branched_string(""), "1: 1\nR 3: 3");
    /// # Ok::<(), splay_multimap::splay_tree::Error>(())
    /// ```
    pub fn remove<V>(&mut self, key: &V) -> Result<Option<NodeId>>
    where
        T: Borrow<V>,
        V: PartialOrd + ?Sized,
    {
        Ok(match self.lookup(key, false)? {
            Some(id) => self.splice(id),
            None => None,
        })
    }

    /// Removes the oldest value bound to `key`, then behaves like
    /// [`remove_value`](SplayMultiMap::remove_value) if the key ran out of values.
    pub fn remove_first_value<V>(&mut self, key: &V) -> Result<Option<NodeId>>
    where
        T: Borrow<V>,
        V: PartialOrd + ?Sized,
    {
        Ok(match self.lookup(key, false)? {
            Some(id) => {
                self.nodes[id].remove_first_value();
                self.prune(id)
            },
            None => None,
        })
    }

    /// Removes the newest value bound to `key`, then behaves like
    /// [`remove_value`](SplayMultiMap::remove_value) if the key ran out of values.
    pub fn remove_last_value<V>(&mut self, key: &V) -> Result<Option<NodeId>>
    where
        T: Borrow<V>,
        V: PartialOrd + ?Sized,
    {
        Ok(match self.lookup(key, false)? {
            Some(id) => {
                self.nodes[id].remove_last_value();
                self.prune(id)
            },
            None => None,
        })
    }

    /// Removes every value bound to `key`. The emptied key is removed as well unless the map
    /// retains empty nodes. Returns `false` if the key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_multimap::splay_tree::SplayMultiMap;
    ///
    /// let mut map = SplayMultiMap::new();
    /// map.insert_multiple(vec![(1, 'a'), (1, 'b'), (2, 'c')])?;
    ///
    /// assert!(map.remove_all_values(&1)?);
    /// assert!(!map.contains_key(&1)?);
    /// assert_eq!(map.size(), 1);
    /// assert!(!map.remove_all_values(&1)?);
    /// # Ok::<(), splay_multimap::splay_tree::Error>(())
    /// ```
    pub fn remove_all_values<V>(&mut self, key: &V) -> Result<bool>
    where
        T: Borrow<V>,
        V: PartialOrd + ?Sized,
    {
        Ok(match self.lookup(key, false)? {
            Some(id) => {
                self.nodes[id].remove_all_values();
                self.prune(id);
                true
            },
            None => false,
        })
    }
}

impl<T> SplayMultiMap<T, T>
where
    T: PartialOrd + Clone,
{
    /// Inserts `key` bound to a copy of itself.
    pub fn insert_key(&mut self, key: T) -> Result<NodeId> {
        let value = key.clone();
        self.insert(key, value)
    }

    /// Inserts every key bound to a copy of itself, one at a time.
    pub fn insert_keys<I>(&mut self, keys: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        for key in keys {
            self.insert_key(key)?;
        }
        Ok(())
    }
}

impl<T, U> Clone for SplayMultiMap<T, U>
where
    T: Clone,
    U: Clone,
{
    fn clone(&self) -> Self {
        let mut nodes = Arena::new(self.config.chunk_size);
        let root = match self.root {
            Some(root) => Some(tree::clone_subtree(&self.nodes, root, &mut nodes)),
            None => None,
        };
        SplayMultiMap {
            nodes,
            root,
            config: self.config,
        }
    }
}

impl<T, U> Default for SplayMultiMap<T, U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, U> fmt::Display for SplayMultiMap<T, U>
where
    T: fmt::Display,
    U: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_sequenced_string())
    }
}

impl<T, U> fmt::Debug for SplayMultiMap<T, U>
where
    T: fmt::Debug,
    U: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|node| (node.key(), node.values())))
            .finish()
    }
}

impl<'a, T, U> IntoIterator for &'a SplayMultiMap<T, U>
where
    T: 'a,
    U: 'a,
{
    type IntoIter = Iter<'a, T, U>;
    type Item = NodeRef<'a, T, U>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator for `SplayMultiMap<T, U>`.
///
/// This iterator walks the nodes in key order by following successor links and yields a
/// `NodeRef` per key.
pub struct Iter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    nodes: &'a Nodes<T, U>,
    next: Option<NodeId>,
    remaining: usize,
}

impl<'a, T, U> Iterator for Iter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    type Item = NodeRef<'a, T, U>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = tree::successor(self.nodes, id);
        self.remaining -= 1;
        Some(NodeRef::new(self.nodes, id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, U> ExactSizeIterator for Iter<'a, T, U> {}
