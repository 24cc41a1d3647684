use crate::splay_tree::{traversal, tree, NodeId, Nodes};
use std::collections::VecDeque;
use std::fmt;

/// A node of a splay tree: one key, every value inserted under it, and links to its neighbours.
pub struct Node<T, U> {
    pub key: T,
    pub values: VecDeque<U>,
    pub parent: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl<T, U> Node<T, U> {
    pub fn new(key: T, value: U) -> Self {
        let mut values = VecDeque::new();
        values.push_back(value);
        Node::with_values(key, values)
    }

    pub fn with_values(key: T, values: VecDeque<U>) -> Self {
        Node {
            key,
            values,
            parent: None,
            left: None,
            right: None,
        }
    }

    pub fn push_value(&mut self, value: U) {
        self.values.push_back(value);
    }

    /// Removes every value equal to `value` and returns how many were removed.
    pub fn remove_value(&mut self, value: &U) -> usize
    where
        U: PartialEq,
    {
        let before = self.values.len();
        self.values.retain(|current| current != value);
        before - self.values.len()
    }

    pub fn remove_first_value(&mut self) -> Option<U> {
        self.values.pop_front()
    }

    pub fn remove_last_value(&mut self) -> Option<U> {
        self.values.pop_back()
    }

    pub fn remove_all_values(&mut self) {
        self.values.clear();
    }

    pub fn first_value(&self) -> Option<&U> {
        self.values.front()
    }

    pub fn last_value(&self) -> Option<&U> {
        self.values.back()
    }

    pub fn contains(&self, value: &U) -> bool
    where
        U: PartialEq,
    {
        self.values.contains(value)
    }

    #[cfg(test)]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub(crate) fn unlink(&mut self) {
        self.parent = None;
        self.left = None;
        self.right = None;
    }
}

/// Renders as `key: v1, v2`, or just `key` when the node holds no values.
impl<T, U> fmt::Display for Node<T, U>
where
    T: fmt::Display,
    U: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.key)?;
        for (index, value) in self.values.iter().enumerate() {
            if index == 0 {
                write!(f, ": {}", value)?;
            } else {
                write!(f, ", {}", value)?;
            }
        }
        Ok(())
    }
}

/// A read-only view of a node inside a `SplayMultiMap`.
///
/// The view can walk to neighbouring nodes and compute aggregates over the subtree rooted at the
/// node. It borrows the map, so the map cannot be modified while a `NodeRef` is alive.
pub struct NodeRef<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    nodes: &'a Nodes<T, U>,
    id: NodeId,
}

impl<'a, T, U> Clone for NodeRef<'a, T, U> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T, U> Copy for NodeRef<'a, T, U> {}

impl<'a, T, U> NodeRef<'a, T, U> {
    pub(crate) fn new(nodes: &'a Nodes<T, U>, id: NodeId) -> Self {
        NodeRef { nodes, id }
    }

    fn node(&self) -> &'a Node<T, U> {
        &self.nodes[self.id]
    }

    fn view(&self, id: Option<NodeId>) -> Option<NodeRef<'a, T, U>> {
        id.map(|id| NodeRef::new(self.nodes, id))
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn key(&self) -> &'a T {
        &self.node().key
    }

    /// Returns the node's values, oldest first.
    pub fn values(&self) -> &'a VecDeque<U> {
        &self.node().values
    }

    pub fn first_value(&self) -> Option<&'a U> {
        self.node().first_value()
    }

    pub fn last_value(&self) -> Option<&'a U> {
        self.node().last_value()
    }

    /// Returns the number of values held by this node alone.
    pub fn values_len(&self) -> usize {
        self.node().values.len()
    }

    pub fn contains(&self, value: &U) -> bool
    where
        U: PartialEq,
    {
        self.node().contains(value)
    }

    pub fn parent(&self) -> Option<NodeRef<'a, T, U>> {
        self.view(self.node().parent)
    }

    pub fn left(&self) -> Option<NodeRef<'a, T, U>> {
        self.view(self.node().left)
    }

    pub fn right(&self) -> Option<NodeRef<'a, T, U>> {
        self.view(self.node().right)
    }

    /// Returns the node with the smallest key in this node's subtree.
    pub fn leftmost(&self) -> NodeRef<'a, T, U> {
        NodeRef::new(self.nodes, tree::leftmost(self.nodes, self.id))
    }

    /// Returns the node with the largest key in this node's subtree.
    pub fn rightmost(&self) -> NodeRef<'a, T, U> {
        NodeRef::new(self.nodes, tree::rightmost(self.nodes, self.id))
    }

    /// Returns the next node in key order across the whole tree.
    pub fn successor(&self) -> Option<NodeRef<'a, T, U>> {
        self.view(tree::successor(self.nodes, self.id))
    }

    /// Returns the previous node in key order across the whole tree.
    pub fn predecessor(&self) -> Option<NodeRef<'a, T, U>> {
        self.view(tree::predecessor(self.nodes, self.id))
    }

    /// Returns the number of nodes in this node's subtree.
    pub fn size(&self) -> usize {
        tree::size(self.nodes, self.id)
    }

    /// Returns the height of this node's subtree. A leaf has height 1.
    pub fn height(&self) -> usize {
        tree::height(self.nodes, self.id)
    }

    /// Returns the number of values held in this node's subtree.
    pub fn values_size(&self) -> usize {
        tree::values_size(self.nodes, self.id)
    }

    /// Returns `true` if any node of this subtree holds `value`.
    pub fn subtree_contains(&self, value: &U) -> bool
    where
        U: PartialEq,
    {
        tree::subtree_contains(self.nodes, self.id, value)
    }

    pub fn to_sequenced_string(&self) -> String
    where
        T: fmt::Display,
        U: fmt::Display,
    {
        traversal::to_sequenced_string(self.nodes, self.id)
    }

    pub fn to_branched_string(&self, prefix: &str) -> String
    where
        T: fmt::Display,
        U: fmt::Display,
    {
        traversal::to_branched_string(self.nodes, self.id, prefix)
    }
}

impl<'a, T, U> fmt::Display for NodeRef<'a, T, U>
where
    T: fmt::Display,
    U: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.node().fmt(f)
    }
}

impl<'a, T, U> fmt::Debug for NodeRef<'a, T, U>
where
    T: fmt::Debug,
    U: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", self.key())
            .field("values", self.values())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Node;

    #[test]
    fn test_values_are_fifo() {
        let mut node = Node::new("c", 3.0);
        node.push_value(3.5);
        node.push_value(4.0);
        assert_eq!(node.first_value(), Some(&3.0));
        assert_eq!(node.last_value(), Some(&4.0));
        assert_eq!(node.remove_first_value(), Some(3.0));
        assert_eq!(node.remove_last_value(), Some(4.0));
        assert_eq!(node.values, vec![3.5]);
    }

    #[test]
    fn test_remove_value_removes_every_copy() {
        let mut node = Node::new(1, 'x');
        node.push_value('y');
        node.push_value('x');
        assert_eq!(node.remove_value(&'x'), 2);
        assert_eq!(node.remove_value(&'z'), 0);
        assert!(node.contains(&'y'));
        assert!(!node.contains(&'x'));
    }

    #[test]
    fn test_display() {
        let mut node = Node::new("c", 3);
        assert_eq!(node.to_string(), "c: 3");
        node.push_value(4);
        assert_eq!(node.to_string(), "c: 3, 4");
        node.remove_all_values();
        assert_eq!(node.to_string(), "c");
    }

    #[test]
    fn test_is_leaf() {
        let node = Node::new(0, 0);
        assert!(node.is_leaf());
    }
}
