use crate::splay_tree::node::Node;
use crate::splay_tree::{compare, NodeId, Nodes, Result};
use std::borrow::Borrow;
use std::cmp::{self, Ordering};

/// Which child slot of its parent a node occupies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    Left,
    Right,
}

/// Returns the parent of `id` and the side it hangs from, or `None` for a subtree root.
pub fn attachment<T, U>(nodes: &Nodes<T, U>, id: NodeId) -> Option<(NodeId, Side)> {
    nodes[id].parent.map(|parent| {
        if nodes[parent].left == Some(id) {
            (parent, Side::Left)
        } else {
            (parent, Side::Right)
        }
    })
}

/// Points `parent`'s child slot on `side` at `child` and `child`'s parent link back at `parent`.
pub fn attach<T, U>(
    nodes: &mut Nodes<T, U>,
    parent: Option<(NodeId, Side)>,
    child: Option<NodeId>,
) {
    if let Some(child) = child {
        nodes[child].parent = parent.map(|(parent, _)| parent);
    }
    if let Some((parent, side)) = parent {
        match side {
            Side::Left => nodes[parent].left = child,
            Side::Right => nodes[parent].right = child,
        }
    }
}

pub fn leftmost<T, U>(nodes: &Nodes<T, U>, mut id: NodeId) -> NodeId {
    while let Some(left) = nodes[id].left {
        id = left;
    }
    id
}

pub fn rightmost<T, U>(nodes: &Nodes<T, U>, mut id: NodeId) -> NodeId {
    while let Some(right) = nodes[id].right {
        id = right;
    }
    id
}

pub fn successor<T, U>(nodes: &Nodes<T, U>, id: NodeId) -> Option<NodeId> {
    if let Some(right) = nodes[id].right {
        return Some(leftmost(nodes, right));
    }
    let mut curr = id;
    let mut parent = nodes[id].parent;
    while let Some(parent_id) = parent {
        if nodes[parent_id].right != Some(curr) {
            break;
        }
        curr = parent_id;
        parent = nodes[parent_id].parent;
    }
    parent
}

pub fn predecessor<T, U>(nodes: &Nodes<T, U>, id: NodeId) -> Option<NodeId> {
    if let Some(left) = nodes[id].left {
        return Some(rightmost(nodes, left));
    }
    let mut curr = id;
    let mut parent = nodes[id].parent;
    while let Some(parent_id) = parent {
        if nodes[parent_id].left != Some(curr) {
            break;
        }
        curr = parent_id;
        parent = nodes[parent_id].parent;
    }
    parent
}

/// Inserts `value` under `key` into the subtree rooted at `root`, appending to the existing node
/// when the key is already present. Returns the node holding the key.
pub fn insert<T, U>(nodes: &mut Nodes<T, U>, root: NodeId, key: T, value: U) -> Result<NodeId>
where
    T: PartialOrd,
{
    let mut curr = root;
    loop {
        let side = match compare(&key, &nodes[curr].key)? {
            Ordering::Less => match nodes[curr].left {
                Some(left) => {
                    curr = left;
                    continue;
                },
                None => Side::Left,
            },
            Ordering::Greater => match nodes[curr].right {
                Some(right) => {
                    curr = right;
                    continue;
                },
                None => Side::Right,
            },
            Ordering::Equal => {
                nodes[curr].push_value(value);
                return Ok(curr);
            },
        };
        let id = nodes.allocate(Node::new(key, value));
        attach(nodes, Some((curr, side)), Some(id));
        return Ok(id);
    }
}

pub fn find_node<T, U, V>(nodes: &Nodes<T, U>, root: NodeId, key: &V) -> Result<Option<NodeId>>
where
    T: Borrow<V>,
    V: PartialOrd + ?Sized,
{
    let mut curr = Some(root);
    while let Some(id) = curr {
        curr = match compare(key, nodes[id].key.borrow())? {
            Ordering::Less => nodes[id].left,
            Ordering::Greater => nodes[id].right,
            Ordering::Equal => return Ok(Some(id)),
        };
    }
    Ok(None)
}

/// Descends towards `key` for as long as a child exists on the indicated side and returns the
/// node where the descent stopped.
pub fn find_closest_node<T, U, V>(nodes: &Nodes<T, U>, root: NodeId, key: &V) -> Result<NodeId>
where
    T: Borrow<V>,
    V: PartialOrd + ?Sized,
{
    let mut curr = root;
    loop {
        let next = match compare(key, nodes[curr].key.borrow())? {
            Ordering::Less => nodes[curr].left,
            Ordering::Greater => nodes[curr].right,
            Ordering::Equal => None,
        };
        match next {
            Some(next) => curr = next,
            None => return Ok(curr),
        }
    }
}

/// Splices `id` out of its tree and returns the node now occupying its position.
///
/// A left child takes the removed node's place, and the right subtree, if any, is hung off the
/// rightmost node of that left subtree. Without a left child the right child is promoted as is.
/// The removed node is left in the arena with all of its links cleared.
pub fn remove<T, U>(nodes: &mut Nodes<T, U>, id: NodeId) -> Option<NodeId> {
    let slot = attachment(nodes, id);
    let (left, right) = (nodes[id].left, nodes[id].right);
    let replacement = match (left, right) {
        (Some(left), right) => {
            if let Some(right) = right {
                let graft_point = rightmost(nodes, left);
                attach(nodes, Some((graft_point, Side::Right)), Some(right));
            }
            Some(left)
        },
        (None, right) => right,
    };
    attach(nodes, slot, replacement);
    nodes[id].unlink();
    replacement
}

pub fn size<T, U>(nodes: &Nodes<T, U>, root: NodeId) -> usize {
    let mut stack = vec![root];
    let mut count = 0;
    while let Some(id) = stack.pop() {
        count += 1;
        stack.extend(nodes[id].left);
        stack.extend(nodes[id].right);
    }
    count
}

pub fn values_size<T, U>(nodes: &Nodes<T, U>, root: NodeId) -> usize {
    let mut stack = vec![root];
    let mut count = 0;
    while let Some(id) = stack.pop() {
        count += nodes[id].values.len();
        stack.extend(nodes[id].left);
        stack.extend(nodes[id].right);
    }
    count
}

pub fn height<T, U>(nodes: &Nodes<T, U>, root: NodeId) -> usize {
    let mut stack = vec![(root, 1)];
    let mut max_depth = 0;
    while let Some((id, depth)) = stack.pop() {
        max_depth = cmp::max(max_depth, depth);
        stack.extend(nodes[id].left.map(|left| (left, depth + 1)));
        stack.extend(nodes[id].right.map(|right| (right, depth + 1)));
    }
    max_depth
}

pub fn subtree_contains<T, U>(nodes: &Nodes<T, U>, root: NodeId, value: &U) -> bool
where
    U: PartialEq,
{
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if nodes[id].contains(value) {
            return true;
        }
        stack.extend(nodes[id].left);
        stack.extend(nodes[id].right);
    }
    false
}

pub fn clear_values<T, U>(nodes: &mut Nodes<T, U>, root: NodeId) {
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let node = &mut nodes[id];
        node.remove_all_values();
        stack.extend(node.left);
        stack.extend(node.right);
    }
}

/// Copies the subtree rooted at `root` into `target` and returns the handle of the copy's root.
pub fn clone_subtree<T, U>(nodes: &Nodes<T, U>, root: NodeId, target: &mut Nodes<T, U>) -> NodeId
where
    T: Clone,
    U: Clone,
{
    let copy_of = |target: &mut Nodes<T, U>, id: NodeId| {
        let node = &nodes[id];
        target.allocate(Node::with_values(node.key.clone(), node.values.clone()))
    };
    let new_root = copy_of(target, root);
    let mut stack = vec![(root, new_root)];
    while let Some((id, copy)) = stack.pop() {
        for &(child, side) in &[(nodes[id].left, Side::Left), (nodes[id].right, Side::Right)] {
            if let Some(child) = child {
                let child_copy = copy_of(target, child);
                attach(target, Some((copy, side)), Some(child_copy));
                stack.push((child, child_copy));
            }
        }
    }
    new_root
}

/// Checks ordering and link consistency of the subtree rooted at `root`.
#[cfg(test)]
pub fn is_well_formed<T, U>(nodes: &Nodes<T, U>, root: NodeId) -> bool
where
    T: PartialOrd,
{
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        for &child in &[nodes[id].left, nodes[id].right] {
            if let Some(child) = child {
                if nodes[child].parent != Some(id) {
                    return false;
                }
                stack.push(child);
            }
        }
    }
    let mut curr = Some(leftmost(nodes, root));
    let last = rightmost(nodes, root);
    while let Some(id) = curr {
        if id == last {
            break;
        }
        let next = successor(nodes, id);
        match next {
            Some(next) if nodes[id].key < nodes[next].key => curr = Some(next),
            _ => return false,
        }
    }
    true
}
