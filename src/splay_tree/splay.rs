use crate::splay_tree::tree::{self, Side};
use crate::splay_tree::{NodeId, Nodes};
use log::trace;

/// Rotates left around `pivot`: its right child takes its place and `pivot` becomes that child's
/// left child. Returns the new apex.
pub fn rotate_left<T, U>(nodes: &mut Nodes<T, U>, pivot: NodeId) -> NodeId {
    let apex = nodes[pivot].right.expect("Expected right child node to be `Some`.");
    let slot = tree::attachment(nodes, pivot);
    let inner = nodes[apex].left;
    nodes[pivot].right = inner;
    if let Some(inner) = inner {
        nodes[inner].parent = Some(pivot);
    }
    tree::attach(nodes, slot, Some(apex));
    tree::attach(nodes, Some((apex, Side::Left)), Some(pivot));
    apex
}

/// Rotates right around `pivot`: its left child takes its place and `pivot` becomes that child's
/// right child. Returns the new apex.
pub fn rotate_right<T, U>(nodes: &mut Nodes<T, U>, pivot: NodeId) -> NodeId {
    let apex = nodes[pivot].left.expect("Expected left child node to be `Some`.");
    let slot = tree::attachment(nodes, pivot);
    let inner = nodes[apex].right;
    nodes[pivot].left = inner;
    if let Some(inner) = inner {
        nodes[inner].parent = Some(pivot);
    }
    tree::attach(nodes, slot, Some(apex));
    tree::attach(nodes, Some((apex, Side::Right)), Some(pivot));
    apex
}

/// Lifts `target` by rotating at `pivot`, which must be `target`'s parent.
fn lift<T, U>(nodes: &mut Nodes<T, U>, pivot: NodeId, target: NodeId) -> NodeId {
    if nodes[pivot].left == Some(target) {
        rotate_right(nodes, pivot)
    } else {
        rotate_left(nodes, pivot)
    }
}

/// Splays `target` to the top of the subtree rooted at `root` and returns `target`.
///
/// `target` must lie inside that subtree. The rebuilt subtree occupies the same slot in the
/// enclosing tree that `root` did.
pub fn splay<T, U>(nodes: &mut Nodes<T, U>, root: NodeId, target: NodeId) -> NodeId {
    let slot = tree::attachment(nodes, root);
    let mut root = root;
    let mut rotations = 0;

    while target != root {
        let parent = match nodes[target].parent {
            Some(parent) => parent,
            None => break,
        };

        // zig
        if parent == root {
            root = lift(nodes, parent, target);
            rotations += 1;
            continue;
        }

        let grandparent = nodes[parent]
            .parent
            .expect("Expected a node below the subtree root to have a grandparent.");
        let target_is_left = nodes[parent].left == Some(target);
        let parent_is_left = nodes[grandparent].left == Some(parent);

        let apex = if target_is_left == parent_is_left {
            // zig-zig
            lift(nodes, grandparent, parent);
            lift(nodes, parent, target)
        } else {
            // zig-zag
            lift(nodes, parent, target);
            lift(nodes, grandparent, target)
        };
        rotations += 2;
        if grandparent == root {
            root = apex;
        }
    }

    tree::attach(nodes, slot, Some(root));
    trace!("splayed node to subtree root after {} rotations", rotations);
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::splay_tree::node::Node;

    fn build(keys: &[u32]) -> (Nodes<u32, ()>, NodeId) {
        let mut nodes = Arena::new(16);
        let root = nodes.allocate(Node::new(keys[0], ()));
        for &key in &keys[1..] {
            tree::insert(&mut nodes, root, key, ()).unwrap();
        }
        (nodes, root)
    }

    fn find(nodes: &Nodes<u32, ()>, root: NodeId, key: u32) -> NodeId {
        tree::find_node(nodes, root, &key).unwrap().unwrap()
    }

    fn key_of(nodes: &Nodes<u32, ()>, id: Option<NodeId>) -> Option<u32> {
        id.map(|id| nodes[id].key)
    }

    #[test]
    fn test_rotate_left() {
        let (mut nodes, root) = build(&[2, 1, 4, 3, 5]);
        let apex = rotate_left(&mut nodes, root);
        assert_eq!(nodes[apex].key, 4);
        assert_eq!(nodes[apex].parent, None);
        assert_eq!(key_of(&nodes, nodes[apex].left), Some(2));
        assert_eq!(key_of(&nodes, nodes[root].right), Some(3));
        assert_eq!(nodes[find(&nodes, apex, 3)].parent, Some(root));
        assert!(tree::is_well_formed(&nodes, apex));
    }

    #[test]
    fn test_rotate_right_redirects_grandparent() {
        let (mut nodes, root) = build(&[1, 4, 3, 5, 2]);
        let four = nodes[root].right.unwrap();
        let apex = rotate_right(&mut nodes, four);
        assert_eq!(nodes[apex].key, 3);
        assert_eq!(nodes[root].right, Some(apex));
        assert_eq!(nodes[apex].parent, Some(root));
        assert_eq!(key_of(&nodes, nodes[four].left), None);
        assert!(tree::is_well_formed(&nodes, root));
    }

    #[test]
    fn test_zig() {
        let (mut nodes, root) = build(&[2, 1, 3]);
        let one = find(&nodes, root, 1);
        let new_root = splay(&mut nodes, root, one);
        assert_eq!(new_root, one);
        assert_eq!(key_of(&nodes, nodes[one].right), Some(2));
        assert!(tree::is_well_formed(&nodes, new_root));
    }

    #[test]
    fn test_zig_zig() {
        let (mut nodes, root) = build(&[3, 2, 1]);
        let one = find(&nodes, root, 1);
        let new_root = splay(&mut nodes, root, one);
        assert_eq!(new_root, one);
        let two = nodes[one].right.unwrap();
        assert_eq!(nodes[two].key, 2);
        assert_eq!(key_of(&nodes, nodes[two].right), Some(3));
        assert_eq!(tree::height(&nodes, new_root), 3);
        assert!(tree::is_well_formed(&nodes, new_root));
    }

    #[test]
    fn test_zig_zag() {
        let (mut nodes, root) = build(&[3, 1, 2]);
        let two = find(&nodes, root, 2);
        let new_root = splay(&mut nodes, root, two);
        assert_eq!(new_root, two);
        assert_eq!(key_of(&nodes, nodes[two].left), Some(1));
        assert_eq!(key_of(&nodes, nodes[two].right), Some(3));
        assert!(tree::is_well_formed(&nodes, new_root));
    }

    #[test]
    fn test_splay_deep_node() {
        let keys: Vec<u32> = (1..=32).collect();
        let (mut nodes, root) = build(&keys);
        let target = find(&nodes, root, 32);
        let new_root = splay(&mut nodes, root, target);
        assert_eq!(nodes[new_root].key, 32);
        assert_eq!(nodes[new_root].parent, None);
        assert!(tree::height(&nodes, new_root) < 32);
        assert_eq!(tree::size(&nodes, new_root), 32);
        assert!(tree::is_well_formed(&nodes, new_root));
    }

    #[test]
    fn test_splay_inner_subtree_stays_attached() {
        let (mut nodes, root) = build(&[10, 5, 15, 3, 7, 6, 8]);
        let five = find(&nodes, root, 5);
        let six = find(&nodes, root, 6);
        let new_subroot = splay(&mut nodes, five, six);
        assert_eq!(new_subroot, six);
        assert_eq!(nodes[root].left, Some(six));
        assert_eq!(nodes[six].parent, Some(root));
        assert_eq!(tree::size(&nodes, root), 7);
        assert!(tree::is_well_formed(&nodes, root));
    }

    #[test]
    fn test_splay_root_is_noop() {
        let (mut nodes, root) = build(&[2, 1, 3]);
        assert_eq!(splay(&mut nodes, root, root), root);
        assert_eq!(key_of(&nodes, nodes[root].left), Some(1));
    }
}
