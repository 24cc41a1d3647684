use crate::splay_tree::traversal;
use crate::splay_tree::tree::{self, Side};
use crate::splay_tree::{NodeId, Nodes};
use log::{debug, log_enabled, Level};

/// Rebuilds the subtree rooted at `root` into a tree of minimal height and returns its new root.
///
/// The nodes are laid out in key order and the middle of every segment becomes the apex of that
/// segment, with the right half taking the extra node when the segment has an even length. The
/// new root takes the slot `root` occupied in the enclosing tree.
pub fn rebuild<T, U>(nodes: &mut Nodes<T, U>, root: NodeId) -> NodeId {
    let old_height = if log_enabled!(Level::Debug) {
        Some(tree::height(nodes, root))
    } else {
        None
    };

    let slot = tree::attachment(nodes, root);
    let sorted = traversal::nodes_in_order(nodes, root);
    for &id in &sorted {
        nodes[id].unlink();
    }

    let new_root = build(nodes, &sorted).expect("Expected a non-empty subtree.");
    tree::attach(nodes, slot, Some(new_root));

    if let Some(old_height) = old_height {
        debug!(
            "rebuilt subtree of {} nodes, height {} -> {}",
            sorted.len(),
            old_height,
            tree::height(nodes, new_root)
        );
    }
    new_root
}

/// Links `segment` into a balanced subtree and returns its root. Recursion depth is bounded by
/// the height of the result.
fn build<T, U>(nodes: &mut Nodes<T, U>, segment: &[NodeId]) -> Option<NodeId> {
    if segment.is_empty() {
        return None;
    }
    let middle = segment.len() / 2;
    let apex = segment[middle];
    let left = build(nodes, &segment[..middle]);
    let right = build(nodes, &segment[middle + 1..]);
    tree::attach(nodes, Some((apex, Side::Left)), left);
    tree::attach(nodes, Some((apex, Side::Right)), right);
    Some(apex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::splay_tree::node::Node;

    fn chain(len: u32) -> (Nodes<u32, u32>, NodeId) {
        let mut nodes = Arena::new(16);
        let root = nodes.allocate(Node::new(0, 0));
        for key in 1..len {
            tree::insert(&mut nodes, root, key, key).unwrap();
        }
        (nodes, root)
    }

    fn ceil_log2(value: usize) -> usize {
        let mut bits = 0;
        while (1 << bits) < value {
            bits += 1;
        }
        bits
    }

    #[test]
    fn test_rebuild_eight() {
        let (mut nodes, root) = chain(8);
        assert_eq!(tree::height(&nodes, root), 8);
        let new_root = rebuild(&mut nodes, root);
        assert_eq!(nodes[new_root].key, 4);
        assert_eq!(nodes[new_root].parent, None);
        assert_eq!(tree::height(&nodes, new_root), 4);
        assert_eq!(tree::size(&nodes, new_root), 8);
        assert!(tree::is_well_formed(&nodes, new_root));
    }

    #[test]
    fn test_rebuild_favours_right_half() {
        let (mut nodes, root) = chain(4);
        let new_root = rebuild(&mut nodes, root);
        // [0, 1, 2, 3] -> apex 2, left [0, 1] -> apex 1
        assert_eq!(nodes[new_root].key, 2);
        let left = nodes[new_root].left.unwrap();
        assert_eq!(nodes[left].key, 1);
        assert_eq!(nodes[nodes[left].left.unwrap()].key, 0);
        assert_eq!(nodes[nodes[new_root].right.unwrap()].key, 3);
    }

    #[test]
    fn test_rebuild_single_node() {
        let (mut nodes, root) = chain(1);
        assert_eq!(rebuild(&mut nodes, root), root);
        assert!(nodes[root].is_leaf());
    }

    #[test]
    fn test_rebuild_height_bound() {
        for len in 1..200 {
            let (mut nodes, root) = chain(len);
            let new_root = rebuild(&mut nodes, root);
            let height = tree::height(&nodes, new_root);
            assert!(height <= ceil_log2(len as usize + 1));
            assert!(tree::is_well_formed(&nodes, new_root));
        }
    }

    #[test]
    fn test_rebuild_inner_subtree_stays_attached() {
        let (mut nodes, root) = chain(6);
        let one = nodes[root].right.unwrap();
        let new_subroot = rebuild(&mut nodes, one);
        assert_eq!(nodes[root].right, Some(new_subroot));
        assert_eq!(nodes[new_subroot].parent, Some(root));
        assert_eq!(nodes[new_subroot].key, 3);
        assert_eq!(tree::height(&nodes, root), 4);
        assert!(tree::is_well_formed(&nodes, root));
    }
}
