use crate::splay_tree::config::TraversalOrder;
use crate::splay_tree::tree;
use crate::splay_tree::{NodeId, Nodes};
use std::fmt::{self, Write};

pub fn nodes_in_order<T, U>(nodes: &Nodes<T, U>, root: NodeId) -> Vec<NodeId> {
    let mut ret = Vec::new();
    let mut stack = Vec::new();
    let mut curr = Some(root);
    loop {
        while let Some(id) = curr {
            stack.push(id);
            curr = nodes[id].left;
        }
        match stack.pop() {
            Some(id) => {
                ret.push(id);
                curr = nodes[id].right;
            },
            None => return ret,
        }
    }
}

pub fn nodes_reverse_order<T, U>(nodes: &Nodes<T, U>, root: NodeId) -> Vec<NodeId> {
    let mut ret = Vec::new();
    let mut stack = Vec::new();
    let mut curr = Some(root);
    loop {
        while let Some(id) = curr {
            stack.push(id);
            curr = nodes[id].right;
        }
        match stack.pop() {
            Some(id) => {
                ret.push(id);
                curr = nodes[id].left;
            },
            None => return ret,
        }
    }
}

pub fn nodes_pre_order<T, U>(nodes: &Nodes<T, U>, root: NodeId) -> Vec<NodeId> {
    let mut ret = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        ret.push(id);
        stack.extend(nodes[id].right);
        stack.extend(nodes[id].left);
    }
    ret
}

pub fn nodes_post_order<T, U>(nodes: &Nodes<T, U>, root: NodeId) -> Vec<NodeId> {
    // node, right, left reversed is left, right, node
    let mut ret = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        ret.push(id);
        stack.extend(nodes[id].left);
        stack.extend(nodes[id].right);
    }
    ret.reverse();
    ret
}

pub fn collect_nodes<T, U>(
    nodes: &Nodes<T, U>,
    root: NodeId,
    order: TraversalOrder,
) -> Vec<NodeId> {
    match order {
        TraversalOrder::InOrder => nodes_in_order(nodes, root),
        TraversalOrder::ReverseOrder => nodes_reverse_order(nodes, root),
        TraversalOrder::PreOrder => nodes_pre_order(nodes, root),
        TraversalOrder::PostOrder => nodes_post_order(nodes, root),
    }
}

/// Every value of the subtree, each node's values kept together in insertion order.
pub fn collect_values<'a, T, U>(
    nodes: &'a Nodes<T, U>,
    root: NodeId,
    order: TraversalOrder,
) -> Vec<&'a U> {
    collect_nodes(nodes, root, order)
        .into_iter()
        .flat_map(move |id| nodes[id].values.iter())
        .collect()
}

/// Walks the subtree in key order through successor links, stopping after its rightmost node.
fn for_each_in_order<T, U, F>(nodes: &Nodes<T, U>, root: NodeId, mut f: F) -> fmt::Result
where
    F: FnMut(NodeId, bool) -> fmt::Result,
{
    let last = tree::rightmost(nodes, root);
    let mut curr = tree::leftmost(nodes, root);
    loop {
        f(curr, curr == last)?;
        if curr == last {
            return Ok(());
        }
        curr = tree::successor(nodes, curr)
            .expect("Expected a successor before the rightmost node.");
    }
}

/// `key: v1, v2; key: v1` for every node in key order.
pub fn to_sequenced_string<T, U>(nodes: &Nodes<T, U>, root: NodeId) -> String
where
    T: fmt::Display,
    U: fmt::Display,
{
    let mut ret = String::new();
    for_each_in_order(nodes, root, |id, is_last| {
        write!(ret, "{}", nodes[id])?;
        if !is_last {
            ret.push_str("; ");
        }
        Ok(())
    })
    .expect("Expected writing to a `String` to succeed.");
    ret
}

pub fn keys_to_sequenced_string<T, U>(nodes: &Nodes<T, U>, root: NodeId) -> String
where
    T: fmt::Display,
{
    let mut ret = String::new();
    for_each_in_order(nodes, root, |id, is_last| {
        write!(ret, "{}", nodes[id].key)?;
        if !is_last {
            ret.push_str(", ");
        }
        Ok(())
    })
    .expect("Expected writing to a `String` to succeed.");
    ret
}

pub fn values_to_sequenced_string<T, U>(nodes: &Nodes<T, U>, root: NodeId) -> String
where
    U: fmt::Display,
{
    let mut ret = String::new();
    for_each_in_order(nodes, root, |id, is_last| {
        for (index, value) in nodes[id].values.iter().enumerate() {
            if index > 0 {
                ret.push_str(", ");
            }
            write!(ret, "{}", value)?;
        }
        if !is_last {
            ret.push_str("; ");
        }
        Ok(())
    })
    .expect("Expected writing to a `String` to succeed.");
    ret
}

/// One line per node in pre-order. Each line carries the path from the subtree root as a prefix
/// of `L ` and `R ` steps after the caller's `prefix`.
pub fn to_branched_string<T, U>(nodes: &Nodes<T, U>, root: NodeId, prefix: &str) -> String
where
    T: fmt::Display,
    U: fmt::Display,
{
    let mut lines = Vec::new();
    let mut stack = vec![(root, prefix.to_string())];
    while let Some((id, path)) = stack.pop() {
        lines.push(format!("{}{}", path, nodes[id]));
        if let Some(right) = nodes[id].right {
            stack.push((right, format!("{}R ", path)));
        }
        if let Some(left) = nodes[id].left {
            stack.push((left, format!("{}L ", path)));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::splay_tree::node::Node;

    //       d
    //     b   e
    //    a c
    fn build() -> (Nodes<char, u32>, NodeId) {
        let mut nodes = Arena::new(16);
        let root = nodes.allocate(Node::new('d', 4));
        for &(key, value) in &[('b', 2), ('e', 5), ('a', 1), ('c', 3), ('c', 33)] {
            tree::insert(&mut nodes, root, key, value).unwrap();
        }
        (nodes, root)
    }

    fn keys(nodes: &Nodes<char, u32>, ids: Vec<NodeId>) -> String {
        ids.into_iter().map(|id| nodes[id].key).collect()
    }

    #[test]
    fn test_node_orders() {
        let (nodes, root) = build();
        assert_eq!(keys(&nodes, nodes_in_order(&nodes, root)), "abcde");
        assert_eq!(keys(&nodes, nodes_reverse_order(&nodes, root)), "edcba");
        assert_eq!(keys(&nodes, nodes_pre_order(&nodes, root)), "dbace");
        assert_eq!(keys(&nodes, nodes_post_order(&nodes, root)), "acbed");
    }

    #[test]
    fn test_values_keep_node_values_together() {
        let (nodes, root) = build();
        assert_eq!(
            collect_values(&nodes, root, TraversalOrder::InOrder),
            vec![&1, &2, &3, &33, &4, &5],
        );
        assert_eq!(
            collect_values(&nodes, root, TraversalOrder::ReverseOrder),
            vec![&5, &4, &3, &33, &2, &1],
        );
        assert_eq!(
            collect_values(&nodes, root, TraversalOrder::PreOrder),
            vec![&4, &2, &1, &3, &33, &5],
        );
        assert_eq!(
            collect_values(&nodes, root, TraversalOrder::PostOrder),
            vec![&1, &3, &33, &2, &5, &4],
        );
    }

    #[test]
    fn test_sequenced_strings() {
        let (nodes, root) = build();
        assert_eq!(to_sequenced_string(&nodes, root), "a: 1; b: 2; c: 3, 33; d: 4; e: 5");
        assert_eq!(keys_to_sequenced_string(&nodes, root), "a, b, c, d, e");
        assert_eq!(values_to_sequenced_string(&nodes, root), "1; 2; 3, 33; 4; 5");
    }

    #[test]
    fn test_sequenced_string_of_inner_subtree() {
        let (nodes, root) = build();
        let b = nodes[root].left.unwrap();
        assert_eq!(keys_to_sequenced_string(&nodes, b), "a, b, c");
    }

    #[test]
    fn test_branched_string() {
        let (nodes, root) = build();
        assert_eq!(
            to_branched_string(&nodes, root, " "),
            " d: 4\n L b: 2\n L L a: 1\n L R c: 3, 33\n R e: 5",
        );
    }
}
