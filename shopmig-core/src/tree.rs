use crate::error::{MigrateError, Result};
use crate::model::CategoryNode;
use tracing::debug;

/// Builds the category tree from a flattened, depth-tagged pre-order sequence,
/// the shape the admin UI exposes when the category tree widget is unrolled.
///
/// The cursor path holds the position of the currently open node at every depth
/// seen so far. An item at depth 0 starts a new root and resets the path; an
/// item at depth d hangs off the open node at depth d-1. A depth that exceeds
/// the open path length means the scrape skipped a level and the sequence is
/// unusable.
pub fn build_category_tree(
    items: impl IntoIterator<Item = (usize, CategoryNode)>,
) -> Result<Vec<CategoryNode>> {
    let mut roots: Vec<CategoryNode> = Vec::new();
    let mut path: Vec<usize> = Vec::new();

    for (index, (depth, mut node)) in items.into_iter().enumerate() {
        node.children.clear();

        if depth > path.len() {
            return Err(MigrateError::Structural(format!(
                "item {} (source id {}) jumps to depth {} with only {} level(s) open",
                index,
                node.source_id,
                depth,
                path.len()
            )));
        }

        if depth == 0 {
            roots.push(node);
            path.clear();
            path.push(roots.len() - 1);
        } else {
            path.truncate(depth);
            let parent = node_at_mut(&mut roots, &path);
            parent.children.push(node);
            let slot = parent.children.len() - 1;
            path.push(slot);
        }
    }

    debug!(roots = roots.len(), "built category tree");
    Ok(roots)
}

/// Pre-order walk producing the depth-tagged sequence the builder consumes.
/// The inverse of [`build_category_tree`]: feeding the output back in
/// reconstructs the same tree, sibling order included.
pub fn flatten_category_tree(roots: &[CategoryNode]) -> Vec<(usize, &CategoryNode)> {
    let mut out = Vec::new();
    for root in roots {
        flatten_into(root, 0, &mut out);
    }
    out
}

fn flatten_into<'a>(node: &'a CategoryNode, depth: usize, out: &mut Vec<(usize, &'a CategoryNode)>) {
    out.push((depth, node));
    for child in &node.children {
        flatten_into(child, depth + 1, out);
    }
}

fn node_at_mut<'a>(roots: &'a mut [CategoryNode], path: &[usize]) -> &'a mut CategoryNode {
    let mut node = &mut roots[path[0]];
    for &slot in &path[1..] {
        node = &mut node.children[slot];
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(depth: usize, id: i64, title: &str) -> (usize, CategoryNode) {
        (depth, CategoryNode::new(id, title))
    }

    #[test]
    fn builds_siblings_under_shared_parent() {
        let tree = build_category_tree(vec![
            item(0, 1, "A"),
            item(1, 2, "B"),
            item(1, 3, "C"),
            item(0, 4, "D"),
        ])
        .unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].title, "A");
        assert_eq!(tree[0].children.len(), 2);
        assert_eq!(tree[0].children[0].title, "B");
        assert_eq!(tree[0].children[1].title, "C");
        assert_eq!(tree[1].title, "D");
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn builds_deep_chain_then_backtracks() {
        let tree = build_category_tree(vec![
            item(0, 1, "A"),
            item(1, 2, "B"),
            item(2, 3, "C"),
            item(3, 4, "D"),
            item(1, 5, "E"),
        ])
        .unwrap();

        assert_eq!(tree[0].children.len(), 2);
        assert_eq!(tree[0].children[0].children[0].children[0].title, "D");
        assert_eq!(tree[0].children[1].title, "E");
    }

    #[test]
    fn depth_gap_is_structural_error() {
        let err = build_category_tree(vec![item(0, 1, "A"), item(2, 2, "B")]).unwrap_err();
        assert!(matches!(err, MigrateError::Structural(_)));
    }

    #[test]
    fn leading_nonzero_depth_is_structural_error() {
        let err = build_category_tree(vec![item(1, 1, "A")]).unwrap_err();
        assert!(matches!(err, MigrateError::Structural(_)));
    }

    #[test]
    fn flatten_round_trips_the_input_sequence() {
        let input = vec![
            item(0, 1, "A"),
            item(1, 2, "B"),
            item(2, 3, "C"),
            item(1, 4, "D"),
            item(0, 5, "E"),
            item(1, 6, "F"),
        ];
        let tree = build_category_tree(input.clone()).unwrap();
        let flat: Vec<(usize, i64)> = flatten_category_tree(&tree)
            .into_iter()
            .map(|(d, n)| (d, n.source_id))
            .collect();
        let expected: Vec<(usize, i64)> =
            input.iter().map(|(d, n)| (*d, n.source_id)).collect();
        assert_eq!(flat, expected);
    }
}
