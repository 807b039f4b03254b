//! Smallest-area hit-testing over a node tree.
//!
//! Assumes a child's bounds lie inside its parent's: a point outside a node
//! with geometry never reaches that node's children. Dumps where children
//! overflow their parents will miss those children.
use crate::geometry::PixelPoint;
use crate::hierarchy::node::UiNode;

/// Most specific node containing `p` (original-image space), if any.
pub fn hit_test(root: &UiNode, p: PixelPoint) -> Option<&UiNode> {
    best_match(root, p).map(|(node, _)| node)
}

/// Returns the matched node together with its bounds area.
pub fn best_match(node: &UiNode, p: PixelPoint) -> Option<(&UiNode, i64)> {
    match node.bounds() {
        None => smallest_child_match(node, p),
        Some(rect) if rect.contains(p) => {
            let own = (node, rect.area());
            match smallest_child_match(node, p) {
                Some(child) if child.1 < own.1 => Some(child),
                _ => Some(own),
            }
        }
        Some(_) => None,
    }
}

fn smallest_child_match(node: &UiNode, p: PixelPoint) -> Option<(&UiNode, i64)> {
    node.children
        .iter()
        .filter_map(|child| best_match(child, p))
        .fold(None, |best, candidate| match best {
            Some(b) if candidate.1 >= b.1 => Some(b),
            _ => Some(candidate),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn node(bounds: Option<&str>, children: Vec<UiNode>) -> UiNode {
        let mut props = BTreeMap::new();
        if let Some(b) = bounds {
            props.insert("bounds".to_string(), b.to_string());
        }
        UiNode::new("node", 0, props).with_children(children)
    }

    #[test]
    fn single_node_contains_interior_points() {
        let root = node(Some("[10,20][110,70]"), vec![]);
        for (x, y) in [(11, 21), (60, 45), (109, 69)] {
            let hit = hit_test(&root, PixelPoint::new(x, y)).unwrap();
            assert_eq!(hit.id, root.id);
        }
    }

    #[test]
    fn edges_are_inclusive() {
        let root = node(Some("[10,20][110,70]"), vec![]);
        assert!(hit_test(&root, PixelPoint::new(10, 20)).is_some());
        assert!(hit_test(&root, PixelPoint::new(110, 70)).is_some());
        assert!(hit_test(&root, PixelPoint::new(111, 70)).is_none());
    }

    #[test]
    fn child_is_more_specific_than_parent() {
        let child = node(Some("[10,10][30,30]"), vec![]);
        let child_id = child.id;
        let root = node(Some("[0,0][100,100]"), vec![child]);
        assert_eq!(hit_test(&root, PixelPoint::new(15, 15)).unwrap().id, child_id);
        assert_eq!(hit_test(&root, PixelPoint::new(50, 50)).unwrap().id, root.id);
    }

    #[test]
    fn miss_returns_none() {
        let root = node(
            Some("[0,0][100,100]"),
            vec![node(Some("[10,10][30,30]"), vec![])],
        );
        assert!(hit_test(&root, PixelPoint::new(150, 15)).is_none());
        assert!(hit_test(&root, PixelPoint::new(-1, 0)).is_none());
    }

    #[test]
    fn geometry_less_nodes_are_transparent() {
        let small = node(Some("[0,0][10,10]"), vec![]);
        let small_id = small.id;
        let big = node(Some("[0,0][50,50]"), vec![]);
        let root = node(None, vec![big, node(None, vec![small])]);
        assert_eq!(hit_test(&root, PixelPoint::new(5, 5)).unwrap().id, small_id);
        assert!(hit_test(&root, PixelPoint::new(60, 60)).is_none());
    }

    #[test]
    fn equal_area_keeps_first_in_document_order() {
        let first = node(Some("[0,0][20,20]"), vec![]);
        let first_id = first.id;
        let second = node(Some("[0,0][20,20]"), vec![]);
        let root = node(Some("[0,0][100,100]"), vec![first, second]);
        assert_eq!(hit_test(&root, PixelPoint::new(5, 5)).unwrap().id, first_id);
    }

    #[test]
    fn same_area_child_does_not_replace_parent() {
        let child = node(Some("[0,0][20,20]"), vec![]);
        let root = node(Some("[0,0][20,20]"), vec![child]);
        assert_eq!(hit_test(&root, PixelPoint::new(5, 5)).unwrap().id, root.id);
    }

    #[test]
    fn overflowing_child_is_missed() {
        let overflow = node(Some("[200,200][220,220]"), vec![]);
        let root = node(Some("[0,0][100,100]"), vec![overflow]);
        assert!(hit_test(&root, PixelPoint::new(210, 210)).is_none());
    }

    #[test]
    fn deepest_smallest_wins_across_levels() {
        let leaf = node(Some("[12,12][14,14]"), vec![]);
        let leaf_id = leaf.id;
        let mid = node(Some("[10,10][40,40]"), vec![leaf]);
        let sibling = node(Some("[0,0][60,60]"), vec![]);
        let root = node(Some("[0,0][100,100]"), vec![sibling, mid]);
        assert_eq!(hit_test(&root, PixelPoint::new(13, 13)).unwrap().id, leaf_id);
    }
}
