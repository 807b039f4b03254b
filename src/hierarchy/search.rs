use crate::hierarchy::node::{NodeId, UiNode};

const SEARCHED_ATTRIBUTES: [&str; 5] = ["resource-id", "text", "content-desc", "class", "package"];

/// Case-insensitive substring search in document order. A blank query
/// matches nothing.
pub fn search<'a>(root: &'a UiNode, query: &str) -> Vec<&'a UiNode> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    root.iter().filter(|node| matches(node, &needle)).collect()
}

fn matches(node: &UiNode, needle: &str) -> bool {
    node.tag.to_lowercase().contains(needle)
        || SEARCHED_ATTRIBUTES.iter().any(|key| {
            node.property(key)
                .is_some_and(|v| v.to_lowercase().contains(needle))
        })
}

pub fn find(root: &UiNode, id: NodeId) -> Option<&UiNode> {
    root.iter().find(|node| node.id == id)
}

/// Ancestors of `id`, root first, excluding the node itself. `None` when the
/// node is not in this tree.
pub fn path_to(root: &UiNode, id: NodeId) -> Option<Vec<&UiNode>> {
    if root.id == id {
        return Some(Vec::new());
    }
    root.children.iter().find_map(|child| {
        path_to(child, id).map(|mut tail| {
            tail.insert(0, root);
            tail
        })
    })
}
