use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::hierarchy::bounds::parse_bounds;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique node handle, only meaningful for addressing nodes in a UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    pub(crate) fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// uiautomator attributes in dump order.
pub const WELL_KNOWN_ATTRIBUTES: [&str; 17] = [
    "index",
    "text",
    "resource-id",
    "class",
    "package",
    "content-desc",
    "checkable",
    "checked",
    "clickable",
    "enabled",
    "focusable",
    "focused",
    "scrollable",
    "long-clickable",
    "password",
    "selected",
    "bounds",
];

/// One element of a hierarchy snapshot. Immutable once parsed.
#[derive(Debug, Clone, Serialize)]
pub struct UiNode {
    pub id: NodeId,
    pub tag: String,
    pub depth: usize,
    pub properties: BTreeMap<String, String>,
    pub children: Vec<UiNode>,
    #[serde(skip)]
    rect: Option<Rect>,
}

impl UiNode {
    pub fn new(tag: impl Into<String>, depth: usize, properties: BTreeMap<String, String>) -> Self {
        let rect = properties.get("bounds").and_then(|b| parse_bounds(b));
        Self {
            id: NodeId::next(),
            tag: tag.into(),
            depth,
            properties,
            children: Vec::new(),
            rect,
        }
    }

    pub fn with_children(mut self, children: Vec<UiNode>) -> Self {
        self.children = children;
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Parsed `bounds`; `None` when absent or malformed.
    pub fn bounds(&self) -> Option<Rect> {
        self.rect
    }

    pub fn text(&self) -> Option<&str> {
        self.property("text")
    }

    pub fn resource_id(&self) -> Option<&str> {
        self.property("resource-id")
    }

    pub fn class_name(&self) -> Option<&str> {
        self.property("class")
    }

    pub fn package(&self) -> Option<&str> {
        self.property("package")
    }

    pub fn content_desc(&self) -> Option<&str> {
        self.property("content-desc")
    }

    pub fn is_clickable(&self) -> bool {
        self.property("clickable") == Some("true")
    }

    /// Short label for a tree row, e.g. `node [ok_button] "OK"`.
    pub fn display_label(&self) -> String {
        let mut label = self.tag.clone();
        let res_id = self.resource_id().filter(|s| !s.is_empty());
        if let Some(res_id) = res_id {
            let short = res_id.rsplit('/').next().unwrap_or(res_id);
            label.push_str(&format!(" [{short}]"));
        }
        if let Some(text) = self.text().filter(|t| !t.is_empty() && t.chars().count() < 20) {
            label.push_str(&format!(" \"{text}\""));
        }
        if res_id.is_none() {
            if let Some(class) = self.class_name().filter(|c| !c.is_empty()) {
                let short = class.rsplit('.').next().unwrap_or(class);
                label.push_str(&format!(" ({short})"));
            }
        }
        label
    }

    /// Ordered key/value rows for a details panel.
    pub fn details(&self) -> Vec<(String, String)> {
        let mut rows = vec![("tag".to_string(), self.tag.clone())];
        for key in WELL_KNOWN_ATTRIBUTES {
            if let Some(value) = self.properties.get(key) {
                rows.push((key.to_string(), value.clone()));
            }
        }
        for (key, value) in &self.properties {
            if !WELL_KNOWN_ATTRIBUTES.contains(&key.as_str()) {
                rows.push((key.clone(), value.clone()));
            }
        }
        rows.push(("children-count".to_string(), self.children.len().to_string()));
        rows
    }

    /// Pre-order iterator over this node and all descendants.
    pub fn iter(&self) -> impl Iterator<Item = &UiNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    pub fn node_count(&self) -> usize {
        self.iter().count()
    }
}
