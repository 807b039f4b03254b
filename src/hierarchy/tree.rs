use crate::canvas::Viewport;
use crate::errors::InspectorResult;
use crate::geometry::{self, PixelPoint, RectF};
use crate::hierarchy::hit_test::hit_test;
use crate::hierarchy::node::{NodeId, UiNode};
use crate::hierarchy::parser::parse;
use crate::hierarchy::search;

/// Owns the current hierarchy snapshot and the selected node.
#[derive(Debug, Default)]
pub struct Hierarchy {
    root: Option<UiNode>,
    selected: Option<NodeId>,
}

impl Hierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current tree. On a parse error the previous tree is
    /// discarded as well and the component is left empty.
    pub fn load(&mut self, text: &str) -> InspectorResult<&UiNode> {
        self.clear();
        match parse(text) {
            Ok(root) => {
                tracing::info!(nodes = root.node_count(), "hierarchy loaded");
                Ok(&*self.root.insert(root))
            }
            Err(e) => {
                tracing::warn!(error = %e, "hierarchy rejected");
                Err(e)
            }
        }
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.selected = None;
    }

    pub fn root(&self) -> Option<&UiNode> {
        self.root.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.root.is_some()
    }

    pub fn node_count(&self) -> usize {
        self.root.as_ref().map_or(0, UiNode::node_count)
    }

    pub fn hit_test(&self, p: PixelPoint) -> Option<&UiNode> {
        hit_test(self.root.as_ref()?, p)
    }

    pub fn find(&self, id: NodeId) -> Option<&UiNode> {
        search::find(self.root.as_ref()?, id)
    }

    pub fn search(&self, query: &str) -> Vec<&UiNode> {
        match &self.root {
            Some(root) => search::search(root, query),
            None => Vec::new(),
        }
    }

    pub fn path_to(&self, id: NodeId) -> Option<Vec<&UiNode>> {
        search::path_to(self.root.as_ref()?, id)
    }

    /// Selects a node by id. Returns `false` for ids outside this tree.
    pub fn select(&mut self, id: NodeId) -> bool {
        if self.find(id).is_none() {
            return false;
        }
        self.selected = Some(id);
        true
    }

    /// Hit-tests `p` and selects the result. A miss clears the selection.
    pub fn select_at(&mut self, p: PixelPoint) -> Option<&UiNode> {
        self.selected = self.hit_test(p).map(|n| n.id);
        self.selected()
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&UiNode> {
        self.find(self.selected?)
    }

    /// Display-space box of the selected node.
    pub fn highlight_rect(&self, viewport: &Viewport) -> Option<RectF> {
        let bounds = self.selected()?.bounds()?;
        Some(geometry::rect_to_display(bounds, viewport))
    }
}
