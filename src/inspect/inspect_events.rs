//! Events raised by the inspector on its bus.

use uuid::Uuid;

use crate::entities::SceneNode;

// === Selection ===

/// Selection moved to `node`, or was cleared (None). Clearing happens on
/// explicit deselect, on disable, and when the selected node leaves the graph.
#[derive(Clone, Debug)]
pub struct SelectionChangedEvent {
    pub node: Option<SceneNode>,
}

impl SelectionChangedEvent {
    pub fn uuid(&self) -> Option<Uuid> {
        self.node.as_ref().map(SceneNode::uuid)
    }
}

// === Tree ===

/// A reconciliation pass changed the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeReconciledEvent {
    pub added: usize,
    pub removed: usize,
    pub moved: usize,
    /// Tracked nodes after the pass
    pub total: usize,
}

// === Lifecycle ===

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InspectorToggledEvent {
    pub enabled: bool,
}
