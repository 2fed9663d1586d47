//! Tree view synchronizer - keeps the outliner tree in step with the graph.
//!
//! One [`TrackedNode`] (and one tree item) exists per reachable, non-helper
//! node. Reconciliation consumes a walker [`Observation`]:
//!
//! 1. items of retained children under removed nodes are lifted to the top
//!    level, then removed nodes are disposed and their items dropped
//! 2. entries are visited in traversal order; new ones get an item at their
//!    sibling slot, retained ones are moved there if they are elsewhere
//!
//! Moving never recreates an item, so ids, expansion and selection survive
//! reorders and reparenting.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use log::{debug, trace};
use uuid::Uuid;

use super::walker::Observation;
use crate::core::DisposerList;
use crate::entities::{SceneNode, WeakNode};
use crate::widgets::outliner::{ItemId, TreeModel};

/// UI-side shadow of one live node.
#[derive(Debug)]
pub struct TrackedNode {
    node: WeakNode,
    uuid: Uuid,
    item: ItemId,
    children: Vec<Uuid>,
    disposers: DisposerList,
}

impl TrackedNode {
    pub fn node(&self) -> Option<SceneNode> {
        self.node.upgrade()
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn item(&self) -> ItemId {
        self.item
    }

    /// Tracked children, graph order.
    pub fn children(&self) -> &[Uuid] {
        &self.children
    }

    /// Released when the node leaves the tree. Folders bound to the node
    /// nest their own list here.
    pub fn disposers(&self) -> &DisposerList {
        &self.disposers
    }
}

/// What one reconciliation changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    pub added: Vec<Uuid>,
    pub removed: Vec<Uuid>,
    pub moved: Vec<Uuid>,
    pub relabeled: Vec<Uuid>,
    /// The selected item was removed
    pub selection_cleared: bool,
}

impl SyncReport {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.moved.is_empty() && self.relabeled.is_empty()
    }
}

/// Owner of the outliner tree and the tracked nodes.
#[derive(Debug, Default)]
pub struct TreeSync {
    tree: TreeModel,
    tracked: IndexMap<Uuid, TrackedNode>,
    by_item: HashMap<ItemId, Uuid>,
}

impl TreeSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tree(&self) -> &TreeModel {
        &self.tree
    }

    pub fn set_expand_new(&mut self, expand: bool) {
        self.tree.expand_new = expand;
    }

    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    pub fn tracked(&self, uuid: &Uuid) -> Option<&TrackedNode> {
        self.tracked.get(uuid)
    }

    pub fn item_of(&self, uuid: &Uuid) -> Option<ItemId> {
        self.tracked.get(uuid).map(|t| t.item)
    }

    pub fn uuid_of(&self, item: ItemId) -> Option<Uuid> {
        self.by_item.get(&item).copied()
    }

    pub fn node_of(&self, item: ItemId) -> Option<SceneNode> {
        self.tracked.get(self.by_item.get(&item)?)?.node()
    }

    pub fn selected(&self) -> Option<ItemId> {
        self.tree.selected()
    }

    /// Select the item of `uuid` (None clears). Returns the selected item.
    pub fn select(&mut self, uuid: Option<&Uuid>) -> Option<ItemId> {
        let item = uuid.and_then(|u| self.item_of(u));
        self.tree.select(item);
        self.tree.selected()
    }

    pub fn set_expanded(&mut self, item: ItemId, expanded: bool) -> bool {
        self.tree.set_expanded(item, expanded)
    }

    /// Apply an observation.
    pub fn reconcile(&mut self, obs: &Observation) -> SyncReport {
        let mut report = SyncReport::default();
        let had_selection = self.tree.selected().is_some();

        self.drop_removed(&obs.removed, &mut report);

        for t in self.tracked.values_mut() {
            t.children.clear();
        }

        let mut slots: HashMap<Option<ItemId>, usize> = HashMap::new();
        for entry in &obs.entries {
            let parent_item = entry.parent.and_then(|p| self.item_of(&p));
            let slot = slots.entry(parent_item).or_default();
            let index = *slot;
            *slot += 1;

            let label = entry.node.display_name();
            match self.tracked.get(&entry.uuid) {
                Some(t) => {
                    let item = t.item;
                    if self.tree.parent(item) != parent_item || self.tree.index_of(item) != Some(index) {
                        self.tree.move_item(item, parent_item, index);
                        report.moved.push(entry.uuid);
                    }
                    if self.tree.label(item) != Some(label.as_str()) {
                        self.tree.set_label(item, label);
                        report.relabeled.push(entry.uuid);
                    }
                }
                None => {
                    let Some(item) = self.tree.insert(parent_item, index, label) else {
                        debug!("tree sync: no parent item for {}", entry.uuid);
                        continue;
                    };
                    self.by_item.insert(item, entry.uuid);
                    self.tracked.insert(
                        entry.uuid,
                        TrackedNode {
                            node: entry.node.downgrade(),
                            uuid: entry.uuid,
                            item,
                            children: Vec::new(),
                            disposers: DisposerList::new(format!("tracked '{}'", entry.node.display_name())),
                        },
                    );
                    report.added.push(entry.uuid);
                }
            }
            if let Some(parent) = entry.parent.and_then(|p| self.tracked.get_mut(&p)) {
                parent.children.push(entry.uuid);
            }
        }

        report.selection_cleared = had_selection && self.tree.selected().is_none();
        if !report.is_empty() {
            trace!(
                "tree sync: +{} -{} ~{} ({} tracked)",
                report.added.len(),
                report.removed.len(),
                report.moved.len(),
                self.tracked.len()
            );
        }
        report
    }

    fn drop_removed(&mut self, removed: &[Uuid], report: &mut SyncReport) {
        let gone: HashSet<&Uuid> = removed.iter().collect();

        // Lift surviving children out before their old parent's item goes.
        for uuid in removed {
            let Some(t) = self.tracked.get(uuid) else {
                continue;
            };
            let survivors: Vec<ItemId> = self
                .tree
                .children(t.item)
                .iter()
                .copied()
                .filter(|c| self.by_item.get(c).is_some_and(|u| !gone.contains(u)))
                .collect();
            for child in survivors {
                let end = self.tree.roots().len();
                self.tree.move_item(child, None, end);
            }
        }

        for uuid in removed {
            let Some(t) = self.tracked.shift_remove(uuid) else {
                continue;
            };
            self.by_item.remove(&t.item);
            self.tree.remove(t.item);
            t.disposers.dispose();
            report.removed.push(*uuid);
        }
    }

    /// Dispose every tracked node and empty the tree.
    pub fn clear(&mut self) {
        for (_, t) in self.tracked.drain(..) {
            t.disposers.dispose();
        }
        self.by_item.clear();
        self.tree.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::SceneLibrary;
    use crate::inspect::walker::SceneWalker;

    fn labels(sync: &TreeSync) -> Vec<String> {
        let tree = sync.tree();
        tree.walk()
            .into_iter()
            .map(|(id, depth)| format!("{}{}", "-".repeat(depth), tree.label(id).unwrap_or("?")))
            .collect()
    }

    #[test]
    fn test_mirrors_graph() {
        let lib = SceneLibrary::new();
        let scene = lib.scene("scene");
        let a = lib.group("a");
        scene.add(&a);
        a.add(&lib.object3d("a1"));
        scene.add(&lib.object3d("b"));

        let mut walker = SceneWalker::new(&[scene.clone()]);
        let mut sync = TreeSync::new();
        let report = sync.reconcile(&walker.observe());
        assert_eq!(report.added.len(), 4);
        assert_eq!(labels(&sync), ["scene", "-a", "--a1", "-b"]);

        let t = sync.tracked(&a.uuid()).unwrap();
        assert_eq!(t.children().len(), 1);
    }

    #[test]
    fn test_reorder_and_reparent_keep_items() {
        let lib = SceneLibrary::new();
        let scene = lib.scene("scene");
        let a = lib.group("a");
        let b = lib.group("b");
        let x = lib.object3d("x");
        scene.add(&a);
        scene.add(&b);
        a.add(&x);

        let mut walker = SceneWalker::new(&[scene.clone()]);
        let mut sync = TreeSync::new();
        sync.reconcile(&walker.observe());
        let x_item = sync.item_of(&x.uuid()).unwrap();
        sync.set_expanded(x_item, false);
        sync.select(Some(&x.uuid()));

        scene.insert(0, &b);
        b.add(&x);
        let report = sync.reconcile(&walker.observe());
        assert!(report.added.is_empty() && report.removed.is_empty());
        assert_eq!(labels(&sync), ["scene", "-b", "--x", "-a"]);
        assert_eq!(sync.item_of(&x.uuid()), Some(x_item));
        assert_eq!(sync.selected(), Some(x_item));
        assert!(!sync.tree().is_expanded(x_item));
    }

    #[test]
    fn test_removed_parent_with_surviving_child() {
        let lib = SceneLibrary::new();
        let scene = lib.scene("scene");
        let p = lib.group("p");
        let c = lib.object3d("c");
        let gone = lib.object3d("gone");
        scene.add(&p);
        p.add(&c);
        p.add(&gone);

        let mut walker = SceneWalker::new(&[scene.clone()]);
        let mut sync = TreeSync::new();
        sync.reconcile(&walker.observe());
        let c_item = sync.item_of(&c.uuid()).unwrap();
        let p_list = sync.tracked(&p.uuid()).unwrap().disposers().clone();

        // c survives under scene, p and its other child leave
        scene.add(&c);
        scene.remove(&p);
        let report = sync.reconcile(&walker.observe());
        assert_eq!(report.removed.len(), 2);
        assert_eq!(sync.item_of(&c.uuid()), Some(c_item));
        assert_eq!(labels(&sync), ["scene", "-c"]);
        assert!(p_list.is_disposed());
        assert_eq!(sync.len(), 2);
    }

    #[test]
    fn test_rename_relabels() {
        let lib = SceneLibrary::new();
        let scene = lib.scene("scene");
        let a = lib.group("");
        scene.add(&a);
        let mut walker = SceneWalker::new(&[scene.clone()]);
        let mut sync = TreeSync::new();
        sync.reconcile(&walker.observe());
        assert_eq!(labels(&sync), ["scene", "-Group"]);
        a.set_name("Renamed");
        let report = sync.reconcile(&walker.observe());
        assert_eq!(report.relabeled, [a.uuid()]);
        assert_eq!(labels(&sync), ["scene", "-Renamed"]);
    }

    #[test]
    fn test_selection_cleared_on_removal() {
        let lib = SceneLibrary::new();
        let scene = lib.scene("scene");
        let a = lib.group("a");
        scene.add(&a);
        let mut walker = SceneWalker::new(&[scene.clone()]);
        let mut sync = TreeSync::new();
        sync.reconcile(&walker.observe());
        sync.select(Some(&a.uuid()));
        scene.remove(&a);
        let report = sync.reconcile(&walker.observe());
        assert!(report.selection_cleared);
        assert_eq!(sync.selected(), None);
    }

    #[test]
    fn test_clear_disposes_everything() {
        let lib = SceneLibrary::new();
        let scene = lib.scene("scene");
        scene.add(&lib.group("a"));
        let mut walker = SceneWalker::new(&[scene.clone()]);
        let mut sync = TreeSync::new();
        sync.reconcile(&walker.observe());
        let list = sync.tracked(&scene.uuid()).unwrap().disposers().clone();
        sync.clear();
        assert!(list.is_disposed());
        assert!(sync.tree().is_empty());
        assert!(sync.is_empty());
    }
}
