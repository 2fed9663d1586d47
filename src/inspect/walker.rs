//! Scene walker - traversal of the live graph plus a structural diff against
//! the previous traversal.
//!
//! A walk is depth-first, parent before children, starting from each root in
//! order. Nodes flagged as inspector helpers are skipped together with their
//! subtrees, and a node reachable along two paths is reported once (first
//! path wins). Identity is the node uuid.
//!
//! Between passes the walker remembers uuids, placements and material
//! identities only; it never holds a strong reference to a node.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::trace;
use uuid::Uuid;

use crate::entities::{SceneNode, WeakNode};

/// One reachable node as seen by a walk.
#[derive(Debug, Clone)]
pub struct WalkEntry {
    pub node: SceneNode,
    pub uuid: Uuid,
    /// Parent identity, None for roots
    pub parent: Option<Uuid>,
    /// Position among the parent's non-helper children (or among the roots)
    pub index: usize,
    pub depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placement {
    parent: Option<Uuid>,
    index: usize,
    material: Option<Uuid>,
}

impl Placement {
    fn of(entry: &WalkEntry) -> Self {
        Self {
            parent: entry.parent,
            index: entry.index,
            material: entry.node.material().map(|m| m.uuid()),
        }
    }

    fn moved_from(&self, prev: &Placement) -> bool {
        self.parent != prev.parent || self.index != prev.index
    }
}

/// Lazy, finite traversal. Cloning restarts nothing: the clone continues
/// from the same point; call [`SceneWalker::walk`] for a fresh pass.
#[derive(Debug, Clone)]
pub struct Walk {
    stack: Vec<(SceneNode, Option<Uuid>, usize, usize)>,
    seen: HashSet<Uuid>,
}

impl Walk {
    fn new(roots: Vec<SceneNode>) -> Self {
        let roots: Vec<SceneNode> = roots.into_iter().filter(|r| !r.is_inspector_helper()).collect();
        let stack = roots
            .into_iter()
            .enumerate()
            .map(|(i, r)| (r, None, i, 0))
            .rev()
            .collect();
        Self {
            stack,
            seen: HashSet::new(),
        }
    }
}

impl Iterator for Walk {
    type Item = WalkEntry;

    fn next(&mut self) -> Option<WalkEntry> {
        while let Some((node, parent, index, depth)) = self.stack.pop() {
            let uuid = node.uuid();
            if !self.seen.insert(uuid) {
                continue;
            }
            let children: Vec<SceneNode> = node
                .children()
                .into_iter()
                .filter(|c| !c.is_inspector_helper())
                .collect();
            for (i, child) in children.into_iter().enumerate().rev() {
                self.stack.push((child, Some(uuid), i, depth + 1));
            }
            return Some(WalkEntry {
                node,
                uuid,
                parent,
                index,
                depth,
            });
        }
        None
    }
}

/// Result of one observation pass.
#[derive(Debug, Clone, Default)]
pub struct Observation {
    /// Reachable nodes in traversal order
    pub entries: Vec<WalkEntry>,
    /// Newly reachable identities, traversal order
    pub added: Vec<Uuid>,
    /// Identities reachable in both passes, traversal order
    pub retained: Vec<Uuid>,
    /// Retained identities whose parent or sibling index changed
    pub moved: Vec<Uuid>,
    /// Identities no longer reachable, previous traversal order
    pub removed: Vec<Uuid>,
    /// Retained identities whose material was replaced or cleared
    pub swapped: Vec<Uuid>,
}

impl Observation {
    /// Nothing structural happened since the previous pass.
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.moved.is_empty() && self.removed.is_empty() && self.swapped.is_empty()
    }
}

/// Observes a set of root nodes.
#[derive(Debug, Default)]
pub struct SceneWalker {
    roots: Vec<WeakNode>,
    previous: IndexMap<Uuid, Placement>,
}

impl SceneWalker {
    pub fn new(roots: &[SceneNode]) -> Self {
        Self {
            roots: roots.iter().map(SceneNode::downgrade).collect(),
            previous: IndexMap::new(),
        }
    }

    /// Replace the inspected roots. The previous pass is kept, so the next
    /// observation reports the difference.
    pub fn set_roots(&mut self, roots: &[SceneNode]) {
        self.roots = roots.iter().map(SceneNode::downgrade).collect();
    }

    pub fn add_root(&mut self, root: &SceneNode) {
        if !self.roots.iter().any(|r| r.ptr_eq(&root.downgrade())) {
            self.roots.push(root.downgrade());
        }
    }

    /// Live roots. Dropped roots are silently skipped.
    pub fn roots(&self) -> Vec<SceneNode> {
        self.roots.iter().filter_map(WeakNode::upgrade).collect()
    }

    /// Fresh traversal of the current graph.
    pub fn walk(&self) -> Walk {
        Walk::new(self.roots())
    }

    /// Whether `node` is currently reachable: some ancestor-or-self is a root
    /// and nothing on the way up is a helper.
    pub fn is_reachable(&self, node: &SceneNode) -> bool {
        let roots = self.roots();
        let mut cursor = Some(node.clone());
        while let Some(cur) = cursor {
            if cur.is_inspector_helper() {
                return false;
            }
            if roots.iter().any(|r| r.ptr_eq(&cur)) {
                return true;
            }
            cursor = cur.parent();
        }
        false
    }

    /// Walk the graph and classify identities against the previous pass.
    pub fn observe(&mut self) -> Observation {
        let mut obs = Observation::default();
        let mut current: IndexMap<Uuid, Placement> = IndexMap::new();

        for entry in self.walk() {
            let placement = Placement::of(&entry);
            match self.previous.get(&entry.uuid) {
                None => obs.added.push(entry.uuid),
                Some(prev) => {
                    obs.retained.push(entry.uuid);
                    if placement.moved_from(prev) {
                        obs.moved.push(entry.uuid);
                    }
                    if placement.material != prev.material {
                        obs.swapped.push(entry.uuid);
                    }
                }
            }
            current.insert(entry.uuid, placement);
            obs.entries.push(entry);
        }

        obs.removed = self
            .previous
            .keys()
            .filter(|uuid| !current.contains_key(*uuid))
            .copied()
            .collect();

        if !obs.is_unchanged() {
            trace!(
                "walker: {} reachable, +{} -{} ~{} swapped {}",
                obs.entries.len(),
                obs.added.len(),
                obs.removed.len(),
                obs.moved.len(),
                obs.swapped.len()
            );
        }
        self.previous = current;
        obs
    }

    /// Forget the previous pass; the next observation reports everything as added.
    pub fn reset(&mut self) {
        self.previous.clear();
    }

    /// Number of identities seen by the last pass.
    pub fn known_len(&self) -> usize {
        self.previous.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::SceneLibrary;

    fn names(walk: Walk) -> Vec<String> {
        walk.map(|e| e.node.name()).collect()
    }

    #[test]
    fn test_preorder_and_helpers_skipped() {
        let lib = SceneLibrary::new();
        let scene = lib.scene("scene");
        let a = lib.group("a");
        let b = lib.group("b");
        let a1 = lib.object3d("a1");
        scene.add(&a);
        scene.add(&b);
        a.add(&a1);
        let helper = lib.forward_helper();
        a.add(&helper);
        helper.add(&lib.object3d("under helper"));

        let walker = SceneWalker::new(&[scene.clone()]);
        assert_eq!(names(walker.walk()), ["scene", "a", "a1", "b"]);
        // restartable
        assert_eq!(walker.walk().count(), 4);
    }

    #[test]
    fn test_shared_reachability_visited_once() {
        let lib = SceneLibrary::new();
        let r1 = lib.group("r1");
        let r2 = lib.group("r2");
        r1.add(&r2);
        let walker = SceneWalker::new(&[r1.clone(), r2.clone()]);
        assert_eq!(names(walker.walk()), ["r1", "r2"]);
    }

    #[test]
    fn test_observe_classifies() {
        let lib = SceneLibrary::new();
        let scene = lib.scene("scene");
        let a = lib.group("a");
        let b = lib.group("b");
        scene.add(&a);
        scene.add(&b);

        let mut walker = SceneWalker::new(&[scene.clone()]);
        let first = walker.observe();
        assert_eq!(first.added.len(), 3);
        assert!(first.removed.is_empty());

        let unchanged = walker.observe();
        assert!(unchanged.is_unchanged());
        assert_eq!(unchanged.retained.len(), 3);

        let c = lib.group("c");
        scene.remove(&a);
        b.add(&c);
        let obs = walker.observe();
        assert_eq!(obs.added, [c.uuid()]);
        assert_eq!(obs.removed, [a.uuid()]);
        // b shifted from index 1 to 0
        assert_eq!(obs.moved, [b.uuid()]);
    }

    #[test]
    fn test_reparent_reported_as_moved() {
        let lib = SceneLibrary::new();
        let scene = lib.scene("scene");
        let a = lib.group("a");
        let b = lib.group("b");
        let x = lib.object3d("x");
        scene.add(&a);
        scene.add(&b);
        a.add(&x);

        let mut walker = SceneWalker::new(&[scene.clone()]);
        walker.observe();
        b.add(&x);
        let obs = walker.observe();
        assert!(obs.added.is_empty() && obs.removed.is_empty());
        assert_eq!(obs.moved, [x.uuid()]);
    }

    #[test]
    fn test_material_swap_reported() {
        let lib = SceneLibrary::new();
        let scene = lib.scene("scene");
        let floor = lib.mesh("floor", lib.mesh_standard_material("old"));
        scene.add(&floor);

        let mut walker = SceneWalker::new(&[scene.clone()]);
        walker.observe();
        floor.set_attr("visible", crate::entities::AttrValue::Bool(false));
        assert!(walker.observe().is_unchanged());

        floor.set_material(Some(lib.mesh_standard_material("new")));
        let obs = walker.observe();
        assert_eq!(obs.swapped, [floor.uuid()]);
        assert!(obs.moved.is_empty());
        assert!(!obs.is_unchanged());

        floor.set_material(None);
        assert_eq!(walker.observe().swapped, [floor.uuid()]);
        assert!(walker.observe().swapped.is_empty());
    }

    #[test]
    fn test_no_strong_refs_between_passes() {
        let lib = SceneLibrary::new();
        let scene = lib.scene("scene");
        let a = lib.group("a");
        scene.add(&a);
        let weak = a.downgrade();
        let mut walker = SceneWalker::new(&[scene.clone()]);
        walker.observe();
        scene.remove(&a);
        drop(a);
        assert!(!weak.is_alive());
        assert_eq!(walker.observe().removed.len(), 1);
    }

    #[test]
    fn test_reset_and_reachability() {
        let lib = SceneLibrary::new();
        let scene = lib.scene("scene");
        let a = lib.group("a");
        scene.add(&a);
        let mut walker = SceneWalker::new(&[scene.clone()]);
        walker.observe();
        walker.reset();
        assert_eq!(walker.observe().added.len(), 2);

        assert!(walker.is_reachable(&a));
        let detached = lib.group("detached");
        assert!(!walker.is_reachable(&detached));
        let helper = lib.forward_helper();
        a.add(&helper);
        assert!(!walker.is_reachable(&helper));
    }
}
