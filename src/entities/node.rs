//! Scene nodes - the live graph the inspector observes.
//!
//! A `SceneNode` is a shared handle (`Rc<RefCell<..>>`) to one entity of the
//! host's scene graph: identity, typed properties, ordered children, optional
//! material and a capability chain. Parents own their children; the parent
//! link is weak, so dropping a subtree from its parent frees it.
//!
//! The host application is the only structural mutator of this graph. The
//! inspector reads it, writes properties through bindings, and attaches its
//! own helper nodes (flagged with `set_inspector_helper`) which it always
//! removes again.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use log::warn;
use uuid::Uuid;

use super::attrs::{AttrValue, Attrs};
use super::caps::Capabilities;
use super::material::Material;
use super::traits::PropertyHost;

struct NodeData {
    uuid: Uuid,
    name: String,
    caps: Capabilities,
    attrs: Attrs,
    children: Vec<SceneNode>,
    parent: Weak<RefCell<NodeData>>,
    material: Option<Material>,
    /// Inspector-owned visual aid, skipped by the scene walker
    inspector_helper: bool,
    /// Set when a property change needs the renderer to rebuild derived state
    needs_update: bool,
}

/// Shared handle to a live scene node. Cloning shares the node.
#[derive(Clone)]
pub struct SceneNode {
    data: Rc<RefCell<NodeData>>,
}

/// Non-owning handle to a scene node.
#[derive(Clone, Default)]
pub struct WeakNode {
    data: Weak<RefCell<NodeData>>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, caps: Capabilities, attrs: Attrs) -> Self {
        Self {
            data: Rc::new(RefCell::new(NodeData {
                uuid: Uuid::new_v4(),
                name: name.into(),
                caps,
                attrs,
                children: Vec::new(),
                parent: Weak::new(),
                material: None,
                inspector_helper: false,
                needs_update: false,
            })),
        }
    }

    // --- Identity ---

    pub fn uuid(&self) -> Uuid {
        self.data.borrow().uuid
    }

    pub fn name(&self) -> String {
        self.data.borrow().name.clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.data.borrow_mut().name = name.into();
    }

    /// Most specific capability, e.g. "DirectionalLight".
    pub fn kind(&self) -> String {
        self.data.borrow().caps.kind().to_string()
    }

    /// Label for tree items: the name, or the kind if the name is empty.
    pub fn display_name(&self) -> String {
        let data = self.data.borrow();
        if data.name.trim().is_empty() {
            data.caps.kind().to_string()
        } else {
            data.name.clone()
        }
    }

    pub fn ptr_eq(&self, other: &SceneNode) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    pub fn downgrade(&self) -> WeakNode {
        WeakNode {
            data: Rc::downgrade(&self.data),
        }
    }

    // --- Capabilities ---

    pub fn has_cap(&self, cap: &str) -> bool {
        self.data.borrow().caps.has(cap)
    }

    pub fn has_any_cap(&self, caps: &[&str]) -> bool {
        self.data.borrow().caps.has_any(caps)
    }

    pub fn caps(&self) -> Capabilities {
        self.data.borrow().caps.clone()
    }

    pub fn add_cap(&self, cap: impl Into<String>) {
        self.data.borrow_mut().caps.add(cap);
    }

    // --- Properties ---

    pub fn get_attr(&self, key: &str) -> Option<AttrValue> {
        self.data.borrow().attrs.get(key).cloned()
    }

    pub fn set_attr(&self, key: &str, value: AttrValue) {
        self.data.borrow_mut().attrs.set(key, value);
    }

    /// Snapshot of all properties.
    pub fn attrs(&self) -> Attrs {
        self.data.borrow().attrs.clone()
    }

    pub fn with_attrs<R>(&self, f: impl FnOnce(&Attrs) -> R) -> R {
        f(&self.data.borrow().attrs)
    }

    pub fn material(&self) -> Option<Material> {
        self.data.borrow().material.clone()
    }

    pub fn set_material(&self, material: Option<Material>) {
        self.data.borrow_mut().material = material;
    }

    pub fn is_inspector_helper(&self) -> bool {
        self.data.borrow().inspector_helper
    }

    pub fn set_inspector_helper(&self, helper: bool) {
        self.data.borrow_mut().inspector_helper = helper;
    }

    pub fn mark_needs_update(&self) {
        self.data.borrow_mut().needs_update = true;
    }

    pub fn needs_update(&self) -> bool {
        self.data.borrow().needs_update
    }

    /// Read and clear the refresh flag (renderer side).
    pub fn take_needs_update(&self) -> bool {
        std::mem::take(&mut self.data.borrow_mut().needs_update)
    }

    // --- Hierarchy ---

    pub fn parent(&self) -> Option<SceneNode> {
        self.data
            .borrow()
            .parent
            .upgrade()
            .map(|data| SceneNode { data })
    }

    /// Snapshot of the ordered children (helpers included).
    pub fn children(&self) -> Vec<SceneNode> {
        self.data.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.data.borrow().children.len()
    }

    pub fn child(&self, index: usize) -> Option<SceneNode> {
        self.data.borrow().children.get(index).cloned()
    }

    pub fn index_of(&self, child: &SceneNode) -> Option<usize> {
        self.data
            .borrow()
            .children
            .iter()
            .position(|c| c.ptr_eq(child))
    }

    /// True if `self` is `other` or one of its ancestors.
    pub fn is_ancestor_of(&self, other: &SceneNode) -> bool {
        let mut cursor = Some(other.clone());
        while let Some(node) = cursor {
            if node.ptr_eq(self) {
                return true;
            }
            cursor = node.parent();
        }
        false
    }

    /// Append `child`, detaching it from its current parent first.
    ///
    /// Refuses (returns false) if that would create a cycle.
    pub fn add(&self, child: &SceneNode) -> bool {
        let len = self.child_count();
        self.insert(len, child)
    }

    /// Insert `child` at `index` (clamped), detaching it from its current
    /// parent first. Re-inserting an existing child moves it.
    pub fn insert(&self, index: usize, child: &SceneNode) -> bool {
        if child.is_ancestor_of(self) {
            warn!(
                "Refusing to add '{}' under '{}': would create a cycle",
                child.name(),
                self.name()
            );
            return false;
        }
        child.remove_from_parent();

        let mut data = self.data.borrow_mut();
        let index = index.min(data.children.len());
        data.children.insert(index, child.clone());
        drop(data);

        child.data.borrow_mut().parent = Rc::downgrade(&self.data);
        true
    }

    /// Detach `child`. Returns false if it was not a child of `self`.
    pub fn remove(&self, child: &SceneNode) -> bool {
        let removed = {
            let mut data = self.data.borrow_mut();
            match data.children.iter().position(|c| c.ptr_eq(child)) {
                Some(pos) => Some(data.children.remove(pos)),
                None => None,
            }
        };
        match removed {
            Some(node) => {
                node.data.borrow_mut().parent = Weak::new();
                true
            }
            None => false,
        }
    }

    /// Detach from the current parent, if any.
    pub fn remove_from_parent(&self) -> bool {
        match self.parent() {
            Some(parent) => parent.remove(self),
            None => false,
        }
    }

    /// Visit `self` and every descendant, parent before children.
    pub fn traverse(&self, f: &mut dyn FnMut(&SceneNode)) {
        f(self);
        for child in self.children() {
            child.traverse(f);
        }
    }

    /// Number of nodes in this subtree, helpers included.
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        self.traverse(&mut |_| count += 1);
        count
    }

    /// First node in this subtree with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<SceneNode> {
        let mut found = None;
        self.traverse(&mut |node| {
            if found.is_none() && node.data.borrow().name == name {
                found = Some(node.clone());
            }
        });
        found
    }
}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data.borrow();
        f.debug_struct("SceneNode")
            .field("name", &data.name)
            .field("kind", &data.caps.kind())
            .field("uuid", &data.uuid)
            .field("children", &data.children.len())
            .finish()
    }
}

impl WeakNode {
    pub fn upgrade(&self) -> Option<SceneNode> {
        self.data.upgrade().map(|data| SceneNode { data })
    }

    pub fn is_alive(&self) -> bool {
        self.data.strong_count() > 0
    }

    pub fn ptr_eq(&self, other: &WeakNode) -> bool {
        self.data.ptr_eq(&other.data)
    }
}

impl fmt::Debug for WeakNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(node) => write!(f, "WeakNode({})", node.name()),
            None => write!(f, "WeakNode(<dropped>)"),
        }
    }
}

impl PropertyHost for WeakNode {
    fn get_attr(&self, key: &str) -> Option<AttrValue> {
        self.upgrade()?.get_attr(key)
    }

    fn set_attr(&self, key: &str, value: AttrValue) -> bool {
        match self.upgrade() {
            Some(node) => {
                node.set_attr(key, value);
                true
            }
            None => false,
        }
    }

    fn mark_needs_update(&self) {
        if let Some(node) = self.upgrade() {
            node.mark_needs_update();
        }
    }

    fn is_alive(&self) -> bool {
        WeakNode::is_alive(self)
    }

    fn describe(&self) -> String {
        match self.upgrade() {
            Some(node) => format!("{} ({})", node.display_name(), node.kind()),
            None => "<dropped node>".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::caps;

    fn node(name: &str) -> SceneNode {
        SceneNode::new(name, Capabilities::new([caps::OBJECT3D]), Attrs::new())
    }

    #[test]
    fn test_add_sets_parent() {
        let root = node("root");
        let a = node("a");
        assert!(root.add(&a));
        assert_eq!(root.child_count(), 1);
        assert!(a.parent().is_some_and(|p| p.ptr_eq(&root)));
    }

    #[test]
    fn test_add_reparents() {
        let r1 = node("r1");
        let r2 = node("r2");
        let a = node("a");
        r1.add(&a);
        r2.add(&a);
        assert_eq!(r1.child_count(), 0);
        assert_eq!(r2.child_count(), 1);
        assert!(a.parent().is_some_and(|p| p.ptr_eq(&r2)));
    }

    #[test]
    fn test_insert_moves_within_parent() {
        let root = node("root");
        let (a, b, c) = (node("a"), node("b"), node("c"));
        root.add(&a);
        root.add(&b);
        root.add(&c);
        root.insert(0, &c);
        let names: Vec<String> = root.children().iter().map(|n| n.name()).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn test_cycle_refused() {
        let a = node("a");
        let b = node("b");
        a.add(&b);
        assert!(!b.add(&a));
        assert!(!a.add(&a));
        assert!(a.parent().is_none());
    }

    #[test]
    fn test_remove() {
        let root = node("root");
        let a = node("a");
        root.add(&a);
        assert!(root.remove(&a));
        assert!(!root.remove(&a));
        assert!(a.parent().is_none());
        assert!(!a.remove_from_parent());
    }

    #[test]
    fn test_weak_handle_does_not_own() {
        let weak = {
            let a = node("a");
            let w = a.downgrade();
            assert!(w.is_alive());
            w
        };
        assert!(!weak.is_alive());
        assert!(weak.get_attr("visible").is_none());
        assert!(!weak.set_attr("visible", AttrValue::Bool(false)));
    }

    #[test]
    fn test_property_host_roundtrip() {
        let a = node("a");
        let host = a.downgrade();
        assert!(host.set_attr("visible", AttrValue::Bool(false)));
        assert_eq!(a.get_attr("visible"), Some(AttrValue::Bool(false)));
        host.mark_needs_update();
        assert!(a.take_needs_update());
        assert!(!a.needs_update());
    }

    #[test]
    fn test_subtree_len_and_find() {
        let root = node("root");
        let a = node("a");
        let b = node("b");
        root.add(&a);
        a.add(&b);
        assert_eq!(root.subtree_len(), 3);
        assert!(root.find_by_name("b").is_some_and(|n| n.ptr_eq(&b)));
        assert!(root.find_by_name("zzz").is_none());
    }

    #[test]
    fn test_display_name_falls_back_to_kind() {
        let n = SceneNode::new("", Capabilities::new([caps::OBJECT3D, caps::MESH]), Attrs::new());
        assert_eq!(n.display_name(), "Mesh");
    }
}
