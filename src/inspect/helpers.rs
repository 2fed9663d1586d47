//! Helper injector - transient visual aids attached to the live scene.
//!
//! A helper is a node built by the scene library, flagged as inspector
//! helper (so the walker never reports it) and attached as a child of the
//! inspected node while its toggle is on. Each toggle owns one
//! [`HelperSlot`]; the slot is closed by the folder's disposer list, after
//! which it never attaches anything again.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, trace};

use super::binder::Section;
use crate::entities::{SceneLibrary, SceneNode, WeakNode};
use crate::widgets::pane::InputHandle;

type HelperFactory = Box<dyn Fn(&SceneLibrary, &SceneNode) -> SceneNode>;

/// At most one helper object for one node.
pub struct HelperSlot {
    library: Rc<SceneLibrary>,
    node: WeakNode,
    make: HelperFactory,
    helper: RefCell<Option<SceneNode>>,
    closed: Cell<bool>,
}

impl HelperSlot {
    /// Attach the helper. No-op (false) if already attached, closed, or the
    /// node is gone.
    pub fn enable(&self) -> bool {
        if self.closed.get() || self.helper.borrow().is_some() {
            return false;
        }
        let Some(node) = self.node.upgrade() else {
            return false;
        };
        let helper = (self.make)(&self.library, &node);
        helper.set_inspector_helper(true);
        if !node.add(&helper) {
            return false;
        }
        trace!("helper '{}' attached to '{}'", helper.name(), node.display_name());
        *self.helper.borrow_mut() = Some(helper);
        true
    }

    /// Detach the helper if attached.
    pub fn disable(&self) -> bool {
        let Some(helper) = self.helper.borrow_mut().take() else {
            return false;
        };
        trace!("helper '{}' detached", helper.name());
        helper.remove_from_parent();
        true
    }

    pub fn set_enabled(&self, enabled: bool) -> bool {
        if enabled { self.enable() } else { self.disable() }
    }

    pub fn is_enabled(&self) -> bool {
        self.helper.borrow().is_some()
    }

    /// Detach and refuse any later `enable`.
    pub fn close(&self) {
        self.closed.set(true);
        self.disable();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    pub fn helper(&self) -> Option<SceneNode> {
        self.helper.borrow().clone()
    }
}

/// Creates helper slots from the injected library.
#[derive(Clone)]
pub struct HelperInjector {
    library: Rc<SceneLibrary>,
}

impl HelperInjector {
    pub fn new(library: Rc<SceneLibrary>) -> Self {
        Self { library }
    }

    pub fn library(&self) -> &Rc<SceneLibrary> {
        &self.library
    }

    pub fn slot(
        &self,
        node: &SceneNode,
        make: impl Fn(&SceneLibrary, &SceneNode) -> SceneNode + 'static,
    ) -> Rc<HelperSlot> {
        Rc::new(HelperSlot {
            library: Rc::clone(&self.library),
            node: node.downgrade(),
            make: Box::new(make),
            helper: RefCell::new(None),
            closed: Cell::new(false),
        })
    }

    /// Arrow along the node's forward axis.
    pub fn forward_slot(&self, node: &SceneNode) -> Rc<HelperSlot> {
        self.slot(node, |lib, _| lib.forward_helper())
    }

    /// Light visualisation.
    pub fn light_slot(&self, node: &SceneNode) -> Rc<HelperSlot> {
        self.slot(node, |lib, light| lib.light_helper(light))
    }

    /// Boolean input `key` on `section` driving `slot`. The slot is closed
    /// when the section's disposer list runs.
    pub fn attach_toggle(&self, section: &Section, key: &str, slot: Rc<HelperSlot>) -> InputHandle {
        let owned = Rc::clone(&slot);
        section.disposers().push(move || owned.close());
        let key_name = key.to_string();
        section.toggle(key, false, move |on| {
            if !slot.set_enabled(on) {
                debug!("helper toggle '{key_name}' -> {on}: no change");
            }
        })
    }
}

/// Number of inspector helpers in `root`'s subtree.
pub fn count_helpers(root: &SceneNode) -> usize {
    let mut count = 0;
    root.traverse(&mut |n| {
        if n.is_inspector_helper() {
            count += 1;
        }
    });
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DisposerList;
    use crate::entities::AttrValue;
    use crate::inspect::binder::{BindContext, NoTextures};
    use crate::widgets::pane::Pane;

    #[test]
    fn test_enable_disable_exactly_one() {
        let lib = Rc::new(SceneLibrary::new());
        let node = lib.object3d("n");
        let slot = HelperInjector::new(Rc::clone(&lib)).forward_slot(&node);

        assert!(slot.enable());
        assert!(!slot.enable());
        assert_eq!(node.child_count(), 1);
        let helper = slot.helper().unwrap();
        assert!(helper.is_inspector_helper());

        assert!(slot.disable());
        assert_eq!(node.child_count(), 0);
        assert!(helper.parent().is_none());
        assert!(!slot.disable());
    }

    #[test]
    fn test_closed_slot_never_attaches() {
        let lib = Rc::new(SceneLibrary::new());
        let node = lib.object3d("n");
        let slot = HelperInjector::new(Rc::clone(&lib)).light_slot(&node);
        slot.enable();
        slot.close();
        assert_eq!(node.child_count(), 0);
        assert!(!slot.enable());
        assert_eq!(node.child_count(), 0);
    }

    #[test]
    fn test_toggle_disposed_with_section() {
        let lib = Rc::new(SceneLibrary::new());
        let pane = Pane::new("p");
        let list = DisposerList::new("folder");
        let ctx = BindContext::new(Rc::clone(&lib), Rc::new(NoTextures));
        let section = Section::new(pane.add_folder("f"), list.clone(), ctx);
        let node = lib.object3d("n");
        let injector = HelperInjector::new(Rc::clone(&lib));
        let toggle = injector.attach_toggle(&section, "forwardHelper", injector.forward_slot(&node));

        toggle.edit(AttrValue::Bool(true));
        assert_eq!(count_helpers(&node), 1);
        list.dispose();
        assert_eq!(count_helpers(&node), 0);
        assert_eq!(node.child_count(), 0);
        assert_eq!(pane.widget_count(), 0);
    }
}
