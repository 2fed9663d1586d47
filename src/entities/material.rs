//! Materials - shared surface descriptions referenced by mesh-like nodes.
//!
//! Several nodes may share one material, so it is its own shared handle with
//! its own properties and capability chain. `needs_update` mirrors the
//! "recompile before the change is visible" flag renderers expect; `version`
//! counts how often it was raised.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use uuid::Uuid;

use super::attrs::{AttrValue, Attrs};
use super::caps::Capabilities;
use super::traits::PropertyHost;

struct MaterialData {
    uuid: Uuid,
    name: String,
    caps: Capabilities,
    attrs: Attrs,
    needs_update: bool,
    version: u32,
}

/// Shared handle to a material.
#[derive(Clone)]
pub struct Material {
    data: Rc<RefCell<MaterialData>>,
}

/// Non-owning material handle, used by bindings.
#[derive(Clone, Default)]
pub struct WeakMaterial {
    data: Weak<RefCell<MaterialData>>,
}

impl Material {
    pub fn new(name: impl Into<String>, caps: Capabilities, attrs: Attrs) -> Self {
        Self {
            data: Rc::new(RefCell::new(MaterialData {
                uuid: Uuid::new_v4(),
                name: name.into(),
                caps,
                attrs,
                needs_update: false,
                version: 0,
            })),
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.data.borrow().uuid
    }

    pub fn name(&self) -> String {
        self.data.borrow().name.clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.data.borrow_mut().name = name.into();
    }

    pub fn kind(&self) -> String {
        self.data.borrow().caps.kind().to_string()
    }

    /// Folder title: "name (kind)", trimmed when the name is empty.
    pub fn title(&self) -> String {
        let data = self.data.borrow();
        format!("{} ({})", data.name, data.caps.kind()).trim().to_string()
    }

    pub fn has_cap(&self, cap: &str) -> bool {
        self.data.borrow().caps.has(cap)
    }

    pub fn has_any_cap(&self, caps: &[&str]) -> bool {
        self.data.borrow().caps.has_any(caps)
    }

    pub fn get_attr(&self, key: &str) -> Option<AttrValue> {
        self.data.borrow().attrs.get(key).cloned()
    }

    pub fn set_attr(&self, key: &str, value: AttrValue) {
        self.data.borrow_mut().attrs.set(key, value);
    }

    pub fn attrs(&self) -> Attrs {
        self.data.borrow().attrs.clone()
    }

    pub fn mark_needs_update(&self) {
        let mut data = self.data.borrow_mut();
        data.needs_update = true;
        data.version = data.version.wrapping_add(1);
    }

    pub fn needs_update(&self) -> bool {
        self.data.borrow().needs_update
    }

    pub fn take_needs_update(&self) -> bool {
        std::mem::take(&mut self.data.borrow_mut().needs_update)
    }

    pub fn version(&self) -> u32 {
        self.data.borrow().version
    }

    pub fn ptr_eq(&self, other: &Material) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    pub fn downgrade(&self) -> WeakMaterial {
        WeakMaterial {
            data: Rc::downgrade(&self.data),
        }
    }
}

impl fmt::Debug for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data.borrow();
        f.debug_struct("Material")
            .field("name", &data.name)
            .field("kind", &data.caps.kind())
            .field("version", &data.version)
            .finish()
    }
}

impl WeakMaterial {
    pub fn upgrade(&self) -> Option<Material> {
        self.data.upgrade().map(|data| Material { data })
    }
}

impl PropertyHost for WeakMaterial {
    fn get_attr(&self, key: &str) -> Option<AttrValue> {
        self.upgrade()?.get_attr(key)
    }

    fn set_attr(&self, key: &str, value: AttrValue) -> bool {
        match self.upgrade() {
            Some(material) => {
                material.set_attr(key, value);
                true
            }
            None => false,
        }
    }

    fn mark_needs_update(&self) {
        if let Some(material) = self.upgrade() {
            material.mark_needs_update();
        }
    }

    fn is_alive(&self) -> bool {
        self.data.strong_count() > 0
    }

    fn describe(&self) -> String {
        match self.upgrade() {
            Some(material) => material.title(),
            None => "<dropped material>".to_string(),
        }
    }
}
