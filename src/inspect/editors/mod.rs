//! Built-in editor groups.
//!
//! Each submodule contributes dispatch rules for one capability family.
//! `register_defaults` appends them broad-first: object, lights, cameras,
//! material families, texture slots, then the rarely used material fields.

mod camera;
mod light;
mod material;
mod object;
mod texture;

use std::rc::Rc;

use super::binder::{FolderBuilder, Section};
use super::dispatch::DispatchTable;
use crate::entities::{SceneLibrary, SceneNode, WeakMaterial};

/// Append every built-in rule to `table`.
pub fn register_defaults(table: &mut DispatchTable, library: Rc<SceneLibrary>) {
    table.push(object::object_rule());

    for rule in light::rules() {
        table.push(rule);
    }
    for rule in camera::rules() {
        table.push(rule);
    }
    for rule in material::family_rules(&library) {
        table.push(rule);
    }
    for rule in texture::rules(&library) {
        table.push(rule);
    }
    table.push(material::advanced_rule());
}

/// True if the node's material carries any of `caps`.
fn material_has(node: &SceneNode, caps: &[&str]) -> bool {
    node.material().is_some_and(|m| m.has_any_cap(caps))
}

/// The shared "material" section and a handle to the material.
fn material_section(builder: &mut FolderBuilder) -> Option<(Section, WeakMaterial)> {
    let material = builder.node().material()?;
    let section = builder.section("material", &material.title());
    Some((section, material.downgrade()))
}
