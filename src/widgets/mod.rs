//! UI Widgets - retained models plus their egui renderers
//!
//! - `pane`: folders of typed inputs, separators and buttons
//! - `outliner`: the scene tree

pub mod outliner;
pub mod pane;
