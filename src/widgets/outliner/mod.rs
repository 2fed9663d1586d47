//! Outliner widget
//!
//! Scene hierarchy as a tree with stable item ids and single selection

mod outliner;
pub mod outliner_ui;

pub use outliner::{ItemId, TreeModel};
pub use outliner_ui::{OutlinerActions, render};
