//! Pane widget
//!
//! Retained folders/inputs/buttons with change listeners, drawn by egui

mod pane;
pub mod pane_ui;

pub use pane::{
    ButtonHandle, FolderHandle, InputHandle, InputOptions, InputView, ListenerId, Pane, WidgetHandle,
    WidgetId, WidgetKind,
};
pub use pane_ui::{PaneAction, PaneActions, render, show};
