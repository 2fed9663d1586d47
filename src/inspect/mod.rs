//! Scene inspection engine
//!
//! - `walker`: traversal and structural diff of the live graph
//! - `tree_sync`: outliner tree reconciliation
//! - `dispatch` + `editors`: which editors a node gets
//! - `binder`: folders of live bindings on the pane
//! - `helpers`: transient visual aids injected into the graph
//! - `inspector`: lifecycle owner tying it together

pub mod binder;
pub mod dispatch;
pub mod editors;
pub mod helpers;
pub mod inspect_events;
pub mod inspector;
pub mod tree_sync;
pub mod walker;

pub use binder::{BindContext, Folder, FolderBuilder, NoTextures, PaneBinder, Section, TexturePicker};
pub use dispatch::{DispatchRule, DispatchTable};
pub use helpers::{HelperInjector, HelperSlot};
pub use inspect_events::{InspectorToggledEvent, SelectionChangedEvent, TreeReconciledEvent};
pub use inspector::Inspector;
pub use tree_sync::{SyncReport, TrackedNode, TreeSync};
pub use walker::{Observation, SceneWalker, Walk, WalkEntry};
