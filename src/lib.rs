//! scene-inspect - live scene inspector library
//!
//! Re-exports all modules for use by binary targets.

// Core plumbing (disposal, events, frame hook)
pub mod core;

// Scene graph and widget toolkit consumed by the inspector
pub mod entities;
pub mod widgets;

// Inspection engine
pub mod inspect;

// App modules
pub mod cli;
pub mod config;
pub mod paths;
pub mod shell;

// Re-export commonly used types
pub use config::InspectorSettings;
pub use core::{downcast_event, BoxedEvent, DisposerList, EventBus, FrameTickEvent, SubscriptionToken};
pub use entities::{AttrValue, Attrs, Material, SceneLibrary, SceneNode, Texture};
pub use inspect::{DispatchRule, DispatchTable, Inspector, SelectionChangedEvent, TexturePicker};
