//! Core plumbing - events, disposal, render-loop hook
//!
//! These modules are independent of the scene graph and of the UI.

pub mod disposer;
pub mod event_bus;
pub mod frame_events;

pub use disposer::DisposerList;
pub use event_bus::{downcast_event, BoxedEvent, EventBus, SubscriptionToken};
pub use frame_events::FrameTickEvent;
