//! Entities module - the scene graph the inspector observes and edits.
//!
//! - `SceneNode` / `Material` / `Texture`: shared handles into the live graph
//! - `Attrs` / `AttrValue`: typed property storage
//! - `Capabilities`: open-ended capability chains used for editor dispatch
//! - `SceneLibrary`: factory for nodes, materials and helper objects
//! - `PropertyHost`: the interface bindings read and write through

pub mod attrs;
pub mod caps;
pub mod color;
pub mod keys;
pub mod library;
pub mod material;
pub mod node;
pub mod texture;
pub mod traits;

pub use attrs::{AttrValue, Attrs};
pub use caps::Capabilities;
pub use library::SceneLibrary;
pub use material::{Material, WeakMaterial};
pub use node::{SceneNode, WeakNode};
pub use texture::Texture;
pub use traits::PropertyHost;
