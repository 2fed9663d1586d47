//! Texture handles.
//!
//! The inspector only ever moves textures between slots; it never decodes
//! pixels. A texture is therefore a shared, immutable descriptor compared by
//! identity.

use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use uuid::Uuid;

#[derive(Debug)]
struct TextureData {
    uuid: Uuid,
    name: String,
    source: Option<PathBuf>,
}

/// Shared texture descriptor. Equality is identity.
#[derive(Clone)]
pub struct Texture {
    data: Rc<TextureData>,
}

impl Texture {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            data: Rc::new(TextureData {
                uuid: Uuid::new_v4(),
                name: name.into(),
                source: None,
            }),
        }
    }

    /// Texture backed by a file on disk. Named after the file stem.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("texture")
            .to_string();
        Self {
            data: Rc::new(TextureData {
                uuid: Uuid::new_v4(),
                name,
                source: Some(path),
            }),
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.data.uuid
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn source(&self) -> Option<&PathBuf> {
        self.data.source.as_ref()
    }
}

impl PartialEq for Texture {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("name", &self.data.name)
            .field("uuid", &self.data.uuid)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_equality() {
        let a = Texture::new("checker");
        let b = Texture::new("checker");
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_path_uses_stem() {
        let tex = Texture::from_path("/tmp/assets/bricks_albedo.png");
        assert_eq!(tex.name(), "bricks_albedo");
        assert!(tex.source().is_some());
    }
}
