//! Capability tags.
//!
//! A capability is an open-ended string; nodes and materials carry an ordered
//! chain from the most general tag to the most specific one. The constants
//! below are the tags the default editors know about. Host code is free to
//! introduce new ones; a tag no rule asks for is simply never matched.

use indexmap::IndexSet;

// Nodes
pub const OBJECT3D: &str = "Object3D";
pub const SCENE: &str = "Scene";
pub const GROUP: &str = "Group";
pub const MESH: &str = "Mesh";
pub const INSTANCED_MESH: &str = "InstancedMesh";
pub const LINE: &str = "Line";
pub const POINTS: &str = "Points";
pub const LIGHT: &str = "Light";
pub const AMBIENT_LIGHT: &str = "AmbientLight";
pub const DIRECTIONAL_LIGHT: &str = "DirectionalLight";
pub const POINT_LIGHT: &str = "PointLight";
pub const SPOT_LIGHT: &str = "SpotLight";
pub const RECT_AREA_LIGHT: &str = "RectAreaLight";
pub const HEMISPHERE_LIGHT: &str = "HemisphereLight";
pub const CAMERA: &str = "Camera";
pub const PERSPECTIVE_CAMERA: &str = "PerspectiveCamera";
pub const ORTHOGRAPHIC_CAMERA: &str = "OrthographicCamera";
pub const ARROW_HELPER: &str = "ArrowHelper";

// Materials
pub const MATERIAL: &str = "Material";
pub const POINTS_MATERIAL: &str = "PointsMaterial";
pub const LINE_BASIC_MATERIAL: &str = "LineBasicMaterial";
pub const LINE_DASHED_MATERIAL: &str = "LineDashedMaterial";
pub const MESH_BASIC_MATERIAL: &str = "MeshBasicMaterial";
pub const MESH_DEPTH_MATERIAL: &str = "MeshDepthMaterial";
pub const MESH_LAMBERT_MATERIAL: &str = "MeshLambertMaterial";
pub const MESH_PHONG_MATERIAL: &str = "MeshPhongMaterial";
pub const MESH_STANDARD_MATERIAL: &str = "MeshStandardMaterial";
pub const MESH_PHYSICAL_MATERIAL: &str = "MeshPhysicalMaterial";
pub const SHADER_MATERIAL: &str = "ShaderMaterial";

/// Ordered capability chain, general → specific.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    chain: IndexSet<String>,
}

impl Capabilities {
    pub fn new<I, S>(chain: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            chain: chain.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has(&self, cap: &str) -> bool {
        self.chain.contains(cap)
    }

    /// True if any of `caps` is present.
    pub fn has_any(&self, caps: &[&str]) -> bool {
        caps.iter().any(|c| self.has(c))
    }

    /// Append a more specific capability. Already present tags are ignored.
    pub fn add(&mut self, cap: impl Into<String>) {
        self.chain.insert(cap.into());
    }

    /// Most specific tag, i.e. the kind name.
    pub fn kind(&self) -> &str {
        self.chain.last().map(String::as_str).unwrap_or("Unknown")
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.chain.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_is_most_specific() {
        let caps = Capabilities::new([OBJECT3D, LIGHT, DIRECTIONAL_LIGHT]);
        assert_eq!(caps.kind(), DIRECTIONAL_LIGHT);
        assert!(caps.has(LIGHT));
        assert!(!caps.has(MESH));
    }

    #[test]
    fn test_open_ended_tags() {
        let mut caps = Capabilities::new([OBJECT3D]);
        caps.add("Trail");
        assert!(caps.has("Trail"));
        assert!(caps.has_any(&[MESH, "Trail"]));
        assert_eq!(caps.kind(), "Trail");
        // duplicates ignored
        caps.add(OBJECT3D);
        assert_eq!(caps.len(), 2);
    }

    #[test]
    fn test_empty_kind() {
        assert_eq!(Capabilities::default().kind(), "Unknown");
    }
}
