//! Scene library - factory for nodes, materials and helper objects.
//!
//! Everything that builds scene objects with their default properties goes
//! through here. The inspector never constructs nodes itself; it is handed an
//! `Rc<SceneLibrary>` and asks it for helpers and enum tables.

use serde_json::json;

use super::attrs::{AttrValue, Attrs};
use super::caps::{self, Capabilities};
use super::color;
use super::keys::*;
use super::material::Material;
use super::node::SceneNode;

/// `side` values.
pub const FRONT_SIDE: i32 = 0;
pub const BACK_SIDE: i32 = 1;
pub const DOUBLE_SIDE: i32 = 2;

/// `normalMapType` values.
pub const TANGENT_SPACE_NORMAL_MAP: i32 = 0;
pub const OBJECT_SPACE_NORMAL_MAP: i32 = 1;

/// `blendDst` default (OneMinusSrcAlphaFactor).
pub const ONE_MINUS_SRC_ALPHA_FACTOR: i32 = 205;

/// Name given to forward helpers.
pub const FORWARD_HELPER_NAME: &str = "Forward helper";

/// Factory for scene objects with the default property sets editors expect.
#[derive(Debug, Clone)]
pub struct SceneLibrary {
    /// Default length of arrow helpers
    pub helper_length: f32,
    /// Colour of inspector helpers
    pub helper_color: [f32; 3],
}

impl Default for SceneLibrary {
    fn default() -> Self {
        Self {
            helper_length: 1.0,
            helper_color: color::from_u32(0xffff00),
        }
    }
}

impl SceneLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Enum tables ---

    /// Side choices, in radio grid order.
    pub fn sides(&self) -> Vec<(String, i32)> {
        vec![
            ("Back".to_string(), BACK_SIDE),
            ("Double".to_string(), DOUBLE_SIDE),
            ("Front".to_string(), FRONT_SIDE),
        ]
    }

    pub fn normal_map_types(&self) -> Vec<(String, i32)> {
        vec![
            ("ObjectSpaceNormalMap".to_string(), OBJECT_SPACE_NORMAL_MAP),
            ("TangentSpaceNormalMap".to_string(), TANGENT_SPACE_NORMAL_MAP),
        ]
    }

    // --- Nodes ---

    fn node(&self, name: &str, chain: &[&str], attrs: Attrs) -> SceneNode {
        SceneNode::new(name, Capabilities::new(chain.iter().copied()), attrs)
    }

    pub fn object3d(&self, name: &str) -> SceneNode {
        self.node(name, &[caps::OBJECT3D], object_attrs())
    }

    pub fn scene(&self, name: &str) -> SceneNode {
        self.node(name, &[caps::OBJECT3D, caps::SCENE], object_attrs())
    }

    pub fn group(&self, name: &str) -> SceneNode {
        self.node(name, &[caps::OBJECT3D, caps::GROUP], object_attrs())
    }

    pub fn mesh(&self, name: &str, material: Material) -> SceneNode {
        let node = self.node(name, &[caps::OBJECT3D, caps::MESH], object_attrs());
        node.set_material(Some(material));
        node
    }

    pub fn instanced_mesh(&self, name: &str, material: Material, count: i32) -> SceneNode {
        let attrs = object_attrs().with("count", AttrValue::Int(count));
        let node = self.node(name, &[caps::OBJECT3D, caps::MESH, caps::INSTANCED_MESH], attrs);
        node.set_material(Some(material));
        node
    }

    pub fn line(&self, name: &str, material: Material) -> SceneNode {
        let node = self.node(name, &[caps::OBJECT3D, caps::LINE], object_attrs());
        node.set_material(Some(material));
        node
    }

    pub fn points(&self, name: &str, material: Material) -> SceneNode {
        let node = self.node(name, &[caps::OBJECT3D, caps::POINTS], object_attrs());
        node.set_material(Some(material));
        node
    }

    // --- Lights ---

    fn light(&self, name: &str, kind: &str, rgb: u32, intensity: f32, extra: Attrs) -> SceneNode {
        let mut attrs = object_attrs()
            .with(A_COLOR, AttrValue::Color(color::from_u32(rgb)))
            .with(A_INTENSITY, AttrValue::Float(intensity));
        for (key, value) in extra.iter() {
            attrs.set(key.clone(), value.clone());
        }
        self.node(name, &[caps::OBJECT3D, caps::LIGHT, kind], attrs)
    }

    pub fn ambient_light(&self, name: &str, rgb: u32, intensity: f32) -> SceneNode {
        self.light(name, caps::AMBIENT_LIGHT, rgb, intensity, Attrs::new())
    }

    pub fn directional_light(&self, name: &str, rgb: u32, intensity: f32) -> SceneNode {
        let extra = Attrs::new()
            .with(A_SHADOW_BIAS, AttrValue::Float(0.0))
            .with(A_SHADOW_NORMAL_BIAS, AttrValue::Float(0.0));
        self.light(name, caps::DIRECTIONAL_LIGHT, rgb, intensity, extra)
    }

    pub fn point_light(&self, name: &str, rgb: u32, intensity: f32) -> SceneNode {
        let extra = Attrs::new()
            .with(A_DISTANCE, AttrValue::Float(0.0))
            .with(A_DECAY, AttrValue::Float(2.0));
        self.light(name, caps::POINT_LIGHT, rgb, intensity, extra)
    }

    pub fn spot_light(&self, name: &str, rgb: u32, intensity: f32) -> SceneNode {
        let extra = Attrs::new()
            .with(A_ANGLE, AttrValue::Float(std::f32::consts::FRAC_PI_3))
            .with(A_PENUMBRA, AttrValue::Float(0.0))
            .with(A_DISTANCE, AttrValue::Float(0.0))
            .with(A_DECAY, AttrValue::Float(2.0));
        self.light(name, caps::SPOT_LIGHT, rgb, intensity, extra)
    }

    pub fn rect_area_light(&self, name: &str, rgb: u32, intensity: f32, width: f32, height: f32) -> SceneNode {
        let extra = Attrs::new()
            .with(A_WIDTH, AttrValue::Float(width))
            .with(A_HEIGHT, AttrValue::Float(height));
        self.light(name, caps::RECT_AREA_LIGHT, rgb, intensity, extra)
    }

    pub fn hemisphere_light(&self, name: &str, sky: u32, ground: u32, intensity: f32) -> SceneNode {
        let extra = Attrs::new().with(A_GROUND_COLOR, AttrValue::Color(color::from_u32(ground)));
        self.light(name, caps::HEMISPHERE_LIGHT, sky, intensity, extra)
    }

    // --- Cameras ---

    pub fn perspective_camera(&self, name: &str, fov: f32, near: f32, far: f32) -> SceneNode {
        let attrs = object_attrs()
            .with(A_NEAR, AttrValue::Float(near))
            .with(A_FAR, AttrValue::Float(far))
            .with(A_FOV, AttrValue::Float(fov))
            .with(A_ZOOM, AttrValue::Float(1.0));
        self.node(name, &[caps::OBJECT3D, caps::CAMERA, caps::PERSPECTIVE_CAMERA], attrs)
    }

    pub fn orthographic_camera(&self, name: &str, near: f32, far: f32) -> SceneNode {
        let attrs = object_attrs()
            .with(A_NEAR, AttrValue::Float(near))
            .with(A_FAR, AttrValue::Float(far))
            .with(A_ZOOM, AttrValue::Float(1.0));
        self.node(name, &[caps::OBJECT3D, caps::CAMERA, caps::ORTHOGRAPHIC_CAMERA], attrs)
    }

    // --- Helpers ---

    /// Arrow pointing down the local forward axis, flagged as inspector helper.
    pub fn forward_helper(&self) -> SceneNode {
        let attrs = object_attrs()
            .with(A_DIRECTION, AttrValue::Vec3([0.0, 0.0, 1.0]))
            .with(A_LENGTH, AttrValue::Float(self.helper_length))
            .with(A_COLOR, AttrValue::Color(self.helper_color));
        let helper = self.node(FORWARD_HELPER_NAME, &[caps::OBJECT3D, caps::ARROW_HELPER], attrs);
        helper.set_inspector_helper(true);
        helper
    }

    /// Visual aid for a light, named after it and flagged as inspector helper.
    pub fn light_helper(&self, light: &SceneNode) -> SceneNode {
        let color = light
            .get_attr(A_COLOR)
            .unwrap_or(AttrValue::Color(self.helper_color));
        let kind = format!("{}Helper", light.kind());
        let attrs = object_attrs()
            .with(A_COLOR, color)
            .with(A_LENGTH, AttrValue::Float(self.helper_length));
        let helper = self.node(
            &format!("{} helper", light.display_name()),
            &[caps::OBJECT3D, kind.as_str()],
            attrs,
        );
        helper.set_inspector_helper(true);
        helper
    }

    // --- Materials ---

    fn material(&self, name: &str, chain: &[&str], attrs: Attrs) -> Material {
        let mut full = material_attrs();
        for (key, value) in attrs.iter() {
            full.set(key.clone(), value.clone());
        }
        Material::new(name, Capabilities::new(chain.iter().copied()), full)
    }

    pub fn points_material(&self, name: &str) -> Material {
        let attrs = Attrs::new()
            .with(A_COLOR, AttrValue::Color([1.0; 3]))
            .with(A_SIZE, AttrValue::Float(1.0))
            .with(A_SIZE_ATTENUATION, AttrValue::Bool(true))
            .with(A_FOG, AttrValue::Bool(true));
        self.material(name, &[caps::MATERIAL, caps::POINTS_MATERIAL], attrs)
    }

    pub fn line_basic_material(&self, name: &str) -> Material {
        self.material(name, &[caps::MATERIAL, caps::LINE_BASIC_MATERIAL], line_attrs())
    }

    pub fn line_dashed_material(&self, name: &str) -> Material {
        let attrs = line_attrs()
            .with("dashSize", AttrValue::Float(3.0))
            .with("gapSize", AttrValue::Float(1.0));
        self.material(
            name,
            &[caps::MATERIAL, caps::LINE_BASIC_MATERIAL, caps::LINE_DASHED_MATERIAL],
            attrs,
        )
    }

    pub fn mesh_basic_material(&self, name: &str) -> Material {
        let attrs = basic_texture_attrs()
            .with(A_COLOR, AttrValue::Color([1.0; 3]))
            .with(A_FOG, AttrValue::Bool(true))
            .with(A_REFLECTIVITY, AttrValue::Float(1.0))
            .with(A_REFRACTION_RATIO, AttrValue::Float(0.98))
            .with(A_WIREFRAME, AttrValue::Bool(false));
        self.material(name, &[caps::MATERIAL, caps::MESH_BASIC_MATERIAL], attrs)
    }

    pub fn mesh_depth_material(&self, name: &str) -> Material {
        let attrs = Attrs::new().with(A_FOG, AttrValue::Bool(false));
        self.material(name, &[caps::MATERIAL, caps::MESH_DEPTH_MATERIAL], attrs)
    }

    pub fn mesh_lambert_material(&self, name: &str) -> Material {
        let attrs = lit_attrs()
            .with(A_REFLECTIVITY, AttrValue::Float(1.0))
            .with(A_REFRACTION_RATIO, AttrValue::Float(0.98));
        self.material(name, &[caps::MATERIAL, caps::MESH_LAMBERT_MATERIAL], attrs)
    }

    pub fn mesh_phong_material(&self, name: &str) -> Material {
        let attrs = lit_attrs()
            .with(A_REFLECTIVITY, AttrValue::Float(1.0))
            .with(A_REFRACTION_RATIO, AttrValue::Float(0.98))
            .with(A_SHININESS, AttrValue::Float(30.0));
        self.material(name, &[caps::MATERIAL, caps::MESH_PHONG_MATERIAL], attrs)
    }

    pub fn mesh_standard_material(&self, name: &str) -> Material {
        self.material(name, &[caps::MATERIAL, caps::MESH_STANDARD_MATERIAL], standard_attrs())
    }

    pub fn mesh_physical_material(&self, name: &str) -> Material {
        let attrs = standard_attrs()
            .with(A_ATTENUATION_COLOR, AttrValue::Color([1.0; 3]))
            .with(A_CLEARCOAT, AttrValue::Float(0.0))
            .with(A_CLEARCOAT_ROUGHNESS, AttrValue::Float(0.0))
            .with(A_TRANSMISSION, AttrValue::Float(0.0))
            .with(A_IOR, AttrValue::Float(1.5))
            .with(A_REFLECTIVITY, AttrValue::Float(0.5))
            .with(A_SHEEN, AttrValue::Float(0.0))
            .with(A_SHEEN_ROUGHNESS, AttrValue::Float(1.0))
            .with(A_SHEEN_COLOR, AttrValue::Color([0.0; 3]))
            .with(A_CLEARCOAT_MAP, AttrValue::Texture(None))
            .with(A_CLEARCOAT_NORMAL_MAP, AttrValue::Texture(None))
            .with(A_CLEARCOAT_NORMAL_SCALE, AttrValue::Vec2([1.0, 1.0]))
            .with(A_CLEARCOAT_ROUGHNESS_MAP, AttrValue::Texture(None))
            .with(A_SHEEN_ROUGHNESS_MAP, AttrValue::Texture(None));
        self.material(
            name,
            &[
                caps::MATERIAL,
                caps::MESH_STANDARD_MATERIAL,
                caps::MESH_PHYSICAL_MATERIAL,
            ],
            attrs,
        )
    }

    pub fn shader_material(
        &self,
        name: &str,
        uniforms: serde_json::Value,
        vertex_shader: &str,
        fragment_shader: &str,
    ) -> Material {
        let attrs = Attrs::new()
            .with(A_UNIFORMS, AttrValue::Json(uniforms))
            .with(A_VERTEX_SHADER, AttrValue::Str(vertex_shader.to_string()))
            .with(A_FRAGMENT_SHADER, AttrValue::Str(fragment_shader.to_string()))
            .with(A_FOG, AttrValue::Bool(false));
        self.material(name, &[caps::MATERIAL, caps::SHADER_MATERIAL], attrs)
    }

    /// Uniform block in the `{ name: { value: ... } }` layout shader materials use.
    pub fn uniforms(&self, entries: &[(&str, serde_json::Value)]) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (name, value) in entries {
            map.insert(name.to_string(), json!({ "value": value }));
        }
        serde_json::Value::Object(map)
    }
}

fn object_attrs() -> Attrs {
    Attrs::new()
        .with(A_VISIBLE, AttrValue::Bool(true))
        .with(A_POSITION, AttrValue::Vec3([0.0; 3]))
        .with(A_ROTATION, AttrValue::Vec3([0.0; 3]))
        .with(A_SCALE, AttrValue::Vec3([1.0; 3]))
        .with(A_CAST_SHADOW, AttrValue::Bool(false))
        .with(A_RECEIVE_SHADOW, AttrValue::Bool(false))
        .with(A_FRUSTUM_CULLED, AttrValue::Bool(true))
        .with(A_RENDER_ORDER, AttrValue::Int(0))
}

fn material_attrs() -> Attrs {
    Attrs::new()
        .with(A_VISIBLE, AttrValue::Bool(true))
        .with(A_TRANSPARENT, AttrValue::Bool(false))
        .with(A_OPACITY, AttrValue::Float(1.0))
        .with(A_SIDE, AttrValue::Int(FRONT_SIDE))
        .with(A_VERTEX_COLORS, AttrValue::Bool(false))
        .with(A_ALPHA_TEST, AttrValue::Float(0.0))
        .with(A_BLEND_DST, AttrValue::Int(ONE_MINUS_SRC_ALPHA_FACTOR))
        .with(A_CLIP_SHADOWS, AttrValue::Bool(false))
        .with(A_DEPTH_TEST, AttrValue::Bool(true))
        .with(A_DEPTH_WRITE, AttrValue::Bool(true))
        .with(A_POLYGON_OFFSET, AttrValue::Bool(false))
        .with(A_POLYGON_OFFSET_FACTOR, AttrValue::Float(0.0))
        .with(A_DITHERING, AttrValue::Bool(false))
}

fn line_attrs() -> Attrs {
    Attrs::new()
        .with(A_COLOR, AttrValue::Color([1.0; 3]))
        .with(A_FOG, AttrValue::Bool(true))
        .with(A_LINEWIDTH, AttrValue::Float(1.0))
}

fn basic_texture_attrs() -> Attrs {
    Attrs::new()
        .with(A_MAP, AttrValue::Texture(None))
        .with(A_ALPHA_MAP, AttrValue::Texture(None))
        .with(A_AO_MAP, AttrValue::Texture(None))
        .with(A_AO_MAP_INTENSITY, AttrValue::Float(1.0))
        .with(A_LIGHT_MAP, AttrValue::Texture(None))
        .with(A_LIGHT_MAP_INTENSITY, AttrValue::Float(1.0))
}

/// Shared by lambert, phong and standard.
fn lit_attrs() -> Attrs {
    basic_texture_attrs()
        .with(A_COLOR, AttrValue::Color([1.0; 3]))
        .with(A_EMISSIVE, AttrValue::Color([0.0; 3]))
        .with(A_EMISSIVE_INTENSITY, AttrValue::Float(1.0))
        .with(A_FLAT_SHADING, AttrValue::Bool(false))
        .with(A_FOG, AttrValue::Bool(true))
        .with(A_WIREFRAME, AttrValue::Bool(false))
        .with(A_BUMP_MAP, AttrValue::Texture(None))
        .with(A_BUMP_SCALE, AttrValue::Float(1.0))
        .with(A_DISPLACEMENT_MAP, AttrValue::Texture(None))
        .with(A_DISPLACEMENT_SCALE, AttrValue::Float(1.0))
        .with(A_DISPLACEMENT_BIAS, AttrValue::Float(0.0))
        .with(A_EMISSIVE_MAP, AttrValue::Texture(None))
        .with(A_NORMAL_MAP, AttrValue::Texture(None))
        .with(A_NORMAL_MAP_TYPE, AttrValue::Int(TANGENT_SPACE_NORMAL_MAP))
}

fn standard_attrs() -> Attrs {
    lit_attrs()
        .with(A_ROUGHNESS, AttrValue::Float(1.0))
        .with(A_METALNESS, AttrValue::Float(0.0))
        .with(A_ENV_MAP_INTENSITY, AttrValue::Float(1.0))
        .with(A_METALNESS_MAP, AttrValue::Texture(None))
        .with(A_ROUGHNESS_MAP, AttrValue::Texture(None))
}
