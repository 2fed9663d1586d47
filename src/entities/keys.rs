//! Attribute key constants for Attrs access.
//!
//! Avoid string typos, enable IDE autocomplete.
//! Usage: `node.get_attr(A_VISIBLE)`

// === Object3D ===
pub const A_VISIBLE: &str = "visible";
pub const A_POSITION: &str = "position";
pub const A_ROTATION: &str = "rotation";
pub const A_SCALE: &str = "scale";
pub const A_CAST_SHADOW: &str = "castShadow";
pub const A_RECEIVE_SHADOW: &str = "receiveShadow";
pub const A_FRUSTUM_CULLED: &str = "frustumCulled";
pub const A_RENDER_ORDER: &str = "renderOrder";

// === Lights ===
pub const A_COLOR: &str = "color";
pub const A_INTENSITY: &str = "intensity";
pub const A_GROUND_COLOR: &str = "groundColor";
pub const A_DISTANCE: &str = "distance";
pub const A_DECAY: &str = "decay";
pub const A_ANGLE: &str = "angle";
pub const A_PENUMBRA: &str = "penumbra";
pub const A_WIDTH: &str = "width";
pub const A_HEIGHT: &str = "height";
pub const A_SHADOW_BIAS: &str = "shadowBias";
pub const A_SHADOW_NORMAL_BIAS: &str = "shadowNormalBias";

// === Cameras ===
pub const A_NEAR: &str = "near";
pub const A_FAR: &str = "far";
pub const A_FOV: &str = "fov";
pub const A_ZOOM: &str = "zoom";

// === Helpers ===
/// Arrow helper length
pub const A_LENGTH: &str = "length";
/// Arrow helper direction
pub const A_DIRECTION: &str = "direction";

// === Material, base ===
pub const A_TRANSPARENT: &str = "transparent";
pub const A_OPACITY: &str = "opacity";
pub const A_SIDE: &str = "side";
pub const A_VERTEX_COLORS: &str = "vertexColors";
pub const A_ALPHA_TEST: &str = "alphaTest";
pub const A_BLEND_DST: &str = "blendDst";
pub const A_CLIP_SHADOWS: &str = "clipShadows";
pub const A_DEPTH_TEST: &str = "depthTest";
pub const A_DEPTH_WRITE: &str = "depthWrite";
pub const A_POLYGON_OFFSET: &str = "polygonOffset";
pub const A_POLYGON_OFFSET_FACTOR: &str = "polygonOffsetFactor";
pub const A_DITHERING: &str = "dithering";

// === Material, per family ===
pub const A_SIZE: &str = "size";
pub const A_SIZE_ATTENUATION: &str = "sizeAttenuation";
pub const A_FOG: &str = "fog";
pub const A_LINEWIDTH: &str = "linewidth";
pub const A_REFLECTIVITY: &str = "reflectivity";
pub const A_REFRACTION_RATIO: &str = "refractionRatio";
pub const A_WIREFRAME: &str = "wireframe";
pub const A_EMISSIVE: &str = "emissive";
pub const A_EMISSIVE_INTENSITY: &str = "emissiveIntensity";
pub const A_FLAT_SHADING: &str = "flatShading";
pub const A_SHININESS: &str = "shininess";
pub const A_ROUGHNESS: &str = "roughness";
pub const A_METALNESS: &str = "metalness";
pub const A_ENV_MAP_INTENSITY: &str = "envMapIntensity";
pub const A_ATTENUATION_COLOR: &str = "attenuationColor";
pub const A_CLEARCOAT: &str = "clearcoat";
pub const A_CLEARCOAT_ROUGHNESS: &str = "clearcoatRoughness";
pub const A_TRANSMISSION: &str = "transmission";
pub const A_IOR: &str = "ior";
pub const A_SHEEN: &str = "sheen";
pub const A_SHEEN_ROUGHNESS: &str = "sheenRoughness";
pub const A_SHEEN_COLOR: &str = "sheenColor";
pub const A_UNIFORMS: &str = "uniforms";
pub const A_VERTEX_SHADER: &str = "vertexShader";
pub const A_FRAGMENT_SHADER: &str = "fragmentShader";

// === Material, texture slots ===
pub const A_MAP: &str = "map";
pub const A_ALPHA_MAP: &str = "alphaMap";
pub const A_AO_MAP: &str = "aoMap";
pub const A_AO_MAP_INTENSITY: &str = "aoMapIntensity";
pub const A_LIGHT_MAP: &str = "lightMap";
pub const A_LIGHT_MAP_INTENSITY: &str = "lightMapIntensity";
pub const A_BUMP_MAP: &str = "bumpMap";
pub const A_BUMP_SCALE: &str = "bumpScale";
pub const A_DISPLACEMENT_MAP: &str = "displacementMap";
pub const A_DISPLACEMENT_SCALE: &str = "displacementScale";
pub const A_DISPLACEMENT_BIAS: &str = "displacementBias";
pub const A_EMISSIVE_MAP: &str = "emissiveMap";
pub const A_NORMAL_MAP: &str = "normalMap";
pub const A_NORMAL_MAP_TYPE: &str = "normalMapType";
pub const A_METALNESS_MAP: &str = "metalnessMap";
pub const A_ROUGHNESS_MAP: &str = "roughnessMap";
pub const A_CLEARCOAT_MAP: &str = "clearcoatMap";
pub const A_CLEARCOAT_NORMAL_MAP: &str = "clearcoatNormalMap";
pub const A_CLEARCOAT_NORMAL_SCALE: &str = "clearcoatNormalScale";
pub const A_CLEARCOAT_ROUGHNESS_MAP: &str = "clearcoatRoughnessMap";
pub const A_SHEEN_ROUGHNESS_MAP: &str = "sheenRoughnessMap";
