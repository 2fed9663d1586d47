//! Generic attribute storage shared by scene nodes and materials.
//!
//! Keys keep insertion order (`IndexMap`), which is also the order a generic
//! editor would list them in. Values are the closed set of kinds the widget
//! toolkit knows how to edit.

use indexmap::IndexMap;

use super::texture::Texture;

/// Generic attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Str(String),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    /// Linear RGB, components in 0..1
    Color([f32; 3]),
    /// Structured parameter block (e.g. shader uniforms)
    Json(serde_json::Value),
    /// Optional texture slot
    Texture(Option<Texture>),
}

impl AttrValue {
    /// Short kind name, used in logs and by the pane renderer.
    pub fn kind(&self) -> &'static str {
        match self {
            AttrValue::Bool(_) => "bool",
            AttrValue::Int(_) => "int",
            AttrValue::Float(_) => "float",
            AttrValue::Str(_) => "string",
            AttrValue::Vec2(_) => "vec2",
            AttrValue::Vec3(_) => "vec3",
            AttrValue::Color(_) => "color",
            AttrValue::Json(_) => "json",
            AttrValue::Texture(_) => "texture",
        }
    }

    /// True when both values are the same variant.
    pub fn same_kind(&self, other: &AttrValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            AttrValue::Float(v) => Some(*v),
            AttrValue::Int(v) => Some(*v as f32),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Attribute container: string key → typed value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attrs {
    map: IndexMap<String, AttrValue>,
}

impl Attrs {
    pub fn new() -> Self {
        Self {
            map: IndexMap::new(),
        }
    }

    /// Builder-style set, used by node constructors.
    pub fn with(mut self, key: impl Into<String>, value: AttrValue) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: AttrValue) {
        self.map.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.map.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.map.get(key) {
            Some(AttrValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_i32(&self, key: &str) -> Option<i32> {
        match self.map.get(key) {
            Some(AttrValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_float(&self, key: &str) -> Option<f32> {
        match self.map.get(key) {
            Some(AttrValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.map.get(key) {
            Some(AttrValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_vec3(&self, key: &str) -> Option<[f32; 3]> {
        match self.map.get(key) {
            Some(AttrValue::Vec3(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_color(&self, key: &str) -> Option<[f32; 3]> {
        match self.map.get(key) {
            Some(AttrValue::Color(v)) => Some(*v),
            _ => None,
        }
    }

    /// Get float value with custom default
    pub fn get_float_or(&self, key: &str, default: f32) -> f32 {
        self.get_float(key).unwrap_or(default)
    }

    /// Get bool value with custom default
    pub fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }

    /// Get mutable reference to attribute value
    pub fn get_mut(&mut self, key: &str) -> Option<&mut AttrValue> {
        self.map.get_mut(key)
    }

    /// Remove attribute by key, keeping the order of the others
    pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
        self.map.shift_remove(key)
    }

    /// Iterate over all attributes in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttrValue)> {
        self.map.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.map.keys()
    }

    /// Check if attribute exists
    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Get number of attributes
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Keys whose values differ between `self` and `other` (including keys
    /// present on only one side), in `self`'s order followed by extra keys.
    pub fn diff_keys(&self, other: &Attrs) -> Vec<String> {
        let mut keys: Vec<String> = self
            .map
            .iter()
            .filter(|(k, v)| other.get(k) != Some(*v))
            .map(|(k, _)| k.clone())
            .collect();
        keys.extend(
            other
                .map
                .keys()
                .filter(|k| !self.map.contains_key(*k))
                .cloned(),
        );
        keys
    }
}
