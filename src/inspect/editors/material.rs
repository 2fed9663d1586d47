//! Material fields, one rule per material family.
//!
//! All rules write into the node's "material" section, so the base fields
//! always come first and family fields follow in rule order.

use std::rc::Rc;

use super::{material_has, material_section};
use crate::entities::keys::*;
use crate::entities::{SceneLibrary, WeakMaterial, caps};
use crate::inspect::binder::{FolderBuilder, Section};
use crate::inspect::dispatch::DispatchRule;
use crate::widgets::pane::{InputOptions, InputView};

/// Rule whose generator runs `fields` on the material section.
fn material_rule(
    name: &str,
    family: &'static [&'static str],
    fields: impl Fn(&Section, &WeakMaterial) + 'static,
) -> DispatchRule {
    DispatchRule::new(
        name,
        move |n| material_has(n, family),
        move |b: &mut FolderBuilder| {
            if let Some((section, host)) = material_section(b) {
                fields(&section, &host);
            }
        },
    )
}

pub(super) fn family_rules(library: &Rc<SceneLibrary>) -> Vec<DispatchRule> {
    let lib = Rc::clone(library);
    vec![
        DispatchRule::new(
            "material",
            |n| n.material().is_some(),
            move |b: &mut FolderBuilder| {
                if let Some((s, host)) = material_section(b) {
                    base_fields(&s, &host, &lib);
                }
            },
        ),
        material_rule("points_material", &[caps::POINTS_MATERIAL], |s, host| {
            s.color(host, A_COLOR);
            s.bind(host, A_SIZE);
            s.bind(host, A_SIZE_ATTENUATION);
        }),
        material_rule(
            "line_material",
            &[caps::LINE_BASIC_MATERIAL, caps::LINE_DASHED_MATERIAL],
            |s, host| {
                s.color(host, A_COLOR);
                s.bind(host, A_FOG);
                s.bind(host, A_LINEWIDTH);
            },
        ),
        material_rule("mesh_basic_material", &[caps::MESH_BASIC_MATERIAL], |s, host| {
            s.color(host, A_COLOR);
            s.bind(host, A_FOG);
            s.ranged(host, A_REFLECTIVITY);
            s.ranged(host, A_REFRACTION_RATIO);
            s.bind(host, A_WIREFRAME);
        }),
        material_rule("mesh_depth_material", &[caps::MESH_DEPTH_MATERIAL], |s, host| {
            s.bind(host, A_FOG);
        }),
        material_rule("mesh_lambert_material", &[caps::MESH_LAMBERT_MATERIAL], |s, host| {
            shaded_fields(s, host);
            s.bind(host, A_FOG);
            s.ranged(host, A_REFLECTIVITY);
            s.ranged(host, A_REFRACTION_RATIO);
            s.bind(host, A_WIREFRAME);
        }),
        material_rule("mesh_phong_material", &[caps::MESH_PHONG_MATERIAL], |s, host| {
            shaded_fields(s, host);
            s.bind(host, A_FOG);
            s.ranged(host, A_REFLECTIVITY);
            s.ranged(host, A_REFRACTION_RATIO);
            s.bind_with(host, A_SHININESS, InputOptions::new().min(0.0), false);
            s.bind(host, A_WIREFRAME);
        }),
        material_rule("mesh_standard_material", &[caps::MESH_STANDARD_MATERIAL], |s, host| {
            s.color(host, A_COLOR);
            s.color(host, A_EMISSIVE);
            s.bind_with(host, A_EMISSIVE_INTENSITY, InputOptions::new().min(0.0), false);
            s.ranged(host, A_ROUGHNESS);
            s.ranged(host, A_METALNESS);
            s.bind_refresh(host, A_FLAT_SHADING);
            s.bind(host, A_FOG);
            s.bind(host, A_WIREFRAME);
            s.bind(host, A_ENV_MAP_INTENSITY);
        }),
        material_rule("mesh_physical_material", &[caps::MESH_PHYSICAL_MATERIAL], |s, host| {
            s.separator();
            s.color(host, A_ATTENUATION_COLOR);
            s.ranged(host, A_CLEARCOAT);
            s.ranged(host, A_CLEARCOAT_ROUGHNESS);
            s.ranged(host, A_TRANSMISSION);
            s.bind_with(host, A_IOR, InputOptions::new().range(1.0, 2.333), false);
            s.ranged(host, A_REFLECTIVITY);
            s.ranged(host, A_SHEEN);
            s.ranged(host, A_SHEEN_ROUGHNESS);
            s.color(host, A_SHEEN_COLOR);
        }),
        material_rule("shader_material", &[caps::SHADER_MATERIAL], |s, host| {
            s.json(host, A_UNIFORMS);
            s.text_area(host, A_VERTEX_SHADER);
            s.text_area(host, A_FRAGMENT_SHADER);
        }),
    ]
}

fn base_fields(s: &Section, host: &WeakMaterial, lib: &SceneLibrary) {
    s.bind(host, A_VISIBLE);
    s.bind_refresh(host, A_TRANSPARENT);
    s.ranged(host, A_OPACITY);
    s.enumerated(host, A_SIDE, lib.sides(), InputView::RadioGrid { columns: 3 });
    s.bind(host, A_VERTEX_COLORS);
    s.separator();
}

/// Colour, emissive and flat shading shared by lambert and phong.
fn shaded_fields(s: &Section, host: &WeakMaterial) {
    s.color(host, A_COLOR);
    s.color(host, A_EMISSIVE);
    s.bind_with(host, A_EMISSIVE_INTENSITY, InputOptions::new().min(0.0), false);
    s.bind_refresh(host, A_FLAT_SHADING);
}

/// Rarely edited fields common to every material.
pub(super) fn advanced_rule() -> DispatchRule {
    DispatchRule::new("material_advanced", |n| n.material().is_some(), |b: &mut FolderBuilder| {
        let Some((s, host)) = material_section(b) else {
            return;
        };
        let host = &host;
        s.separator();
        s.ranged(host, A_ALPHA_TEST);
        s.bind(host, A_BLEND_DST);
        s.bind(host, A_CLIP_SHADOWS);
        s.bind(host, A_DEPTH_TEST);
        s.bind(host, A_DEPTH_WRITE);
        s.bind(host, A_POLYGON_OFFSET);
        s.bind(host, A_POLYGON_OFFSET_FACTOR);
        s.bind(host, A_DITHERING);
    })
}

#[cfg(test)]
mod tests {
    use crate::core::DisposerList;
    use crate::entities::keys::*;
    use crate::entities::{AttrValue, SceneLibrary, SceneNode};
    use crate::inspect::binder::{BindContext, NoTextures, PaneBinder};
    use crate::inspect::dispatch::DispatchTable;
    use crate::widgets::pane::Pane;
    use serde_json::json;
    use std::rc::Rc;

    fn build(node: &SceneNode) -> (Pane, crate::inspect::binder::Folder) {
        let lib = Rc::new(SceneLibrary::new());
        let pane = Pane::new("p");
        let binder = PaneBinder::new(
            pane.clone(),
            DispatchTable::with_defaults(Rc::clone(&lib)),
            BindContext::new(lib, Rc::new(NoTextures)),
        );
        let folder = binder.build(node, &|_: &SceneNode| true).unwrap();
        (pane, folder)
    }

    fn position(keys: &[String], key: &str) -> usize {
        keys.iter().position(|k| k == key).unwrap_or(usize::MAX)
    }

    #[test]
    fn test_physical_order_base_first() {
        let lib = SceneLibrary::new();
        let mesh = lib.mesh("Box", lib.mesh_physical_material(""));
        let (pane, folder) = build(&mesh);
        let section = pane.find_folder(folder.id(), "(MeshPhysicalMaterial)").unwrap();
        let keys = pane.input_keys(section);

        let base: Vec<usize> = [A_VISIBLE, A_OPACITY, A_SIDE, A_VERTEX_COLORS]
            .iter()
            .map(|k| position(&keys, k))
            .collect();
        let physical: Vec<usize> = [A_CLEARCOAT, A_TRANSMISSION, A_SHEEN]
            .iter()
            .map(|k| position(&keys, k))
            .collect();
        assert!(base.windows(2).all(|w| w[0] < w[1]));
        assert!(physical.windows(2).all(|w| w[0] < w[1]));
        assert!(physical.iter().all(|p| *p != usize::MAX));
        assert!(base.last() < physical.first());
        // standard fields come between them
        assert!(position(&keys, A_ROUGHNESS) < position(&keys, A_CLEARCOAT));
        assert!(position(&keys, A_DITHERING) > position(&keys, A_SHEEN));
    }

    #[test]
    fn test_side_radio_rejects_unknown() {
        let lib = SceneLibrary::new();
        let material = lib.mesh_standard_material("Floor");
        let mesh = lib.mesh("Floor", material.clone());
        let (pane, folder) = build(&mesh);
        let side = pane.find_input(folder.id(), A_SIDE).unwrap();
        assert!(!pane.edit(side, AttrValue::Int(9)));
        assert!(pane.edit(side, AttrValue::Int(2)));
        assert_eq!(material.get_attr(A_SIDE), Some(AttrValue::Int(2)));
        assert!(material.needs_update());
    }

    #[test]
    fn test_opacity_clamped_and_transparent_refreshes() {
        let lib = SceneLibrary::new();
        let material = lib.mesh_basic_material("m");
        let mesh = lib.mesh("m", material.clone());
        let (pane, folder) = build(&mesh);
        let opacity = pane.find_input(folder.id(), A_OPACITY).unwrap();
        pane.edit(opacity, AttrValue::Float(5.0));
        assert_eq!(material.get_attr(A_OPACITY), Some(AttrValue::Float(1.0)));
        assert!(!material.needs_update());

        let transparent = pane.find_input(folder.id(), A_TRANSPARENT).unwrap();
        pane.edit(transparent, AttrValue::Bool(true));
        assert!(material.needs_update());
    }

    #[test]
    fn test_shader_material_uniforms() {
        let lib = SceneLibrary::new();
        let uniforms = lib.uniforms(&[("color1", json!({"x": 1, "y": 1, "z": 0}))]);
        let material = lib.shader_material("", uniforms.clone(), "void main() {}", "void main() {}");
        let mesh = lib.mesh("Shader Mesh", material.clone());
        let (pane, folder) = build(&mesh);
        let input = pane.find_input(folder.id(), A_UNIFORMS).unwrap();
        pane.edit(input, AttrValue::Str("{".into()));
        assert_eq!(material.get_attr(A_UNIFORMS), Some(AttrValue::Json(uniforms)));
        assert!(pane.find_input(folder.id(), A_FRAGMENT_SHADER).is_some());
        assert!(pane.find_input(folder.id(), A_ROUGHNESS).is_none());
    }

    #[test]
    fn test_advanced_fields_without_material_cap() {
        use crate::entities::{Attrs, Capabilities, Material};

        let lib = SceneLibrary::new();
        let mut attrs = Attrs::new();
        attrs.set(A_OPACITY, AttrValue::Float(1.0));
        attrs.set(A_DITHERING, AttrValue::Bool(false));
        let material = Material::new("odd", Capabilities::new(["ToonRamp"]), attrs);
        let mesh = lib.mesh("Odd", material.clone());
        let (pane, folder) = build(&mesh);

        assert_eq!(folder.rules(), ["object", "material", "material_advanced"]);
        let dithering = pane.find_input(folder.id(), A_DITHERING).unwrap();
        assert!(pane.edit(dithering, AttrValue::Bool(true)));
        assert_eq!(material.get_attr(A_DITHERING), Some(AttrValue::Bool(true)));
    }

    #[test]
    fn test_folder_dispose_leaves_nothing() {
        let lib = SceneLibrary::new();
        let mesh = lib.mesh("Box", lib.mesh_physical_material("phys"));
        let (pane, folder) = build(&mesh);
        assert!(pane.widget_count() > 40);
        let list: &DisposerList = folder.disposers();
        list.dispose();
        assert_eq!(pane.widget_count(), 0);
        assert_eq!(pane.listener_count(), 0);
        assert_eq!(mesh.child_count(), 0);
    }
}
