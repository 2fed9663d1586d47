//! Texture slots and their intensity/scale companions.

use std::rc::Rc;

use super::{material_has, material_section};
use crate::entities::keys::*;
use crate::entities::{SceneLibrary, caps};
use crate::inspect::binder::FolderBuilder;
use crate::inspect::dispatch::DispatchRule;
use crate::widgets::pane::InputView;

const BASIC: &[&str] = &[
    caps::MESH_BASIC_MATERIAL,
    caps::MESH_LAMBERT_MATERIAL,
    caps::MESH_PHONG_MATERIAL,
    caps::MESH_STANDARD_MATERIAL,
];
const LIT: &[&str] = &[
    caps::MESH_LAMBERT_MATERIAL,
    caps::MESH_PHONG_MATERIAL,
    caps::MESH_STANDARD_MATERIAL,
];

pub(super) fn rules(library: &Rc<SceneLibrary>) -> Vec<DispatchRule> {
    let lib = Rc::clone(library);
    vec![
        DispatchRule::new("basic_textures", |n| material_has(n, BASIC), |b: &mut FolderBuilder| {
            let Some((s, host)) = material_section(b) else {
                return;
            };
            s.separator();
            s.texture_slot(&host, A_MAP);
            s.texture_slot(&host, A_ALPHA_MAP);
            s.texture_slot(&host, A_AO_MAP);
            s.ranged(&host, A_AO_MAP_INTENSITY);
            s.texture_slot(&host, A_LIGHT_MAP);
            s.ranged(&host, A_LIGHT_MAP_INTENSITY);
        }),
        DispatchRule::new("lit_textures", |n| material_has(n, LIT), move |b: &mut FolderBuilder| {
            let Some((s, host)) = material_section(b) else {
                return;
            };
            s.texture_slot(&host, A_BUMP_MAP);
            s.ranged(&host, A_BUMP_SCALE);
            s.texture_slot(&host, A_DISPLACEMENT_MAP);
            s.bind(&host, A_DISPLACEMENT_SCALE);
            s.bind(&host, A_DISPLACEMENT_BIAS);
            s.texture_slot(&host, A_EMISSIVE_MAP);
            s.texture_slot(&host, A_NORMAL_MAP);
            s.enumerated(&host, A_NORMAL_MAP_TYPE, lib.normal_map_types(), InputView::Default);
        }),
        DispatchRule::new(
            "pbr_textures",
            |n| material_has(n, &[caps::MESH_STANDARD_MATERIAL]),
            |b: &mut FolderBuilder| {
                if let Some((s, host)) = material_section(b) {
                    s.texture_slot(&host, A_METALNESS_MAP);
                    s.texture_slot(&host, A_ROUGHNESS_MAP);
                }
            },
        ),
        DispatchRule::new(
            "physical_textures",
            |n| material_has(n, &[caps::MESH_PHYSICAL_MATERIAL]),
            |b: &mut FolderBuilder| {
                if let Some((s, host)) = material_section(b) {
                    s.texture_slot(&host, A_CLEARCOAT_MAP);
                    s.texture_slot(&host, A_CLEARCOAT_NORMAL_MAP);
                    s.ranged(&host, A_CLEARCOAT_NORMAL_SCALE);
                    s.texture_slot(&host, A_CLEARCOAT_ROUGHNESS_MAP);
                    s.texture_slot(&host, A_SHEEN_ROUGHNESS_MAP);
                }
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AttrValue, SceneNode, Texture};
    use crate::inspect::binder::{BindContext, PaneBinder, TexturePicker};
    use crate::inspect::dispatch::DispatchTable;
    use crate::widgets::pane::Pane;

    #[test]
    fn test_depth_material_has_no_slots() {
        let lib = Rc::new(SceneLibrary::new());
        let mesh = lib.mesh("d", lib.mesh_depth_material(""));
        let table = DispatchTable::with_defaults(Rc::clone(&lib));
        let names = table.matching_names(&mesh);
        assert!(!names.contains(&"basic_textures"));
        assert!(names.contains(&"mesh_depth_material"));
    }

    #[test]
    fn test_assign_through_picker() {
        let lib = Rc::new(SceneLibrary::new());
        let material = lib.mesh_phong_material("p");
        let mesh = lib.mesh("m", material.clone());
        let picker: Rc<dyn TexturePicker> = Rc::new(|_: &str| Some(Texture::new("bricks")));
        let pane = Pane::new("p");
        let binder = PaneBinder::new(
            pane.clone(),
            DispatchTable::with_defaults(Rc::clone(&lib)),
            BindContext::new(Rc::clone(&lib), picker),
        );
        let folder = binder.build(&mesh, &|_: &SceneNode| true).unwrap();

        let slot = pane.find_folder(folder.id(), A_NORMAL_MAP).unwrap();
        let assign = pane.find_button(slot, "assign").unwrap();
        pane.click(assign);
        assert!(matches!(material.get_attr(A_NORMAL_MAP), Some(AttrValue::Texture(Some(_)))));
        assert!(material.needs_update());
        // other slots untouched
        assert_eq!(material.get_attr(A_MAP), Some(AttrValue::Texture(None)));
        assert!(pane.find_button(pane.find_folder(folder.id(), A_MAP).unwrap(), "assign").is_some());
    }
}
