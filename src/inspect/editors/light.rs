//! Light fields.

use std::f32::consts::FRAC_PI_2;

use crate::entities::caps;
use crate::entities::keys::*;
use crate::inspect::binder::FolderBuilder;
use crate::inspect::dispatch::DispatchRule;
use crate::widgets::pane::InputOptions;

pub(super) fn rules() -> Vec<DispatchRule> {
    vec![
        DispatchRule::new("light", |n| n.has_cap(caps::LIGHT), light_fields),
        DispatchRule::new("directional_light", |n| n.has_cap(caps::DIRECTIONAL_LIGHT), directional_fields),
        DispatchRule::new("point_light", |n| n.has_cap(caps::POINT_LIGHT), attenuation_fields),
        DispatchRule::new("spot_light", |n| n.has_cap(caps::SPOT_LIGHT), spot_fields),
        DispatchRule::new("rect_area_light", |n| n.has_cap(caps::RECT_AREA_LIGHT), rect_area_fields),
        DispatchRule::new("hemisphere_light", |n| n.has_cap(caps::HEMISPHERE_LIGHT), |b| {
            b.root().color(&b.host(), A_GROUND_COLOR);
        }),
    ]
}

fn light_fields(b: &mut FolderBuilder) {
    let host = b.host();
    let s = b.root();
    s.color(&host, A_COLOR);
    s.bind_with(&host, A_INTENSITY, InputOptions::new().min(0.0), false);
}

fn directional_fields(b: &mut FolderBuilder) {
    let host = b.host();
    let s = b.root();
    let fine = InputOptions::new().step(0.0001);
    s.bind_with(&host, A_SHADOW_BIAS, fine.clone(), false);
    s.bind_with(&host, A_SHADOW_NORMAL_BIAS, fine, false);

    let helpers = &b.context().helpers;
    helpers.attach_toggle(s, "lightHelper", helpers.light_slot(b.node()));
}

fn attenuation_fields(b: &mut FolderBuilder) {
    let host = b.host();
    let s = b.root();
    s.bind_with(&host, A_DISTANCE, InputOptions::new().min(0.0), false);
    s.bind_with(&host, A_DECAY, InputOptions::new().min(0.0), false);
}

fn spot_fields(b: &mut FolderBuilder) {
    let host = b.host();
    let s = b.root();
    s.bind_with(&host, A_ANGLE, InputOptions::new().range(0.0, FRAC_PI_2), false);
    s.ranged(&host, A_PENUMBRA);
    attenuation_fields(b);
}

fn rect_area_fields(b: &mut FolderBuilder) {
    let host = b.host();
    let s = b.root();
    s.bind_with(&host, A_WIDTH, InputOptions::new().min(0.0), false);
    s.bind_with(&host, A_HEIGHT, InputOptions::new().min(0.0), false);
}
