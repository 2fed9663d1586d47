//! Object3D fields and the forward helper toggle.

use crate::entities::caps;
use crate::entities::keys::*;
use crate::inspect::binder::FolderBuilder;
use crate::inspect::dispatch::DispatchRule;
use crate::widgets::pane::InputOptions;

pub(super) fn object_rule() -> DispatchRule {
    DispatchRule::new("object", |n| n.has_cap(caps::OBJECT3D), object_fields)
}

fn object_fields(b: &mut FolderBuilder) {
    let host = b.host();
    let s = b.root();

    s.bind(&host, A_VISIBLE);
    for key in [A_POSITION, A_ROTATION, A_SCALE] {
        s.bind_with(&host, key, InputOptions::new().step(0.1), false);
    }
    s.bind(&host, A_CAST_SHADOW);
    s.bind(&host, A_RECEIVE_SHADOW);
    s.bind(&host, A_FRUSTUM_CULLED);
    s.bind(&host, A_RENDER_ORDER);

    let helpers = &b.context().helpers;
    helpers.attach_toggle(s, "forwardHelper", helpers.forward_slot(b.node()));
}
