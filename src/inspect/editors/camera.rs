//! Camera fields. Every change flags the camera so its projection is rebuilt.

use crate::entities::caps;
use crate::entities::keys::*;
use crate::inspect::dispatch::DispatchRule;
use crate::widgets::pane::InputOptions;

pub(super) fn rules() -> Vec<DispatchRule> {
    vec![
        DispatchRule::new("camera", |n| n.has_cap(caps::CAMERA), |b| {
            let host = b.host();
            b.root().bind_refresh(&host, A_NEAR);
            b.root().bind_refresh(&host, A_FAR);
        }),
        DispatchRule::new("perspective_camera", |n| n.has_cap(caps::PERSPECTIVE_CAMERA), |b| {
            let host = b.host();
            let s = b.root();
            s.bind_with(&host, A_FOV, InputOptions::new().range(1.0, 179.0).step(1.0), true);
            s.bind_with(&host, A_ZOOM, InputOptions::new().min(0.01), true);
        }),
    ]
}
