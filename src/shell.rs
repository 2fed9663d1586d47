//! Shared shell module for standalone binary targets.
//!
//! Provides logger setup, the demo scene and the per-frame driving of an
//! inspector over it.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use log::{debug, info};
use serde_json::json;

use crate::config::InspectorSettings;
use crate::core::{EventBus, FrameTickEvent, downcast_event};
use crate::entities::keys::*;
use crate::entities::{AttrValue, SceneLibrary, SceneNode};
use crate::inspect::{Inspector, InspectorToggledEvent, SelectionChangedEvent, TreeReconciledEvent};
use crate::widgets::pane::InputOptions;

/// Trails alive at once
pub const MAX_TRAILS: usize = 20;
/// Frames between trail spawns
pub const TRAIL_EVERY: u64 = 30;
/// Title of the host control pane
pub const GAME_PANE: &str = "Game";

const VERTEX_SHADER: &str = "varying vec3 vColor;\nattribute vec3 colors;\n\nvoid main() {\n  vColor = colors;\n  gl_Position = projectionMatrix * modelViewMatrix * vec4(position, 1.0);\n}\n";
const FRAGMENT_SHADER: &str = "uniform vec3 color1;\nuniform vec3 color2;\nvarying vec3 vColor;\n\nvoid main() {\n  gl_FragColor = vec4(mix(color1, color2, vColor.x), 1.0);\n}\n";

/// Console logger for tests and tools (respects RUST_LOG, default warn).
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .filter_module("egui", log::LevelFilter::Info)
        .format_timestamp_millis()
        .try_init();
}

/// Demo scene: camera, lights, a rotating box, a floor, a shader mesh and
/// trails that come and go.
pub fn build_demo_scene(lib: &SceneLibrary) -> SceneNode {
    let scene = lib.scene("Scene");

    let camera_rig = lib.group("Camera");
    let camera = lib.perspective_camera("", 50.0, -200.0, 200.0);
    camera.set_attr(A_POSITION, AttrValue::Vec3([1.0, 1.0, 1.0]));
    camera_rig.add(&camera);
    scene.add(&camera_rig);

    scene.add(&lib.ambient_light("", 0xffffff, 0.3));

    let directional = lib.directional_light("", 0xffffff, 1.0);
    directional.set_attr(A_CAST_SHADOW, AttrValue::Bool(true));
    directional.set_attr(A_SHADOW_NORMAL_BIAS, AttrValue::Float(-0.1));
    directional.set_attr(A_POSITION, AttrValue::Vec3([5.0, 20.0, 2.5]));
    scene.add(&directional);

    let rect = lib.rect_area_light("", 0xff0000, 0.5, 30.0, 30.0);
    rect.set_attr(A_POSITION, AttrValue::Vec3([0.0, 0.1, 0.0]));
    rect.set_attr(A_ROTATION, AttrValue::Vec3([std::f32::consts::FRAC_PI_2, 0.0, 0.0]));
    scene.add(&rect);

    let boxy = lib.mesh("Box", lib.mesh_physical_material(""));
    boxy.set_attr(A_CAST_SHADOW, AttrValue::Bool(true));
    boxy.set_attr(A_RECEIVE_SHADOW, AttrValue::Bool(true));
    boxy.set_attr(A_POSITION, AttrValue::Vec3([0.0, 1.5, 0.0]));
    scene.add(&boxy);

    let dodecahedrons = lib.instanced_mesh("Dodecahedrons", lib.mesh_physical_material(""), 30);
    dodecahedrons.set_attr(A_CAST_SHADOW, AttrValue::Bool(true));
    dodecahedrons.set_attr(A_RECEIVE_SHADOW, AttrValue::Bool(true));
    boxy.add(&dodecahedrons);

    let floor = lib.mesh("Floor", lib.mesh_standard_material(""));
    floor.set_attr(A_CAST_SHADOW, AttrValue::Bool(true));
    floor.set_attr(A_RECEIVE_SHADOW, AttrValue::Bool(true));
    scene.add(&floor);

    let uniforms = lib.uniforms(&[
        ("color1", json!({"x": 1, "y": 1, "z": 0})),
        ("color2", json!({"x": 0, "y": 1, "z": 1})),
    ]);
    let shader = lib.mesh("Shader Mesh", lib.shader_material("", uniforms, VERTEX_SHADER, FRAGMENT_SHADER));
    shader.set_attr(A_CAST_SHADOW, AttrValue::Bool(true));
    shader.set_attr(A_RECEIVE_SHADOW, AttrValue::Bool(true));
    shader.set_attr(A_POSITION, AttrValue::Vec3([10.0, 1.0, 0.0]));
    scene.add(&shader);

    scene
}

/// Host state shared by binaries: the scene, its inspector and the bus the
/// frame hook runs on.
pub struct Shell {
    pub library: Rc<SceneLibrary>,
    pub scene: SceneNode,
    pub bus: EventBus,
    pub inspector: Inspector,
    trails: VecDeque<SceneNode>,
    spawned: u64,
    frame: u64,
    paused: Rc<Cell<bool>>,
    spawn_requested: Rc<Cell<bool>>,
    /// Last status line worth showing
    pub status: String,
}

impl Shell {
    pub fn new(settings: InspectorSettings) -> Self {
        let library = Rc::new(SceneLibrary::new());
        let scene = build_demo_scene(&library);
        let bus = EventBus::new();
        let inspector = Inspector::new(&[scene.clone()], Rc::clone(&library), settings, bus.clone());
        Self {
            library,
            scene,
            bus,
            inspector,
            trails: VecDeque::new(),
            spawned: 0,
            frame: 0,
            paused: Rc::new(Cell::new(false)),
            spawn_requested: Rc::new(Cell::new(false)),
            status: String::new(),
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn trail_count(&self) -> usize {
        self.trails.len()
    }

    /// Advance the demo by one frame and fire the frame hook.
    pub fn tick(&mut self, time: f64) {
        self.frame += 1;
        self.animate(time);
        self.bus.dispatch(&FrameTickEvent {
            frame: self.frame,
            time,
        });
    }

    pub fn is_paused(&self) -> bool {
        self.paused.get()
    }

    /// Host controls on the inspector: pause the animation, spawn a trail.
    /// Added once per enabled period; the inspector removes it on disable.
    pub fn add_game_pane(&self) -> bool {
        if self.inspector.panes().iter().any(|p| p.title() == GAME_PANE) {
            return false;
        }
        let Some(pane) = self.inspector.add_pane(GAME_PANE) else {
            return false;
        };
        let paused = Rc::clone(&self.paused);
        pane.add_input("paused", AttrValue::Bool(paused.get()), InputOptions::new())
            .on_change(move |v| paused.set(v.as_bool().unwrap_or(false)));
        let requested = Rc::clone(&self.spawn_requested);
        pane.add_button("spawn trail").on_click(move || requested.set(true));
        true
    }

    fn animate(&mut self, time: f64) {
        if self.spawn_requested.take() {
            self.spawn_trail();
        }
        if self.paused.get() {
            return;
        }
        if let Some(boxy) = self.scene.find_by_name("Box") {
            let [x, y, z] = boxy.with_attrs(|a| a.get_vec3(A_ROTATION)).unwrap_or([0.0; 3]);
            boxy.set_attr(A_ROTATION, AttrValue::Vec3([x, y + 0.01, z]));
        }

        if self.frame % TRAIL_EVERY == 0 {
            self.spawn_trail();
        }

        let t = time as f32 / 10.0;
        for (i, trail) in self.trails.iter().enumerate() {
            let phase = i as f32 * 0.7;
            let target = [(t + phase).sin() * 5.0, 7.0 + (t * 1.3 + phase).cos() * 3.0, (t * 0.7 + phase).sin() * 10.0];
            let [x, y, z] = trail.with_attrs(|a| a.get_vec3(A_POSITION)).unwrap_or(target);
            let lerp = |a: f32, b: f32| a + (b - a) * 0.05;
            trail.set_attr(A_POSITION, AttrValue::Vec3([lerp(x, target[0]), lerp(y, target[1]), lerp(z, target[2])]));
        }
    }

    fn spawn_trail(&mut self) {
        if self.trails.len() >= MAX_TRAILS {
            if let Some(old) = self.trails.pop_front() {
                debug!("retiring '{}'", old.name());
                old.remove_from_parent();
            }
        }
        self.spawned += 1;
        let trail = self.library.line(&format!("Trail {}", self.spawned), self.library.line_basic_material(""));
        trail.set_attr(A_POSITION, AttrValue::Vec3([0.0, 7.0, 0.0]));
        self.scene.add(&trail);
        self.trails.push_back(trail);
    }

    /// Drain queued events, keeping the last interesting one as status.
    pub fn process_events(&mut self) -> usize {
        let events = self.bus.poll();
        for event in &events {
            if let Some(e) = downcast_event::<SelectionChangedEvent>(event) {
                self.status = match &e.node {
                    Some(node) => format!("Selected {} ({})", node.display_name(), node.kind()),
                    None => "Nothing selected".to_string(),
                };
            } else if let Some(e) = downcast_event::<TreeReconciledEvent>(event) {
                debug!("tree: +{} -{} ~{} = {}", e.added, e.removed, e.moved, e.total);
            } else if let Some(e) = downcast_event::<InspectorToggledEvent>(event) {
                info!("inspector {}", if e.enabled { "on" } else { "off" });
                if e.enabled && self.inspector.is_enabled() {
                    self.add_game_pane();
                }
                self.status = format!("Inspector {}", if e.enabled { "enabled" } else { "disabled" });
            }
        }
        events.len()
    }

    /// One line per top-level node, for the central panel.
    pub fn summary(&self) -> Vec<String> {
        self.scene
            .children()
            .iter()
            .map(|n| {
                let position = n.with_attrs(|a| a.get_vec3(A_POSITION)).unwrap_or([0.0; 3]);
                format!(
                    "{:<16} {:<22} [{:>7.2} {:>7.2} {:>7.2}]  {} children",
                    n.display_name(),
                    n.kind(),
                    position[0],
                    position[1],
                    position[2],
                    n.child_count()
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::helpers::count_helpers;

    #[test]
    fn test_demo_scene_layout() {
        let lib = SceneLibrary::new();
        let scene = build_demo_scene(&lib);
        assert_eq!(scene.child_count(), 7);
        let boxy = scene.find_by_name("Box").unwrap();
        assert_eq!(boxy.child(0).unwrap().name(), "Dodecahedrons");
        assert!(scene.find_by_name("Shader Mesh").unwrap().material().is_some());
        assert_eq!(count_helpers(&scene), 0);
    }

    #[test]
    fn test_trails_spawn_and_retire() {
        let mut shell = Shell::new(InspectorSettings::default());
        shell.inspector.enable();
        let base = shell.scene.subtree_len();
        for i in 0..(TRAIL_EVERY * (MAX_TRAILS as u64 + 5)) {
            shell.tick(i as f64 / 60.0);
        }
        assert_eq!(shell.trail_count(), MAX_TRAILS);
        assert_eq!(shell.scene.subtree_len(), base + MAX_TRAILS);
        assert_eq!(shell.inspector.tracked_len(), base + MAX_TRAILS);
        assert!(shell.process_events() > 0);
        shell.inspector.disable();
    }

    #[test]
    fn test_game_pane_controls() {
        let mut shell = Shell::new(InspectorSettings::default());
        shell.inspector.enable();
        shell.inspector.enable();
        shell.process_events();
        shell.process_events();
        let panes = shell.inspector.panes();
        assert_eq!(panes.len(), 1);
        let game = &panes[0];
        assert_eq!(game.title(), GAME_PANE);

        let root = game.roots();
        game.edit(root[0], AttrValue::Bool(true));
        assert!(shell.is_paused());
        shell.tick(0.0);
        let boxy = shell.scene.find_by_name("Box").unwrap();
        assert_eq!(boxy.with_attrs(|a| a.get_vec3(A_ROTATION)), Some([0.0; 3]));

        game.click(root[1]);
        shell.tick(0.016);
        assert_eq!(shell.trail_count(), 1);

        shell.inspector.disable();
        assert!(shell.inspector.panes().is_empty());
        assert_eq!(game.widget_count(), 0);
    }

    #[test]
    fn test_box_rotates() {
        let mut shell = Shell::new(InspectorSettings::default());
        shell.tick(0.0);
        shell.tick(0.016);
        let boxy = shell.scene.find_by_name("Box").unwrap();
        let rotation = boxy.with_attrs(|a| a.get_vec3(A_ROTATION)).unwrap();
        assert!((rotation[1] - 0.02).abs() < 1e-6);
    }
}
