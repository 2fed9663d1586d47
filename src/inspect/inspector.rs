//! Inspector - lifecycle owner wiring walker, tree sync and binder to a host.
//!
//! While enabled the inspector holds one root [`DisposerList`] with the tree
//! teardown (tracked nodes, cascading to any folder bound to them), the open
//! folder, the frame-hook subscription and any extra panes the host added.
//! Disabling drains it, so afterwards no helper stays attached and no widget
//! or listener survives.
//!
//! Events are raised only after the internal state borrow is released;
//! handlers may call back into the inspector.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use eframe::egui::Ui;
use log::{debug, info, trace};

use super::binder::{BindContext, Folder, NoTextures, PaneBinder, TexturePicker};
use super::dispatch::{DispatchRule, DispatchTable};
use super::inspect_events::{InspectorToggledEvent, SelectionChangedEvent, TreeReconciledEvent};
use super::tree_sync::{SyncReport, TreeSync};
use super::walker::SceneWalker;
use crate::config::InspectorSettings;
use crate::core::{DisposerList, EventBus, FrameTickEvent};
use crate::entities::{SceneLibrary, SceneNode};
use crate::widgets::outliner::{self, ItemId, OutlinerActions, TreeModel};
use crate::widgets::pane::{self, Pane, WidgetId};

struct State {
    settings: InspectorSettings,
    enabled: bool,
    ticks: u64,
    walker: SceneWalker,
    sync: TreeSync,
    binder: PaneBinder,
    folder: Option<Folder>,
    /// Host panes from [`Inspector::add_pane`], alive while enabled
    panes: Vec<Pane>,
    disposers: Option<DisposerList>,
}

struct Inner {
    bus: EventBus,
    pane: Pane,
    state: RefCell<State>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        let st = self.state.get_mut();
        if let Some(list) = st.disposers.take() {
            // Weak handles in the list can no longer upgrade; tear down here.
            if let Some(folder) = st.folder.take() {
                folder.dispose();
            }
            st.sync.clear();
            list.dispose();
        }
    }
}

/// Live scene inspector. Cheap to clone; clones share one instance.
#[derive(Clone)]
pub struct Inspector {
    inner: Rc<Inner>,
}

impl Inspector {
    /// Disabled inspector over `roots`. The host dispatches
    /// [`FrameTickEvent`] on `bus` every frame.
    pub fn new(roots: &[SceneNode], library: Rc<SceneLibrary>, settings: InspectorSettings, bus: EventBus) -> Self {
        let pane = Pane::new(settings.pane_title.as_str());
        let mut ctx = BindContext::new(Rc::clone(&library), Rc::new(NoTextures));
        ctx.unit_range = settings.unit_range();
        let binder = PaneBinder::new(pane.clone(), DispatchTable::with_defaults(library), ctx);
        let mut sync = TreeSync::new();
        sync.set_expand_new(settings.expand_new_items);

        Self {
            inner: Rc::new(Inner {
                bus,
                pane,
                state: RefCell::new(State {
                    settings,
                    enabled: false,
                    ticks: 0,
                    walker: SceneWalker::new(roots),
                    sync,
                    binder,
                    folder: None,
                    panes: Vec::new(),
                    disposers: None,
                }),
            }),
        }
    }

    pub fn with_picker(self, picker: Rc<dyn TexturePicker>) -> Self {
        self.set_texture_picker(picker);
        self
    }

    pub fn set_texture_picker(&self, picker: Rc<dyn TexturePicker>) {
        self.inner.state.borrow_mut().binder.context_mut().picker = picker;
    }

    /// Append a dispatch rule. Takes effect on the next selection.
    pub fn push_rule(&self, rule: DispatchRule) {
        self.inner.state.borrow_mut().binder.table_mut().push(rule);
    }

    pub fn add_root(&self, root: &SceneNode) {
        self.inner.state.borrow_mut().walker.add_root(root);
    }

    pub fn bus(&self) -> &EventBus {
        &self.inner.bus
    }

    pub fn pane(&self) -> &Pane {
        &self.inner.pane
    }

    pub fn settings(&self) -> InspectorSettings {
        self.inner.state.borrow().settings.clone()
    }

    pub fn set_poll_interval(&self, frames: u32) {
        self.inner.state.borrow_mut().settings.poll_interval = frames.max(1);
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.state.borrow().enabled
    }

    /// Root disposer list while enabled. Actions pushed here run on disable.
    pub fn disposers(&self) -> Option<DisposerList> {
        self.inner.state.borrow().disposers.clone()
    }

    // ========== Lifecycle ==========

    /// Start observing. Returns false if already enabled.
    pub fn enable(&self) -> bool {
        {
            let mut st = self.inner.state.borrow_mut();
            if st.enabled {
                return false;
            }
            st.enabled = true;
            st.ticks = 0;
            st.walker.reset();

            let list = DisposerList::new("inspector");
            let weak = Rc::downgrade(&self.inner);
            list.push(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.state.borrow_mut().sync.clear();
                }
            });
            let weak = Rc::downgrade(&self.inner);
            list.push(move || {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let folder = inner.state.borrow_mut().folder.take();
                if let Some(folder) = folder {
                    folder.dispose();
                }
            });
            let weak: Weak<Inner> = Rc::downgrade(&self.inner);
            let token = self.inner.bus.subscribe::<FrameTickEvent, _>(move |tick| {
                if let Some(inner) = weak.upgrade() {
                    Inspector { inner }.on_frame(tick);
                }
            });
            let bus = self.inner.bus.clone();
            list.push(move || {
                bus.unsubscribe(token);
            });
            st.disposers = Some(list);
        }
        info!("inspector enabled");
        self.inner.bus.emit(InspectorToggledEvent { enabled: true });
        self.refresh();
        true
    }

    /// Stop observing and remove everything the inspector created. Returns
    /// false if already disabled.
    pub fn disable(&self) -> bool {
        let (list, had_folder) = {
            let mut st = self.inner.state.borrow_mut();
            if !st.enabled {
                return false;
            }
            st.enabled = false;
            (st.disposers.take(), st.folder.is_some())
        };
        if let Some(list) = list {
            list.dispose();
        }
        self.inner.state.borrow_mut().walker.reset();
        info!("inspector disabled");
        if had_folder {
            self.inner.bus.emit(SelectionChangedEvent { node: None });
        }
        self.inner.bus.emit(InspectorToggledEvent { enabled: false });
        true
    }

    /// Same as [`Inspector::disable`]; safe to call any number of times.
    pub fn dispose(&self) {
        self.disable();
    }

    pub fn toggle(&self) -> bool {
        if self.is_enabled() {
            self.disable();
        } else {
            self.enable();
        }
        self.is_enabled()
    }

    fn on_frame(&self, tick: &FrameTickEvent) {
        let due = {
            let mut st = self.inner.state.borrow_mut();
            if !st.enabled {
                return;
            }
            st.ticks += 1;
            st.ticks % st.settings.poll_every() == 0
        };
        if due {
            trace!("inspector poll at frame {}", tick.frame);
            self.refresh();
        }
    }

    /// Observe the graph now and reconcile the tree. None while disabled.
    ///
    /// The open folder follows the live node: its inputs are refreshed from
    /// the current property values, and it is rebuilt when the node's
    /// material was swapped.
    pub fn refresh(&self) -> Option<SyncReport> {
        let (report, total, cleared, rebuild) = {
            let mut guard = self.inner.state.borrow_mut();
            let st = &mut *guard;
            if !st.enabled {
                return None;
            }
            let obs = st.walker.observe();
            let report = st.sync.reconcile(&obs);
            // A removed node's tracked list already disposed its folder.
            let orphaned = st.folder.as_ref().is_some_and(Folder::is_disposed);
            if orphaned {
                st.folder = None;
                st.sync.select(None);
            }
            let rebuild = st
                .folder
                .as_ref()
                .filter(|f| obs.swapped.contains(&f.node_uuid()))
                .and_then(Folder::node);
            if rebuild.is_none() {
                if let Some(folder) = &st.folder {
                    let changed = folder.sync();
                    if changed > 0 {
                        trace!("inspector: {changed} inputs refreshed from the live node");
                    }
                }
            }
            let cleared = orphaned || report.selection_cleared;
            (report, st.sync.len(), cleared, rebuild)
        };

        if !report.is_empty() {
            self.inner.bus.emit(TreeReconciledEvent {
                added: report.added.len(),
                removed: report.removed.len(),
                moved: report.moved.len(),
                total,
            });
        }
        if cleared {
            debug!("inspector: selected node left the graph");
            self.inner.bus.emit(SelectionChangedEvent { node: None });
        }
        if let Some(node) = rebuild {
            debug!("inspector: material of '{}' swapped, rebuilding", node.display_name());
            self.select_node(&node);
        }
        Some(report)
    }

    // ========== Selection ==========

    /// Select the node behind a tree item. Unknown items clear the selection.
    pub fn select_item(&self, item: ItemId) -> bool {
        let node = self.inner.state.borrow().sync.node_of(item);
        match node {
            Some(node) => self.select_node(&node),
            None => {
                self.clear_selection();
                false
            }
        }
    }

    /// Build the folder for `node`, replacing the current one. False if the
    /// inspector is disabled or the node is not reachable.
    pub fn select_node(&self, node: &SceneNode) -> bool {
        let tracked = {
            let st = self.inner.state.borrow();
            if !st.enabled {
                return false;
            }
            st.sync.tracked(&node.uuid()).is_some()
        };
        if !tracked {
            self.refresh();
        }

        let (had_folder, built) = {
            let mut guard = self.inner.state.borrow_mut();
            let st = &mut *guard;
            let old = st.folder.take();
            if let Some(old) = &old {
                old.dispose();
            }

            let walker = &st.walker;
            let folder = match st.sync.tracked(&node.uuid()) {
                Some(_) => st.binder.build(node, &|n| walker.is_reachable(n)),
                None => None,
            };
            let built = match folder {
                Some(folder) => {
                    if let Some(t) = st.sync.tracked(&node.uuid()) {
                        t.disposers().push_list(folder.disposers());
                    }
                    st.sync.select(Some(&node.uuid()));
                    debug!("inspector: selected '{}' ({:?})", node.display_name(), folder.rules());
                    st.folder = Some(folder);
                    true
                }
                None => {
                    debug!("inspector: '{}' not reachable, selection cleared", node.display_name());
                    st.sync.select(None);
                    false
                }
            };
            (old.is_some(), built)
        };

        if built || had_folder {
            self.inner.bus.emit(SelectionChangedEvent {
                node: built.then(|| node.clone()),
            });
        }
        built
    }

    /// Dispose the open folder, if any.
    pub fn clear_selection(&self) {
        let old = {
            let mut st = self.inner.state.borrow_mut();
            st.sync.select(None);
            st.folder.take()
        };
        if let Some(folder) = old {
            folder.dispose();
            self.inner.bus.emit(SelectionChangedEvent { node: None });
        }
    }

    /// Node of the open folder.
    pub fn selected(&self) -> Option<SceneNode> {
        self.inner.state.borrow().folder.as_ref().and_then(Folder::node)
    }

    /// Widget id of the open folder.
    pub fn folder_id(&self) -> Option<WidgetId> {
        self.inner.state.borrow().folder.as_ref().map(Folder::id)
    }

    /// Rules that generated the open folder, in order.
    pub fn folder_rules(&self) -> Vec<String> {
        self.inner
            .state
            .borrow()
            .folder
            .as_ref()
            .map(|f| f.rules().to_vec())
            .unwrap_or_default()
    }

    // ========== Tree ==========

    pub fn tracked_len(&self) -> usize {
        self.inner.state.borrow().sync.len()
    }

    pub fn item_of(&self, node: &SceneNode) -> Option<ItemId> {
        self.inner.state.borrow().sync.item_of(&node.uuid())
    }

    pub fn with_tree<R>(&self, f: impl FnOnce(&TreeModel) -> R) -> R {
        f(self.inner.state.borrow().sync.tree())
    }

    // ========== Host panes ==========

    /// Extra pane for host controls, shown next to the inspector pane and
    /// removed with everything else on disable. None while disabled.
    pub fn add_pane(&self, title: &str) -> Option<Pane> {
        let (list, pane) = {
            let mut st = self.inner.state.borrow_mut();
            let list = st.disposers.clone()?;
            let pane = Pane::new(title);
            st.panes.push(pane.clone());
            (list, pane)
        };
        let weak = Rc::downgrade(&self.inner);
        let owned = pane.clone();
        list.push(move || {
            owned.clear();
            if let Some(inner) = weak.upgrade() {
                inner.state.borrow_mut().panes.retain(|p| !p.ptr_eq(&owned));
            }
        });
        debug!("inspector: pane '{title}' added");
        Some(pane)
    }

    /// Host panes, in creation order.
    pub fn panes(&self) -> Vec<Pane> {
        self.inner.state.borrow().panes.clone()
    }

    // ========== UI ==========

    /// Draw the outliner and apply the selection it reports.
    pub fn render_outliner(&self, ui: &mut Ui) -> OutlinerActions {
        let actions = {
            let st = self.inner.state.borrow();
            outliner::render(ui, st.sync.tree(), "scene_inspect_outliner")
        };
        match actions.selected {
            Some(Some(item)) => {
                self.select_item(item);
            }
            Some(None) => self.clear_selection(),
            None => {}
        }
        actions
    }

    /// Draw the pane. True if a widget changed.
    pub fn render_pane(&self, ui: &mut Ui) -> bool {
        pane::show(ui, &self.inner.pane)
    }

    /// Draw the host panes, each under its title. True if a widget changed.
    pub fn render_panes(&self, ui: &mut Ui) -> bool {
        let mut changed = false;
        for extra in self.panes() {
            ui.separator();
            ui.strong(extra.title());
            changed |= pane::show(ui, &extra);
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::keys::*;
    use crate::entities::{AttrValue, Attrs};
    use crate::inspect::helpers::count_helpers;
    use serde_json::json;
    use uuid::Uuid;

    fn inspector(scene: &SceneNode) -> Inspector {
        Inspector::new(
            &[scene.clone()],
            Rc::new(SceneLibrary::new()),
            InspectorSettings::default(),
            EventBus::new(),
        )
    }

    fn demo(lib: &SceneLibrary) -> SceneNode {
        let scene = lib.scene("Scene");
        let camera = lib.perspective_camera("Camera", 50.0, 0.1, 100.0);
        let sun = lib.directional_light("Sun", 0xffffff, 1.0);
        let boxy = lib.mesh("Box", lib.mesh_physical_material("Phys"));
        let floor = lib.mesh("Floor", lib.mesh_standard_material("FloorMat"));
        let uniforms = lib.uniforms(&[("a", json!(1))]);
        let shader = lib.mesh("Shader Mesh", lib.shader_material("", uniforms, "void main() {}", "void main() {}"));
        scene.add(&camera);
        scene.add(&sun);
        scene.add(&boxy);
        boxy.add(&lib.instanced_mesh("Instances", lib.mesh_basic_material(""), 10));
        scene.add(&floor);
        scene.add(&shader);
        scene
    }

    /// Reachable non-helper nodes counted straight from the graph.
    fn visible_count(node: &SceneNode) -> usize {
        if node.is_inspector_helper() {
            return 0;
        }
        1 + node.children().iter().map(visible_count).sum::<usize>()
    }

    fn record_selection(bus: &EventBus) -> Rc<RefCell<Vec<Option<Uuid>>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.subscribe::<SelectionChangedEvent, _>(move |e| sink.borrow_mut().push(e.uuid()));
        seen
    }

    #[test]
    fn test_enable_builds_tree() {
        let lib = SceneLibrary::new();
        let scene = demo(&lib);
        let insp = inspector(&scene);
        assert_eq!(insp.tracked_len(), 0);
        assert!(insp.enable());
        assert_eq!(insp.tracked_len(), visible_count(&scene));
        assert_eq!(insp.with_tree(|t| t.len()), insp.tracked_len());
        assert_eq!(insp.bus().subscriber_count::<FrameTickEvent>(), 1);
    }

    #[test]
    fn test_enable_disable_twice_idempotent() {
        let lib = SceneLibrary::new();
        let scene = demo(&lib);
        let insp = inspector(&scene);
        let before = scene.subtree_len();

        for _ in 0..2 {
            assert!(insp.enable());
            assert!(!insp.enable());
            let box_node = scene.find_by_name("Box").unwrap();
            assert!(insp.select_node(&box_node));
            assert!(insp.disable());
            assert!(!insp.disable());

            assert!(!insp.is_enabled());
            assert_eq!(insp.tracked_len(), 0);
            assert_eq!(insp.pane().widget_count(), 0);
            assert_eq!(insp.pane().listener_count(), 0);
            assert_eq!(insp.bus().subscriber_count::<FrameTickEvent>(), 0);
            assert_eq!(scene.subtree_len(), before);
        }
    }

    #[test]
    fn test_frame_tick_polls_at_interval() {
        let lib = SceneLibrary::new();
        let scene = lib.scene("Scene");
        let insp = inspector(&scene);
        insp.set_poll_interval(3);
        insp.enable();
        assert_eq!(insp.tracked_len(), 1);

        scene.add(&lib.group("late"));
        let bus = insp.bus().clone();
        bus.dispatch(&FrameTickEvent { frame: 1, time: 0.0 });
        bus.dispatch(&FrameTickEvent { frame: 2, time: 0.1 });
        assert_eq!(insp.tracked_len(), 1);
        bus.dispatch(&FrameTickEvent { frame: 3, time: 0.2 });
        assert_eq!(insp.tracked_len(), 2);

        insp.disable();
        scene.add(&lib.group("ignored"));
        bus.dispatch(&FrameTickEvent { frame: 4, time: 0.3 });
        assert_eq!(insp.tracked_len(), 0);
    }

    #[test]
    fn test_random_add_remove_keeps_counts() {
        let lib = SceneLibrary::new();
        let scene = demo(&lib);
        let insp = inspector(&scene);
        insp.enable();

        let mut seed: u64 = 0x9e37_79b9_7f4a_7c15;
        let mut next = move || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed
        };

        for step in 0..400 {
            let mut nodes = Vec::new();
            scene.traverse(&mut |n| {
                if !n.is_inspector_helper() {
                    nodes.push(n.clone());
                }
            });
            let pick = nodes[(next() % nodes.len() as u64) as usize].clone();
            match next() % 5 {
                0 | 1 => {
                    pick.add(&lib.group(&format!("n{step}")));
                }
                2 => {
                    if !pick.ptr_eq(&scene) {
                        pick.remove_from_parent();
                    }
                }
                3 => {
                    let target = nodes[(next() % nodes.len() as u64) as usize].clone();
                    if !pick.ptr_eq(&scene) {
                        target.add(&pick);
                    }
                }
                _ => {
                    insp.select_node(&pick);
                    if let Some(toggle) = insp.folder_id().and_then(|f| insp.pane().find_input(f, "forwardHelper")) {
                        insp.pane().edit(toggle, AttrValue::Bool(next() % 2 == 0));
                    }
                }
            }
            insp.refresh();
            assert_eq!(insp.tracked_len(), visible_count(&scene), "step {step}");
            assert_eq!(insp.with_tree(|t| t.len()), insp.tracked_len());
            if let Some(selected) = insp.selected() {
                assert!(insp.item_of(&selected).is_some());
            }
        }

        insp.disable();
        assert_eq!(count_helpers(&scene), 0);
    }

    #[test]
    fn test_dispose_restores_baseline() {
        let lib = SceneLibrary::new();
        let scene = demo(&lib);
        let mut baseline: Vec<(SceneNode, Attrs, Option<Attrs>)> = Vec::new();
        scene.traverse(&mut |n| baseline.push((n.clone(), n.attrs(), n.material().map(|m| m.attrs()))));
        let total = scene.subtree_len();

        let insp = inspector(&scene);
        insp.enable();
        let pane = insp.pane().clone();

        let boxy = scene.find_by_name("Box").unwrap();
        insp.select_node(&boxy);
        let folder = insp.folder_id().unwrap();
        pane.edit(pane.find_input(folder, A_OPACITY).unwrap(), AttrValue::Float(0.5));
        pane.edit(pane.find_input(folder, "forwardHelper").unwrap(), AttrValue::Bool(true));

        let sun = scene.find_by_name("Sun").unwrap();
        insp.select_node(&sun);
        let folder = insp.folder_id().unwrap();
        pane.edit(pane.find_input(folder, "lightHelper").unwrap(), AttrValue::Bool(true));
        pane.edit(pane.find_input(folder, "forwardHelper").unwrap(), AttrValue::Bool(true));
        assert_eq!(count_helpers(&scene), 2);

        insp.select_node(&scene.find_by_name("Camera").unwrap());
        insp.dispose();
        insp.dispose();

        assert_eq!(scene.subtree_len(), total);
        assert_eq!(count_helpers(&scene), 0);
        for (node, attrs, material) in &baseline {
            assert_eq!(&node.attrs(), attrs, "{}", node.display_name());
            let now = node.material().map(|m| m.attrs());
            if node.ptr_eq(&boxy) {
                let mut expected = material.clone().unwrap();
                expected.set(A_OPACITY, AttrValue::Float(0.5));
                assert_eq!(now, Some(expected));
            } else {
                assert_eq!(&now, material, "{}", node.display_name());
            }
        }
        assert_eq!(pane.widget_count(), 0);
    }

    #[test]
    fn test_edit_touches_one_property() {
        let lib = SceneLibrary::new();
        let scene = demo(&lib);
        let insp = inspector(&scene);
        insp.enable();
        let floor = scene.find_by_name("Floor").unwrap();
        insp.select_node(&floor);

        let mut before = Vec::new();
        scene.traverse(&mut |n| before.push((n.clone(), n.attrs(), n.material().map(|m| m.attrs()))));

        let pane = insp.pane();
        let input = pane.find_input(insp.folder_id().unwrap(), A_POSITION).unwrap();
        assert!(pane.edit(input, AttrValue::Vec3([1.0, 2.0, 3.0])));

        for (node, attrs, material) in &before {
            assert_eq!(&node.material().map(|m| m.attrs()), material);
            let diff = node.attrs().diff_keys(attrs);
            if node.ptr_eq(&floor) {
                assert_eq!(diff, [A_POSITION.to_string()]);
            } else {
                assert!(diff.is_empty());
            }
        }
    }

    #[test]
    fn test_malformed_uniforms_kept() {
        let lib = SceneLibrary::new();
        let scene = demo(&lib);
        let insp = inspector(&scene);
        insp.enable();
        let shader = scene.find_by_name("Shader Mesh").unwrap();
        let material = shader.material().unwrap();
        let original = material.get_attr(A_UNIFORMS);
        insp.select_node(&shader);

        let pane = insp.pane();
        let input = pane.find_input(insp.folder_id().unwrap(), A_UNIFORMS).unwrap();
        pane.edit(input, AttrValue::Str("{\"a\": ".into()));
        assert_eq!(material.get_attr(A_UNIFORMS), original);
        assert!(!material.needs_update());
    }

    #[test]
    fn test_physical_folder_order() {
        let lib = SceneLibrary::new();
        let scene = demo(&lib);
        let insp = inspector(&scene);
        insp.enable();
        insp.select_node(&scene.find_by_name("Box").unwrap());
        let rules = insp.folder_rules();
        let at = |name: &str| rules.iter().position(|r| r == name).unwrap();
        assert!(at("material") < at("mesh_standard_material"));
        assert!(at("mesh_standard_material") < at("mesh_physical_material"));
    }

    #[test]
    fn test_forward_helper_attach_detach() {
        let lib = SceneLibrary::new();
        let scene = demo(&lib);
        let insp = inspector(&scene);
        insp.enable();
        let floor = scene.find_by_name("Floor").unwrap();
        insp.select_node(&floor);
        let pane = insp.pane();
        let toggle = pane.find_input(insp.folder_id().unwrap(), "forwardHelper").unwrap();

        pane.edit(toggle, AttrValue::Bool(true));
        pane.edit(toggle, AttrValue::Bool(true));
        assert_eq!(floor.child_count(), 1);
        let helper = floor.child(0).unwrap();
        assert!(helper.is_inspector_helper());

        let tracked = insp.tracked_len();
        insp.refresh();
        assert_eq!(insp.tracked_len(), tracked);

        pane.edit(toggle, AttrValue::Bool(false));
        assert_eq!(floor.child_count(), 0);
        assert!(helper.parent().is_none());
    }

    #[test]
    fn test_reselect_disposes_previous() {
        let lib = SceneLibrary::new();
        let scene = demo(&lib);
        let insp = inspector(&scene);
        insp.enable();
        let seen = record_selection(insp.bus());

        let boxy = scene.find_by_name("Box").unwrap();
        let sun = scene.find_by_name("Sun").unwrap();
        insp.select_node(&boxy);
        insp.select_node(&sun);
        assert_eq!(insp.pane().roots().len(), 1);
        assert!(insp.selected().unwrap().ptr_eq(&sun));
        assert_eq!(*seen.borrow(), [Some(boxy.uuid()), Some(sun.uuid())]);

        insp.clear_selection();
        assert_eq!(insp.pane().widget_count(), 0);
        assert_eq!(seen.borrow().last(), Some(&None));
    }

    #[test]
    fn test_removing_selected_clears() {
        let lib = SceneLibrary::new();
        let scene = demo(&lib);
        let insp = inspector(&scene);
        insp.enable();
        let seen = record_selection(insp.bus());

        let boxy = scene.find_by_name("Box").unwrap();
        insp.select_node(&boxy);
        let toggle = insp.pane().find_input(insp.folder_id().unwrap(), "forwardHelper").unwrap();
        insp.pane().edit(toggle, AttrValue::Bool(true));
        assert_eq!(count_helpers(&scene), 1);

        scene.remove(&boxy);
        let report = insp.refresh().unwrap();
        assert!(report.removed.contains(&boxy.uuid()));
        assert!(insp.selected().is_none());
        assert_eq!(insp.pane().widget_count(), 0);
        assert_eq!(count_helpers(&boxy), 0);
        assert_eq!(insp.with_tree(|t| t.selected()), None);
        assert_eq!(seen.borrow().last(), Some(&None));
    }

    #[test]
    fn test_detached_node_not_selected() {
        let lib = SceneLibrary::new();
        let scene = demo(&lib);
        let insp = inspector(&scene);
        insp.enable();
        let stray = lib.group("stray");
        assert!(!insp.select_node(&stray));
        assert!(insp.folder_id().is_none());
        assert_eq!(insp.pane().widget_count(), 0);
    }

    #[test]
    fn test_select_new_node_before_poll() {
        let lib = SceneLibrary::new();
        let scene = demo(&lib);
        let insp = inspector(&scene);
        insp.enable();
        let fresh = lib.group("fresh");
        scene.add(&fresh);
        assert!(insp.select_node(&fresh));
        assert!(insp.item_of(&fresh).is_some());
    }

    #[test]
    fn test_handlers_may_reenter() {
        let lib = SceneLibrary::new();
        let scene = demo(&lib);
        let insp = inspector(&scene);
        insp.enable();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (sink, handle) = (Rc::clone(&seen), insp.clone());
        insp.bus().subscribe::<SelectionChangedEvent, _>(move |_| {
            sink.borrow_mut().push((handle.tracked_len(), handle.folder_id().is_some()));
        });

        insp.select_node(&scene.find_by_name("Floor").unwrap());
        assert_eq!(*seen.borrow(), [(visible_count(&scene), true)]);
        insp.bus().clear();
    }

    #[test]
    fn test_select_item_from_tree() {
        let lib = SceneLibrary::new();
        let scene = demo(&lib);
        let insp = inspector(&scene);
        insp.enable();
        let camera = scene.find_by_name("Camera").unwrap();
        let item = insp.item_of(&camera).unwrap();
        assert!(insp.select_item(item));
        assert_eq!(insp.with_tree(|t| t.selected()), Some(item));
        assert_eq!(insp.folder_rules(), ["object", "camera", "perspective_camera"]);
        assert!(!insp.select_item(9_999));
        assert!(insp.selected().is_none());
    }

    #[test]
    fn test_material_swap_rebuilds_folder() {
        let lib = SceneLibrary::new();
        let scene = demo(&lib);
        let insp = inspector(&scene);
        insp.enable();
        let seen = record_selection(insp.bus());
        let floor = scene.find_by_name("Floor").unwrap();
        let old = floor.material().unwrap();
        insp.select_node(&floor);
        let before = insp.folder_id().unwrap();

        let fresh = lib.mesh_basic_material("Fresh");
        floor.set_material(Some(fresh.clone()));
        insp.refresh();

        let folder = insp.folder_id().unwrap();
        assert_ne!(folder, before);
        assert!(!insp.pane().contains(before));
        assert!(insp.folder_rules().contains(&"mesh_basic_material".to_string()));
        assert!(!insp.folder_rules().contains(&"mesh_standard_material".to_string()));
        assert_eq!(*seen.borrow(), [Some(floor.uuid()), Some(floor.uuid())]);

        let pane = insp.pane();
        pane.edit(pane.find_input(folder, A_OPACITY).unwrap(), AttrValue::Float(0.25));
        assert_eq!(fresh.get_attr(A_OPACITY), Some(AttrValue::Float(0.25)));
        assert_eq!(old.get_attr(A_OPACITY), Some(AttrValue::Float(1.0)));
    }

    #[test]
    fn test_reselection_keeps_tracked_list_bounded() {
        let lib = SceneLibrary::new();
        let scene = demo(&lib);
        let insp = inspector(&scene);
        insp.enable();
        let floor = scene.find_by_name("Floor").unwrap();
        let boxy = scene.find_by_name("Box").unwrap();
        let pending = || {
            insp.inner
                .state
                .borrow()
                .sync
                .tracked(&floor.uuid())
                .map(|t| t.disposers().len())
                .unwrap_or_default()
        };

        insp.select_node(&floor);
        let baseline = pending();
        for _ in 0..500 {
            insp.select_node(&boxy);
            insp.select_node(&floor);
        }
        assert!(pending() <= baseline + 1, "{} pending disposers", pending());
    }

    #[test]
    fn test_inputs_follow_live_values() {
        let lib = SceneLibrary::new();
        let scene = demo(&lib);
        let insp = inspector(&scene);
        insp.enable();
        let boxy = scene.find_by_name("Box").unwrap();
        insp.select_node(&boxy);
        let pane = insp.pane().clone();
        let rotation = pane.find_input(insp.folder_id().unwrap(), A_ROTATION).unwrap();

        let bus = insp.bus().clone();
        for frame in 1..=100 {
            let [x, y, z] = boxy.with_attrs(|a| a.get_vec3(A_ROTATION)).unwrap_or([0.0; 3]);
            boxy.set_attr(A_ROTATION, AttrValue::Vec3([x, y + 0.01, z]));
            bus.dispatch(&FrameTickEvent { frame, time: frame as f64 / 60.0 });
        }
        let live = boxy.get_attr(A_ROTATION);
        assert_eq!(pane.value(rotation), live);

        // Editing one component keeps the others the node has now.
        let Some(AttrValue::Vec3([_, y, z])) = pane.value(rotation) else {
            panic!("rotation input is not a vec3");
        };
        assert!(pane.edit(rotation, AttrValue::Vec3([0.5, y, z])));
        assert_eq!(boxy.get_attr(A_ROTATION), Some(AttrValue::Vec3([0.5, y, z])));
        assert!(y > 0.9);

        // Host-side colour change reaches the hex proxy.
        let sun = scene.find_by_name("Sun").unwrap();
        insp.select_node(&sun);
        let color = pane.find_input(insp.folder_id().unwrap(), A_COLOR).unwrap();
        sun.set_attr(A_COLOR, AttrValue::Color([1.0, 0.0, 0.0]));
        insp.refresh();
        assert_eq!(pane.value(color), Some(AttrValue::Str("#ff0000".into())));
    }

    #[test]
    fn test_host_pane_lives_while_enabled() {
        let lib = SceneLibrary::new();
        let scene = demo(&lib);
        let insp = inspector(&scene);
        assert!(insp.add_pane("Game").is_none());

        insp.enable();
        let game = insp.add_pane("Game").unwrap();
        let clicks = Rc::new(std::cell::Cell::new(0));
        let c = Rc::clone(&clicks);
        let button = game.add_button("spawn");
        button.on_click(move || c.set(c.get() + 1));
        game.click(button.id());
        assert_eq!(clicks.get(), 1);
        assert_eq!(insp.panes().len(), 1);
        assert!(insp.panes()[0].ptr_eq(&game));

        insp.disable();
        assert!(insp.panes().is_empty());
        assert_eq!(game.widget_count(), 0);
        assert_eq!(game.listener_count(), 0);
        assert!(!game.click(button.id()));

        insp.enable();
        assert!(insp.panes().is_empty());
    }

    #[test]
    fn test_drop_while_enabled_cleans_up() {
        let lib = SceneLibrary::new();
        let scene = demo(&lib);
        let bus = EventBus::new();
        let insp = Inspector::new(
            &[scene.clone()],
            Rc::new(SceneLibrary::new()),
            InspectorSettings::default(),
            bus.clone(),
        );
        insp.enable();
        let floor = scene.find_by_name("Floor").unwrap();
        insp.select_node(&floor);
        let toggle = insp.pane().find_input(insp.folder_id().unwrap(), "forwardHelper").unwrap();
        insp.pane().edit(toggle, AttrValue::Bool(true));
        drop(insp);
        assert_eq!(count_helpers(&scene), 0);
        assert_eq!(bus.subscriber_count::<FrameTickEvent>(), 0);
    }
}
