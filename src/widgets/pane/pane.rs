//! Retained widget tree: folders, typed inputs, separators and buttons.
//!
//! The pane owns the widget state and the listeners; egui only draws it (see
//! `pane_ui`). Handles are weak, so a handle outliving its pane is inert.
//!
//! Listener invocation always happens on a snapshot with the pane borrow
//! released, so listeners may add or dispose widgets (including their own).

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use log::{debug, trace};

use crate::entities::AttrValue;

pub type WidgetId = u64;
pub type ListenerId = u64;

type ChangeListener = Rc<dyn Fn(&AttrValue)>;
type ClickListener = Rc<dyn Fn()>;

/// How an input is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputView {
    #[default]
    Default,
    /// Multi-line text
    TextArea,
    /// Colour swatch plus `#rrggbb` text (string proxy)
    Color,
    /// Choices as a grid of radio buttons
    RadioGrid { columns: usize },
}

/// Presentation and validation options of an input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputOptions {
    pub label: Option<String>,
    pub min: Option<f32>,
    pub max: Option<f32>,
    pub step: Option<f32>,
    /// Enumerated values; when non-empty, edits outside this set are rejected
    pub choices: Vec<(String, AttrValue)>,
    pub view: InputView,
    pub readonly: bool,
}

impl InputOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn range(mut self, min: f32, max: f32) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn min(mut self, min: f32) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f32) -> Self {
        self.max = Some(max);
        self
    }

    pub fn step(mut self, step: f32) -> Self {
        self.step = Some(step);
        self
    }

    pub fn choices(mut self, choices: Vec<(String, AttrValue)>) -> Self {
        self.choices = choices;
        self
    }

    pub fn view(mut self, view: InputView) -> Self {
        self.view = view;
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    fn clamp(&self, v: f32) -> f32 {
        let v = self.min.map_or(v, |min| v.max(min));
        self.max.map_or(v, |max| v.min(max))
    }

    fn clamp_int(&self, v: i32) -> i32 {
        let v = self.min.map_or(v, |min| v.max(min.ceil() as i32));
        self.max.map_or(v, |max| v.min(max.floor() as i32))
    }

    /// Validate an edit against the current value: same kind (ints widen to
    /// floats), numbers clamped, choices enforced.
    fn accept(&self, current: &AttrValue, value: AttrValue) -> Option<AttrValue> {
        let value = match (current, value) {
            (AttrValue::Float(_), AttrValue::Int(i)) => AttrValue::Float(i as f32),
            (_, v) if v.same_kind(current) => v,
            _ => return None,
        };
        let value = match value {
            AttrValue::Float(v) => AttrValue::Float(self.clamp(v)),
            AttrValue::Int(v) => AttrValue::Int(self.clamp_int(v)),
            AttrValue::Vec2(v) => AttrValue::Vec2(v.map(|c| self.clamp(c))),
            AttrValue::Vec3(v) => AttrValue::Vec3(v.map(|c| self.clamp(c))),
            other => other,
        };
        if !self.choices.is_empty() && !self.choices.iter().any(|(_, c)| *c == value) {
            return None;
        }
        Some(value)
    }
}

/// What a widget is.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetKind {
    Folder { title: String, expanded: bool },
    Input { key: String, value: AttrValue, options: InputOptions },
    Separator,
    Button { title: String },
}

#[derive(Debug)]
pub(super) struct Widget {
    pub(super) parent: Option<WidgetId>,
    pub(super) kind: WidgetKind,
    pub(super) children: Vec<WidgetId>,
}

#[derive(Default)]
pub(super) struct PaneState {
    pub(super) title: String,
    pub(super) widgets: IndexMap<WidgetId, Widget>,
    pub(super) roots: Vec<WidgetId>,
    next_id: WidgetId,
    change_listeners: HashMap<WidgetId, Vec<(ListenerId, ChangeListener)>>,
    click_listeners: HashMap<WidgetId, Vec<(ListenerId, ClickListener)>>,
}

/// A panel of widgets. Cloning shares the pane.
#[derive(Clone)]
pub struct Pane {
    pub(super) state: Rc<RefCell<PaneState>>,
}

impl fmt::Debug for Pane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Pane")
            .field("title", &state.title)
            .field("widgets", &state.widgets.len())
            .finish()
    }
}

impl Pane {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            state: Rc::new(RefCell::new(PaneState {
                title: title.into(),
                next_id: 1,
                ..Default::default()
            })),
        }
    }

    pub fn title(&self) -> String {
        self.state.borrow().title.clone()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.state.borrow_mut().title = title.into();
    }

    /// Identity comparison of two handles.
    pub fn ptr_eq(&self, other: &Pane) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    // --- Construction ---

    pub fn add_folder(&self, title: impl Into<String>) -> FolderHandle {
        let id = self.add_widget(None, WidgetKind::Folder { title: title.into(), expanded: true });
        FolderHandle(self.handle(id))
    }

    pub fn add_input(&self, key: impl Into<String>, value: AttrValue, options: InputOptions) -> InputHandle {
        let id = self.add_widget(None, WidgetKind::Input { key: key.into(), value, options });
        InputHandle(self.handle(id))
    }

    pub fn add_separator(&self) -> WidgetHandle {
        let id = self.add_widget(None, WidgetKind::Separator);
        self.handle(id)
    }

    pub fn add_button(&self, title: impl Into<String>) -> ButtonHandle {
        let id = self.add_widget(None, WidgetKind::Button { title: title.into() });
        ButtonHandle(self.handle(id))
    }

    fn handle(&self, id: WidgetId) -> WidgetHandle {
        WidgetHandle {
            pane: Rc::downgrade(&self.state),
            id,
        }
    }

    /// Insert a widget under `parent` (None = top level).
    /// Adding under a disposed parent yields a detached, already-gone widget.
    fn add_widget(&self, parent: Option<WidgetId>, kind: WidgetKind) -> WidgetId {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;

        match parent {
            None => state.roots.push(id),
            Some(pid) => match state.widgets.get_mut(&pid) {
                Some(p) => p.children.push(id),
                None => {
                    debug!("add under disposed widget {pid} ignored");
                    return id;
                }
            },
        }
        trace!("pane '{}': add widget {id} {:?}", state.title, kind_name(&kind));
        state.widgets.insert(
            id,
            Widget {
                parent,
                kind,
                children: Vec::new(),
            },
        );
        id
    }

    // --- Disposal ---

    /// Remove every widget and listener.
    pub fn clear(&self) {
        for id in self.roots() {
            self.dispose_widget(id);
        }
    }

    /// Remove a widget, its descendants and all their listeners.
    /// Unknown or already removed ids are ignored.
    pub fn dispose_widget(&self, id: WidgetId) {
        let mut state = self.state.borrow_mut();
        let Some(widget) = state.widgets.get(&id) else {
            return;
        };
        match widget.parent {
            Some(pid) => {
                if let Some(p) = state.widgets.get_mut(&pid) {
                    p.children.retain(|c| *c != id);
                }
            }
            None => state.roots.retain(|c| *c != id),
        }

        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(w) = state.widgets.shift_remove(&cur) {
                stack.extend(w.children);
            }
            state.change_listeners.remove(&cur);
            state.click_listeners.remove(&cur);
        }
    }

    // --- Listeners ---

    fn next_listener_id(state: &mut PaneState) -> ListenerId {
        let id = state.next_id;
        state.next_id += 1;
        id
    }

    fn on_change(&self, id: WidgetId, f: ChangeListener) -> Option<ListenerId> {
        let mut state = self.state.borrow_mut();
        if !state.widgets.contains_key(&id) {
            return None;
        }
        let lid = Self::next_listener_id(&mut state);
        state.change_listeners.entry(id).or_default().push((lid, f));
        Some(lid)
    }

    fn on_click(&self, id: WidgetId, f: ClickListener) -> Option<ListenerId> {
        let mut state = self.state.borrow_mut();
        if !state.widgets.contains_key(&id) {
            return None;
        }
        let lid = Self::next_listener_id(&mut state);
        state.click_listeners.entry(id).or_default().push((lid, f));
        Some(lid)
    }

    fn off(&self, id: WidgetId, listener: ListenerId) -> bool {
        let mut state = self.state.borrow_mut();
        let mut removed = false;
        if let Some(list) = state.change_listeners.get_mut(&id) {
            let before = list.len();
            list.retain(|(l, _)| *l != listener);
            removed |= list.len() != before;
        }
        if let Some(list) = state.click_listeners.get_mut(&id) {
            let before = list.len();
            list.retain(|(l, _)| *l != listener);
            removed |= list.len() != before;
        }
        removed
    }

    // --- Interaction ---

    /// Simulate a user edit of input `id`.
    ///
    /// Returns false (and notifies nobody) when the widget is gone, not an
    /// input, readonly, or the value is of the wrong kind or not one of the
    /// enumerated choices. Numbers are clamped to the input's bounds.
    pub fn edit(&self, id: WidgetId, value: AttrValue) -> bool {
        let (stored, listeners) = {
            let mut state = self.state.borrow_mut();
            let stored = {
                let Some(widget) = state.widgets.get_mut(&id) else {
                    debug!("edit of missing widget {id} ignored");
                    return false;
                };
                let WidgetKind::Input { key, value: current, options } = &mut widget.kind else {
                    return false;
                };
                if options.readonly {
                    return false;
                }
                let Some(accepted) = options.accept(current, value) else {
                    debug!("edit of '{key}' rejected");
                    return false;
                };
                *current = accepted.clone();
                accepted
            };
            let listeners: Vec<ChangeListener> = state
                .change_listeners
                .get(&id)
                .map(|l| l.iter().map(|(_, f)| Rc::clone(f)).collect())
                .unwrap_or_default();
            (stored, listeners)
        };
        for listener in listeners {
            listener(&stored);
        }
        true
    }

    /// Simulate a click on button `id`. Returns false if it is not a live button.
    pub fn click(&self, id: WidgetId) -> bool {
        let listeners: Vec<ClickListener> = {
            let state = self.state.borrow();
            match state.widgets.get(&id) {
                Some(Widget { kind: WidgetKind::Button { .. }, .. }) => {}
                _ => return false,
            }
            state
                .click_listeners
                .get(&id)
                .map(|l| l.iter().map(|(_, f)| Rc::clone(f)).collect())
                .unwrap_or_default()
        };
        for listener in listeners {
            listener();
        }
        true
    }

    /// Overwrite an input's value without notifying listeners.
    pub fn set_value(&self, id: WidgetId, value: AttrValue) -> bool {
        let mut state = self.state.borrow_mut();
        match state.widgets.get_mut(&id) {
            Some(Widget { kind: WidgetKind::Input { value: current, .. }, .. }) => {
                *current = value;
                true
            }
            _ => false,
        }
    }

    pub fn set_expanded(&self, id: WidgetId, expanded: bool) -> bool {
        let mut state = self.state.borrow_mut();
        match state.widgets.get_mut(&id) {
            Some(Widget { kind: WidgetKind::Folder { expanded: e, .. }, .. }) => {
                *e = expanded;
                true
            }
            _ => false,
        }
    }

    pub fn set_label(&self, id: WidgetId, text: impl Into<String>) -> bool {
        let mut state = self.state.borrow_mut();
        match state.widgets.get_mut(&id).map(|w| &mut w.kind) {
            Some(WidgetKind::Folder { title, .. }) | Some(WidgetKind::Button { title }) => {
                *title = text.into();
                true
            }
            Some(WidgetKind::Input { options, .. }) => {
                options.label = Some(text.into());
                true
            }
            _ => false,
        }
    }

    // --- Queries ---

    pub fn contains(&self, id: WidgetId) -> bool {
        self.state.borrow().widgets.contains_key(&id)
    }

    pub fn widget_count(&self) -> usize {
        self.state.borrow().widgets.len()
    }

    /// Registered change and click listeners.
    pub fn listener_count(&self) -> usize {
        let state = self.state.borrow();
        let changes: usize = state.change_listeners.values().map(Vec::len).sum();
        let clicks: usize = state.click_listeners.values().map(Vec::len).sum();
        changes + clicks
    }

    pub fn kind(&self, id: WidgetId) -> Option<WidgetKind> {
        self.state.borrow().widgets.get(&id).map(|w| w.kind.clone())
    }

    pub fn value(&self, id: WidgetId) -> Option<AttrValue> {
        match self.state.borrow().widgets.get(&id)?.kind {
            WidgetKind::Input { ref value, .. } => Some(value.clone()),
            _ => None,
        }
    }

    pub fn roots(&self) -> Vec<WidgetId> {
        self.state.borrow().roots.clone()
    }

    pub fn children(&self, id: WidgetId) -> Vec<WidgetId> {
        self.state
            .borrow()
            .widgets
            .get(&id)
            .map(|w| w.children.clone())
            .unwrap_or_default()
    }

    /// All descendants of `id` in display order (pre-order), `id` excluded.
    pub fn descendants(&self, id: WidgetId) -> Vec<WidgetId> {
        let state = self.state.borrow();
        let mut out = Vec::new();
        let mut stack: Vec<WidgetId> = state
            .widgets
            .get(&id)
            .map(|w| w.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(cur) = stack.pop() {
            out.push(cur);
            if let Some(w) = state.widgets.get(&cur) {
                stack.extend(w.children.iter().rev().copied());
            }
        }
        out
    }

    /// Keys of the inputs below `id`, in display order.
    pub fn input_keys(&self, id: WidgetId) -> Vec<String> {
        self.descendants(id)
            .into_iter()
            .filter_map(|w| match self.kind(w) {
                Some(WidgetKind::Input { key, .. }) => Some(key),
                _ => None,
            })
            .collect()
    }

    /// First input with `key` below `id`.
    pub fn find_input(&self, id: WidgetId, key: &str) -> Option<WidgetId> {
        self.descendants(id).into_iter().find(|w| {
            matches!(self.kind(*w), Some(WidgetKind::Input { key: ref k, .. }) if k == key)
        })
    }

    /// First button titled `title` below `id`.
    pub fn find_button(&self, id: WidgetId, title: &str) -> Option<WidgetId> {
        self.descendants(id).into_iter().find(|w| {
            matches!(self.kind(*w), Some(WidgetKind::Button { title: ref t }) if t == title)
        })
    }

    /// First folder titled `title` below `id`.
    pub fn find_folder(&self, id: WidgetId, title: &str) -> Option<WidgetId> {
        self.descendants(id).into_iter().find(|w| {
            matches!(self.kind(*w), Some(WidgetKind::Folder { title: ref t, .. }) if t == title)
        })
    }
}

fn kind_name(kind: &WidgetKind) -> &'static str {
    match kind {
        WidgetKind::Folder { .. } => "folder",
        WidgetKind::Input { .. } => "input",
        WidgetKind::Separator => "separator",
        WidgetKind::Button { .. } => "button",
    }
}

/// Weak handle to one widget.
#[derive(Debug, Clone)]
pub struct WidgetHandle {
    pane: Weak<RefCell<PaneState>>,
    id: WidgetId,
}

impl WidgetHandle {
    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn pane(&self) -> Option<Pane> {
        self.pane.upgrade().map(|state| Pane { state })
    }

    /// Remove the widget and everything below it. Idempotent.
    pub fn dispose(&self) {
        if let Some(pane) = self.pane() {
            pane.dispose_widget(self.id);
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.pane().is_none_or(|p| !p.contains(self.id))
    }

    fn add(&self, kind: WidgetKind) -> WidgetHandle {
        let id = match self.pane() {
            Some(pane) => pane.add_widget(Some(self.id), kind),
            None => 0,
        };
        WidgetHandle {
            pane: self.pane.clone(),
            id,
        }
    }
}

/// Handle to a folder; children are added through it.
#[derive(Debug, Clone)]
pub struct FolderHandle(WidgetHandle);

impl FolderHandle {
    pub fn id(&self) -> WidgetId {
        self.0.id
    }

    pub fn pane(&self) -> Option<Pane> {
        self.0.pane()
    }

    pub fn add_folder(&self, title: impl Into<String>) -> FolderHandle {
        FolderHandle(self.0.add(WidgetKind::Folder { title: title.into(), expanded: true }))
    }

    pub fn add_input(&self, key: impl Into<String>, value: AttrValue, options: InputOptions) -> InputHandle {
        InputHandle(self.0.add(WidgetKind::Input { key: key.into(), value, options }))
    }

    pub fn add_separator(&self) -> WidgetHandle {
        self.0.add(WidgetKind::Separator)
    }

    pub fn add_button(&self, title: impl Into<String>) -> ButtonHandle {
        ButtonHandle(self.0.add(WidgetKind::Button { title: title.into() }))
    }

    pub fn set_title(&self, title: impl Into<String>) {
        if let Some(pane) = self.pane() {
            pane.set_label(self.id(), title);
        }
    }

    pub fn dispose(&self) {
        self.0.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.0.is_disposed()
    }
}

/// Handle to an input widget.
#[derive(Debug, Clone)]
pub struct InputHandle(WidgetHandle);

impl InputHandle {
    pub fn id(&self) -> WidgetId {
        self.0.id
    }

    /// Register a change listener. None if the widget is already gone.
    pub fn on_change(&self, f: impl Fn(&AttrValue) + 'static) -> Option<ListenerId> {
        self.0.pane()?.on_change(self.id(), Rc::new(f))
    }

    pub fn off(&self, listener: ListenerId) -> bool {
        self.0.pane().is_some_and(|p| p.off(self.id(), listener))
    }

    pub fn value(&self) -> Option<AttrValue> {
        self.0.pane()?.value(self.id())
    }

    /// Programmatic refresh; listeners are not notified.
    pub fn set_value(&self, value: AttrValue) -> bool {
        self.0.pane().is_some_and(|p| p.set_value(self.id(), value))
    }

    /// Same as a user edit.
    pub fn edit(&self, value: AttrValue) -> bool {
        self.0.pane().is_some_and(|p| p.edit(self.id(), value))
    }

    pub fn dispose(&self) {
        self.0.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.0.is_disposed()
    }
}

/// Handle to a button.
#[derive(Debug, Clone)]
pub struct ButtonHandle(WidgetHandle);

impl ButtonHandle {
    pub fn id(&self) -> WidgetId {
        self.0.id
    }

    pub fn on_click(&self, f: impl Fn() + 'static) -> Option<ListenerId> {
        self.0.pane()?.on_click(self.id(), Rc::new(f))
    }

    pub fn off(&self, listener: ListenerId) -> bool {
        self.0.pane().is_some_and(|p| p.off(self.id(), listener))
    }

    pub fn click(&self) -> bool {
        self.0.pane().is_some_and(|p| p.click(self.id()))
    }

    pub fn dispose(&self) {
        self.0.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.0.is_disposed()
    }
}
