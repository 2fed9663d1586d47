//! Pane/folder binder - builds a live editor folder for one selected node.
//!
//! The binder asks the dispatch table which generators apply to a node and
//! runs them in order against a [`FolderBuilder`]. Every widget a generator
//! creates is registered on the folder's disposer list before `build`
//! returns, so disposing the [`Folder`] removes all of it.
//!
//! Bindings write through [`PropertyHost`] weak handles and are pulled back
//! from the live property by [`Folder::sync`], so values changed by the host
//! (animation, scripts) show up in the pane. A write to a dropped
//! target is ignored; malformed text in proxy inputs (colour hex, JSON) is
//! ignored and the property keeps its prior value.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use log::{debug, trace};
use uuid::Uuid;

use super::dispatch::DispatchTable;
use super::helpers::HelperInjector;
use crate::core::DisposerList;
use crate::entities::{AttrValue, PropertyHost, SceneLibrary, SceneNode, Texture, WeakNode, color};
use crate::widgets::pane::{ButtonHandle, FolderHandle, InputHandle, InputOptions, InputView, Pane, WidgetId};

/// Source of textures for "assign" and "replace" actions.
pub trait TexturePicker {
    /// Texture for `slot`, or None when the user cancelled.
    fn pick(&self, slot: &str) -> Option<Texture>;
}

impl<F> TexturePicker for F
where
    F: Fn(&str) -> Option<Texture>,
{
    fn pick(&self, slot: &str) -> Option<Texture> {
        self(slot)
    }
}

/// Picker that never supplies anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTextures;

impl TexturePicker for NoTextures {
    fn pick(&self, _slot: &str) -> Option<Texture> {
        None
    }
}

/// Shared collaborators of every binding.
#[derive(Clone)]
pub struct BindContext {
    pub library: Rc<SceneLibrary>,
    pub helpers: HelperInjector,
    pub picker: Rc<dyn TexturePicker>,
    /// Bounds of unit-interval inputs (opacity, roughness, ...)
    pub unit_range: (f32, f32),
}

impl BindContext {
    pub fn new(library: Rc<SceneLibrary>, picker: Rc<dyn TexturePicker>) -> Self {
        Self {
            helpers: HelperInjector::new(Rc::clone(&library)),
            library,
            picker,
            unit_range: (0.0, 1.0),
        }
    }
}

/// Pulls one live property into its input; true if the input changed.
type Pull = Box<dyn Fn() -> bool>;
type Pulls = Rc<RefCell<Vec<Pull>>>;

/// One folder level: a folder widget plus the disposer list its widgets
/// register on.
#[derive(Clone)]
pub struct Section {
    folder: FolderHandle,
    disposers: DisposerList,
    ctx: BindContext,
    pulls: Pulls,
}

impl Section {
    /// Wrap `folder`; its removal is the first action registered on `disposers`.
    pub fn new(folder: FolderHandle, disposers: DisposerList, ctx: BindContext) -> Self {
        Self::with_pulls(folder, disposers, ctx, Pulls::default())
    }

    fn with_pulls(folder: FolderHandle, disposers: DisposerList, ctx: BindContext, pulls: Pulls) -> Self {
        let handle = folder.clone();
        disposers.push(move || handle.dispose());
        Self {
            folder,
            disposers,
            ctx,
            pulls,
        }
    }

    /// Copy the live values of every binding in this section tree into their
    /// inputs without notifying listeners. Returns how many inputs changed.
    pub fn sync(&self) -> usize {
        if self.disposers.is_disposed() {
            return 0;
        }
        self.pulls.borrow().iter().filter(|pull| pull()).count()
    }

    fn watch(&self, pull: impl Fn() -> bool + 'static) {
        self.pulls.borrow_mut().push(Box::new(pull));
    }

    pub fn id(&self) -> WidgetId {
        self.folder.id()
    }

    pub fn disposers(&self) -> &DisposerList {
        &self.disposers
    }

    pub fn context(&self) -> &BindContext {
        &self.ctx
    }

    /// Nested folder with its own disposer list, nested in this one.
    pub fn add_section(&self, title: &str) -> Section {
        let list = DisposerList::new(format!("section '{title}'"));
        self.disposers.push_list(&list);
        Section::with_pulls(self.folder.add_folder(title), list, self.ctx.clone(), Rc::clone(&self.pulls))
    }

    fn register_input(&self, input: &InputHandle) {
        let handle = input.clone();
        self.disposers.push(move || handle.dispose());
    }

    fn register_button(&self, button: &ButtonHandle) {
        let handle = button.clone();
        self.disposers.push(move || handle.dispose());
    }

    pub fn separator(&self) {
        let handle = self.folder.add_separator();
        self.disposers.push(move || handle.dispose());
    }

    /// Button with a click action, registered on this section.
    pub fn button(&self, title: &str, on_click: impl Fn() + 'static) -> ButtonHandle {
        let button = self.folder.add_button(title);
        button.on_click(on_click);
        self.register_button(&button);
        button
    }

    /// Input not backed by a property (e.g. helper toggles).
    pub fn toggle(&self, key: &str, initial: bool, on_change: impl Fn(bool) + 'static) -> InputHandle {
        let input = self.folder.add_input(key, AttrValue::Bool(initial), InputOptions::new());
        input.on_change(move |v| {
            if let Some(b) = v.as_bool() {
                on_change(b);
            }
        });
        self.register_input(&input);
        input
    }

    /// Bind `key` of `host` to an input. Skipped (None) when the property is
    /// missing. With `refresh`, every write also raises the host's
    /// needs-update flag.
    pub fn bind_with<H>(&self, host: &H, key: &str, options: InputOptions, refresh: bool) -> Option<InputHandle>
    where
        H: PropertyHost + Clone + 'static,
    {
        let value = host.get_attr(key)?;
        if matches!(value, AttrValue::Texture(_)) {
            self.texture_slot(host, key);
            return None;
        }
        let input = self.folder.add_input(key, value, options);
        let target = host.clone();
        let key = key.to_string();
        let (source, shown, pulled) = (host.clone(), input.clone(), key.clone());
        input.on_change(move |v| {
            if target.set_attr(&key, v.clone()) {
                if refresh {
                    target.mark_needs_update();
                }
            } else {
                debug!("write to '{key}' ignored: target dropped");
            }
        });
        self.watch(move || match source.get_attr(&pulled) {
            Some(live) if shown.value().is_some_and(|v| v != live) => shown.set_value(live),
            _ => false,
        });
        self.register_input(&input);
        Some(input)
    }

    pub fn bind<H>(&self, host: &H, key: &str) -> Option<InputHandle>
    where
        H: PropertyHost + Clone + 'static,
    {
        self.bind_with(host, key, InputOptions::new(), false)
    }

    /// Bind and flag the host for refresh on change.
    pub fn bind_refresh<H>(&self, host: &H, key: &str) -> Option<InputHandle>
    where
        H: PropertyHost + Clone + 'static,
    {
        self.bind_with(host, key, InputOptions::new(), true)
    }

    /// Bind with the unit range.
    pub fn ranged<H>(&self, host: &H, key: &str) -> Option<InputHandle>
    where
        H: PropertyHost + Clone + 'static,
    {
        let (min, max) = self.ctx.unit_range;
        self.bind_with(host, key, InputOptions::new().range(min, max), false)
    }

    /// Bind to a choice list drawn as a dropdown or radio grid.
    pub fn enumerated<H>(&self, host: &H, key: &str, choices: Vec<(String, i32)>, view: InputView) -> Option<InputHandle>
    where
        H: PropertyHost + Clone + 'static,
    {
        let choices = choices
            .into_iter()
            .map(|(name, v)| (name, AttrValue::Int(v)))
            .collect();
        self.bind_with(host, key, InputOptions::new().choices(choices).view(view), true)
    }

    /// Colour edited through a `#rrggbb` text proxy. Unparsable text is ignored.
    pub fn color<H>(&self, host: &H, key: &str) -> Option<InputHandle>
    where
        H: PropertyHost + Clone + 'static,
    {
        let Some(AttrValue::Color(rgb)) = host.get_attr(key) else {
            return None;
        };
        let input = self.folder.add_input(
            key,
            AttrValue::Str(color::to_hex(rgb)),
            InputOptions::new().view(InputView::Color),
        );
        let target = host.clone();
        let key = key.to_string();
        let (source, shown, pulled) = (host.clone(), input.clone(), key.clone());
        input.on_change(move |v| {
            let Some(rgb) = v.as_str().and_then(color::from_hex) else {
                trace!("'{key}': not a colour, ignored");
                return;
            };
            target.set_attr(&key, AttrValue::Color(rgb));
        });
        self.watch(move || {
            let Some(AttrValue::Color(live)) = source.get_attr(&pulled) else {
                return false;
            };
            let hex = color::to_hex(live);
            // Text that is not a colour yet is a pending user edit and stays.
            match shown.value() {
                Some(AttrValue::Str(text)) if color::from_hex(&text).is_some() && !text.eq_ignore_ascii_case(&hex) => {
                    shown.set_value(AttrValue::Str(hex))
                }
                _ => false,
            }
        });
        self.register_input(&input);
        Some(input)
    }

    /// Structured block edited as pretty-printed JSON. Parse failures keep
    /// the prior value; success flags the host for refresh.
    pub fn json<H>(&self, host: &H, key: &str) -> Option<InputHandle>
    where
        H: PropertyHost + Clone + 'static,
    {
        let Some(AttrValue::Json(value)) = host.get_attr(key) else {
            return None;
        };
        let text = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
        let input = self.folder.add_input(
            key,
            AttrValue::Str(text),
            InputOptions::new().view(InputView::TextArea),
        );
        let target = host.clone();
        let key = key.to_string();
        let (source, shown, pulled) = (host.clone(), input.clone(), key.clone());
        self.watch(move || {
            let Some(AttrValue::Json(live)) = source.get_attr(&pulled) else {
                return false;
            };
            let Some(text) = shown.value() else {
                return false;
            };
            // Unparsable text is a pending user edit and stays.
            match text.as_str().map(|t| serde_json::from_str::<serde_json::Value>(t)) {
                Some(Ok(parsed)) if parsed != live => {
                    let pretty = serde_json::to_string_pretty(&live).unwrap_or_else(|_| live.to_string());
                    shown.set_value(AttrValue::Str(pretty))
                }
                _ => false,
            }
        });
        input.on_change(move |v| {
            let Some(text) = v.as_str() else {
                return;
            };
            match serde_json::from_str::<serde_json::Value>(text) {
                Ok(parsed) => {
                    if target.set_attr(&key, AttrValue::Json(parsed)) {
                        target.mark_needs_update();
                    }
                }
                Err(e) => trace!("'{key}': invalid JSON kept out ({e})"),
            }
        });
        self.register_input(&input);
        Some(input)
    }

    /// Multi-line text property (e.g. shader source), flags refresh.
    pub fn text_area<H>(&self, host: &H, key: &str) -> Option<InputHandle>
    where
        H: PropertyHost + Clone + 'static,
    {
        self.bind_with(host, key, InputOptions::new().view(InputView::TextArea), true)
    }

    /// Texture slot: "assign" when empty, preview + "replace" + "clear" when
    /// set. Switching state rebuilds only the slot's own folder contents.
    /// Returns false when the property is missing or not a texture.
    pub fn texture_slot<H>(&self, host: &H, key: &str) -> bool
    where
        H: PropertyHost + Clone + 'static,
    {
        if !matches!(host.get_attr(key), Some(AttrValue::Texture(_))) {
            return false;
        }
        let slot = Rc::new(TextureSlot {
            host: host.clone(),
            key: key.to_string(),
            folder: self.folder.add_folder(key),
            picker: Rc::clone(&self.ctx.picker),
            contents: RefCell::new(DisposerList::new(format!("texture '{key}'"))),
        });
        slot.rebuild();
        let owned = Rc::clone(&slot);
        self.disposers.push(move || owned.close());
        true
    }
}

struct TextureSlot<H> {
    host: H,
    key: String,
    folder: FolderHandle,
    picker: Rc<dyn TexturePicker>,
    contents: RefCell<DisposerList>,
}

impl<H: PropertyHost + Clone + 'static> TextureSlot<H> {
    fn rebuild(self: &Rc<Self>) {
        let fresh = DisposerList::new(format!("texture '{}'", self.key));
        let old = self.contents.replace(fresh.clone());
        old.dispose();

        let current = match self.host.get_attr(&self.key) {
            Some(AttrValue::Texture(t)) => t,
            _ => return,
        };
        match current {
            None => {
                let me = Rc::downgrade(self);
                self.add_button(&fresh, "assign", move || {
                    if let Some(slot) = me.upgrade() {
                        slot.pick();
                    }
                });
            }
            Some(texture) => {
                let preview = self.folder.add_input(
                    "preview",
                    AttrValue::Str(texture.name().to_string()),
                    InputOptions::new().readonly(),
                );
                fresh.push(move || preview.dispose());

                let me = Rc::downgrade(self);
                self.add_button(&fresh, "replace", move || {
                    if let Some(slot) = me.upgrade() {
                        slot.pick();
                    }
                });
                let me: Weak<Self> = Rc::downgrade(self);
                self.add_button(&fresh, "clear", move || {
                    if let Some(slot) = me.upgrade() {
                        slot.set(None);
                    }
                });
            }
        }
    }

    fn add_button(&self, list: &DisposerList, title: &str, on_click: impl Fn() + 'static) {
        let button = self.folder.add_button(title);
        button.on_click(on_click);
        list.push(move || button.dispose());
    }

    fn pick(self: &Rc<Self>) {
        match self.picker.pick(&self.key) {
            Some(texture) => self.set(Some(texture)),
            None => debug!("texture pick for '{}' cancelled", self.key),
        }
    }

    fn set(self: &Rc<Self>, texture: Option<Texture>) {
        if self.host.set_attr(&self.key, AttrValue::Texture(texture)) {
            self.host.mark_needs_update();
            self.rebuild();
        }
    }

    fn close(&self) {
        self.contents.borrow().clone().dispose();
        self.folder.dispose();
    }
}

/// Everything a generator needs: the node, its root section and named
/// nested sections shared between generators.
pub struct FolderBuilder {
    node: SceneNode,
    root: Section,
    sections: IndexMap<String, Section>,
}

impl FolderBuilder {
    pub fn node(&self) -> &SceneNode {
        &self.node
    }

    /// Weak handle to the node, for bindings.
    pub fn host(&self) -> WeakNode {
        self.node.downgrade()
    }

    pub fn root(&self) -> &Section {
        &self.root
    }

    pub fn context(&self) -> &BindContext {
        &self.root.ctx
    }

    /// Nested section `key`, created with `title` on first use. Later
    /// generators asking for the same key append to the same folder.
    pub fn section(&mut self, key: &str, title: &str) -> Section {
        if let Some(section) = self.sections.get(key) {
            return section.clone();
        }
        let section = self.root.add_section(title);
        self.sections.insert(key.to_string(), section.clone());
        section
    }
}

/// Live editor folder for one node.
pub struct Folder {
    node: WeakNode,
    uuid: Uuid,
    handle: FolderHandle,
    root: Section,
    disposers: DisposerList,
    rules: Vec<String>,
}

impl std::fmt::Debug for Folder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Folder")
            .field("node", &self.node)
            .field("widget", &self.handle.id())
            .field("rules", &self.rules)
            .finish()
    }
}

impl Folder {
    pub fn node(&self) -> Option<SceneNode> {
        self.node.upgrade()
    }

    pub fn node_uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn id(&self) -> WidgetId {
        self.handle.id()
    }

    pub fn disposers(&self) -> &DisposerList {
        &self.disposers
    }

    /// Names of the dispatch rules that populated this folder.
    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    /// Refresh every bound input from the live node. Returns how many changed.
    pub fn sync(&self) -> usize {
        self.root.sync()
    }

    /// Remove every widget, listener and helper of this folder. Idempotent.
    pub fn dispose(&self) {
        self.disposers.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.disposers.is_disposed()
    }
}

/// Builds folders on a pane from a dispatch table.
pub struct PaneBinder {
    pane: Pane,
    table: DispatchTable,
    ctx: BindContext,
}

impl PaneBinder {
    pub fn new(pane: Pane, table: DispatchTable, ctx: BindContext) -> Self {
        Self { pane, table, ctx }
    }

    pub fn pane(&self) -> &Pane {
        &self.pane
    }

    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut DispatchTable {
        &mut self.table
    }

    pub fn context(&self) -> &BindContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut BindContext {
        &mut self.ctx
    }

    /// Build the folder for `node`.
    ///
    /// `reachable` is checked before construction and after every generator;
    /// if the node stops being reachable, the partial folder is disposed and
    /// None is returned. Unknown kinds get an empty folder.
    pub fn build(&self, node: &SceneNode, reachable: &dyn Fn(&SceneNode) -> bool) -> Option<Folder> {
        if !reachable(node) {
            debug!("binder: '{}' not reachable, nothing built", node.display_name());
            return None;
        }

        let title = format!("{} ({})", node.display_name(), node.kind());
        let disposers = DisposerList::new(format!("folder '{title}'"));
        let root = Section::new(self.pane.add_folder(title.as_str()), disposers.clone(), self.ctx.clone());
        let handle = root.folder.clone();
        let synced = root.clone();
        let mut builder = FolderBuilder {
            node: node.clone(),
            root,
            sections: IndexMap::new(),
        };

        let mut rules = Vec::new();
        for rule in self.table.matching(node) {
            rule.generate(&mut builder);
            rules.push(rule.name().to_string());
            if !reachable(node) {
                debug!(
                    "binder: '{}' vanished during rule '{}', aborting",
                    node.display_name(),
                    rule.name()
                );
                disposers.dispose();
                return None;
            }
        }
        trace!("binder: built '{title}' from {rules:?}");

        Some(Folder {
            node: node.downgrade(),
            uuid: node.uuid(),
            handle,
            root: synced,
            disposers,
            rules,
        })
    }
}
