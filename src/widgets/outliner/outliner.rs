//! Tree model behind the scene outliner.
//!
//! Items have stable ids for their whole lifetime: moving an item keeps its id,
//! label, expansion and selection. Removing an item removes its subtree.

use indexmap::IndexMap;
use log::{debug, trace};

pub type ItemId = u64;

#[derive(Debug, Clone)]
struct TreeItem {
    label: String,
    parent: Option<ItemId>,
    children: Vec<ItemId>,
    expanded: bool,
}

/// Ordered tree of labelled items with a single selection.
#[derive(Debug, Clone)]
pub struct TreeModel {
    items: IndexMap<ItemId, TreeItem>,
    roots: Vec<ItemId>,
    selected: Option<ItemId>,
    next_id: ItemId,
    /// Expansion state given to new items
    pub expand_new: bool,
}

impl Default for TreeModel {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeModel {
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
            roots: Vec::new(),
            selected: None,
            next_id: 1,
            expand_new: true,
        }
    }

    fn siblings_mut(&mut self, parent: Option<ItemId>) -> Option<&mut Vec<ItemId>> {
        match parent {
            None => Some(&mut self.roots),
            Some(pid) => self.items.get_mut(&pid).map(|p| &mut p.children),
        }
    }

    /// Create an item under `parent` (None = top level) at `index` (clamped).
    /// Returns None if `parent` does not exist.
    pub fn insert(&mut self, parent: Option<ItemId>, index: usize, label: impl Into<String>) -> Option<ItemId> {
        let id = self.next_id;
        let siblings = self.siblings_mut(parent)?;
        let index = index.min(siblings.len());
        siblings.insert(index, id);

        self.next_id += 1;
        let label = label.into();
        trace!("tree: insert {id} '{label}' under {parent:?} at {index}");
        self.items.insert(
            id,
            TreeItem {
                label,
                parent,
                children: Vec::new(),
                expanded: self.expand_new,
            },
        );
        Some(id)
    }

    /// Move `id` under `parent` at `index` (clamped, counted after removal).
    ///
    /// Refuses unknown ids and moves into the item's own subtree.
    pub fn move_item(&mut self, id: ItemId, parent: Option<ItemId>, index: usize) -> bool {
        let Some(item) = self.items.get(&id) else {
            return false;
        };
        let old_parent = item.parent;
        if let Some(pid) = parent {
            if !self.items.contains_key(&pid) || self.is_ancestor_or_self(id, pid) {
                debug!("tree: refusing move of {id} under {pid}");
                return false;
            }
        }

        if let Some(siblings) = self.siblings_mut(old_parent) {
            siblings.retain(|c| *c != id);
        }
        let Some(siblings) = self.siblings_mut(parent) else {
            return false;
        };
        let index = index.min(siblings.len());
        siblings.insert(index, id);
        if let Some(item) = self.items.get_mut(&id) {
            item.parent = parent;
        }
        true
    }

    fn is_ancestor_or_self(&self, ancestor: ItemId, mut id: ItemId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.items.get(&id).and_then(|i| i.parent) {
                Some(p) => id = p,
                None => return false,
            }
        }
    }

    /// Remove `id` and its subtree. Returns the removed ids (pre-order).
    /// Clears the selection if it was inside the subtree.
    pub fn remove(&mut self, id: ItemId) -> Vec<ItemId> {
        let Some(item) = self.items.get(&id) else {
            return Vec::new();
        };
        let parent = item.parent;
        if let Some(siblings) = self.siblings_mut(parent) {
            siblings.retain(|c| *c != id);
        }

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(item) = self.items.shift_remove(&cur) {
                stack.extend(item.children.iter().rev().copied());
                removed.push(cur);
            }
        }
        if self.selected.is_some_and(|s| removed.contains(&s)) {
            self.selected = None;
        }
        removed
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.roots.clear();
        self.selected = None;
    }

    // --- Item state ---

    pub fn label(&self, id: ItemId) -> Option<&str> {
        self.items.get(&id).map(|i| i.label.as_str())
    }

    pub fn set_label(&mut self, id: ItemId, label: impl Into<String>) -> bool {
        match self.items.get_mut(&id) {
            Some(item) => {
                item.label = label.into();
                true
            }
            None => false,
        }
    }

    pub fn is_expanded(&self, id: ItemId) -> bool {
        self.items.get(&id).is_some_and(|i| i.expanded)
    }

    pub fn set_expanded(&mut self, id: ItemId, expanded: bool) -> bool {
        match self.items.get_mut(&id) {
            Some(item) => {
                item.expanded = expanded;
                true
            }
            None => false,
        }
    }

    pub fn selected(&self) -> Option<ItemId> {
        self.selected
    }

    /// Select `id` (None clears). Selecting an unknown item clears the selection.
    pub fn select(&mut self, id: Option<ItemId>) {
        self.selected = id.filter(|i| self.items.contains_key(i));
    }

    // --- Structure queries ---

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn roots(&self) -> &[ItemId] {
        &self.roots
    }

    pub fn parent(&self, id: ItemId) -> Option<ItemId> {
        self.items.get(&id)?.parent
    }

    pub fn children(&self, id: ItemId) -> &[ItemId] {
        self.items.get(&id).map(|i| i.children.as_slice()).unwrap_or(&[])
    }

    /// Position among siblings.
    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        let siblings = match self.items.get(&id)?.parent {
            None => &self.roots,
            Some(pid) => &self.items.get(&pid)?.children,
        };
        siblings.iter().position(|c| *c == id)
    }

    /// Every item with its depth, in display order.
    pub fn walk(&self) -> Vec<(ItemId, usize)> {
        let mut out = Vec::with_capacity(self.items.len());
        let mut stack: Vec<(ItemId, usize)> = self.roots.iter().rev().map(|r| (*r, 0)).collect();
        while let Some((id, depth)) = stack.pop() {
            out.push((id, depth));
            stack.extend(self.children(id).iter().rev().map(|c| (*c, depth + 1)));
        }
        out
    }
}
