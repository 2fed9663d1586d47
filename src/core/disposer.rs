//! Disposer lists: ordered cleanup actions with exact-once, reverse-order release.
//!
//! Every component that acquires an external side effect (a widget, a listener,
//! a helper node attached to the live scene) registers its release here, on the
//! nearest enclosing list. Lists nest: a folder's list is pushed into its parent
//! folder's list, a tracked node's list into the inspector's root list, so a
//! single `dispose()` at any level tears down the whole subtree depth-first.
//!
//! Rules:
//! - `push()` is the only mutation before disposal
//! - `dispose()` runs actions last-in first-out, each exactly once
//! - a second `dispose()` is a no-op
//! - pushing onto a disposed list runs the action immediately
//! - nested lists that were disposed on their own are dropped on the next
//!   `push_list()`, so a long-lived parent does not accumulate dead children

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::trace;

/// Boxed cleanup action.
pub type Disposer = Box<dyn FnOnce()>;

enum Entry {
    Action(Disposer),
    List(DisposerList),
}

impl Entry {
    fn run(self) {
        match self {
            Entry::Action(action) => action(),
            Entry::List(list) => list.dispose(),
        }
    }
}

struct DisposerState {
    label: String,
    actions: Vec<Entry>,
    disposed: bool,
}

/// Shared handle to an ordered list of cleanup actions.
///
/// Cloning yields another handle to the same list.
#[derive(Clone)]
pub struct DisposerList {
    state: Rc<RefCell<DisposerState>>,
}

impl Default for DisposerList {
    fn default() -> Self {
        Self::new("disposers")
    }
}

impl fmt::Debug for DisposerList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("DisposerList")
            .field("label", &state.label)
            .field("pending", &state.actions.len())
            .field("disposed", &state.disposed)
            .finish()
    }
}

impl DisposerList {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            state: Rc::new(RefCell::new(DisposerState {
                label: label.into(),
                actions: Vec::new(),
                disposed: false,
            })),
        }
    }

    /// Append a cleanup action.
    ///
    /// If the list was already disposed the action runs right away.
    pub fn push(&self, action: impl FnOnce() + 'static) {
        let mut state = self.state.borrow_mut();
        if state.disposed {
            drop(state);
            action();
            return;
        }
        state.actions.push(Entry::Action(Box::new(action)));
    }

    /// Nest `child` so that disposing `self` disposes `child` at this position.
    ///
    /// Nested lists already disposed are pruned first.
    pub fn push_list(&self, child: &DisposerList) {
        let mut state = self.state.borrow_mut();
        if state.disposed {
            drop(state);
            child.dispose();
            return;
        }
        state
            .actions
            .retain(|entry| !matches!(entry, Entry::List(list) if list.is_disposed()));
        state.actions.push(Entry::List(child.clone()));
    }

    /// Run all pending actions in reverse registration order.
    ///
    /// Idempotent. Actions pushed while disposal is running (by the actions
    /// themselves) are executed before this call returns.
    pub fn dispose(&self) {
        let actions = {
            let mut state = self.state.borrow_mut();
            if state.disposed {
                return;
            }
            state.disposed = true;
            trace!("Disposing '{}' ({} actions)", state.label, state.actions.len());
            std::mem::take(&mut state.actions)
        };
        // Borrow released: actions may touch this list (push, dispose) safely.
        for entry in actions.into_iter().rev() {
            entry.run();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.state.borrow().disposed
    }

    /// Number of actions still waiting to run
    pub fn len(&self) -> usize {
        self.state.borrow().actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn label(&self) -> String {
        self.state.borrow().label.clone()
    }

    /// Identity comparison of two handles.
    pub fn same_list(&self, other: &DisposerList) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}
