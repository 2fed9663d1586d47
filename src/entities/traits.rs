//! Abstract traits for dependency inversion.
//!
//! The inspector edits properties through this interface only, so it never
//! needs to know whether a property lives on a node, on its material, or on
//! something a host adds later.

use super::attrs::AttrValue;

/// Something with named, typed, settable properties.
///
/// Implemented for weak handles: a binding holding a host never keeps the
/// underlying scene object alive, and every call on a dropped host is a no-op.
pub trait PropertyHost {
    /// Current value of `key`, None if the key is absent or the host is gone.
    fn get_attr(&self, key: &str) -> Option<AttrValue>;

    /// Overwrite `key`. Returns false if the host is gone.
    fn set_attr(&self, key: &str, value: AttrValue) -> bool;

    /// Raise the externally visible "needs refresh" flag.
    fn mark_needs_update(&self);

    /// Whether the underlying object still exists.
    fn is_alive(&self) -> bool;

    /// Human readable description for logs.
    fn describe(&self) -> String;
}
