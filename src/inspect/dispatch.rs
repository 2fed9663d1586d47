//! Type dispatch table - ordered (predicate, generator) rules.
//!
//! Every rule whose predicate matches contributes to the node's folder, in
//! declaration order. Broad rules come first, narrower ones only add to what
//! the broad ones built. New capability families are supported by pushing
//! rules; nothing closed needs editing.

use std::fmt;
use std::rc::Rc;

use super::binder::FolderBuilder;
use super::editors;
use crate::entities::{SceneLibrary, SceneNode};

type Predicate = Rc<dyn Fn(&SceneNode) -> bool>;
type Generator = Rc<dyn Fn(&mut FolderBuilder)>;

/// One named dispatch rule.
#[derive(Clone)]
pub struct DispatchRule {
    name: String,
    predicate: Predicate,
    generator: Generator,
}

impl fmt::Debug for DispatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DispatchRule").field(&self.name).finish()
    }
}

impl DispatchRule {
    pub fn new(
        name: impl Into<String>,
        predicate: impl Fn(&SceneNode) -> bool + 'static,
        generator: impl Fn(&mut FolderBuilder) + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            predicate: Rc::new(predicate),
            generator: Rc::new(generator),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matches(&self, node: &SceneNode) -> bool {
        (self.predicate)(node)
    }

    pub fn generate(&self, builder: &mut FolderBuilder) {
        (self.generator)(builder)
    }
}

/// Ordered rule list.
#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    rules: Vec<DispatchRule>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in editors (object, lights, cameras, materials, textures).
    pub fn with_defaults(library: Rc<SceneLibrary>) -> Self {
        let mut table = Self::new();
        editors::register_defaults(&mut table, library);
        table
    }

    /// Append a rule after all existing ones.
    pub fn push(&mut self, rule: DispatchRule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[DispatchRule] {
        &self.rules
    }

    /// Rules applicable to `node`, in declaration order.
    pub fn matching(&self, node: &SceneNode) -> Vec<&DispatchRule> {
        self.rules.iter().filter(|r| r.matches(node)).collect()
    }

    pub fn matching_names(&self, node: &SceneNode) -> Vec<&str> {
        self.matching(node).into_iter().map(DispatchRule::name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Attrs, Capabilities, caps};

    fn table() -> DispatchTable {
        DispatchTable::with_defaults(Rc::new(SceneLibrary::new()))
    }

    #[test]
    fn test_light_rules_broad_first() {
        let lib = SceneLibrary::new();
        let sun = lib.directional_light("sun", 0xffffff, 1.0);
        assert_eq!(table().matching_names(&sun), ["object", "light", "directional_light"]);
    }

    #[test]
    fn test_physical_mesh_rules() {
        let lib = SceneLibrary::new();
        let mesh = lib.mesh("box", lib.mesh_physical_material(""));
        assert_eq!(
            table().matching_names(&mesh),
            [
                "object",
                "material",
                "mesh_standard_material",
                "mesh_physical_material",
                "basic_textures",
                "lit_textures",
                "pbr_textures",
                "physical_textures",
                "material_advanced",
            ]
        );
    }

    #[test]
    fn test_unknown_kind_matches_nothing() {
        let odd = SceneNode::new("odd", Capabilities::new(["Gizmo"]), Attrs::new());
        assert!(table().matching(&odd).is_empty());
    }

    #[test]
    fn test_push_extends_without_touching_existing() {
        let mut t = table();
        let before = t.len();
        t.push(DispatchRule::new("trail", |n| n.has_cap("Trail"), |_| {}));
        assert_eq!(t.len(), before + 1);

        let lib = SceneLibrary::new();
        let trail = lib.object3d("t");
        trail.add_cap("Trail");
        assert_eq!(t.matching_names(&trail), ["object", "trail"]);
        assert_eq!(t.matching_names(&lib.group("g")), ["object"]);
        assert!(lib.group("g").has_cap(caps::GROUP));
    }
}
