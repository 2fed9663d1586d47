//! Outliner widget - egui rendering via `egui_ltreeview`.

use eframe::egui::{self, Ui};
use egui_ltreeview::{Action, NodeBuilder, TreeView, TreeViewBuilder};

use super::outliner::{ItemId, TreeModel};

/// Outliner render result.
#[derive(Debug, Default)]
pub struct OutlinerActions {
    pub hovered: bool,
    /// Set when the user picked a different item (inner None = cleared)
    pub selected: Option<Option<ItemId>>,
}

/// Draw `tree`. Selection changes are reported, not applied.
pub fn render(ui: &mut Ui, tree: &TreeModel, id_salt: &str) -> OutlinerActions {
    let mut out = OutlinerActions::default();
    if tree.is_empty() {
        ui.weak("(empty scene)");
        return out;
    }

    let tree_id = ui.make_persistent_id(("outliner_tree", id_salt));
    let (response, actions) = TreeView::new(tree_id).show(ui, |builder| {
        for root in tree.roots() {
            build_item(builder, tree, *root);
        }
    });
    out.hovered = response.hovered();

    for action in actions {
        if let Action::SetSelected(ids) = action {
            let picked = ids.first().copied();
            if picked != tree.selected() {
                out.selected = Some(picked);
            }
        }
    }
    out
}

fn build_item(builder: &mut TreeViewBuilder<'_, ItemId>, tree: &TreeModel, id: ItemId) {
    let label = tree.label(id).unwrap_or("?").to_string();
    let children = tree.children(id);
    if children.is_empty() {
        builder.leaf(id, label);
        return;
    }
    builder.node(
        NodeBuilder::dir(id)
            .default_open(tree.is_expanded(id))
            .label(egui::RichText::new(label)),
    );
    for child in children {
        build_item(builder, tree, *child);
    }
    builder.close_dir();
}
