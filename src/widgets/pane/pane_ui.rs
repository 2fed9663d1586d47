//! Pane widget - egui rendering.
//!
//! Drawing never touches listeners: user interaction is collected into
//! [`PaneActions`] while the pane is borrowed, then applied through
//! [`Pane::edit`] / [`Pane::click`] once the borrow is released.

use eframe::egui::{self, ComboBox, Ui};

use super::pane::{InputOptions, InputView, Pane, PaneState, WidgetId, WidgetKind};
use crate::entities::{AttrValue, color};

/// One user interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum PaneAction {
    Edit(WidgetId, AttrValue),
    Click(WidgetId),
    Toggle(WidgetId, bool),
}

/// Pane render result.
#[derive(Debug, Default)]
pub struct PaneActions {
    pub hovered: bool,
    pub actions: Vec<PaneAction>,
}

impl PaneActions {
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Feed the collected interactions back into the pane.
    pub fn apply(self, pane: &Pane) {
        for action in self.actions {
            match action {
                PaneAction::Edit(id, value) => {
                    pane.edit(id, value);
                }
                PaneAction::Click(id) => {
                    pane.click(id);
                }
                PaneAction::Toggle(id, expanded) => {
                    pane.set_expanded(id, expanded);
                }
            }
        }
    }
}

/// Draw `pane` and collect interactions without applying them.
pub fn render(ui: &mut Ui, pane: &Pane) -> PaneActions {
    let mut out = PaneActions::default();
    let state = pane.state.borrow();

    if state.roots.is_empty() {
        ui.weak("(nothing selected)");
        return out;
    }

    let response = ui
        .scope(|ui| {
            for id in &state.roots {
                render_widget(ui, &state, *id, &mut out);
            }
        })
        .response;
    out.hovered = response.hovered();
    out
}

/// Draw `pane` and apply the interactions.
pub fn show(ui: &mut Ui, pane: &Pane) -> bool {
    let actions = render(ui, pane);
    let changed = !actions.is_empty();
    actions.apply(pane);
    changed
}

fn render_widget(ui: &mut Ui, state: &PaneState, id: WidgetId, out: &mut PaneActions) {
    let Some(widget) = state.widgets.get(&id) else {
        return;
    };
    match &widget.kind {
        WidgetKind::Folder { title, expanded } => {
            let resp = egui::CollapsingHeader::new(title.as_str())
                .id_salt(("pane_folder", id))
                .open(Some(*expanded))
                .show(ui, |ui| {
                    for child in &widget.children {
                        render_widget(ui, state, *child, out);
                    }
                });
            if resp.header_response.clicked() {
                out.actions.push(PaneAction::Toggle(id, !*expanded));
            }
        }
        WidgetKind::Input { key, value, options } => {
            let label = options.label.as_deref().unwrap_or(key);
            if options.view == InputView::TextArea {
                ui.label(label);
                render_input(ui, id, value, options, out);
            } else {
                ui.horizontal(|ui| {
                    ui.label(label);
                    render_input(ui, id, value, options, out);
                });
            }
        }
        WidgetKind::Separator => {
            ui.separator();
        }
        WidgetKind::Button { title } => {
            if ui.button(title.as_str()).clicked() {
                out.actions.push(PaneAction::Click(id));
            }
        }
    }
}

fn render_input(ui: &mut Ui, id: WidgetId, value: &AttrValue, options: &InputOptions, out: &mut PaneActions) {
    let mut edited = value.clone();
    let changed = ui
        .add_enabled_ui(!options.readonly, |ui| {
            if !options.choices.is_empty() {
                return render_choices(ui, id, &mut edited, options);
            }
            render_value(ui, &mut edited, options)
        })
        .inner;
    if changed && edited != *value {
        out.actions.push(PaneAction::Edit(id, edited));
    }
}

fn render_choices(ui: &mut Ui, id: WidgetId, edited: &mut AttrValue, options: &InputOptions) -> bool {
    let before = edited.clone();
    match options.view {
        InputView::RadioGrid { columns } => {
            let columns = columns.max(1);
            egui::Grid::new(("pane_radio", id)).show(ui, |ui| {
                for (i, (name, choice)) in options.choices.iter().enumerate() {
                    if ui.radio(*edited == *choice, name.as_str()).clicked() {
                        *edited = choice.clone();
                    }
                    if (i + 1) % columns == 0 {
                        ui.end_row();
                    }
                }
            });
        }
        _ => {
            let current = options
                .choices
                .iter()
                .find(|(_, c)| c == edited)
                .map(|(n, _)| n.clone())
                .unwrap_or_else(|| "?".to_string());
            ComboBox::from_id_salt(("pane_combo", id))
                .selected_text(current)
                .show_ui(ui, |ui| {
                    for (name, choice) in &options.choices {
                        ui.selectable_value(edited, choice.clone(), name.as_str());
                    }
                });
        }
    }
    *edited != before
}

fn render_value(ui: &mut Ui, edited: &mut AttrValue, options: &InputOptions) -> bool {
    let speed = options.step.unwrap_or(0.01) as f64;
    let lo = options.min.unwrap_or(f32::NEG_INFINITY);
    let hi = options.max.unwrap_or(f32::INFINITY);

    match edited {
        AttrValue::Bool(v) => ui.checkbox(v, "").changed(),
        AttrValue::Int(v) => ui
            .add(egui::DragValue::new(v).speed(speed.max(1.0)).range(lo as i32..=hi as i32))
            .changed(),
        AttrValue::Float(v) => {
            if options.min.is_some() && options.max.is_some() {
                ui.add(egui::Slider::new(v, lo..=hi).step_by(options.step.unwrap_or(0.0) as f64))
                    .changed()
            } else {
                ui.add(egui::DragValue::new(v).speed(speed).range(lo..=hi)).changed()
            }
        }
        AttrValue::Str(s) => match options.view {
            InputView::TextArea => ui
                .add(
                    egui::TextEdit::multiline(s)
                        .code_editor()
                        .desired_rows(6)
                        .desired_width(f32::INFINITY),
                )
                .changed(),
            InputView::Color => {
                let mut changed = false;
                if let Some(rgb) = color::from_hex(s) {
                    let mut bytes = color::to_srgb_bytes(rgb);
                    if ui.color_edit_button_srgb(&mut bytes).changed() {
                        *s = format!("#{:02x}{:02x}{:02x}", bytes[0], bytes[1], bytes[2]);
                        changed = true;
                    }
                }
                changed |= ui
                    .add(egui::TextEdit::singleline(s).desired_width(72.0))
                    .changed();
                changed
            }
            _ => ui.text_edit_singleline(s).changed(),
        },
        AttrValue::Vec2(arr) => {
            let mut changed = false;
            for (axis, c) in ["X:", "Y:"].iter().zip(arr.iter_mut()) {
                ui.label(*axis);
                changed |= ui.add(egui::DragValue::new(c).speed(speed).range(lo..=hi)).changed();
            }
            changed
        }
        AttrValue::Vec3(arr) => {
            let mut changed = false;
            for (axis, c) in ["X:", "Y:", "Z:"].iter().zip(arr.iter_mut()) {
                ui.label(*axis);
                changed |= ui.add(egui::DragValue::new(c).speed(speed).range(lo..=hi)).changed();
            }
            changed
        }
        AttrValue::Color(rgb) => ui.color_edit_button_rgb(rgb).changed(),
        AttrValue::Json(v) => {
            ui.label(format!("JSON: {} chars", v.to_string().len()));
            false
        }
        AttrValue::Texture(t) => {
            match t {
                Some(tex) => ui.label(tex.name()),
                None => ui.weak("(none)"),
            };
            false
        }
    }
}
