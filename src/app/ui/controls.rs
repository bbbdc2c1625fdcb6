use eframe::egui::{ComboBox, Slider, Ui, Vec2};

use crate::catalog::ChartAxis;
use crate::util::ellipsize;

use super::super::{UnrelatedDisplayMode, ViewMode, ViewModel};

impl ViewModel {
    pub(in crate::app) fn draw_controls(
        &mut self,
        ui: &mut Ui,
        view_path: Option<&str>,
        save_view_requested: &mut bool,
    ) {
        ui.heading("View");
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.view.mode, ViewMode::Graph, "Graph");
            ui.selectable_value(&mut self.view.mode, ViewMode::Spider, "Spider");
            ui.selectable_value(&mut self.view.mode, ViewMode::Scatter, "Scatter");
        });

        ui.separator();
        ui.label("Search");
        ui.text_edit_singleline(&mut self.search);

        ui.separator();
        self.draw_focus_controls(ui);

        ui.separator();
        self.draw_displayed_property_controls(ui);

        ui.separator();
        self.draw_spider_axis_controls(ui);

        ui.separator();
        self.draw_scatter_axis_controls(ui);

        ui.separator();
        ui.label("Axis max");
        ui.add(Slider::new(&mut self.view.max_weight, 1.0..=20.0).integer());

        ui.separator();
        if ui.button("Auto-align graph").clicked() {
            self.graph_dirty = true;
            self.pan = Vec2::ZERO;
            self.zoom = 1.0;
        }

        if view_path.is_some() {
            ui.add_space(4.0);
            if ui.button("Save view state").clicked() {
                *save_view_requested = true;
            }
        }
    }

    fn draw_focus_controls(&mut self, ui: &mut Ui) {
        ui.label("Focus entity");

        let entity_choices = self
            .snapshot
            .sorted_entity_ids()
            .into_iter()
            .map(|id| {
                let name = self
                    .snapshot
                    .entities
                    .get(&id)
                    .map(|entity| entity.name.clone())
                    .unwrap_or_else(|| id.clone());
                (id, name)
            })
            .collect::<Vec<_>>();

        let current = self
            .view
            .focus
            .as_ref()
            .and_then(|focus| {
                entity_choices
                    .iter()
                    .find(|(id, _)| id == focus)
                    .map(|(_, name)| name.clone())
            })
            .unwrap_or_else(|| "(none)".to_string());

        ui.horizontal(|ui| {
            ComboBox::from_id_salt("focus_picker")
                .selected_text(ellipsize(&current, 24))
                .show_ui(ui, |ui| {
                    if ui
                        .selectable_label(self.view.focus.is_none(), "(none)")
                        .clicked()
                    {
                        self.view.focus = None;
                    }
                    for (id, name) in &entity_choices {
                        let is_current = self.view.focus.as_deref() == Some(id.as_str());
                        if ui.selectable_label(is_current, name).clicked() {
                            self.view.focus = Some(id.clone());
                        }
                    }
                });
            if self.view.focus.is_some() && ui.button("Clear").clicked() {
                self.view.focus = None;
            }
        });

        ui.label("Unrelated entities");
        ui.horizontal(|ui| {
            ui.selectable_value(
                &mut self.view.unrelated_mode,
                UnrelatedDisplayMode::Dim,
                "Dim",
            );
            ui.selectable_value(
                &mut self.view.unrelated_mode,
                UnrelatedDisplayMode::Hide,
                "Hide",
            );
        });
    }

    fn draw_displayed_property_controls(&mut self, ui: &mut Ui) {
        ui.label("Displayed properties");

        let properties = self
            .snapshot
            .properties
            .iter()
            .map(|property| (property.id.clone(), property.name.clone()))
            .collect::<Vec<_>>();

        if properties.is_empty() {
            ui.small("The catalog defines no properties.");
            return;
        }

        for (property_id, name) in properties {
            let mut shown = self.view.displayed_properties.contains(&property_id);
            if ui.checkbox(&mut shown, name).changed() {
                if shown {
                    self.view.displayed_properties.push(property_id);
                } else {
                    self.view.displayed_properties.retain(|id| id != &property_id);
                }
                // Node heights depend on the displayed rows.
                self.graph_dirty = true;
            }
        }
    }

    fn draw_spider_axis_controls(&mut self, ui: &mut Ui) {
        ui.label("Spider axes (3 or more)");

        for (axis, name) in self.axis_choices() {
            let mut selected = self.view.spider_axes.contains(&axis);
            if ui.checkbox(&mut selected, name).changed() {
                if selected {
                    self.view.spider_axes.push(axis);
                } else {
                    self.view.spider_axes.retain(|existing| existing != &axis);
                }
            }
        }
    }

    fn draw_scatter_axis_controls(&mut self, ui: &mut Ui) {
        ui.label("Scatter axes");

        let choices = self.axis_choices();
        let mut x_axis = self.view.scatter_x.clone();
        let mut y_axis = self.view.scatter_y.clone();
        Self::scatter_axis_picker(ui, "scatter_x", "X", &choices, &mut x_axis);
        Self::scatter_axis_picker(ui, "scatter_y", "Y", &choices, &mut y_axis);
        self.view.scatter_x = x_axis;
        self.view.scatter_y = y_axis;
    }

    fn scatter_axis_picker(
        ui: &mut Ui,
        id_salt: &str,
        label: &str,
        choices: &[(ChartAxis, String)],
        slot: &mut Option<ChartAxis>,
    ) {
        let current = slot
            .as_ref()
            .and_then(|axis| {
                choices
                    .iter()
                    .find(|(choice, _)| choice == axis)
                    .map(|(_, name)| name.clone())
            })
            .unwrap_or_else(|| "(none)".to_string());

        ui.horizontal(|ui| {
            ui.label(label);
            ComboBox::from_id_salt(id_salt.to_owned())
                .selected_text(ellipsize(&current, 22))
                .show_ui(ui, |ui| {
                    if ui.selectable_label(slot.is_none(), "(none)").clicked() {
                        *slot = None;
                    }
                    for (axis, name) in choices {
                        let is_current = slot.as_ref() == Some(axis);
                        if ui.selectable_label(is_current, name).clicked() {
                            *slot = Some(axis.clone());
                        }
                    }
                });
        });
    }

    /// Metrics first, then raw properties, both in catalog order.
    fn axis_choices(&self) -> Vec<(ChartAxis, String)> {
        let mut choices = Vec::new();
        for metric in &self.snapshot.metrics {
            choices.push((
                ChartAxis::Metric(metric.id.clone()),
                format!("{} (metric)", metric.name),
            ));
        }
        for property in &self.snapshot.properties {
            choices.push((
                ChartAxis::Property(property.id.clone()),
                property.name.clone(),
            ));
        }
        choices
    }
}
