use eframe::egui::{RichText, Ui};

use crate::catalog::metric_score;
use crate::util::format_score;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(selected_id) = self.selected.clone() else {
            ui.label("Select an entity from the graph or a chart.");
            return;
        };

        let Some(entity) = self.snapshot.entities.get(&selected_id) else {
            ui.label("The selected entity no longer exists in the snapshot.");
            return;
        };

        let name = entity.name.clone();
        let status = entity.status;
        let description = entity.description.clone();
        let type_name = self
            .snapshot
            .entity_type(entity)
            .map(|entity_type| entity_type.name.clone());

        ui.label(RichText::new(&name).strong());
        ui.small(selected_id.as_str());
        ui.add_space(6.0);

        if let Some(type_name) = type_name {
            ui.label(format!("Type: {type_name}"));
        }
        ui.label(format!("Status: {}", status.label()));
        if !description.is_empty() {
            ui.label(description);
        }

        ui.separator();
        ui.label(RichText::new("Properties").strong());
        if self.snapshot.properties.is_empty() {
            ui.label("The catalog defines no properties.");
        }
        for property in &self.snapshot.properties {
            match self.snapshot.assigned_option(&selected_id, &property.id) {
                Some(option) => {
                    let weight = option
                        .weight
                        .map(|weight| format!("  (weight {})", format_score(Some(weight))))
                        .unwrap_or_default();
                    ui.label(format!("{}: {}{weight}", property.name, option.value));
                }
                None => {
                    ui.label(format!("{}: —", property.name));
                }
            }
        }

        ui.separator();
        ui.label(RichText::new("Metric scores").strong());
        if self.snapshot.metrics.is_empty() {
            ui.label("The catalog defines no metrics.");
        }
        for metric in &self.snapshot.metrics {
            let score = metric_score(&self.snapshot, &selected_id, metric);
            ui.label(format!("{}: {}", metric.name, format_score(score)));
        }

        let dependencies = self
            .snapshot
            .dependencies_of(&selected_id)
            .iter()
            .map(|rel| (rel.target.clone(), rel.description.clone()))
            .collect::<Vec<_>>();
        let dependents = self
            .snapshot
            .dependents_of(&selected_id)
            .iter()
            .map(|rel| (rel.source.clone(), rel.description.clone()))
            .collect::<Vec<_>>();

        let mut navigate_to = None;

        ui.separator();
        ui.label(RichText::new(format!("Depends on ({})", dependencies.len())).strong());
        self.neighbor_list(ui, &dependencies, "deps", &mut navigate_to);

        ui.separator();
        ui.label(RichText::new(format!("Depended on by ({})", dependents.len())).strong());
        self.neighbor_list(ui, &dependents, "dependents", &mut navigate_to);

        ui.separator();
        let is_focus = self.view.focus.as_deref() == Some(selected_id.as_str());
        if is_focus {
            if ui.button("Clear focus").clicked() {
                self.view.focus = None;
            }
        } else if ui.button("Focus this entity").clicked() {
            self.view.focus = Some(selected_id.clone());
        }

        if let Some(target) = navigate_to {
            self.selected = Some(target);
        }
    }

    fn neighbor_list(
        &self,
        ui: &mut Ui,
        neighbors: &[(String, Option<String>)],
        id_salt: &str,
        navigate_to: &mut Option<String>,
    ) {
        if neighbors.is_empty() {
            ui.label("(none)");
            return;
        }

        ui.push_id(id_salt, |ui| {
            for (neighbor_id, description) in neighbors {
                let name = self
                    .snapshot
                    .entities
                    .get(neighbor_id)
                    .map(|entity| entity.name.clone())
                    .unwrap_or_else(|| neighbor_id.clone());
                ui.horizontal(|ui| {
                    if ui.link(name).clicked() {
                        *navigate_to = Some(neighbor_id.clone());
                    }
                    if let Some(description) = description {
                        ui.small(description.as_str());
                    }
                });
            }
        });
    }
}
