use eframe::egui::{self, Align, Align2, Context, Layout, Vec2, vec2};

use crate::catalog::{CatalogSnapshot, Relationship};

use super::super::{ViewConfig, ViewMode, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(snapshot: CatalogSnapshot, mut view: ViewConfig) -> Self {
        // A saved view may reference entities or definitions that the
        // snapshot no longer contains; drop those parts quietly.
        if let Some(focus) = &view.focus
            && !snapshot.entities.contains_key(focus)
        {
            view.focus = None;
        }
        view.displayed_properties
            .retain(|property_id| snapshot.property(property_id).is_some());
        view.spider_axes
            .retain(|axis| Self::axis_exists(&snapshot, axis));
        if let Some(axis) = &view.scatter_x
            && !Self::axis_exists(&snapshot, axis)
        {
            view.scatter_x = None;
        }
        if let Some(axis) = &view.scatter_y
            && !Self::axis_exists(&snapshot, axis)
        {
            view.scatter_y = None;
        }
        view.max_weight = view.max_weight.clamp(1.0, 100.0);

        Self {
            snapshot,
            view,
            search: String::new(),
            selected: None,
            pan: Vec2::ZERO,
            zoom: 1.0,
            graph_dirty: true,
            graph_cache: None,
            connect_drag: None,
            pending_connect: None,
        }
    }

    fn axis_exists(snapshot: &CatalogSnapshot, axis: &crate::catalog::ChartAxis) -> bool {
        match axis {
            crate::catalog::ChartAxis::Metric(id) => snapshot.metric(id).is_some(),
            crate::catalog::ChartAxis::Property(id) => snapshot.property(id).is_some(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        catalog_path: &str,
        view_path: Option<&str>,
        reload_requested: &mut bool,
        save_view_requested: &mut bool,
        is_loading: bool,
    ) {
        if self.graph_dirty {
            self.rebuild_graph_cache();
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("factmap");
                    ui.separator();
                    ui.label(format!("catalog: {catalog_path}"));
                    ui.label(format!("entities: {}", self.snapshot.entity_count()));
                    ui.label(format!(
                        "relationships: {}",
                        self.snapshot.relationship_count()
                    ));
                    ui.label(format!("metrics: {}", self.snapshot.metrics.len()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload catalog"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(focus) = self.view.focus.clone()
                            && let Some(entity) = self.snapshot.entities.get(&focus)
                        {
                            ui.label(format!("focus: {}", entity.name));
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui, view_path, save_view_requested));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading factsheet catalog...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                match self.view.mode {
                    ViewMode::Graph => self.draw_graph(ui),
                    ViewMode::Spider => self.draw_spider(ui),
                    ViewMode::Scatter => self.draw_scatter(ui),
                }
            }
        });

        self.show_connect_dialog(ctx);
    }

    /// Confirmation step between a valid connect gesture and the new
    /// relationship landing in the in-memory snapshot.
    fn show_connect_dialog(&mut self, ctx: &Context) {
        let Some(request) = self.pending_connect.clone() else {
            return;
        };

        let mut confirmed = false;
        let mut dismissed = false;

        egui::Window::new("New dependency")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(format!(
                    "\"{}\" will depend on \"{}\".",
                    request.source_name, request.target_name
                ));
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Create dependency").clicked() {
                        confirmed = true;
                    }
                    if ui.button("Cancel").clicked() {
                        dismissed = true;
                    }
                });
            });

        if confirmed {
            self.snapshot.relationships.push(Relationship {
                id: format!("local-{}-{}", request.source_id, request.target_id),
                source: request.source_id,
                target: request.target_id,
                description: None,
            });
            self.graph_dirty = true;
            self.pending_connect = None;
        } else if dismissed {
            self.pending_connect = None;
        }
    }
}
