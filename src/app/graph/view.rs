use std::collections::HashSet;

use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, StrokeKind, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::catalog::EntityStatus;
use crate::util::ellipsize;

use super::super::highlight::{edge_related, related_set};
use super::super::render_utils::{
    blend_color, clip_to_rect_boundary, dim_color, draw_arrowhead, draw_background, rect_visible,
};
use super::super::{ConnectDrag, UnrelatedDisplayMode, ViewModel};
use super::interaction::{connection_request, node_at, node_screen_rect};

impl ViewModel {
    fn search_matches(&self) -> Option<HashSet<usize>> {
        if self.view.focus.is_some() {
            return None;
        }

        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        let cache = self.graph_cache.as_ref()?;
        let matcher = SkimMatcherV2::default();
        let matches = cache
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                matcher
                    .fuzzy_match(&node.name, query)
                    .or_else(|| {
                        matcher.fuzzy_match(&node.name.to_ascii_lowercase(), &query.to_ascii_lowercase())
                    })
                    .map(|_| index)
            })
            .collect::<HashSet<_>>();
        Some(matches)
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        if self.graph_dirty {
            self.rebuild_graph_cache();
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        let search_matches = self.search_matches();
        let related = related_set(self.view.focus.as_deref(), &self.snapshot.relationships);
        let pan = self.pan;
        let zoom = self.zoom;
        let unrelated_mode = self.view.unrelated_mode;
        let focus = self.view.focus.clone();
        let selected = self.selected.clone();

        let Some(cache) = self.graph_cache.as_ref() else {
            ui.label("The catalog snapshot holds no entities.");
            return;
        };

        let node_rects = cache
            .nodes
            .iter()
            .map(|node| node_screen_rect(rect, pan, zoom, node))
            .collect::<Vec<_>>();

        let node_related = cache
            .nodes
            .iter()
            .map(|node| {
                related
                    .as_ref()
                    .is_none_or(|related| related.contains(&node.id))
            })
            .collect::<Vec<_>>();

        let pointer = ui.input(|input| input.pointer.hover_pos());
        // Hidden nodes are not interactive.
        let hovered = pointer
            .and_then(|pointer| node_at(rect, pan, zoom, cache, pointer))
            .filter(|&index| {
                node_related[index] || unrelated_mode == UnrelatedDisplayMode::Dim
            });

        // Connect gesture: a primary drag starting on a node becomes a
        // rubber band; releasing over another node emits a validated
        // connection request for confirmation.
        let mut pending_connect = self.pending_connect.clone();
        let mut connect_drag = self.connect_drag.take();
        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(source_index) = hovered
        {
            connect_drag = Some(ConnectDrag { source_index });
        }
        if response.drag_stopped()
            && let Some(drag) = connect_drag.take()
        {
            if let Some(target_index) = hovered
                && target_index != drag.source_index
            {
                let source_id = cache.nodes[drag.source_index].id.as_str();
                let target_id = cache.nodes[target_index].id.as_str();
                if let Some(request) = connection_request(&self.snapshot, source_id, target_id) {
                    pending_connect = Some(request);
                }
            }
        }

        // Edges first, nodes on top.
        for &(source, target) in &cache.edges {
            let source_rect = node_rects[source];
            let target_rect = node_rects[target];
            if !rect_visible(rect, source_rect.union(target_rect)) {
                continue;
            }

            let is_related = edge_related(
                related.as_ref(),
                &cache.nodes[source].id,
                &cache.nodes[target].id,
            );
            if !is_related && unrelated_mode == UnrelatedDisplayMode::Hide {
                continue;
            }

            let start = clip_to_rect_boundary(source_rect, target_rect.center());
            let end = clip_to_rect_boundary(target_rect, source_rect.center());

            let base = Color32::from_rgb(132, 142, 158);
            let color = if is_related { base } else { dim_color(base) };
            let width = if is_related && related.is_some() {
                (2.2 * zoom.sqrt()).clamp(1.2, 4.0)
            } else {
                (1.3 * zoom.sqrt()).clamp(0.6, 2.6)
            };

            painter.line_segment([start, end], Stroke::new(width, color));
            draw_arrowhead(&painter, start, end, (9.0 * zoom.sqrt()).clamp(5.0, 14.0), color);
        }

        let mut clicked_node = None;
        let mut context_node = None;

        for (index, node) in cache.nodes.iter().enumerate() {
            let node_rect = node_rects[index];
            if !rect_visible(rect, node_rect) {
                continue;
            }

            let is_related = node_related[index];
            if !is_related && unrelated_mode == UnrelatedDisplayMode::Hide {
                continue;
            }

            let is_selected = selected.as_deref() == Some(node.id.as_str());
            let is_focus = focus.as_deref() == Some(node.id.as_str());
            let is_hovered = hovered == Some(index);
            let is_search_miss = search_matches
                .as_ref()
                .is_some_and(|matches| !matches.contains(&index));

            let mut fill = node.color;
            if node.status == EntityStatus::Archived {
                fill = blend_color(fill, Color32::from_gray(70), 0.55);
            }
            if !is_related || is_search_miss {
                fill = dim_color(fill);
            }
            if is_hovered {
                fill = blend_color(fill, Color32::WHITE, 0.12);
            }

            painter.rect_filled(node_rect, 6.0, fill);

            let stroke = if is_selected {
                Stroke::new(2.4, Color32::from_rgb(245, 206, 93))
            } else if is_focus {
                Stroke::new(2.4, Color32::from_rgb(241, 146, 94))
            } else {
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190))
            };
            painter.rect_stroke(node_rect, 6.0, stroke, StrokeKind::Outside);

            let text_color = if is_related && !is_search_miss {
                Color32::from_gray(240)
            } else {
                Color32::from_gray(150)
            };

            let title = match node.status {
                EntityStatus::Active => node.name.clone(),
                EntityStatus::Draft => format!("{} (draft)", node.name),
                EntityStatus::Archived => format!("{} (archived)", node.name),
            };
            painter.text(
                node_rect.left_top() + vec2(8.0, 6.0) * zoom,
                Align2::LEFT_TOP,
                ellipsize(&title, 26),
                FontId::proportional((13.0 * zoom).clamp(8.0, 20.0)),
                text_color,
            );

            for (row, (property_name, option_value)) in node.rows.iter().enumerate() {
                let offset = vec2(8.0, 26.0 + row as f32 * 18.0) * zoom;
                painter.text(
                    node_rect.left_top() + offset,
                    Align2::LEFT_TOP,
                    ellipsize(&format!("{property_name}: {option_value}"), 30),
                    FontId::proportional((11.0 * zoom).clamp(7.0, 16.0)),
                    text_color.gamma_multiply(0.85),
                );
            }

            if response.clicked_by(egui::PointerButton::Primary) && is_hovered {
                clicked_node = Some(node.id.clone());
            }
            if response.secondary_clicked() && is_hovered {
                context_node = Some(node.id.clone());
            }
        }

        // Rubber band for an in-flight connect gesture.
        if let Some(drag) = &connect_drag
            && let Some(pointer) = pointer
        {
            let source_rect = node_rects[drag.source_index];
            let start = clip_to_rect_boundary(source_rect, pointer);
            let color = Color32::from_rgb(103, 196, 255);
            painter.line_segment([start, pointer], Stroke::new(2.0, color));
            draw_arrowhead(&painter, start, pointer, 9.0, color);
        }

        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        if let Some(index) = hovered
            && let Some(entity) = self.snapshot.entities.get(&cache.nodes[index].id)
        {
            let type_name = self
                .snapshot
                .entity_type(entity)
                .map(|entity_type| entity_type.name.as_str())
                .unwrap_or("untyped");
            let panel_text = format!(
                "{}  |  {}  |  {}  |  {} deps / {} dependents",
                entity.name,
                type_name,
                entity.status.label(),
                self.snapshot.dependencies_of(&entity.id).len(),
                self.snapshot.dependents_of(&entity.id).len()
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                panel_text,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        self.connect_drag = connect_drag;
        self.pending_connect = pending_connect;

        if let Some(node_id) = clicked_node {
            self.selected = Some(node_id);
        } else if response.clicked_by(egui::PointerButton::Primary) && hovered.is_none() {
            self.selected = None;
        }

        if let Some(node_id) = context_node {
            // Right-click toggles the focus used for reachability dimming.
            if self.view.focus.as_deref() == Some(node_id.as_str()) {
                self.view.focus = None;
            } else {
                self.view.focus = Some(node_id);
            }
        }
    }
}
