use eframe::egui::{self, Pos2, Rect, Ui, Vec2, vec2};

use crate::catalog::CatalogSnapshot;

use super::super::render_utils::{NODE_WIDTH, screen_to_world, world_to_screen};
use super::super::{ConnectRequest, GraphCache, GraphNode, ViewModel};

/// Validates a drag-to-connect gesture: self-connections and already
/// existing (source, target) pairs are dropped without emitting anything.
pub(in crate::app) fn connection_request(
    snapshot: &CatalogSnapshot,
    source_id: &str,
    target_id: &str,
) -> Option<ConnectRequest> {
    if source_id == target_id {
        return None;
    }
    if snapshot.has_relationship(source_id, target_id) {
        return None;
    }

    let source = snapshot.entities.get(source_id)?;
    let target = snapshot.entities.get(target_id)?;

    Some(ConnectRequest {
        source_id: source.id.clone(),
        source_name: source.name.clone(),
        target_id: target.id.clone(),
        target_name: target.name.clone(),
    })
}

pub(in crate::app) fn node_screen_rect(
    rect: Rect,
    pan: Vec2,
    zoom: f32,
    node: &GraphNode,
) -> Rect {
    Rect::from_center_size(
        world_to_screen(rect, pan, zoom, node.world_pos),
        vec2(NODE_WIDTH * zoom, node.height * zoom),
    )
}

pub(in crate::app) fn node_at(
    rect: Rect,
    pan: Vec2,
    zoom: f32,
    cache: &GraphCache,
    pointer: Pos2,
) -> Option<usize> {
    // Nodes never overlap after layout; the first hit wins.
    cache
        .nodes
        .iter()
        .position(|node| node_screen_rect(rect, pan, zoom, node).contains(pointer))
}

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.05, 6.0);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::{Entity, EntityStatus, Relationship};

    use super::*;

    fn snapshot() -> CatalogSnapshot {
        let mut snapshot = CatalogSnapshot::default();
        for (id, name) in [("a", "Alpha"), ("b", "Beta"), ("c", "Gamma")] {
            snapshot.entities.insert(
                id.to_string(),
                Entity {
                    id: id.to_string(),
                    name: name.to_string(),
                    status: EntityStatus::Active,
                    type_id: String::new(),
                    description: String::new(),
                },
            );
        }
        snapshot.relationships.push(Relationship {
            id: "r1".to_string(),
            source: "a".to_string(),
            target: "b".to_string(),
            description: None,
        });
        snapshot
    }

    #[test]
    fn self_connection_is_rejected() {
        assert_eq!(connection_request(&snapshot(), "a", "a"), None);
    }

    #[test]
    fn duplicate_connection_is_rejected() {
        let snapshot = snapshot();
        assert_eq!(connection_request(&snapshot, "a", "b"), None);
        // The reverse direction is a different edge and stays valid.
        assert!(connection_request(&snapshot, "b", "a").is_some());
    }

    #[test]
    fn valid_connection_carries_ids_and_names() {
        let request = connection_request(&snapshot(), "a", "c").unwrap();
        assert_eq!(request.source_id, "a");
        assert_eq!(request.source_name, "Alpha");
        assert_eq!(request.target_id, "c");
        assert_eq!(request.target_name, "Gamma");
    }

    #[test]
    fn unknown_endpoints_are_rejected() {
        assert_eq!(connection_request(&snapshot(), "a", "missing"), None);
        assert_eq!(connection_request(&snapshot(), "missing", "a"), None);
    }
}
