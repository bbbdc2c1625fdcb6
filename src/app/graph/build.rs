use std::collections::HashMap;

use eframe::egui::vec2;

use super::super::layout::{LayoutConfig, layered_layout};
use super::super::render_utils::{NODE_WIDTH, node_height, parse_type_color};
use super::super::{GraphCache, GraphNode, ViewModel};

impl ViewModel {
    fn property_rows(&self, entity_id: &str) -> Vec<(String, String)> {
        let mut rows = Vec::new();
        for property_id in &self.view.displayed_properties {
            let Some(property) = self.snapshot.property(property_id) else {
                continue;
            };
            if let Some(option) = self.snapshot.assigned_option(entity_id, property_id) {
                rows.push((property.name.clone(), option.value.clone()));
            }
        }
        rows
    }

    /// Full rebuild: node specs from the snapshot, deduped edge indices,
    /// then a fresh layout pass. Runs on snapshot replacement, displayed-
    /// property changes, and the auto-align action; never incrementally.
    pub(in crate::app) fn rebuild_graph_cache(&mut self) {
        let ids = self.snapshot.sorted_entity_ids();

        if ids.is_empty() {
            self.graph_cache = None;
            self.graph_dirty = false;
            return;
        }

        let mut index_by_id = HashMap::with_capacity(ids.len());
        for (index, id) in ids.iter().enumerate() {
            index_by_id.insert(id.clone(), index);
        }

        let mut nodes = Vec::with_capacity(ids.len());
        for id in &ids {
            let entity = self.snapshot.entities.get(id).expect("entity exists");
            let color = self
                .snapshot
                .entity_type(entity)
                .map(|entity_type| parse_type_color(&entity_type.color))
                .unwrap_or_else(|| parse_type_color(""));
            let rows = self.property_rows(id);
            let height = node_height(rows.len());

            nodes.push(GraphNode {
                id: id.clone(),
                name: entity.name.clone(),
                status: entity.status,
                color,
                rows,
                world_pos: vec2(0.0, 0.0),
                height,
            });
        }

        let mut edges = Vec::with_capacity(self.snapshot.relationships.len());
        for rel in &self.snapshot.relationships {
            if let (Some(&source), Some(&target)) =
                (index_by_id.get(&rel.source), index_by_id.get(&rel.target))
                && source != target
            {
                edges.push((source, target));
            }
        }
        edges.sort_unstable();
        edges.dedup();

        let heights = nodes.iter().map(|node| node.height).collect::<Vec<_>>();
        let positions = layered_layout(&heights, &edges, &LayoutConfig::default());

        // Recenter the laid-out bounding box on the world origin so the
        // default camera shows the whole graph.
        let mut min_x = f32::MAX;
        let mut max_x = f32::MIN;
        let mut min_y = f32::MAX;
        let mut max_y = f32::MIN;
        for (position, node) in positions.iter().zip(nodes.iter()) {
            min_x = min_x.min(position.x - NODE_WIDTH / 2.0);
            max_x = max_x.max(position.x + NODE_WIDTH / 2.0);
            min_y = min_y.min(position.y - node.height / 2.0);
            max_y = max_y.max(position.y + node.height / 2.0);
        }
        let center = vec2((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);

        for (node, position) in nodes.iter_mut().zip(positions) {
            node.world_pos = position - center;
        }

        self.graph_cache = Some(GraphCache { nodes, edges });
        self.graph_dirty = false;
    }
}
