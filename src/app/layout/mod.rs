use eframe::egui::{Vec2, vec2};

mod order;
mod rank;

/// Spacing constants for the layered layout. Widths are uniform; node
/// heights vary with the displayed property rows and are supplied per
/// node by the caller.
#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct LayoutConfig {
    pub node_width: f32,
    pub node_sep: f32,
    pub rank_sep: f32,
    pub margin: f32,
    pub ordering_sweeps: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 180.0,
            node_sep: 80.0,
            rank_sep: 100.0,
            margin: 50.0,
            ordering_sweeps: 8,
        }
    }
}

/// Top-to-bottom layered layout: cycle removal, longest-path ranking,
/// barycenter ordering, then coordinates. Returns the center position of
/// each node. The vertical extent of a rank is its tallest node; ranks
/// are centered horizontally against each other.
///
/// Fully deterministic for identical input, and an empty node set short-
/// circuits before any phase runs.
pub(in crate::app) fn layered_layout(
    heights: &[f32],
    edges: &[(usize, usize)],
    config: &LayoutConfig,
) -> Vec<Vec2> {
    let node_count = heights.len();
    if node_count == 0 {
        return Vec::new();
    }

    let dag = rank::acyclic_edges(node_count, edges);
    let ranks = rank::assign_ranks(node_count, &dag);
    let layers = order::order_ranks(&ranks, &dag, config.ordering_sweeps);

    let mut positions = vec![Vec2::ZERO; node_count];
    let mut y_cursor = config.margin;
    let mut min_x = f32::MAX;

    for layer in &layers {
        if layer.is_empty() {
            continue;
        }

        let tallest = layer
            .iter()
            .map(|&node| heights[node])
            .fold(0.0f32, f32::max);
        let total_width = layer.len() as f32 * config.node_width
            + (layer.len() - 1) as f32 * config.node_sep;

        let mut x_cursor = -total_width / 2.0;
        min_x = min_x.min(x_cursor);
        let y_center = y_cursor + tallest / 2.0;

        for &node in layer {
            positions[node] = vec2(x_cursor + config.node_width / 2.0, y_center);
            x_cursor += config.node_width + config.node_sep;
        }

        y_cursor += tallest + config.rank_sep;
    }

    // Shift so the widest rank's left edge sits at the margin.
    let shift = config.margin - min_x;
    for position in &mut positions {
        position.x += shift;
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    const H: f32 = 44.0;

    #[test]
    fn empty_input_short_circuits() {
        assert!(layered_layout(&[], &[], &LayoutConfig::default()).is_empty());
    }

    #[test]
    fn chain_descends_rank_by_rank() {
        let config = LayoutConfig::default();
        let positions = layered_layout(&[H, H, H], &[(0, 1), (1, 2)], &config);
        assert!(positions[0].y < positions[1].y);
        assert!(positions[1].y < positions[2].y);
        assert_eq!(positions[1].y - positions[0].y, H + config.rank_sep);
    }

    #[test]
    fn diamond_siblings_share_a_rank() {
        let config = LayoutConfig::default();
        let positions = layered_layout(
            &[H, H, H, H],
            &[(0, 1), (0, 2), (1, 3), (2, 3)],
            &config,
        );
        assert_eq!(positions[1].y, positions[2].y);
        let gap = (positions[1].x - positions[2].x).abs();
        assert_eq!(gap, config.node_width + config.node_sep);
    }

    #[test]
    fn rank_extent_follows_the_tallest_node() {
        let config = LayoutConfig::default();
        let tall = 120.0;
        let positions = layered_layout(
            &[H, tall, H, H],
            &[(0, 1), (0, 2), (1, 3)],
            &config,
        );

        // Rank 1 holds nodes 1 and 2; both center on the rank's line.
        assert_eq!(positions[1].y, positions[2].y);
        assert_eq!(positions[1].y, config.margin + H + config.rank_sep + tall / 2.0);

        // Rank 2 starts below the tall node, not below the short one.
        assert_eq!(
            positions[3].y,
            config.margin + H + config.rank_sep + tall + config.rank_sep + H / 2.0
        );
    }

    #[test]
    fn layout_is_deterministic() {
        let heights = [H, 62.0, H, 80.0, H];
        let edges = [(0, 1), (0, 2), (1, 3), (2, 3), (3, 4), (4, 0)];
        let config = LayoutConfig::default();
        let first = layered_layout(&heights, &edges, &config);
        let second = layered_layout(&heights, &edges, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn cyclic_input_still_produces_positions() {
        let positions = layered_layout(&[H, H], &[(0, 1), (1, 0)], &LayoutConfig::default());
        assert_eq!(positions.len(), 2);
        assert_ne!(positions[0].y, positions[1].y);
    }

    #[test]
    fn margin_offsets_the_widest_rank() {
        let config = LayoutConfig::default();
        let positions = layered_layout(&[H, H, H], &[(0, 1), (0, 2)], &config);

        // Rank 1 is the widest; its leftmost node edge sits at the margin.
        let left = positions
            .iter()
            .map(|p| p.x - config.node_width / 2.0)
            .fold(f32::MAX, f32::min);
        assert_eq!(left, config.margin);
        assert_eq!(positions[0].y, config.margin + H / 2.0);
    }
}
