use eframe::egui::Pos2;

mod scatter;
mod spider;

/// Chart hit-testing is a plain nearest-point scan: the closest candidate
/// within 15 px of the pointer, independent of egui's own hit layer.
pub(super) const HIT_RADIUS: f32 = 15.0;

pub(super) fn nearest_within(points: &[Pos2], pointer: Pos2, max_distance: f32) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .map(|(index, point)| (index, point.distance(pointer)))
        .filter(|&(_, distance)| distance <= max_distance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}
