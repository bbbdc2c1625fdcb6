use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, pos2};

pub(super) const NODE_WIDTH: f32 = 180.0;
pub(super) const NODE_BASE_HEIGHT: f32 = 44.0;
pub(super) const PROPERTY_ROW_HEIGHT: f32 = 18.0;

/// Shared by the layout input builder and the node renderer: both must
/// agree on how tall a node is for its displayed property rows.
pub(super) fn node_height(property_rows: usize) -> f32 {
    NODE_BASE_HEIGHT + PROPERTY_ROW_HEIGHT * property_rows as f32
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

/// Unrelated nodes and edges keep their hue at roughly 30% opacity.
pub(super) fn dim_color(color: Color32) -> Color32 {
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * 0.55) as u8,
        (color.g() as f32 * 0.55) as u8,
        (color.b() as f32 * 0.55) as u8,
        (color.a() as f32 * 0.30) as u8,
    )
}

/// `#rrggbb` type colors from the catalog; anything else falls back to a
/// neutral slate.
pub(super) fn parse_type_color(raw: &str) -> Color32 {
    let hex = raw.trim().trim_start_matches('#');
    if hex.len() == 6
        && let Ok(value) = u32::from_str_radix(hex, 16)
    {
        return Color32::from_rgb(
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
        );
    }
    Color32::from_rgb(96, 110, 128)
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + pan;

    let mut x = origin.x.rem_euclid(step);
    while x < rect.right() {
        painter.line_segment(
            [pos2(x, rect.top()), pos2(x, rect.bottom())],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        x += step;
    }

    let mut y = origin.y.rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment(
            [pos2(rect.left(), y), pos2(rect.right(), y)],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        y += step;
    }
}

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom
}

pub(super) fn rect_visible(viewport: Rect, rect: Rect) -> bool {
    viewport.intersects(rect)
}

/// Walks from a node's center toward a target point and stops at the
/// node's rectangle boundary, so edges attach to box edges instead of
/// centers.
pub(super) fn clip_to_rect_boundary(rect: Rect, toward: Pos2) -> Pos2 {
    let center = rect.center();
    let delta = toward - center;

    if delta.x.abs() < f32::EPSILON && delta.y.abs() < f32::EPSILON {
        return center;
    }

    let half_width = rect.width() / 2.0;
    let half_height = rect.height() / 2.0;

    let scale_x = if delta.x.abs() > f32::EPSILON {
        half_width / delta.x.abs()
    } else {
        f32::INFINITY
    };
    let scale_y = if delta.y.abs() > f32::EPSILON {
        half_height / delta.y.abs()
    } else {
        f32::INFINITY
    };

    center + delta * scale_x.min(scale_y).min(1.0)
}

/// Arrowhead at `tip`, pointing along `from -> tip`.
pub(super) fn draw_arrowhead(painter: &Painter, from: Pos2, tip: Pos2, size: f32, color: Color32) {
    let direction = tip - from;
    let length = direction.length();
    if length < f32::EPSILON {
        return;
    }

    let unit = direction / length;
    let normal = Vec2::new(-unit.y, unit.x);
    let base = tip - unit * size;
    let left = base + normal * (size * 0.5);
    let right = base - normal * (size * 0.5);

    painter.add(eframe::egui::Shape::convex_polygon(
        vec![tip, left, right],
        color,
        Stroke::NONE,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_height_grows_per_row() {
        assert_eq!(node_height(0), NODE_BASE_HEIGHT);
        assert_eq!(
            node_height(3),
            NODE_BASE_HEIGHT + 3.0 * PROPERTY_ROW_HEIGHT
        );
    }

    #[test]
    fn type_color_parses_hex_and_falls_back() {
        assert_eq!(parse_type_color("#4f8fd0"), Color32::from_rgb(0x4f, 0x8f, 0xd0));
        assert_eq!(parse_type_color("4f8fd0"), Color32::from_rgb(0x4f, 0x8f, 0xd0));
        assert_eq!(parse_type_color(""), Color32::from_rgb(96, 110, 128));
        assert_eq!(parse_type_color("#zzz"), Color32::from_rgb(96, 110, 128));
    }

    #[test]
    fn clipping_stops_at_the_boundary() {
        let rect = Rect::from_center_size(pos2(0.0, 0.0), Vec2::new(100.0, 40.0));

        // Straight down: exits through the bottom edge.
        let exit = clip_to_rect_boundary(rect, pos2(0.0, 200.0));
        assert_eq!(exit, pos2(0.0, 20.0));

        // Target inside the rect stays put.
        let inside = clip_to_rect_boundary(rect, pos2(10.0, 5.0));
        assert_eq!(inside, pos2(10.0, 5.0));
    }

    #[test]
    fn world_screen_round_trip() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), Vec2::new(800.0, 600.0));
        let pan = Vec2::new(12.0, -7.0);
        let world = Vec2::new(140.0, -60.0);
        let screen = world_to_screen(rect, pan, 1.5, world);
        let back = screen_to_world(rect, pan, 1.5, screen);
        assert!((back - world).length() < 1e-3);
    }
}
