use eframe::egui::{self, Align2, Color32, FontId, Rect, Sense, Stroke, Ui, pos2, vec2};

use crate::catalog::{CatalogSnapshot, ChartAxis, axis_label, axis_value};
use crate::util::{ellipsize, format_score, stable_pair};

use super::super::render_utils::parse_type_color;
use super::super::ViewModel;
use super::{HIT_RADIUS, nearest_within};

pub(in crate::app) struct ScatterScene {
    pub x_label: String,
    pub y_label: String,
    pub x_ticks: Vec<f64>,
    pub y_ticks: Vec<f64>,
    pub points: Vec<ScatterPoint>,
}

pub(in crate::app) struct ScatterPoint {
    pub entity_id: String,
    pub name: String,
    pub color: Color32,
    pub x: f64,
    pub y: f64,
}

pub(in crate::app) enum ScatterBuild {
    Scene(ScatterScene),
    /// Both axes must be selected before anything can be plotted.
    MissingAxes,
}

/// Tick values spanning an axis: whole steps up to the configured max for
/// metric axes, one tick per option value for property axes.
pub(in crate::app) fn axis_ticks(
    snapshot: &CatalogSnapshot,
    axis: &ChartAxis,
    max_weight: f64,
) -> Vec<f64> {
    match axis {
        ChartAxis::Metric(_) => {
            let top = max_weight.max(1.0).ceil() as i64;
            (0..=top).map(|step| step as f64).collect()
        }
        ChartAxis::Property(property_id) => {
            let options = snapshot.options(property_id);
            let mut ticks = options
                .iter()
                .enumerate()
                .map(|(position, option)| option.weight.unwrap_or((position + 1) as f64))
                .collect::<Vec<_>>();
            ticks.sort_by(|a, b| a.total_cmp(b));
            ticks.dedup();
            ticks
        }
    }
}

/// Min-max linear scaling over a tick domain. A degenerate domain
/// (min == max) maps every value to the midpoint instead of dividing by
/// zero.
pub(in crate::app) fn scale_to_range(
    value: f64,
    domain_min: f64,
    domain_max: f64,
    range_min: f32,
    range_max: f32,
) -> f32 {
    if (domain_max - domain_min).abs() < f64::EPSILON {
        return (range_min + range_max) / 2.0;
    }
    let t = ((value - domain_min) / (domain_max - domain_min)).clamp(0.0, 1.0) as f32;
    range_min + t * (range_max - range_min)
}

/// Builds the scatter scene. Entities missing a value on either axis are
/// excluded from the plot.
pub(in crate::app) fn build_scatter(
    snapshot: &CatalogSnapshot,
    x_axis: Option<&ChartAxis>,
    y_axis: Option<&ChartAxis>,
    max_weight: f64,
) -> ScatterBuild {
    let (Some(x_axis), Some(y_axis)) = (x_axis, y_axis) else {
        return ScatterBuild::MissingAxes;
    };

    let mut points = Vec::new();
    for entity_id in snapshot.sorted_entity_ids() {
        let (Some(x), Some(y)) = (
            axis_value(snapshot, &entity_id, x_axis),
            axis_value(snapshot, &entity_id, y_axis),
        ) else {
            continue;
        };

        let entity = snapshot.entities.get(&entity_id).expect("entity exists");
        let color = snapshot
            .entity_type(entity)
            .map(|entity_type| parse_type_color(&entity_type.color))
            .unwrap_or_else(|| parse_type_color(""));

        points.push(ScatterPoint {
            entity_id,
            name: entity.name.clone(),
            color,
            x,
            y,
        });
    }

    ScatterBuild::Scene(ScatterScene {
        x_label: axis_label(snapshot, x_axis),
        y_label: axis_label(snapshot, y_axis),
        x_ticks: axis_ticks(snapshot, x_axis, max_weight),
        y_ticks: axis_ticks(snapshot, y_axis, max_weight),
        points,
    })
}

fn domain(ticks: &[f64]) -> (f64, f64) {
    match (ticks.first(), ticks.last()) {
        (Some(&min), Some(&max)) => (min, max),
        _ => (0.0, 0.0),
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_scatter(&mut self, ui: &mut Ui) {
        let build = build_scatter(
            &self.snapshot,
            self.view.scatter_x.as_ref(),
            self.view.scatter_y.as_ref(),
            self.view.max_weight,
        );

        let scene = match build {
            ScatterBuild::MissingAxes => {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("No axes selected");
                    ui.label("Pick an X and a Y axis in the controls panel.");
                });
                return;
            }
            ScatterBuild::Scene(scene) => scene,
        };

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

        let plot = Rect::from_min_max(
            pos2(rect.left() + 64.0, rect.top() + 24.0),
            pos2(rect.right() - 24.0, rect.bottom() - 48.0),
        );

        let (x_min, x_max) = domain(&scene.x_ticks);
        let (y_min, y_max) = domain(&scene.y_ticks);

        let grid_stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 90));
        for &tick in &scene.x_ticks {
            let x = scale_to_range(tick, x_min, x_max, plot.left(), plot.right());
            painter.line_segment([pos2(x, plot.top()), pos2(x, plot.bottom())], grid_stroke);
            painter.text(
                pos2(x, plot.bottom() + 6.0),
                Align2::CENTER_TOP,
                format_score(Some(tick)),
                FontId::proportional(10.0),
                Color32::from_gray(170),
            );
        }
        for &tick in &scene.y_ticks {
            // Screen y grows downward: the range is inverted.
            let y = scale_to_range(tick, y_min, y_max, plot.bottom(), plot.top());
            painter.line_segment([pos2(plot.left(), y), pos2(plot.right(), y)], grid_stroke);
            painter.text(
                pos2(plot.left() - 8.0, y),
                Align2::RIGHT_CENTER,
                format_score(Some(tick)),
                FontId::proportional(10.0),
                Color32::from_gray(170),
            );
        }

        painter.text(
            pos2(plot.center().x, rect.bottom() - 22.0),
            Align2::CENTER_TOP,
            &scene.x_label,
            FontId::proportional(12.0),
            Color32::from_gray(210),
        );
        painter.text(
            pos2(rect.left() + 10.0, rect.top() + 6.0),
            Align2::LEFT_TOP,
            &scene.y_label,
            FontId::proportional(12.0),
            Color32::from_gray(210),
        );

        let screen_points = scene
            .points
            .iter()
            .map(|point| {
                pos2(
                    scale_to_range(point.x, x_min, x_max, plot.left(), plot.right()),
                    scale_to_range(point.y, y_min, y_max, plot.bottom(), plot.top()),
                )
            })
            .collect::<Vec<_>>();

        for (point, screen) in scene.points.iter().zip(&screen_points) {
            painter.circle_filled(*screen, 4.5, point.color);
            painter.circle_stroke(
                *screen,
                4.5,
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
            );
        }

        let pointer = ui.input(|input| input.pointer.hover_pos());
        let hovered = pointer.and_then(|pointer| nearest_within(&screen_points, pointer, HIT_RADIUS));

        if let Some(index) = hovered {
            let point = &scene.points[index];

            // Coincident points would stack their labels; nudge each by a
            // stable per-entity offset.
            let (jx, jy) = stable_pair(&point.entity_id);
            let label_pos = screen_points[index] + vec2(8.0 + jx * 3.0, -10.0 + jy * 3.0);
            painter.text(
                label_pos,
                Align2::LEFT_BOTTOM,
                ellipsize(&point.name, 32),
                FontId::proportional(12.0),
                Color32::from_gray(240),
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!(
                    "{}  |  {}: {}  |  {}: {}",
                    point.name,
                    scene.x_label,
                    format_score(Some(point.x)),
                    scene.y_label,
                    format_score(Some(point.y))
                ),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );

            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });

            if response.clicked() {
                self.selected = Some(point.entity_id.clone());
            }
        }

        if scene.points.is_empty() {
            painter.text(
                plot.center(),
                Align2::CENTER_CENTER,
                "No entity has data on both selected axes.",
                FontId::proportional(13.0),
                Color32::from_gray(170),
            );
        }
    }
}
