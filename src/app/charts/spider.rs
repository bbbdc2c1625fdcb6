use std::f32::consts::TAU;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Stroke, Ui, vec2};

use crate::catalog::{CatalogSnapshot, ChartAxis, axis_label, axis_value};
use crate::util::format_score;

use super::super::render_utils::parse_type_color;
use super::super::ViewModel;
use super::{HIT_RADIUS, nearest_within};

pub(in crate::app) struct SpiderScene {
    pub axes: Vec<String>,
    pub series: Vec<SpiderSeries>,
}

pub(in crate::app) struct SpiderSeries {
    pub entity_id: String,
    pub name: String,
    pub color: Color32,
    /// One slot per axis; `None` marks "no data" and is flagged, never
    /// silently plotted as a score of zero.
    pub values: Vec<Option<f64>>,
}

pub(in crate::app) enum SpiderBuild {
    Scene(SpiderScene),
    /// A polygon needs at least three axes.
    InsufficientAxes { selected: usize },
}

/// Builds the spider scene for the selected axes. Entities with no value
/// on any axis are excluded entirely; partially covered entities keep
/// their polygon with the unknown vertices flagged.
pub(in crate::app) fn build_spider(
    snapshot: &CatalogSnapshot,
    axes: &[ChartAxis],
    max_weight: f64,
) -> SpiderBuild {
    if axes.len() < 3 {
        return SpiderBuild::InsufficientAxes {
            selected: axes.len(),
        };
    }

    let labels = axes.iter().map(|axis| axis_label(snapshot, axis)).collect();

    let mut series = Vec::new();
    for entity_id in snapshot.sorted_entity_ids() {
        let values = axes
            .iter()
            .map(|axis| {
                axis_value(snapshot, &entity_id, axis).map(|value| value.clamp(0.0, max_weight))
            })
            .collect::<Vec<_>>();

        if values.iter().all(Option::is_none) {
            continue;
        }

        let entity = snapshot.entities.get(&entity_id).expect("entity exists");
        let color = snapshot
            .entity_type(entity)
            .map(|entity_type| parse_type_color(&entity_type.color))
            .unwrap_or_else(|| parse_type_color(""));

        series.push(SpiderSeries {
            entity_id,
            name: entity.name.clone(),
            color,
            values,
        });
    }

    SpiderBuild::Scene(SpiderScene {
        axes: labels,
        series,
    })
}

/// Axis `index` of `count`, starting at the top (−90°) and proceeding
/// clockwise. Screen y grows downward, so increasing angles sweep
/// clockwise on screen.
pub(in crate::app) fn axis_angle(index: usize, count: usize) -> f32 {
    -TAU / 4.0 + (index as f32 / count as f32) * TAU
}

pub(in crate::app) fn value_radius(value: f64, max: f64, radius: f32) -> f32 {
    if max <= 0.0 {
        return 0.0;
    }
    (value.clamp(0.0, max) / max) as f32 * radius
}

fn radial_point(center: Pos2, angle: f32, radius: f32) -> Pos2 {
    center + vec2(angle.cos(), angle.sin()) * radius
}

impl ViewModel {
    pub(in crate::app) fn draw_spider(&mut self, ui: &mut Ui) {
        let max_weight = self.view.max_weight;
        let build = build_spider(&self.snapshot, &self.view.spider_axes, max_weight);

        let scene = match build {
            SpiderBuild::InsufficientAxes { selected } => {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Insufficient axes");
                    ui.label(format!(
                        "A spider chart needs at least 3 axes; {selected} selected. \
                         Pick metrics or properties in the controls panel."
                    ));
                });
                return;
            }
            SpiderBuild::Scene(scene) => scene,
        };

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

        let center = rect.center();
        let radius = (rect.width().min(rect.height()) * 0.38).max(40.0);
        let axis_count = scene.axes.len();

        // Web rings and axis spokes.
        for ring in 1..=4 {
            let ring_radius = radius * ring as f32 / 4.0;
            let ring_points = (0..axis_count)
                .map(|index| radial_point(center, axis_angle(index, axis_count), ring_radius))
                .collect::<Vec<_>>();
            painter.add(egui::Shape::closed_line(
                ring_points,
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 90)),
            ));
        }
        for (index, label) in scene.axes.iter().enumerate() {
            let angle = axis_angle(index, axis_count);
            let tip = radial_point(center, angle, radius);
            painter.line_segment(
                [center, tip],
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 140)),
            );
            painter.text(
                radial_point(center, angle, radius + 16.0),
                Align2::CENTER_CENTER,
                label,
                FontId::proportional(12.0),
                Color32::from_gray(210),
            );
        }

        // Polygons, with vertex positions collected for hit-testing.
        let mut hit_points = Vec::new();
        let mut hit_refs = Vec::new();

        for (series_index, series) in scene.series.iter().enumerate() {
            let vertices = series
                .values
                .iter()
                .enumerate()
                .map(|(axis_index, value)| {
                    let angle = axis_angle(axis_index, axis_count);
                    let vertex_radius = value
                        .map(|value| value_radius(value, max_weight, radius))
                        .unwrap_or(0.0);
                    radial_point(center, angle, vertex_radius)
                })
                .collect::<Vec<_>>();

            painter.add(egui::Shape::closed_line(
                vertices.clone(),
                Stroke::new(1.6, series.color),
            ));

            for (axis_index, (vertex, value)) in
                vertices.iter().zip(series.values.iter()).enumerate()
            {
                match value {
                    Some(_) => painter.circle_filled(*vertex, 3.2, series.color),
                    // Hollow marker: this vertex means "no data", not 0.
                    None => painter.circle_stroke(*vertex, 3.2, Stroke::new(1.2, series.color)),
                };
                hit_points.push(*vertex);
                hit_refs.push((series_index, axis_index));
            }
        }

        let pointer = ui.input(|input| input.pointer.hover_pos());
        let hovered = pointer.and_then(|pointer| {
            nearest_within(&hit_points, pointer, HIT_RADIUS)
                .map(|hit_index| hit_refs[hit_index])
        });

        if let Some((series_index, axis_index)) = hovered {
            let series = &scene.series[series_index];
            let value = series.values[axis_index];
            let tooltip = format!(
                "{}  |  {}: {}",
                series.name,
                scene.axes[axis_index],
                if value.is_some() {
                    format_score(value)
                } else {
                    "no data".to_string()
                }
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                tooltip,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );

            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });

            if response.clicked() {
                self.selected = Some(series.entity_id.clone());
            }
        }

        if scene.series.is_empty() {
            painter.text(
                center,
                Align2::CENTER_CENTER,
                "No entity has data on the selected axes.",
                FontId::proportional(13.0),
                Color32::from_gray(170),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::{Entity, EntityStatus, Metric, PropertyDef, PropertyOption};

    use super::*;

    fn snapshot() -> CatalogSnapshot {
        let mut snapshot = CatalogSnapshot::default();
        for id in ["e1", "e2"] {
            snapshot.entities.insert(
                id.to_string(),
                Entity {
                    id: id.to_string(),
                    name: id.to_uppercase(),
                    status: EntityStatus::Active,
                    type_id: String::new(),
                    description: String::new(),
                },
            );
        }
        for (property_id, order) in [("p1", 1), ("p2", 2), ("p3", 3)] {
            snapshot.properties.push(PropertyDef {
                id: property_id.to_string(),
                name: property_id.to_uppercase(),
                order,
            });
            snapshot.options_by_property.insert(
                property_id.to_string(),
                vec![PropertyOption {
                    id: format!("{property_id}-opt"),
                    property_id: property_id.to_string(),
                    value: "set".to_string(),
                    weight: Some(6.0),
                    order: 1,
                }],
            );
            snapshot.metrics.push(Metric {
                id: format!("m-{property_id}"),
                name: format!("M {property_id}"),
                order,
                property_ids: vec![property_id.to_string()],
            });
        }
        snapshot
    }

    fn metric_axes() -> Vec<ChartAxis> {
        ["m-p1", "m-p2", "m-p3"]
            .iter()
            .map(|id| ChartAxis::Metric(id.to_string()))
            .collect()
    }

    fn assign(snapshot: &mut CatalogSnapshot, entity: &str, property: &str) {
        snapshot.assignments.insert(
            (entity.to_string(), property.to_string()),
            format!("{property}-opt"),
        );
    }

    #[test]
    fn fewer_than_three_axes_is_refused() {
        let snapshot = snapshot();
        let axes = metric_axes()[..2].to_vec();
        match build_spider(&snapshot, &axes, 10.0) {
            SpiderBuild::InsufficientAxes { selected } => assert_eq!(selected, 2),
            SpiderBuild::Scene(_) => panic!("two axes must not build a scene"),
        }
    }

    #[test]
    fn entity_without_any_axis_data_is_excluded() {
        let mut snapshot = snapshot();
        assign(&mut snapshot, "e1", "p1");

        let SpiderBuild::Scene(scene) = build_spider(&snapshot, &metric_axes(), 10.0) else {
            panic!("three axes build a scene");
        };
        assert_eq!(scene.series.len(), 1);
        assert_eq!(scene.series[0].entity_id, "e1");
        // Covered axis carries the value, the others are flagged unknown.
        assert_eq!(scene.series[0].values, vec![Some(6.0), None, None]);
    }

    #[test]
    fn values_clamp_to_the_axis_max() {
        let mut snapshot = snapshot();
        assign(&mut snapshot, "e1", "p1");

        let SpiderBuild::Scene(scene) = build_spider(&snapshot, &metric_axes(), 4.0) else {
            panic!("three axes build a scene");
        };
        assert_eq!(scene.series[0].values[0], Some(4.0));
    }

    #[test]
    fn first_axis_points_straight_up() {
        let angle = axis_angle(0, 4);
        assert!((angle + TAU / 4.0).abs() < 1e-6);
        // Second of four axes: a quarter turn clockwise, i.e. screen right.
        let second = axis_angle(1, 4);
        assert!(second.cos() > 0.99);
    }

    #[test]
    fn radius_scales_and_clamps() {
        assert_eq!(value_radius(5.0, 10.0, 100.0), 50.0);
        assert_eq!(value_radius(25.0, 10.0, 100.0), 100.0);
        assert_eq!(value_radius(-3.0, 10.0, 100.0), 0.0);
        assert_eq!(value_radius(5.0, 0.0, 100.0), 0.0);
    }
}
