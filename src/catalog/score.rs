use serde::{Deserialize, Serialize};

use super::model::{CatalogSnapshot, Metric};

/// One chart axis: either a composite metric score or a raw property value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "id")]
pub enum ChartAxis {
    Metric(String),
    Property(String),
}

/// Average of the option weights the entity has assigned across the
/// metric's property set. `None` means "not computable": the metric has
/// no properties, or the entity has no assignment for any of them. A
/// missing option weight still counts as an assignment, with weight 0.
pub fn metric_score(snapshot: &CatalogSnapshot, entity_id: &str, metric: &Metric) -> Option<f64> {
    if metric.property_ids.is_empty() {
        return None;
    }

    let mut sum = 0.0;
    let mut count = 0usize;
    for property_id in &metric.property_ids {
        let Some(option) = snapshot.assigned_option(entity_id, property_id) else {
            continue;
        };
        sum += option.weight.unwrap_or(0.0);
        count += 1;
    }

    if count == 0 { None } else { Some(sum / count as f64) }
}

/// Value of an entity on a chart axis. Property axes use the assigned
/// option's weight, falling back to its 1-based position in the
/// property's ordered option list when no weight is configured.
pub fn axis_value(snapshot: &CatalogSnapshot, entity_id: &str, axis: &ChartAxis) -> Option<f64> {
    match axis {
        ChartAxis::Metric(metric_id) => {
            let metric = snapshot.metric(metric_id)?;
            metric_score(snapshot, entity_id, metric)
        }
        ChartAxis::Property(property_id) => {
            let assigned = snapshot.assigned_option(entity_id, property_id)?;
            if let Some(weight) = assigned.weight {
                return Some(weight);
            }
            snapshot
                .options(property_id)
                .iter()
                .position(|option| option.id == assigned.id)
                .map(|position| (position + 1) as f64)
        }
    }
}

pub fn axis_label(snapshot: &CatalogSnapshot, axis: &ChartAxis) -> String {
    match axis {
        ChartAxis::Metric(metric_id) => snapshot
            .metric(metric_id)
            .map(|metric| metric.name.clone())
            .unwrap_or_else(|| metric_id.clone()),
        ChartAxis::Property(property_id) => snapshot
            .property(property_id)
            .map(|property| property.name.clone())
            .unwrap_or_else(|| property_id.clone()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::super::model::{Entity, EntityStatus, PropertyDef, PropertyOption};
    use super::*;

    fn snapshot_with_weights() -> CatalogSnapshot {
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
        for (property_id, order) in [("p1", 1), ("p2", 2)] {
            snapshot.properties.push(PropertyDef {
                id: property_id.to_string(),
                name: property_id.to_uppercase(),
                order,
            });
        }

        let mut options = HashMap::new();
        options.insert(
            "p1".to_string(),
            vec![
                option("o-low", "p1", "low", Some(2.0), 1),
                option("o-high", "p1", "high", Some(8.0), 2),
            ],
        );
        options.insert(
            "p2".to_string(),
            vec![
                option("o-a", "p2", "a", None, 1),
                option("o-b", "p2", "b", None, 2),
                option("o-c", "p2", "c", Some(8.0), 3),
            ],
        );
        snapshot.options_by_property = options;
        snapshot
    }

    fn option(id: &str, property_id: &str, value: &str, weight: Option<f64>, order: i64) -> PropertyOption {
        PropertyOption {
            id: id.to_string(),
            property_id: property_id.to_string(),
            value: value.to_string(),
            weight,
            order,
        }
    }

    fn metric(property_ids: &[&str]) -> Metric {
        Metric {
            id: "m".to_string(),
            name: "M".to_string(),
            order: 1,
            property_ids: property_ids.iter().map(|id| id.to_string()).collect(),
        }
    }

    fn assign(snapshot: &mut CatalogSnapshot, entity: &str, property: &str, option: &str) {
        snapshot
            .assignments
            .insert((entity.to_string(), property.to_string()), option.to_string());
    }

    #[test]
    fn score_averages_assigned_weights() {
        let mut snapshot = snapshot_with_weights();
        assign(&mut snapshot, "e1", "p1", "o-low");
        assign(&mut snapshot, "e1", "p2", "o-c");

        let score = metric_score(&snapshot, "e1", &metric(&["p1", "p2"]));
        assert_eq!(score, Some(5.0));
    }

    #[test]
    fn unassigned_properties_are_skipped_not_zeroed() {
        let mut snapshot = snapshot_with_weights();
        assign(&mut snapshot, "e1", "p1", "o-high");

        // p2 unassigned: average over the single assigned property.
        let score = metric_score(&snapshot, "e1", &metric(&["p1", "p2"]));
        assert_eq!(score, Some(8.0));
    }

    #[test]
    fn no_assignments_yield_none() {
        let snapshot = snapshot_with_weights();
        assert_eq!(metric_score(&snapshot, "e2", &metric(&["p1", "p2"])), None);
    }

    #[test]
    fn empty_property_set_yields_none_for_every_entity() {
        let mut snapshot = snapshot_with_weights();
        assign(&mut snapshot, "e1", "p1", "o-high");
        assert_eq!(metric_score(&snapshot, "e1", &metric(&[])), None);
        assert_eq!(metric_score(&snapshot, "e2", &metric(&[])), None);
    }

    #[test]
    fn missing_weight_counts_as_zero_assignment() {
        let mut snapshot = snapshot_with_weights();
        assign(&mut snapshot, "e1", "p1", "o-high");
        assign(&mut snapshot, "e1", "p2", "o-a");

        let score = metric_score(&snapshot, "e1", &metric(&["p1", "p2"]));
        assert_eq!(score, Some(4.0));
    }

    #[test]
    fn property_axis_falls_back_to_option_ordinal() {
        let mut snapshot = snapshot_with_weights();
        assign(&mut snapshot, "e1", "p2", "o-b");

        let axis = ChartAxis::Property("p2".to_string());
        assert_eq!(axis_value(&snapshot, "e1", &axis), Some(2.0));

        assign(&mut snapshot, "e1", "p2", "o-c");
        assert_eq!(axis_value(&snapshot, "e1", &axis), Some(8.0));

        assert_eq!(axis_value(&snapshot, "e2", &axis), None);
    }

    #[test]
    fn metric_axis_delegates_to_score() {
        let mut snapshot = snapshot_with_weights();
        snapshot.metrics.push(metric(&["p1"]));
        assign(&mut snapshot, "e1", "p1", "o-low");

        let axis = ChartAxis::Metric("m".to_string());
        assert_eq!(axis_value(&snapshot, "e1", &axis), Some(2.0));
        assert_eq!(axis_value(&snapshot, "e2", &axis), None);
        assert_eq!(
            axis_value(&snapshot, "e1", &ChartAxis::Metric("missing".to_string())),
            None
        );
    }
}
