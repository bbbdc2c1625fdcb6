use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use super::model::{
    CatalogSnapshot, Entity, EntityStatus, FactsheetType, Metric, PropertyDef, PropertyOption,
    Relationship,
};

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawCatalog {
    #[serde(default)]
    entities: Vec<RawEntity>,
    #[serde(default)]
    types: Vec<RawType>,
    #[serde(default)]
    relationships: Vec<RawRelationship>,
    #[serde(default)]
    properties: Vec<RawProperty>,
    #[serde(default)]
    options: Vec<RawOption>,
    #[serde(default)]
    assignments: Vec<RawAssignment>,
    #[serde(default)]
    metrics: Vec<RawMetric>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawEntity {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    status: String,
    #[serde(default, rename = "type")]
    type_id: String,
    #[serde(default)]
    description: String,
}

#[derive(Clone, Debug, Deserialize)]
struct RawType {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    color: String,
    #[serde(default)]
    order: i64,
}

#[derive(Clone, Debug, Deserialize)]
struct RawRelationship {
    id: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    target: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawProperty {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    order: i64,
}

#[derive(Clone, Debug, Deserialize)]
struct RawOption {
    id: String,
    #[serde(default, rename = "property")]
    property_id: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    weight: Option<f64>,
    #[serde(default)]
    order: i64,
}

#[derive(Clone, Debug, Deserialize)]
struct RawAssignment {
    #[serde(default, rename = "entity")]
    entity_id: String,
    #[serde(default, rename = "property")]
    property_id: String,
    #[serde(default, rename = "option")]
    option_id: String,
}

#[derive(Clone, Debug, Deserialize)]
struct RawMetric {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    order: i64,
    #[serde(default)]
    properties: Vec<String>,
    #[serde(default)]
    expand: Option<RawMetricExpand>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawMetricExpand {
    #[serde(default)]
    properties: Vec<RawProperty>,
}

fn parse_status(raw: &str) -> EntityStatus {
    match raw.trim().to_ascii_lowercase().as_str() {
        "draft" => EntityStatus::Draft,
        "archived" => EntityStatus::Archived,
        _ => EntityStatus::Active,
    }
}

pub(super) fn resolve_catalog(raw: &str) -> Result<CatalogSnapshot> {
    let parsed: RawCatalog = serde_json::from_str(raw).context("invalid catalog JSON")?;

    if parsed.entities.is_empty() {
        return Err(anyhow!("catalog contains no entities"));
    }

    let mut types = HashMap::with_capacity(parsed.types.len());
    for raw_type in parsed.types {
        types.insert(
            raw_type.id.clone(),
            FactsheetType {
                id: raw_type.id,
                name: raw_type.name,
                color: raw_type.color,
                order: raw_type.order,
            },
        );
    }

    let mut entities = HashMap::with_capacity(parsed.entities.len());
    for raw_entity in parsed.entities {
        if raw_entity.id.is_empty() {
            continue;
        }
        let name = if raw_entity.name.is_empty() {
            raw_entity.id.clone()
        } else {
            raw_entity.name
        };
        entities.insert(
            raw_entity.id.clone(),
            Entity {
                id: raw_entity.id,
                name,
                status: parse_status(&raw_entity.status),
                type_id: raw_entity.type_id,
                description: raw_entity.description,
            },
        );
    }

    // Relationships: both endpoints must exist, self-references and
    // duplicate (source, target) pairs are dropped.
    let mut seen_pairs = HashSet::new();
    let mut relationships = Vec::with_capacity(parsed.relationships.len());
    for raw_rel in parsed.relationships {
        if raw_rel.source == raw_rel.target {
            continue;
        }
        if !entities.contains_key(&raw_rel.source) || !entities.contains_key(&raw_rel.target) {
            continue;
        }
        if !seen_pairs.insert((raw_rel.source.clone(), raw_rel.target.clone())) {
            continue;
        }
        relationships.push(Relationship {
            id: raw_rel.id,
            source: raw_rel.source,
            target: raw_rel.target,
            description: raw_rel.description.filter(|text| !text.is_empty()),
        });
    }

    let mut properties = parsed
        .properties
        .into_iter()
        .map(|raw_prop| PropertyDef {
            id: raw_prop.id,
            name: raw_prop.name,
            order: raw_prop.order,
        })
        .collect::<Vec<_>>();
    properties.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
    let known_properties = properties.iter().map(|p| p.id.clone()).collect::<HashSet<_>>();

    let mut options_by_property: HashMap<String, Vec<PropertyOption>> = HashMap::new();
    for raw_option in parsed.options {
        if !known_properties.contains(&raw_option.property_id) {
            continue;
        }
        options_by_property
            .entry(raw_option.property_id.clone())
            .or_default()
            .push(PropertyOption {
                id: raw_option.id,
                property_id: raw_option.property_id,
                value: raw_option.value,
                weight: raw_option.weight,
                order: raw_option.order,
            });
    }
    for options in options_by_property.values_mut() {
        options.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
    }

    // At most one option per (entity, property); later records win, which
    // matches the store's create-or-update semantics for the pair.
    let mut assignments = HashMap::with_capacity(parsed.assignments.len());
    for raw_assignment in parsed.assignments {
        if !entities.contains_key(&raw_assignment.entity_id) {
            continue;
        }
        let Some(options) = options_by_property.get(&raw_assignment.property_id) else {
            continue;
        };
        if !options.iter().any(|option| option.id == raw_assignment.option_id) {
            continue;
        }
        assignments.insert(
            (raw_assignment.entity_id, raw_assignment.property_id),
            raw_assignment.option_id,
        );
    }

    // A metric's property set arrives either as a direct id list or as
    // expanded property records; the direct list wins when present.
    let mut metrics = Vec::with_capacity(parsed.metrics.len());
    for raw_metric in parsed.metrics {
        let mut property_ids = if raw_metric.properties.is_empty() {
            raw_metric
                .expand
                .map(|expand| expand.properties.into_iter().map(|p| p.id).collect())
                .unwrap_or_default()
        } else {
            raw_metric.properties
        };
        let mut seen = HashSet::new();
        property_ids.retain(|id| known_properties.contains(id) && seen.insert(id.clone()));

        metrics.push(Metric {
            id: raw_metric.id,
            name: raw_metric.name,
            order: raw_metric.order,
            property_ids,
        });
    }
    metrics.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));

    Ok(CatalogSnapshot {
        entities,
        types,
        relationships,
        properties,
        options_by_property,
        assignments,
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r##"{
            "types": [{"id": "t1", "name": "Use Case", "color": "#4f8fd0", "order": 1}],
            "entities": [
                {"id": "e1", "name": "Churn model", "status": "active", "type": "t1"},
                {"id": "e2", "name": "CRM export", "status": "draft", "type": "t1"},
                {"id": "e3", "name": "Ghost", "status": "nonsense", "type": "t1"}
            ],
            "relationships": [
                {"id": "r1", "source": "e1", "target": "e2"},
                {"id": "r2", "source": "e1", "target": "e2"},
                {"id": "r3", "source": "e1", "target": "e1"},
                {"id": "r4", "source": "e1", "target": "missing"}
            ],
            "properties": [
                {"id": "p2", "name": "Value", "order": 2},
                {"id": "p1", "name": "Complexity", "order": 1}
            ],
            "options": [
                {"id": "o1", "property": "p1", "value": "low", "weight": 2.0, "order": 1},
                {"id": "o2", "property": "p1", "value": "high", "weight": 8.0, "order": 2},
                {"id": "o3", "property": "unknown", "value": "x", "order": 1}
            ],
            "assignments": [
                {"entity": "e1", "property": "p1", "option": "o1"},
                {"entity": "e1", "property": "p1", "option": "o2"},
                {"entity": "missing", "property": "p1", "option": "o1"}
            ],
            "metrics": [
                {"id": "m1", "name": "Feasibility", "order": 1, "properties": ["p1", "p2"]},
                {"id": "m2", "name": "Expanded", "order": 2, "properties": [],
                 "expand": {"properties": [{"id": "p2", "name": "Value", "order": 2}]}}
            ]
        }"##
    }

    #[test]
    fn resolves_and_prunes_relationships() {
        let snapshot = resolve_catalog(sample_json()).unwrap();
        assert_eq!(snapshot.entity_count(), 3);
        assert_eq!(snapshot.relationship_count(), 1);
        assert_eq!(snapshot.relationships[0].source, "e1");
        assert_eq!(snapshot.relationships[0].target, "e2");
    }

    #[test]
    fn unknown_status_defaults_to_active() {
        let snapshot = resolve_catalog(sample_json()).unwrap();
        assert_eq!(snapshot.entities["e3"].status, EntityStatus::Active);
        assert_eq!(snapshot.entities["e2"].status, EntityStatus::Draft);
    }

    #[test]
    fn duplicate_assignment_keeps_last_record() {
        let snapshot = resolve_catalog(sample_json()).unwrap();
        let option = snapshot.assigned_option("e1", "p1").unwrap();
        assert_eq!(option.id, "o2");
        assert_eq!(snapshot.assignments.len(), 1);
    }

    #[test]
    fn properties_sorted_and_unknown_option_dropped() {
        let snapshot = resolve_catalog(sample_json()).unwrap();
        assert_eq!(snapshot.properties[0].id, "p1");
        assert_eq!(snapshot.properties[1].id, "p2");
        assert!(snapshot.options("unknown").is_empty());
        assert_eq!(snapshot.options("p1").len(), 2);
    }

    #[test]
    fn metric_property_lists_reconcile_to_known_ids() {
        let snapshot = resolve_catalog(sample_json()).unwrap();
        let direct = snapshot.metric("m1").unwrap();
        assert_eq!(direct.property_ids, vec!["p1", "p2"]);

        let expanded = snapshot.metric("m2").unwrap();
        assert_eq!(expanded.property_ids, vec!["p2"]);
    }

    #[test]
    fn empty_entity_list_is_an_error() {
        assert!(resolve_catalog(r#"{"entities": []}"#).is_err());
        assert!(resolve_catalog("not json").is_err());
    }
}
