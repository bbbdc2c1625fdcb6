use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    Draft,
    #[default]
    Active,
    Archived,
}

impl EntityStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Entity {
    pub id: String,
    pub name: String,
    pub status: EntityStatus,
    pub type_id: String,
    pub description: String,
}

#[derive(Clone, Debug)]
pub struct FactsheetType {
    pub id: String,
    pub name: String,
    pub color: String,
    pub order: i64,
}

/// Directed dependency: `source` depends on `target`.
#[derive(Clone, Debug)]
pub struct Relationship {
    pub id: String,
    pub source: String,
    pub target: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug)]
pub struct PropertyDef {
    pub id: String,
    pub name: String,
    pub order: i64,
}

#[derive(Clone, Debug)]
pub struct PropertyOption {
    pub id: String,
    pub property_id: String,
    pub value: String,
    pub weight: Option<f64>,
    pub order: i64,
}

#[derive(Clone, Debug)]
pub struct Metric {
    pub id: String,
    pub name: String,
    pub order: i64,
    pub property_ids: Vec<String>,
}

/// One resolved, validated catalog state. Engines treat it as immutable;
/// the only in-session mutation is appending a confirmed relationship.
#[derive(Clone, Debug, Default)]
pub struct CatalogSnapshot {
    pub entities: HashMap<String, Entity>,
    pub types: HashMap<String, FactsheetType>,
    pub relationships: Vec<Relationship>,
    pub properties: Vec<PropertyDef>,
    pub options_by_property: HashMap<String, Vec<PropertyOption>>,
    pub assignments: HashMap<(String, String), String>,
    pub metrics: Vec<Metric>,
}

impl CatalogSnapshot {
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub fn entity_type(&self, entity: &Entity) -> Option<&FactsheetType> {
        self.types.get(&entity.type_id)
    }

    pub fn property(&self, property_id: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.id == property_id)
    }

    pub fn metric(&self, metric_id: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.id == metric_id)
    }

    /// Options of a property, already sorted by their `order` field.
    pub fn options(&self, property_id: &str) -> &[PropertyOption] {
        self.options_by_property
            .get(property_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn assigned_option(&self, entity_id: &str, property_id: &str) -> Option<&PropertyOption> {
        let option_id = self
            .assignments
            .get(&(entity_id.to_string(), property_id.to_string()))?;
        self.options(property_id)
            .iter()
            .find(|option| &option.id == option_id)
    }

    pub fn has_relationship(&self, source_id: &str, target_id: &str) -> bool {
        self.relationships
            .iter()
            .any(|rel| rel.source == source_id && rel.target == target_id)
    }

    /// Entity ids sorted by type order, then name, for stable pickers and
    /// chart series ordering.
    pub fn sorted_entity_ids(&self) -> Vec<String> {
        let mut ids = self.entities.keys().cloned().collect::<Vec<_>>();
        ids.sort_by(|a, b| {
            let a_entity = self.entities.get(a).expect("entity exists");
            let b_entity = self.entities.get(b).expect("entity exists");
            let a_order = self.entity_type(a_entity).map(|t| t.order).unwrap_or(i64::MAX);
            let b_order = self.entity_type(b_entity).map(|t| t.order).unwrap_or(i64::MAX);
            a_order
                .cmp(&b_order)
                .then_with(|| a_entity.name.cmp(&b_entity.name))
                .then_with(|| a.cmp(b))
        });
        ids
    }

    pub fn dependencies_of(&self, entity_id: &str) -> Vec<&Relationship> {
        self.relationships
            .iter()
            .filter(|rel| rel.source == entity_id)
            .collect()
    }

    pub fn dependents_of(&self, entity_id: &str) -> Vec<&Relationship> {
        self.relationships
            .iter()
            .filter(|rel| rel.target == entity_id)
            .collect()
    }
}
