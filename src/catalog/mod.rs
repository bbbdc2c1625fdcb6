mod load;
mod model;
mod parse;
mod score;

pub use load::load_catalog;
pub use model::{
    CatalogSnapshot, Entity, EntityStatus, FactsheetType, Metric, PropertyDef, PropertyOption,
    Relationship,
};
pub use score::{ChartAxis, axis_label, axis_value, metric_score};
