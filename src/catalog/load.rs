use std::fs;

use anyhow::{Context, Result};

use super::model::CatalogSnapshot;
use super::parse::resolve_catalog;

pub fn load_catalog(path: &str) -> Result<CatalogSnapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog snapshot {path}"))?;
    resolve_catalog(&raw).with_context(|| format!("failed to resolve catalog snapshot {path}"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn loads_snapshot_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r##"{{
                "types": [{{"id": "t1", "name": "Data Source", "color": "#888888", "order": 1}}],
                "entities": [
                    {{"id": "a", "name": "A", "status": "active", "type": "t1"}},
                    {{"id": "b", "name": "B", "status": "active", "type": "t1"}}
                ],
                "relationships": [{{"id": "r", "source": "a", "target": "b"}}]
            }}"##
        )
        .unwrap();

        let snapshot = load_catalog(file.path().to_str().unwrap()).unwrap();
        assert_eq!(snapshot.entity_count(), 2);
        assert_eq!(snapshot.relationship_count(), 1);
    }

    #[test]
    fn missing_file_reports_path() {
        let error = load_catalog("/nonexistent/catalog.json").unwrap_err();
        assert!(format!("{error:#}").contains("/nonexistent/catalog.json"));
    }
}
