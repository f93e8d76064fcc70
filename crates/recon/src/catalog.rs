//! Curated California institution tables, embedded at compile time.
//!
//! Tables are listed in source priority order: on a dedup collision the
//! earlier table wins.

use crate::error::SchemaError;
use crate::literal::LiteralTable;

const EMBEDDED: &[(&str, &str)] = &[
    ("uc", include_str!("../data/uc.toml")),
    ("csu", include_str!("../data/csu.toml")),
    ("private", include_str!("../data/private.toml")),
    ("community_colleges", include_str!("../data/community_colleges.toml")),
    ("trade_schools", include_str!("../data/trade_schools.toml")),
    ("high_schools", include_str!("../data/high_schools.toml")),
];

/// Ids of every embedded table, in priority order.
pub fn table_ids() -> impl Iterator<Item = &'static str> {
    EMBEDDED.iter().map(|(id, _)| *id)
}

/// Parse every embedded table, in priority order.
pub fn all_tables() -> Result<Vec<LiteralTable>, SchemaError> {
    EMBEDDED
        .iter()
        .map(|(id, src)| LiteralTable::from_toml(id, src))
        .collect()
}

/// Parse the named tables, keeping catalog priority order regardless of the
/// order ids were given in. An empty selection means every table.
pub fn select(ids: &[String]) -> Result<Vec<LiteralTable>, SchemaError> {
    if ids.is_empty() {
        return all_tables();
    }

    if let Some(unknown) = ids.iter().find(|id| !table_ids().any(|known| known == id.as_str())) {
        return Err(SchemaError::MalformedTable {
            table: unknown.clone(),
            reason: format!(
                "no such table (available: {})",
                table_ids().collect::<Vec<_>>().join(", ")
            ),
        });
    }

    EMBEDDED
        .iter()
        .filter(|(id, _)| ids.iter().any(|want| want.as_str() == *id))
        .map(|(id, src)| LiteralTable::from_toml(id, src))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::SourceAdapter;
    use crate::literal::LiteralListAdapter;
    use crate::model::SchoolType;

    fn one(id: &str) -> LiteralTable {
        select(&[id.to_string()]).unwrap().remove(0)
    }

    #[test]
    fn every_embedded_table_parses_and_validates() {
        let tables = all_tables().unwrap();
        assert_eq!(tables.len(), 6);
        for table in tables {
            let id = table.id.clone();
            let out = LiteralListAdapter::new(table).produce_records().unwrap();
            assert!(!out.records.is_empty(), "table {id} is empty");
            assert_eq!(out.skipped, 0, "table {id} has blank entries");
        }
    }

    #[test]
    fn table_sizes() {
        let count = |id: &str| one(id).schools.len();
        assert_eq!(count("uc"), 10);
        assert_eq!(count("csu"), 23);
        assert_eq!(count("private"), 16);
        assert_eq!(count("community_colleges"), 15);
        assert_eq!(count("trade_schools"), 8);
        assert_eq!(count("high_schools"), 91);
    }

    #[test]
    fn table_types() {
        let ty = |id: &str| SchoolType::parse(&one(id).school_type).unwrap();
        assert_eq!(ty("uc"), SchoolType::University);
        assert_eq!(ty("community_colleges"), SchoolType::CommunityCollege);
        assert_eq!(ty("trade_schools"), SchoolType::TradeSchool);
        assert_eq!(ty("high_schools"), SchoolType::HighSchool);
    }

    #[test]
    fn ids_match_file_ids() {
        for table in all_tables().unwrap() {
            assert!(table_ids().any(|id| id == table.id));
        }
    }

    #[test]
    fn select_keeps_priority_order() {
        let picked = select(&["high_schools".into(), "uc".into()]).unwrap();
        let ids: Vec<_> = picked.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["uc", "high_schools"]);
    }

    #[test]
    fn select_rejects_unknown_id() {
        let err = select(&["ivy_league".into()]).unwrap_err();
        assert!(err.to_string().contains("ivy_league"));
    }
}
