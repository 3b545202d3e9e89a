//! Taxonomy dataset model.
//!
//! A taxonomy export is a set of CSV files. [`DatasetKind`] names the files
//! the pipeline understands and [`RawRecord`] is the cleaned form of one CSV
//! row: a mapping from column name to an optional cell value.

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Well-known column names used across taxonomy exports.
///
/// Exports are not entirely consistent: some carry `NAME`, others
/// `PREFERREDLABEL`. Consumers fall back between them.
pub mod columns {
    pub const ID: &str = "ID";
    pub const NAME: &str = "NAME";
    pub const PREFERRED_LABEL: &str = "PREFERREDLABEL";
    pub const DESCRIPTION: &str = "DESCRIPTION";
    pub const SKILL_TYPE: &str = "SKILLTYPE";
    pub const RELATION_TYPE: &str = "RELATIONTYPE";
    pub const OCCUPATION_ID: &str = "OCCUPATIONID";
    pub const SKILL_ID: &str = "SKILLID";
    pub const PARENT_ID: &str = "PARENTID";
    pub const CHILD_ID: &str = "CHILDID";
}

/// The taxonomy dataset files understood by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatasetKind {
    /// Occupation entities (`occupations.csv`)
    Occupations,
    /// Skill entities (`skills.csv`)
    Skills,
    /// Skill group entities (`skill_groups.csv`)
    SkillGroups,
    /// Occupation-to-skill relation table (`occupation_to_skill_relations.csv`)
    OccupationToSkillRelations,
    /// Skill/group hierarchy relation table (`skill_hierarchy.csv`)
    SkillHierarchy,
}

impl DatasetKind {
    /// All dataset kinds in ingestion order: entities first, relations after.
    pub fn all() -> [DatasetKind; 5] {
        [
            DatasetKind::Occupations,
            DatasetKind::Skills,
            DatasetKind::SkillGroups,
            DatasetKind::OccupationToSkillRelations,
            DatasetKind::SkillHierarchy,
        ]
    }

    /// The conventional file name for this dataset within an export directory.
    pub fn file_name(self) -> &'static str {
        match self {
            DatasetKind::Occupations => "occupations.csv",
            DatasetKind::Skills => "skills.csv",
            DatasetKind::SkillGroups => "skill_groups.csv",
            DatasetKind::OccupationToSkillRelations => "occupation_to_skill_relations.csv",
            DatasetKind::SkillHierarchy => "skill_hierarchy.csv",
        }
    }

    /// Returns true for the relation tables (as opposed to entity tables).
    pub fn is_relation_table(self) -> bool {
        matches!(
            self,
            DatasetKind::OccupationToSkillRelations | DatasetKind::SkillHierarchy
        )
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatasetKind::Occupations => "occupations",
            DatasetKind::Skills => "skills",
            DatasetKind::SkillGroups => "skill_groups",
            DatasetKind::OccupationToSkillRelations => "occupation_to_skill_relations",
            DatasetKind::SkillHierarchy => "skill_hierarchy",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for DatasetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "occupations" => Ok(DatasetKind::Occupations),
            "skills" => Ok(DatasetKind::Skills),
            "skill_groups" => Ok(DatasetKind::SkillGroups),
            "occupation_to_skill_relations" => Ok(DatasetKind::OccupationToSkillRelations),
            "skill_hierarchy" => Ok(DatasetKind::SkillHierarchy),
            _ => Err(format!("unknown dataset kind `{s}`")),
        }
    }
}

/// One cleaned CSV row: column name mapped to an optional cell value.
///
/// A `None` value means the cell was empty or held a placeholder ("nan",
/// "null") in the source file. Missing columns and null cells are
/// indistinguishable to consumers, which is intentional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: HashMap<String, Option<String>>,
}

impl RawRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a cell value under the given column name.
    pub fn insert(&mut self, column: impl Into<String>, value: Option<String>) {
        self.fields.insert(column.into(), value);
    }

    /// Returns the cell value for a column, flattening missing columns and
    /// null cells both to `None`.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).and_then(|v| v.as_deref())
    }

    /// Returns the first present value among the given columns.
    ///
    /// Used for label lookup where exports disagree on the column name.
    pub fn get_any<'a>(&'a self, columns: &[&str]) -> Option<&'a str> {
        columns.iter().find_map(|column| self.get(column))
    }

    /// Number of columns stored in this record.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when the record holds no columns.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of null cells in this record.
    pub fn null_count(&self) -> usize {
        self.fields.values().filter(|v| v.is_none()).count()
    }
}

impl FromIterator<(String, Option<String>)> for RawRecord {
    fn from_iter<T: IntoIterator<Item = (String, Option<String>)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_kind_roundtrip() {
        for kind in DatasetKind::all() {
            let parsed: DatasetKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_dataset_kind_unknown() {
        let err = "jobs".parse::<DatasetKind>().unwrap_err();
        assert!(err.contains("jobs"));
    }

    #[test]
    fn test_relation_tables() {
        assert!(DatasetKind::OccupationToSkillRelations.is_relation_table());
        assert!(DatasetKind::SkillHierarchy.is_relation_table());
        assert!(!DatasetKind::Occupations.is_relation_table());
        assert!(!DatasetKind::Skills.is_relation_table());
        assert!(!DatasetKind::SkillGroups.is_relation_table());
    }

    #[test]
    fn test_record_get_flattens_nulls() {
        let mut record = RawRecord::new();
        record.insert(columns::ID, Some("1".to_string()));
        record.insert(columns::DESCRIPTION, None);

        assert_eq!(record.get(columns::ID), Some("1"));
        assert_eq!(record.get(columns::DESCRIPTION), None);
        assert_eq!(record.get("MISSING"), None);
        assert_eq!(record.null_count(), 1);
    }

    #[test]
    fn test_record_get_any_fallback() {
        let mut record = RawRecord::new();
        record.insert(columns::PREFERRED_LABEL, Some("Welder".to_string()));

        let label = record.get_any(&[columns::NAME, columns::PREFERRED_LABEL]);
        assert_eq!(label, Some("Welder"));

        let missing = record.get_any(&["FOO", "BAR"]);
        assert_eq!(missing, None);
    }
}
