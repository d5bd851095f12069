use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    path::Path,
};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    error::CompileError,
    normalize::{norm_token, slug},
};

// Out-of-county towns that still show up in the export.
const SUMMIT_EXCLUDE: &[&str] = &[
    "MONTVILLE",
    "MARSHALLVIL",
    "DELLROY",
    "CANAL FULTO",
    "BEDFORD",
    "BRECKSVILLE",
    "MENTOR",
    "DOYLESTOWN",
    "MEDINA",
    "WADSWORTH",
    "KENT",
    "AURORA",
    "MORGANTOWN",
    "COLUMBUS",
    "WAYNESBURG",
];

// Raw city tokens are truncated to eleven characters in the export.
const SUMMIT_RENAME: &[(&str, &str)] = &[
    ("AKRON", "akron"),
    ("AKRON OHIO", "akron"),
    ("BARBERTON", "barberton"),
    ("E BARBERTON", "barberton"),
    ("CUYAHOGA FA", "cuyahoga_falls"),
    ("FAIRLAWN", "fairlawn"),
    ("GREEN", "green"),
    ("UNIONTOWN", "green"),
    ("HUDSON", "hudson"),
    ("MACEDONIA", "macedonia"),
    ("MUNROE FALL", "munroe_falls"),
    ("NEW FRANKLI", "new_franklin"),
    ("NORTON", "norton"),
    ("STOW", "stow"),
    ("TALLMADGE", "tallmadge"),
    ("TWINSBURG", "twinsburg"),
    ("BOSTON HEIG", "boston_heights"),
    ("CLINTON", "clinton"),
    ("LAKEMORE", "lakemore"),
    ("MOGADORE", "mogadore"),
    ("NORTHFIELD", "northfield"),
    ("PENINSULA", "peninsula"),
    ("RICHFIELD", "richfield"),
    ("SILVER LAKE", "silver_lake"),
    ("COVENTRY TO", "coventry"),
    ("NORTH CANTO", "sagamore_hills"),
    ("BATH", "bath"),
    ("HINCKLEY", "bath"),
    ("COPLEY", "copley"),
];

// Numbers are assigned externally and have gaps.
const SUMMIT_IDS: &[(&str, u32)] = &[
    ("akron", 1),
    ("barberton", 2),
    ("cuyahoga_falls", 3),
    ("fairlawn", 4),
    ("green", 5),
    ("hudson", 6),
    ("macedonia", 7),
    ("munroe_falls", 8),
    ("new_franklin", 9),
    ("norton", 10),
    ("stow", 11),
    ("tallmadge", 12),
    ("twinsburg", 13),
    ("boston_heights", 14),
    ("clinton", 15),
    ("lakemore", 16),
    ("mogadore", 17),
    ("northfield", 18),
    ("peninsula", 19),
    ("richfield", 21),
    ("silver_lake", 22),
    ("coventry", 23),
    ("sagamore_hills", 26),
    ("bath", 29),
    ("copley", 31),
];

/// Why a community table was rejected.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("invalid TOML")]
    Toml(#[from] toml::de::Error),

    #[error("`{value}` in [{section}] is not a community slug (expected `{expected}`)")]
    NotASlug {
        section: &'static str,
        value: String,
        expected: String,
    },

    #[error("communities `{first}` and `{second}` share number {number}")]
    DuplicateNumber {
        number: u32,
        first: String,
        second: String,
    },
}

/// Exclusion set, rename table and pre-assigned community numbers.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommunityTable {
    #[serde(default)]
    exclude: BTreeSet<String>,
    #[serde(default)]
    rename: BTreeMap<String, String>,
    #[serde(default)]
    ids: BTreeMap<String, u32>,
}

impl CommunityTable {
    /// The audited Summit County mapping.
    pub fn summit_county() -> Self {
        CommunityTable {
            exclude: SUMMIT_EXCLUDE.iter().map(|s| s.to_string()).collect(),
            rename: SUMMIT_RENAME
                .iter()
                .map(|(raw, canon)| (raw.to_string(), canon.to_string()))
                .collect(),
            ids: SUMMIT_IDS
                .iter()
                .map(|(canon, id)| (canon.to_string(), *id))
                .collect(),
        }
    }

    /// Parse a TOML table. Rename targets and `ids` keys must already be
    /// slugs, and no two communities may share a number.
    pub fn from_toml_str(source: &str) -> Result<Self, TableError> {
        let table: CommunityTable = toml::from_str(source)?;
        let table = table.normalized();
        table.validate()?;
        Ok(table)
    }

    pub fn from_path(path: &Path) -> Result<Self, CompileError> {
        let source =
            std::fs::read_to_string(path).map_err(|e| CompileError::Io(path.to_path_buf(), e))?;
        CommunityTable::from_toml_str(&source)
            .map_err(|e| CompileError::CommunityTable(path.to_path_buf(), e))
    }

    // Raw tokens are matched trimmed and uppercased.
    fn normalized(self) -> Self {
        CommunityTable {
            exclude: self.exclude.iter().map(|raw| norm_token(raw)).collect(),
            rename: self
                .rename
                .into_iter()
                .map(|(raw, canon)| (norm_token(&raw), canon.trim().to_string()))
                .collect(),
            ids: self
                .ids
                .into_iter()
                .map(|(canon, id)| (canon.trim().to_string(), id))
                .collect(),
        }
    }

    fn validate(&self) -> Result<(), TableError> {
        let targets = self.rename.values().map(|canon| ("rename", canon));
        let numbered = self.ids.keys().map(|canon| ("ids", canon));
        for (section, canon) in targets.chain(numbered) {
            let expected = slug(canon);
            if canon.is_empty() || expected != *canon {
                return Err(TableError::NotASlug {
                    section,
                    value: canon.clone(),
                    expected,
                });
            }
        }

        let mut seen: HashMap<u32, &str> = HashMap::new();
        for (canon, &number) in &self.ids {
            if let Some(first) = seen.insert(number, canon) {
                return Err(TableError::DuplicateNumber {
                    number,
                    first: first.to_string(),
                    second: canon.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn is_excluded(&self, raw: &str) -> bool {
        self.exclude.contains(raw)
    }

    pub fn canonical(&self, raw: &str) -> Option<&str> {
        self.rename.get(raw).map(String::as_str)
    }

    pub fn number(&self, canonical: &str) -> Option<u32> {
        self.ids.get(canonical).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{CommunityTable, TableError};
    use crate::error::CompileError;

    #[test]
    fn summit_county_table_keeps_gapped_numbers() {
        let table = CommunityTable::summit_county();

        assert_eq!(table.number("peninsula"), Some(19));
        assert_eq!(table.number("richfield"), Some(21));
        assert_eq!(table.number("copley"), Some(31));
        assert_eq!(table.number("springfield"), None);
        assert_eq!(table.canonical("HINCKLEY"), Some("bath"));
        assert!(table.is_excluded("WAYNESBURG"));
    }

    #[test]
    fn every_summit_rename_target_is_numbered() {
        let table = CommunityTable::summit_county();
        for canon in table.rename.values() {
            assert!(table.number(canon).is_some(), "{canon} has no number");
        }
    }

    #[test]
    fn toml_keys_are_normalized() {
        let table = CommunityTable::from_toml_str(
            r#"
            exclude = [" kent "]
            [rename]
            "akron ohio" = "akron"
            [ids]
            akron = 1
            "#,
        )
        .unwrap();

        assert!(table.is_excluded("KENT"));
        assert_eq!(table.canonical("AKRON OHIO"), Some("akron"));
        assert_eq!(table.number("akron"), Some(1));
    }

    #[test]
    fn toml_rejects_unknown_keys() {
        assert!(CommunityTable::from_toml_str("aliases = []").is_err());
    }

    #[test]
    fn summit_county_table_is_valid() {
        assert!(CommunityTable::summit_county().validate().is_ok());
    }

    #[test]
    fn toml_rejects_rename_target_that_is_not_a_slug() {
        let result = CommunityTable::from_toml_str(
            r#"
            [rename]
            AKRON = "../Akron City"
            [ids]
            akron = 1
            "#,
        );

        match result {
            Err(TableError::NotASlug {
                section,
                value,
                expected,
            }) => {
                assert_eq!(section, "rename");
                assert_eq!(value, "../Akron City");
                assert_eq!(expected, "akron_city");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn toml_rejects_id_key_that_is_not_a_slug() {
        let result = CommunityTable::from_toml_str(
            r#"
            [ids]
            "Cuyahoga Falls" = 3
            "#,
        );

        assert!(matches!(
            result,
            Err(TableError::NotASlug { section: "ids", .. })
        ));
        assert!(CommunityTable::from_toml_str("[rename]\nSTOW = \"\"\n").is_err());
    }

    #[test]
    fn toml_rejects_shared_numbers() {
        let result = CommunityTable::from_toml_str(
            r#"
            [ids]
            green = 5
            stow = 5
            "#,
        );

        match result {
            Err(TableError::DuplicateNumber {
                number,
                first,
                second,
            }) => {
                assert_eq!(number, 5);
                assert_eq!(first, "green");
                assert_eq!(second, "stow");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn from_path_reports_invalid_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("communities.toml");
        std::fs::write(&path, "[ids]\ngreen = 5\nstow = 5\n").unwrap();

        assert!(matches!(
            CommunityTable::from_path(&path),
            Err(CompileError::CommunityTable(_, TableError::DuplicateNumber { .. }))
        ));
    }

    #[test]
    fn from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("communities.toml");
        std::fs::write(&path, "[ids]\nstow = 11\n").unwrap();

        let table = CommunityTable::from_path(&path).unwrap();
        assert_eq!(table.number("stow"), Some(11));
    }
}
