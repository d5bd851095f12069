use csv::StringRecord;

use crate::error::CompileError;

use super::ColumnLayout;

/// Column names of a header-based parcel export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderColumns {
    /// City candidates in priority order. The export frequently leaves `CITY`
    /// blank and carries the value in one of the later columns instead.
    pub city: Vec<String>,
    pub number: String,
    pub additional: String,
    pub direction: String,
    pub street: String,
    pub suffix: String,
    pub unit: String,
}

impl Default for HeaderColumns {
    fn default() -> Self {
        HeaderColumns {
            city: ["CITY", "UDATE1", "USER9", "UDATE2", "UDATE3"]
                .into_iter()
                .map(String::from)
                .collect(),
            number: "ADRNO".to_string(),
            additional: "ADRADD".to_string(),
            direction: "ADRDIR".to_string(),
            street: "ADRSTR".to_string(),
            suffix: "ADRSUF".to_string(),
            unit: "LVU".to_string(),
        }
    }
}

impl HeaderColumns {
    /// Resolve column names against a header record.
    ///
    /// Number, street and suffix columns are required; the others read as
    /// empty when the export lacks them.
    pub fn resolve(&self, header: &StringRecord) -> Result<ColumnLayout, CompileError> {
        let found: Vec<String> = header
            .iter()
            .map(|name| name.trim_start_matches('\u{feff}').to_string())
            .collect();

        if found.iter().all(|name| name.is_empty()) {
            return Err(CompileError::MissingHeader);
        }

        // a repeated name resolves to its last column
        let position = |name: &str| found.iter().rposition(|column| column == name);

        let mut missing: Vec<String> = [&self.number, &self.street, &self.suffix]
            .into_iter()
            .filter(|name| position(name.as_str()).is_none())
            .map(|name| name.to_string())
            .collect();

        if !missing.is_empty() {
            missing.sort();
            missing.dedup();
            return Err(CompileError::MissingColumns { missing, found });
        }

        Ok(ColumnLayout {
            city: self.city.iter().filter_map(|name| position(name.as_str())).collect(),
            number: position(self.number.as_str()),
            additional: position(self.additional.as_str()),
            direction: position(self.direction.as_str()),
            street: position(self.street.as_str()),
            suffix: position(self.suffix.as_str()),
            unit: position(self.unit.as_str()),
            min_len: 0,
        })
    }
}
