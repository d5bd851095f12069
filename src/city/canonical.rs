use crate::normalize::norm_token;

use super::{CityResolution, CityResolver, CommunityTable};

/// Maps raw city tokens through a fixed community table.
///
/// Only the first candidate cell is consulted. Tokens are never inferred:
/// anything not excluded or renamed is reported as unmapped.
#[derive(Debug, Clone)]
pub struct CanonicalResolver {
    table: CommunityTable,
}

impl CanonicalResolver {
    pub fn new(table: CommunityTable) -> Self {
        CanonicalResolver { table }
    }
}

impl CityResolver for CanonicalResolver {
    fn resolve(&self, candidates: &[String]) -> CityResolution {
        let raw = candidates.first().map(|c| norm_token(c)).unwrap_or_default();
        if raw.is_empty() {
            return CityResolution::NoCity;
        }

        // exclusion takes precedence over a rename entry
        if self.table.is_excluded(&raw) {
            return CityResolution::Excluded(raw);
        }

        let Some(slug) = self.table.canonical(&raw) else {
            return CityResolution::Unmapped(raw);
        };

        match self.table.number(slug) {
            Some(number) => CityResolution::Community {
                slug: slug.to_string(),
                number: Some(number),
            },
            None => CityResolution::Unnumbered(slug.to_string()),
        }
    }
}
