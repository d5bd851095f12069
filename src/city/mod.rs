mod canonical;
mod heuristic;
mod table;

pub use canonical::CanonicalResolver;
pub use heuristic::HeuristicResolver;
pub use table::{CommunityTable, TableError};

/// Which community a parcel row belongs to, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CityResolution {
    /// `number` is the community's configured number, or `None` when
    /// communities are numbered in first-seen order.
    Community { slug: String, number: Option<u32> },
    /// No candidate column held a usable place name.
    NoCity,
    /// The raw token names a town outside the territory.
    Excluded(String),
    /// The raw token matches no known spelling.
    Unmapped(String),
    /// The canonical community has no configured number.
    Unnumbered(String),
}

/// Strategy deciding the community of a row from its city candidate cells.
pub trait CityResolver {
    fn resolve(&self, candidates: &[String]) -> CityResolution;
}

/// Selects a city resolution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum CityMode {
    /// First plausible place name across the candidate columns.
    Heuristic,
    /// Fixed rename table, exclusion set and community numbers.
    Canonical,
}
