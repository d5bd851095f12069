use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::{clean, slug};

static ORDINAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\d+(st|nd|rd|th)$").expect("valid ordinal pattern"));

/// How street keys (and the address keys built on them) are derived.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum KeyStyle {
    /// `name[_suffix]`, with ordinal streets such as "31ST ST" keyed by name alone.
    #[default]
    Ordinal,
    /// `[direction_]name[_suffix]`, no ordinal special case.
    Directional,
}

/// Canonical identity of a street within its community.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreetKey {
    pub key: String,
    pub ordinal: bool,
    pub style: KeyStyle,
}

/// True for a numbered street ("1st", "31ST") whose suffix is the generic "St".
pub fn is_ordinal_street(name: &str, suffix: &str) -> bool {
    let name = clean(name);
    let suffix = clean(suffix);
    if name.is_empty() || suffix.is_empty() {
        return false;
    }
    if slug(suffix) != "st" {
        return false;
    }
    ORDINAL_RE.is_match(name)
}

impl KeyStyle {
    /// Build the street key for one row, or `None` when the name has no usable key.
    pub fn street_key(self, direction: &str, name: &str, suffix: &str) -> Option<StreetKey> {
        let name_slug = slug(name);
        if name_slug.is_empty() {
            return None;
        }

        match self {
            KeyStyle::Ordinal => {
                if is_ordinal_street(name, suffix) {
                    return Some(self.key(name_slug, true));
                }

                let suffix_slug = slug(suffix);
                if suffix_slug.is_empty()
                    || name_slug == suffix_slug
                    || name_slug.ends_with(&format!("_{suffix_slug}"))
                {
                    return Some(self.key(name_slug, false));
                }

                Some(self.key(format!("{name_slug}_{suffix_slug}"), false))
            }
            KeyStyle::Directional => {
                let key = [slug(direction), name_slug, slug(suffix)]
                    .into_iter()
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
                    .join("_");
                Some(self.key(key, false))
            }
        }
    }

    fn key(self, key: String, ordinal: bool) -> StreetKey {
        StreetKey {
            key,
            ordinal,
            style: self,
        }
    }
}
