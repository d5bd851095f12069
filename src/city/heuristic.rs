use crate::normalize::{looks_like_city, slug};

use super::{CityResolution, CityResolver};

/// Takes the first candidate cell that looks like a place name.
///
/// Communities are not validated against any list; they are numbered in the
/// order they are first seen.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicResolver;

impl CityResolver for HeuristicResolver {
    fn resolve(&self, candidates: &[String]) -> CityResolution {
        let Some(city) = candidates.iter().find(|c| looks_like_city(c)) else {
            return CityResolution::NoCity;
        };

        let slug = slug(city);
        if slug.is_empty() {
            return CityResolution::NoCity;
        }

        CityResolution::Community { slug, number: None }
    }
}

#[cfg(test)]
mod tests {
    use super::HeuristicResolver;
    use crate::city::{CityResolution, CityResolver};

    fn candidates(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn first_plausible_candidate_wins() {
        let resolution = HeuristicResolver.resolve(&candidates(&["", "BARBERTON", "AKRON"]));
        assert_eq!(
            resolution,
            CityResolution::Community {
                slug: "barberton".to_string(),
                number: None
            }
        );
    }

    #[test]
    fn dates_and_codes_are_passed_over() {
        let resolution =
            HeuristicResolver.resolve(&candidates(&["X", "02-JAN-2026", "CUYAHOGA FA"]));
        assert_eq!(
            resolution,
            CityResolution::Community {
                slug: "cuyahoga_fa".to_string(),
                number: None
            }
        );
    }

    #[test]
    fn no_plausible_candidate_is_no_city() {
        assert_eq!(
            HeuristicResolver.resolve(&candidates(&["", "07-OCT-19", "42"])),
            CityResolution::NoCity
        );
        assert_eq!(HeuristicResolver.resolve(&[]), CityResolution::NoCity);
    }
}
