use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::{clean, slug};

use super::{KeyStyle, StreetKey};

static DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid digits pattern"));

/// Extract every run of digits from a free-text additional-numbers field.
pub fn parse_additional_numbers(field: &str) -> Vec<&str> {
    DIGITS_RE
        .find_iter(clean(field))
        .map(|m| m.as_str())
        .collect()
}

/// The primary house number followed by each additional number, in field order.
pub fn house_numbers<'a>(primary: &'a str, additional: &'a str) -> Vec<&'a str> {
    let mut numbers = vec![primary];
    numbers.extend(parse_additional_numbers(additional));
    numbers
}

/// Build the address key for one house number on an already keyed street.
///
/// Returns `None` when the number has no usable key.
pub fn build_address_key(
    number: &str,
    direction: &str,
    street: &StreetKey,
    unit: &str,
) -> Option<String> {
    let number = slug(number);
    if number.is_empty() {
        return None;
    }

    let mut key = match street.style {
        // the ordinal name already stands for the whole street
        KeyStyle::Ordinal if street.ordinal => number,
        KeyStyle::Ordinal => {
            let direction = slug(direction);
            if direction.is_empty() {
                format!("{number}_{}", street.key)
            } else {
                format!("{number}_{direction}_{}", street.key)
            }
        }
        KeyStyle::Directional => format!("{number}_{}", street.key),
    };

    let unit = slug(unit);
    if !unit.is_empty() {
        key.push_str("_unit_");
        key.push_str(&unit);
    }

    Some(key)
}
