mod address;
mod street;

pub use address::{build_address_key, house_numbers, parse_additional_numbers};
pub use street::{KeyStyle, StreetKey, is_ordinal_street};
