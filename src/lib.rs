mod city;
mod compile;
mod error;
mod hierarchy;
mod keys;
mod logging;
mod normalize;
mod output;
mod parsing;

pub use city::{
    CanonicalResolver, CityMode, CityResolution, CityResolver, CommunityTable, HeuristicResolver,
    TableError,
};
pub use compile::{CompileOptions, CompileStats, Compiled, SkipReason, compile_file, compile_source};
pub use error::CompileError;
pub use hierarchy::{Address, Community, CommunityRef, Hierarchy, Street, StreetRef};
pub use keys::{KeyStyle, StreetKey, build_address_key, house_numbers, parse_additional_numbers};
pub use logging::{QUIET_ENV, log_with_elapsed};
pub use normalize::{clean, looks_like_city, norm_token, slug};
pub use output::{
    CombinedDocument, CommunityDocument, to_json_bytes, write_atomic, write_combined,
    write_community_files,
};
pub use parsing::{
    ColumnLayout, HeaderColumns, InputLayout, ParcelRow, ParcelSource, PositionalColumns, Record,
};

/// Build the city resolver for `mode`, loading `table_path` for the canonical strategy
/// (the built-in Summit County table when absent).
pub fn resolver_for(
    mode: CityMode,
    table_path: Option<&std::path::Path>,
) -> Result<Box<dyn CityResolver>, CompileError> {
    match mode {
        CityMode::Heuristic => Ok(Box::new(HeuristicResolver)),
        CityMode::Canonical => {
            let table = match table_path {
                Some(path) => CommunityTable::from_path(path)?,
                None => CommunityTable::summit_county(),
            };
            Ok(Box::new(CanonicalResolver::new(table)))
        }
    }
}
