use std::{
    collections::HashMap,
    fmt,
    io::Read,
    path::Path,
    time::Instant,
};

use crate::{
    city::{CityResolution, CityResolver},
    error::CompileError,
    hierarchy::Hierarchy,
    keys::{KeyStyle, build_address_key, house_numbers},
    log_with_elapsed,
    normalize::slug,
    parsing::{InputLayout, ParcelRow, ParcelSource, Record},
};

const PROGRESS_EVERY: usize = 100_000;

/// Why a data record contributed nothing to the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    NoCity,
    Excluded,
    Unmapped,
    Unnumbered,
    NoAdrno,
    NoStreet,
    ShortRow,
}

impl SkipReason {
    pub const ALL: [SkipReason; 7] = [
        SkipReason::NoCity,
        SkipReason::Excluded,
        SkipReason::Unmapped,
        SkipReason::Unnumbered,
        SkipReason::NoAdrno,
        SkipReason::NoStreet,
        SkipReason::ShortRow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::NoCity => "no_city",
            SkipReason::Excluded => "excluded",
            SkipReason::Unmapped => "unmapped",
            SkipReason::Unnumbered => "unnumbered",
            SkipReason::NoAdrno => "no_adrno",
            SkipReason::NoStreet => "no_street",
            SkipReason::ShortRow => "short_row",
        }
    }

    fn slot(self) -> usize {
        SkipReason::ALL
            .iter()
            .position(|&reason| reason == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row counters and raw city token tallies gathered during one scan.
#[derive(Debug, Default, Clone)]
pub struct CompileStats {
    pub rows_read: usize,
    pub rows_used: usize,
    pub rows_skipped: usize,
    skipped: [usize; SkipReason::ALL.len()],
    excluded: HashMap<String, usize>,
    unmapped: HashMap<String, usize>,
}

impl CompileStats {
    fn skip(&mut self, reason: SkipReason) {
        self.rows_skipped += 1;
        self.skipped[reason.slot()] += 1;
    }

    pub fn skipped(&self, reason: SkipReason) -> usize {
        self.skipped[reason.slot()]
    }

    /// Per-reason counts in a fixed order; zero counts for the core reasons
    /// are included so summaries keep the same shape between runs.
    pub fn skip_breakdown(&self) -> Vec<(SkipReason, usize)> {
        SkipReason::ALL
            .iter()
            .map(|&reason| (reason, self.skipped(reason)))
            .filter(|&(reason, count)| {
                count > 0
                    || matches!(
                        reason,
                        SkipReason::NoCity | SkipReason::NoAdrno | SkipReason::NoStreet
                    )
            })
            .collect()
    }

    /// Breakdown as `{no_city: 3, no_adrno: 0, no_street: 1}`.
    pub fn reason_summary(&self) -> String {
        let parts: Vec<String> = self
            .skip_breakdown()
            .iter()
            .map(|(reason, count)| format!("{reason}: {count}"))
            .collect();
        format!("{{{}}}", parts.join(", "))
    }

    /// Lines listing the most frequent unmapped and excluded raw city tokens.
    pub fn token_report(&self, n: usize) -> Vec<String> {
        let mut lines = Vec::new();
        for (title, tokens) in [
            ("Unmapped", self.top_unmapped(n)),
            ("Excluded", self.top_excluded(n)),
        ] {
            if tokens.is_empty() {
                continue;
            }
            lines.push(String::new());
            lines.push(format!("{title} raw city tokens (top {n}):"));
            for (token, count) in tokens {
                lines.push(format!("  {token}: {count} rows"));
            }
        }
        lines
    }

    pub fn top_excluded(&self, n: usize) -> Vec<(&str, usize)> {
        top_tokens(&self.excluded, n)
    }

    pub fn top_unmapped(&self, n: usize) -> Vec<(&str, usize)> {
        top_tokens(&self.unmapped, n)
    }
}

fn top_tokens(tally: &HashMap<String, usize>, n: usize) -> Vec<(&str, usize)> {
    let mut tokens: Vec<(&str, usize)> = tally
        .iter()
        .map(|(token, &count)| (token.as_str(), count))
        .collect();
    tokens.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    tokens.truncate(n);
    tokens
}

/// Settings shared by every scan regardless of the city strategy.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub layout: InputLayout,
    pub key_style: KeyStyle,
    /// Prepended to community numbers in ids.
    pub prefix: Option<String>,
    /// Maximum number of data records to read, 0 for all.
    pub limit: usize,
}

pub struct Compiled {
    pub hierarchy: Hierarchy,
    pub stats: CompileStats,
}

/// Compile a parcel export file into a hierarchy.
///
/// `on_skip` is called with the 1-based record number of every skipped row.
pub fn compile_file(
    path: &Path,
    resolver: &dyn CityResolver,
    options: &CompileOptions,
    start: Instant,
    on_skip: impl FnMut(usize, SkipReason),
) -> Result<Compiled, CompileError> {
    let source = ParcelSource::open(path, &options.layout)?;
    log_with_elapsed(start, &format!("Reading {}", path.display()));
    compile_source(source, resolver, options, start, on_skip)
}

/// Scan every record of `source` once, top to bottom.
pub fn compile_source<R: Read>(
    mut source: ParcelSource<R>,
    resolver: &dyn CityResolver,
    options: &CompileOptions,
    start: Instant,
    mut on_skip: impl FnMut(usize, SkipReason),
) -> Result<Compiled, CompileError> {
    let mut hierarchy = Hierarchy::new(options.prefix.as_deref());
    let mut stats = CompileStats::default();

    while let Some(record) = source.next_record()? {
        if options.limit > 0 && stats.rows_read >= options.limit {
            break;
        }
        stats.rows_read += 1;

        let outcome = match record {
            Record::Parcel(row) => {
                insert_row(&mut hierarchy, &mut stats, resolver, options.key_style, &row)
            }
            Record::Short { .. } => Err(SkipReason::ShortRow),
        };

        match outcome {
            Ok(()) => stats.rows_used += 1,
            Err(reason) => {
                stats.skip(reason);
                on_skip(stats.rows_read, reason);
            }
        }

        if stats.rows_read % PROGRESS_EVERY == 0 {
            log_with_elapsed(
                start,
                &format!(
                    "Scanned {} rows, {} communities so far.",
                    stats.rows_read,
                    hierarchy.communities().len()
                ),
            );
        }
    }

    log_with_elapsed(
        start,
        &format!(
            "Scanned {} rows: {} used, {} skipped.",
            stats.rows_read, stats.rows_used, stats.rows_skipped
        ),
    );

    Ok(Compiled { hierarchy, stats })
}

fn insert_row(
    hierarchy: &mut Hierarchy,
    stats: &mut CompileStats,
    resolver: &dyn CityResolver,
    key_style: KeyStyle,
    row: &ParcelRow,
) -> Result<(), SkipReason> {
    let (community_slug, number) = match resolver.resolve(&row.city_candidates) {
        CityResolution::Community { slug, number } => (slug, number),
        CityResolution::NoCity => return Err(SkipReason::NoCity),
        CityResolution::Excluded(raw) => {
            *stats.excluded.entry(raw).or_default() += 1;
            return Err(SkipReason::Excluded);
        }
        CityResolution::Unmapped(raw) => {
            *stats.unmapped.entry(raw).or_default() += 1;
            return Err(SkipReason::Unmapped);
        }
        CityResolution::Unnumbered(_) => return Err(SkipReason::Unnumbered),
    };

    if row.number.is_empty() {
        return Err(SkipReason::NoAdrno);
    }
    if row.street.is_empty() {
        return Err(SkipReason::NoStreet);
    }

    let street_key = key_style
        .street_key(&row.direction, &row.street, &row.suffix)
        .ok_or(SkipReason::NoStreet)?;

    let community = hierarchy.community(&community_slug, number);
    let street = hierarchy.street(community, &street_key.key, street_key.ordinal);

    let unit = slug(&row.unit);
    for house_number in house_numbers(&row.number, &row.additional) {
        let Some(address_key) =
            build_address_key(house_number, &row.direction, &street_key, &row.unit)
        else {
            continue;
        };
        hierarchy.address(street, &address_key, Some(unit.as_str()));
    }

    Ok(())
}
