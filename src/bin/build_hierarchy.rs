use std::{path::PathBuf, time::Instant};

use address_hierarchy::{
    CityMode, CompileError, CompileOptions, Compiled, HeaderColumns, InputLayout, KeyStyle,
    compile_file, log_with_elapsed, resolver_for, write_combined,
};
use clap::Parser;

/// Build the county hierarchy JSON (comunities -> streets -> addresses) with sequential ids.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Parcel export CSV, or a .zip archive containing it
    #[arg(long = "in", default_value = "SC705_PARDAT.CSV", value_hint = clap::ValueHint::FilePath)]
    input: PathBuf,

    /// Output JSON document
    #[arg(long = "out", default_value = "summit_county_addresses.json")]
    output: PathBuf,

    /// Prefix of every community id
    #[arg(long, default_value = "3_2_35_77")]
    prefix: String,

    /// Stop after this many data rows (0 reads all)
    #[arg(long, default_value_t = 0)]
    limit: usize,

    /// Print diagnostics about skipped rows
    #[arg(long)]
    debug: bool,

    /// How a row's community is decided
    #[arg(long, value_enum, default_value_t = CityMode::Heuristic)]
    city_mode: CityMode,

    /// Community table (TOML) for the canonical city mode
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    communities: Option<PathBuf>,

    /// How street and address keys are derived
    #[arg(long, value_enum, default_value_t = KeyStyle::Ordinal)]
    key_style: KeyStyle,

    /// Columns tried for the city, in priority order
    #[arg(long, value_delimiter = ',', default_value = "CITY,UDATE1,USER9,UDATE2,UDATE3")]
    city_columns: Vec<String>,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error building hierarchy: {}", e.report());
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), CompileError> {
    let start = Instant::now();
    let resolver = resolver_for(args.city_mode, args.communities.as_deref())?;

    let options = CompileOptions {
        layout: InputLayout::Header(HeaderColumns {
            city: args.city_columns.clone(),
            ..HeaderColumns::default()
        }),
        key_style: args.key_style,
        prefix: Some(args.prefix.clone()),
        limit: args.limit,
    };

    let debug = args.debug;
    let Compiled { hierarchy, stats } =
        compile_file(&args.input, resolver.as_ref(), &options, start, |row, reason| {
            if debug {
                eprintln!("row {row}: skipped ({reason})");
            }
        })?;

    write_combined(&hierarchy, &args.output)?;
    log_with_elapsed(start, "Output written.");

    println!(
        "Wrote {} (communities={})",
        args.output.display(),
        hierarchy.communities().len()
    );

    if debug {
        println!(
            "Rows used={}, rows skipped={}, skipped reasons={}",
            stats.rows_used,
            stats.rows_skipped,
            stats.reason_summary()
        );
        for line in stats.token_report(25) {
            println!("{line}");
        }
    }

    Ok(())
}
