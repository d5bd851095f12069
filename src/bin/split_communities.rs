use std::{path::PathBuf, time::Instant};

use address_hierarchy::{
    CityMode, CompileError, CompileOptions, Compiled, InputLayout, KeyStyle, PositionalColumns,
    compile_file, log_with_elapsed, resolver_for, write_community_files,
};
use clap::{ArgAction, Parser};

/// Split county parcel addresses into one JSON file per canonical community.
///
/// Columns are located by position; check the indices against the export's
/// header before trusting the output.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Parcel export CSV, or a .zip archive containing it
    #[arg(long = "in", default_value = "SC705_PARDAT.CSV", value_hint = clap::ValueHint::FilePath)]
    input: PathBuf,

    /// Output directory for community JSON files
    #[arg(long, default_value = "out", value_hint = clap::ValueHint::DirPath)]
    outdir: PathBuf,

    /// Stop after this many data rows (0 reads all)
    #[arg(long, default_value_t = 0)]
    limit: usize,

    /// Skip the first CSV record (headers)
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    skip_header: bool,

    #[arg(long, default_value_t = 50)]
    idx_city: usize,

    #[arg(long, default_value_t = 6)]
    idx_number: usize,

    #[arg(long, default_value_t = 7)]
    idx_dir: usize,

    #[arg(long, default_value_t = 8)]
    idx_street: usize,

    #[arg(long, default_value_t = 9)]
    idx_suffix: usize,

    #[arg(long, default_value_t = 15)]
    idx_unit: usize,

    /// Column holding additional house numbers, if any
    #[arg(long)]
    idx_additional: Option<usize>,

    /// Prefix of every community id (none by default)
    #[arg(long)]
    prefix: Option<String>,

    /// How a row's community is decided. Only communities with a configured
    /// number get a file, so heuristic mode writes none.
    #[arg(long, value_enum, default_value_t = CityMode::Canonical)]
    city_mode: CityMode,

    /// Community table (TOML) replacing the built-in Summit County table
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    communities: Option<PathBuf>,

    /// How street and address keys are derived
    #[arg(long, value_enum, default_value_t = KeyStyle::Directional)]
    key_style: KeyStyle,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error splitting communities: {}", e.report());
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), CompileError> {
    let start = Instant::now();
    let resolver = resolver_for(args.city_mode, args.communities.as_deref())?;

    let options = CompileOptions {
        layout: InputLayout::Positional(PositionalColumns {
            city: args.idx_city,
            number: args.idx_number,
            direction: args.idx_dir,
            street: args.idx_street,
            suffix: args.idx_suffix,
            unit: args.idx_unit,
            additional: args.idx_additional,
            skip_header: args.skip_header,
        }),
        key_style: args.key_style,
        prefix: args.prefix.clone(),
        limit: args.limit,
    };

    let Compiled { hierarchy, stats } =
        compile_file(&args.input, resolver.as_ref(), &options, start, |_, _| {})?;

    let written = write_community_files(&hierarchy, &args.outdir)?;
    let unconfigured = hierarchy.communities().len() - written.len();
    if unconfigured > 0 {
        log_with_elapsed(
            start,
            &format!("Left out {unconfigured} communities without a configured number."),
        );
    }
    log_with_elapsed(
        start,
        &format!("Skipped rows by reason: {}", stats.reason_summary()),
    );

    println!(
        "Wrote {} community files into: {}",
        written.len(),
        args.outdir.display()
    );
    for line in stats.token_report(25) {
        println!("{line}");
    }

    Ok(())
}
