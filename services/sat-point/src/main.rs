//! Satellite point extraction tool.
//!
//! Prints values from gridded L4 satellite products at one latitude/longitude:
//! - Finds product files by the date stamp in their names
//! - Looks up the nearest grid cell in each file
//! - Adds land/sea aware smoothed variables (`analysed_sst_smooth`)
//! - Formats the requested fields into one line per file

mod cli;
mod discovery;
mod logging;
mod report;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use chrono::Local;
use clap::Parser;
use grid_query::{coverage, FieldSpec, QueryService};
use netcdf_parser::{silence_hdf5_errors, NetCdfGridFile};
use tracing::{debug, error, info, info_span};

use cli::Args;
use discovery::DiscoveryPattern;

fn main() -> Result<ExitCode> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    logging::init_tracing(&args)?;
    silence_hdf5_errors();
    debug!(?args, "Parsed arguments");

    let config = args.query_config()?;
    let pattern = DiscoveryPattern::default();
    let files = input_files(&args, &pattern)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if files.is_empty() || args.print_dates {
        if files.is_empty() {
            report::write_no_files_hint(&mut out, &args.data_dir)?;
        }
        let dates = discovery::available_dates(&args.data_dir, &pattern, Local::now().naive_local())?;
        report::write_available_dates(&mut out, &dates)?;
        return Ok(if files.is_empty() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        });
    }

    let mut failures = 0usize;
    if args.print_lat_lon_range {
        for path in &files {
            if let Err(e) = print_coverage(&mut out, path) {
                report_failure(path, &e);
                failures += 1;
            }
        }
    } else if args.print_variables {
        let service = QueryService::new(config, info_span!("list_variables"));
        for path in &files {
            if let Err(e) = print_variables(&mut out, &service, path) {
                report_failure(path, &e);
                failures += 1;
            }
        }
    } else {
        let (lat, lon) = args.point()?;
        let service = QueryService::new(config, info_span!("point_query", lat, lon));
        let specs = args.field_specs();
        for path in &files {
            if let Err(e) = print_point(&mut out, &service, path, lat, lon, &specs, &args) {
                report_failure(path, &e);
                failures += 1;
            }
        }
    }

    out.flush()?;
    if failures > 0 {
        info!(failures, files = files.len(), "Finished with errors");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// `--input-filename`, or the files whose stamps fall in the date window.
fn input_files(args: &Args, pattern: &DiscoveryPattern) -> Result<Vec<PathBuf>> {
    if let Some(path) = &args.input_filename {
        if !path.is_file() {
            return Err(anyhow!("'{}' does not exist. Please specify an input file", path.display()));
        }
        return Ok(vec![path.clone()]);
    }

    let window = args.date_window(Local::now().date_naive())?;
    debug!(start = %window.start, end = %window.end, "Date window");
    let files = discovery::files_in_range(
        &args.data_dir,
        window.start.and_time(chrono::NaiveTime::MIN),
        window.end.and_time(chrono::NaiveTime::MIN),
        pattern,
    )?;
    info!(count = files.len(), "Found input files");
    Ok(files)
}

fn print_coverage(out: &mut impl Write, path: &Path) -> Result<()> {
    let grid = NetCdfGridFile::open(path)?;
    report::write_coverage(out, path, &coverage(&grid)?)?;
    Ok(())
}

fn print_variables(out: &mut impl Write, service: &QueryService, path: &Path) -> Result<()> {
    let grid = NetCdfGridFile::open(path)?;
    report::write_variables(out, path, &service.available_variables(&grid))?;
    Ok(())
}

fn print_point(
    out: &mut impl Write,
    service: &QueryService,
    path: &Path,
    lat: f64,
    lon: f64,
    specs: &[FieldSpec],
    args: &Args,
) -> Result<()> {
    let grid = NetCdfGridFile::open(path)?;

    let record = service.query_fields(&grid, lat, lon, specs)?;

    let header: Vec<String> = if specs.is_empty() {
        record.names().map(str::to_string).collect()
    } else {
        args.filter.clone()
    };
    let line = record.render(specs, args.skip_missing)?;
    if line.is_none() {
        debug!(path = %path.display(), "Skipped record with missing values");
    }
    report::write_record(out, &header, line.as_deref())?;
    Ok(())
}

fn report_failure(path: &Path, err: &anyhow::Error) {
    error!(path = %path.display(), error = %err, "Failed to read file");
    eprintln!("Error: {}: {:#}", path.display(), err);
}
