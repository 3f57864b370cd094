//! Command line arguments and the settings derived from them.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, TimeDelta};
use clap::{ArgAction, Parser};
use grid_query::{FieldSpec, QueryConfig};

/// Format of `--date`, `--date-from` and `--date-to`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Parser, Debug)]
#[command(name = "sat-point")]
#[command(about = "Print satellite grid values for a latitude/longitude point")]
pub struct Args {
    /// Directory searched recursively for product files
    /// (`<YYYYMMDDHHMMSS>-DMI-L4*.nc`)
    #[arg(long, env = "SAT_DATA_DIR", default_value = "data/sat")]
    pub data_dir: PathBuf,

    /// Read this file instead of searching the data directory
    #[arg(long, conflicts_with_all = ["date", "date_from"])]
    pub input_filename: Option<PathBuf>,

    /// First day to include (defaults to today)
    #[arg(long, value_parser = parse_date, conflicts_with = "date_from")]
    pub date: Option<NaiveDate>,

    /// First day to include
    #[arg(long, value_parser = parse_date)]
    pub date_from: Option<NaiveDate>,

    /// Day to stop at (exclusive)
    #[arg(long, value_parser = parse_date, conflicts_with_all = ["days_back_in_time", "days_forward_in_time"])]
    pub date_to: Option<NaiveDate>,

    /// Include this many days before the first day
    #[arg(long, conflicts_with = "days_forward_in_time")]
    pub days_back_in_time: Option<u32>,

    /// Include this many days from the first day
    #[arg(long)]
    pub days_forward_in_time: Option<u32>,

    /// Latitude of the point in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude of the point in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Fields to print as `name[:option]`, e.g. `time:julian` or `dummy:;`
    /// (see --print-variables)
    #[arg(short, long, num_args = 1.., action = ArgAction::Append)]
    pub filter: Vec<String>,

    /// Print nothing for a file when any requested value is missing
    #[arg(long)]
    pub skip_missing: bool,

    /// Print the variables available in each file
    #[arg(long)]
    pub print_variables: bool,

    /// Print the latitude/longitude range covered by each file
    #[arg(long)]
    pub print_lat_lon_range: bool,

    /// Print the dates available in the data directory
    #[arg(long)]
    pub print_dates: bool,

    /// Radius of the smoothing window in kilometers
    #[arg(long, env = "SAT_SMOOTH_RADIUS_KM")]
    pub smooth_radius_km: Option<f64>,

    /// YAML file with query settings
    #[arg(long, env = "SAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Shorthand for --log-level debug
    #[arg(short, long, conflicts_with = "verbose")]
    pub debug: bool,

    /// Shorthand for --log-level info
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_filename: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| format!("'{}' is not a {} date: {}", s, DATE_FORMAT, e))
}

/// Day range to search, as given. The end may come before the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Args {
    /// Work out the search window relative to `today`.
    ///
    /// The start is `--date-from`, else `--date`, else today. The end is
    /// `--date-to`, else start minus `--days-back-in-time`, else start plus
    /// `--days-forward-in-time`, else the day after the start.
    pub fn date_window(&self, today: NaiveDate) -> Result<DateWindow> {
        let start = self.date_from.or(self.date).unwrap_or(today);

        let end = if let Some(end) = self.date_to {
            Some(end)
        } else if let Some(days) = self.days_back_in_time {
            start.checked_sub_signed(days_delta(days)?)
        } else if let Some(days) = self.days_forward_in_time {
            start.checked_add_signed(days_delta(days)?)
        } else {
            start.succ_opt()
        };

        let end = end.ok_or_else(|| anyhow!("date window starting {} is out of range", start))?;
        Ok(DateWindow { start, end })
    }

    /// Field specs from `--filter`, in the order given.
    pub fn field_specs(&self) -> Vec<FieldSpec> {
        FieldSpec::parse_all(&self.filter)
    }

    /// Both coordinates of the point, required for queries.
    pub fn point(&self) -> Result<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Ok((lat, lon)),
            _ => Err(anyhow!("--lat and --lon are required to print values")),
        }
    }

    /// Query settings: the YAML file if given, else the environment, with
    /// `--smooth-radius-km` applied on top.
    pub fn query_config(&self) -> Result<QueryConfig> {
        let mut config = match &self.config {
            Some(path) => load_config_file(path)?,
            None => QueryConfig::from_env(),
        };
        if let Some(radius) = self.smooth_radius_km {
            config.smooth_radius_km = radius;
        }
        config
            .validate()
            .map_err(|e| anyhow!("Invalid query configuration: {}", e))?;
        Ok(config)
    }
}

fn days_delta(days: u32) -> Result<TimeDelta> {
    TimeDelta::try_days(i64::from(days)).ok_or_else(|| anyhow!("{} days is out of range", days))
}

fn load_config_file(path: &Path) -> Result<QueryConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}
