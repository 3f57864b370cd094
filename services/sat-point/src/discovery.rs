//! Finding product files by the timestamp in their names.
//!
//! Product names start with a `YYYYMMDDHHMMSS` stamp followed by `-`, e.g.
//! `20150313000000-DMI-L4_GHRSST-SSTfnd-DMI_OI-NSEABALTIC-v02.0-fv01.0.nc`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Layout of the timestamp prefix.
pub const FILENAME_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Which file names count as products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryPattern {
    /// Substring every product name contains.
    pub provider_marker: String,
    /// Required name suffix.
    pub extension: String,
}

impl Default for DiscoveryPattern {
    fn default() -> Self {
        Self {
            provider_marker: "-DMI-L4".to_string(),
            extension: ".nc".to_string(),
        }
    }
}

impl DiscoveryPattern {
    pub fn matches(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.extension) && file_name.contains(&self.provider_marker)
    }
}

/// Timestamp encoded in the name of `path`, if it has one.
pub fn date_from_filename(path: &Path) -> Option<NaiveDateTime> {
    let name = path.file_name()?.to_str()?;
    let stamp = name.split('-').next()?;
    NaiveDateTime::parse_from_str(stamp, FILENAME_TIMESTAMP_FORMAT).ok()
}

/// Product files under `root` stamped within `[from, to)`.
///
/// The bounds are swapped if given in reverse. Paths are absolute and come in
/// traversal order with entries of each directory sorted by name.
pub fn files_in_range(
    root: &Path,
    from: NaiveDateTime,
    to: NaiveDateTime,
    pattern: &DiscoveryPattern,
) -> Result<Vec<PathBuf>> {
    let (from, to) = (from.min(to), from.max(to));
    let root = root
        .canonicalize()
        .with_context(|| format!("Data directory {} is not accessible", root.display()))?;
    debug!(root = %root.display(), %from, %to, "Searching for product files");

    let mut files = Vec::new();
    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if !pattern.matches(name) {
            continue;
        }
        let Some(stamp) = date_from_filename(entry.path()) else {
            debug!(file = name, "Skipping file without a timestamp prefix");
            continue;
        };
        if from <= stamp && stamp < to {
            debug!(path = %entry.path().display(), "Found file");
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Days with at least one product under `root`, sorted and de-duplicated.
///
/// Covers everything from 1981-01-01 up to a day past `now`.
pub fn available_dates(
    root: &Path,
    pattern: &DiscoveryPattern,
    now: NaiveDateTime,
) -> Result<Vec<NaiveDate>> {
    let from = NaiveDate::from_ymd_opt(1981, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("Invalid archive start date")?;
    let to = now
        .checked_add_signed(TimeDelta::days(1))
        .context("Archive end date out of range")?;

    let mut dates: Vec<NaiveDate> = files_in_range(root, from, to, pattern)?
        .iter()
        .filter_map(|path| date_from_filename(path))
        .map(|stamp| stamp.date())
        .collect();
    dates.sort();
    dates.dedup();
    Ok(dates)
}
