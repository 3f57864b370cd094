//! Text written to stdout.

use std::io::{self, Write};
use std::path::Path;

use chrono::NaiveDate;
use grid_query::fields::format_float;
use grid_query::Coverage;

use crate::cli::DATE_FORMAT;

pub fn write_no_files_hint(out: &mut impl Write, data_dir: &Path) -> io::Result<()> {
    writeln!(
        out,
        "No files to get data from. Please specify a date (--date) or a date range (--date-from/--date-to)."
    )?;
    writeln!(out, "Use --help for details.")?;
    writeln!(out)?;
    writeln!(out, "Data dir: '{}'.", data_dir.display())
}

pub fn write_available_dates(out: &mut impl Write, dates: &[NaiveDate]) -> io::Result<()> {
    let dates: Vec<String> = dates
        .iter()
        .map(|d| d.format(DATE_FORMAT).to_string())
        .collect();
    writeln!(out, "Available dates:")?;
    writeln!(out, "{}", dates.join(", "))
}

pub fn write_coverage(out: &mut impl Write, path: &Path, coverage: &Coverage) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Filename: '{}'", path.display())?;
    writeln!(
        out,
        "Lats: {} - {}",
        format_float(coverage.lat.min),
        format_float(coverage.lat.max)
    )?;
    writeln!(
        out,
        "Lons: {} - {}",
        format_float(coverage.lon.min),
        format_float(coverage.lon.max)
    )
}

pub fn write_variables(out: &mut impl Write, path: &Path, names: &[String]) -> io::Result<()> {
    writeln!(out, "Available variables for {}:", path.display())?;
    writeln!(out, "'{}'", names.join("', '"))
}

/// Header naming the fields, then the rendered line unless it was skipped.
pub fn write_record(
    out: &mut impl Write,
    fields: &[String],
    line: Option<&str>,
) -> io::Result<()> {
    writeln!(out, "# {}", fields.join(" "))?;
    if let Some(line) = line {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_query::AxisRange;

    fn text(write: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        write(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_available_dates() {
        let dates = [
            NaiveDate::from_ymd_opt(2015, 3, 12).unwrap(),
            NaiveDate::from_ymd_opt(2015, 3, 13).unwrap(),
        ];
        let out = text(|o| write_available_dates(o, &dates));
        assert_eq!(out, "Available dates:\n2015-03-12, 2015-03-13\n");
    }

    #[test]
    fn test_no_dates() {
        assert_eq!(text(|o| write_available_dates(o, &[])), "Available dates:\n\n");
    }

    #[test]
    fn test_coverage() {
        let coverage = Coverage {
            lat: AxisRange { min: 53.5, max: 56.5 },
            lon: AxisRange { min: 9.5, max: 13.0 },
        };
        let out = text(|o| write_coverage(o, Path::new("/data/a.nc"), &coverage));
        assert_eq!(out, "\nFilename: '/data/a.nc'\nLats: 53.5 - 56.5\nLons: 9.5 - 13.0\n");
    }

    #[test]
    fn test_variables() {
        let names = vec!["lat".to_string(), "analysed_sst".to_string()];
        let out = text(|o| write_variables(o, Path::new("a.nc"), &names));
        assert_eq!(out, "Available variables for a.nc:\n'lat', 'analysed_sst'\n");
    }

    #[test]
    fn test_record_with_and_without_line() {
        let fields = vec!["lat".to_string(), "lon".to_string()];
        assert_eq!(
            text(|o| write_record(o, &fields, Some("55.012.0"))),
            "# lat lon\n55.012.0\n"
        );
        assert_eq!(text(|o| write_record(o, &fields, None)), "# lat lon\n");
    }
}
