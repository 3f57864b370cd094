//! Output field specifications.
//!
//! A field is written as `name` or `name:option`. The kind of a field is
//! decided once from its name when the spec is parsed.

use std::fmt;
use std::str::FromStr;

use crate::grid::{LAT, LON, TIME};

/// Name of the synthetic field that renders its option literally.
pub const DUMMY: &str = "dummy";

/// Time format option selecting the Julian date number.
pub const JULIAN: &str = "julian";

/// How a field is looked up and rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `lat` or `lon`.
    Coordinate,
    /// `time`, rendered with the format option.
    Timestamp,
    /// `dummy`, renders its option string and reads no data.
    SyntheticLabel,
    /// Any other variable.
    Generic,
}

impl FieldKind {
    pub fn of(name: &str) -> Self {
        match name {
            LAT | LON => Self::Coordinate,
            TIME => Self::Timestamp,
            DUMMY => Self::SyntheticLabel,
            _ => Self::Generic,
        }
    }
}

/// One requested output field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub option: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, option: impl Into<String>) -> Self {
        let name = name.into();
        let kind = FieldKind::of(&name);
        Self {
            name,
            option: option.into(),
            kind,
        }
    }

    /// A field without a format option.
    pub fn plain(name: impl Into<String>) -> Self {
        Self::new(name, "")
    }

    /// Parse `name[:option]`, splitting on the first colon only.
    pub fn parse(spec: &str) -> Self {
        match spec.split_once(':') {
            Some((name, option)) => Self::new(name, option),
            None => Self::plain(spec),
        }
    }

    /// Parse a list of field specs.
    pub fn parse_all<S: AsRef<str>>(specs: &[S]) -> Vec<Self> {
        specs.iter().map(|s| Self::parse(s.as_ref())).collect()
    }

    /// Whether this field reads stored data.
    pub fn reads_data(&self) -> bool {
        self.kind != FieldKind::SyntheticLabel
    }
}

impl FromStr for FieldSpec {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.option.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}:{}", self.name, self.option)
        }
    }
}

/// Render a float the way the text output expects: shortest round-trip
/// digits, with integral values keeping one decimal (`55.0`).
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value == f64::INFINITY {
        "inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
