//! Observation records and their text projection.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::{QueryError, Result};
use crate::fields::{format_float, FieldKind, FieldSpec, JULIAN};
use crate::grid::CellValue;
use crate::time::{format_timestamp, julian_date, DEFAULT_TIME_FORMAT};

/// Text printed for a missing value.
pub const MISSING_TEXT: &str = "--";

/// A resolved value of one variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObservationValue {
    Float(f64),
    Timestamp(DateTime<Utc>),
    Missing,
}

impl ObservationValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<CellValue> for ObservationValue {
    fn from(cell: CellValue) -> Self {
        match cell.get() {
            Some(v) => Self::Float(v),
            None => Self::Missing,
        }
    }
}

impl From<Option<f64>> for ObservationValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Missing, Self::Float)
    }
}

impl fmt::Display for ObservationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => f.write_str(&format_float(*v)),
            Self::Timestamp(ts) => write!(f, "{}", ts.format(DEFAULT_TIME_FORMAT)),
            Self::Missing => f.write_str(MISSING_TEXT),
        }
    }
}

/// Values of one point query, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationRecord {
    entries: Vec<(String, ObservationValue)>,
}

impl ObservationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value. Overwriting keeps the original position.
    pub fn set(&mut self, name: impl Into<String>, value: ObservationValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ObservationValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ObservationValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Whether any stored value is missing.
    pub fn has_missing(&self) -> bool {
        self.entries.iter().any(|(_, v)| v.is_missing())
    }

    /// Render the requested fields in order.
    ///
    /// With no specs every stored field is rendered in insertion order. When
    /// `skip_if_any_missing` is set and any referenced value is missing the
    /// whole projection is dropped (`Ok(None)`) before anything is formatted.
    pub fn project(
        &self,
        specs: &[FieldSpec],
        skip_if_any_missing: bool,
    ) -> Result<Option<Vec<String>>> {
        let all_fields: Vec<FieldSpec>;
        let specs = if specs.is_empty() {
            all_fields = self.names().map(FieldSpec::plain).collect();
            &all_fields[..]
        } else {
            specs
        };

        let mut resolved = Vec::with_capacity(specs.len());
        for spec in specs {
            let value = if spec.reads_data() {
                let value = self
                    .get(&spec.name)
                    .ok_or_else(|| QueryError::missing_variable(&spec.name))?;
                Some(value)
            } else {
                None
            };
            resolved.push((spec, value));
        }

        if skip_if_any_missing
            && resolved
                .iter()
                .any(|(_, value)| value.is_some_and(|v| v.is_missing()))
        {
            return Ok(None);
        }

        resolved
            .into_iter()
            .map(|(spec, value)| render_field(spec, value))
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    /// Project and join the fields into one line with no separator.
    pub fn render(&self, specs: &[FieldSpec], skip_if_any_missing: bool) -> Result<Option<String>> {
        Ok(self
            .project(specs, skip_if_any_missing)?
            .map(|fields| fields.concat()))
    }
}

impl fmt::Display for ObservationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (_, value) in &self.entries {
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

fn render_field(spec: &FieldSpec, value: Option<&ObservationValue>) -> Result<String> {
    let value = match (spec.kind, value) {
        (FieldKind::SyntheticLabel, _) | (_, None) => return Ok(spec.option.clone()),
        (_, Some(value)) => value,
    };

    match (spec.kind, value) {
        (FieldKind::Timestamp, ObservationValue::Timestamp(ts)) => {
            if spec.option == JULIAN {
                Ok(format_float(julian_date(ts)))
            } else if spec.option.is_empty() {
                Ok(value.to_string())
            } else {
                format_timestamp(ts, &spec.option).ok_or_else(|| QueryError::InvalidFormat {
                    field: spec.name.clone(),
                    pattern: spec.option.clone(),
                })
            }
        }
        _ => Ok(value.to_string()),
    }
}
