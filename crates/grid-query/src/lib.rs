//! Point queries on gridded satellite surface-temperature fields.
//!
//! Given one opened grid and a coordinate, this crate finds the nearest cell,
//! reads masked values there and computes land/sea aware smoothed values
//! around the point.
//!
//! # Architecture
//!
//! ```text
//! QueryService::query(grid, lat, lon, names)
//!      │
//!      ├─► ResolverRegistry::for_grid   (name -> VariableResolver, once)
//!      │
//!      ├─► locator::locate              (coverage check, then 1-D nearest per axis)
//!      │
//!      ├─► per name:
//!      │     ├─ LatitudeAxis / LongitudeAxis / Time
//!      │     ├─ Cell      -> GridFile::read_cell
//!      │     └─ Smoothed  -> SpatialAverager::average
//!      │
//!      └─► ObservationRecord  ──► project / render (FieldSpec list)
//! ```
//!
//! # Example
//!
//! ```
//! use grid_query::{FieldSpec, QueryConfig, QueryService};
//! use grid_query::testdata::baltic_grid;
//!
//! let grid = baltic_grid();
//! let service = QueryService::new(QueryConfig::default(), tracing::Span::none());
//! let record = service.query(&grid, 55.0, 12.0, &["lat", "lon"]).unwrap();
//!
//! let fields = FieldSpec::parse_all(&["lat", "dummy:|", "lon"]);
//! let line = record.render(&fields, false).unwrap();
//! assert_eq!(line.as_deref(), Some("55.0|12.0"));
//! ```

pub mod averager;
pub mod config;
pub mod coords;
pub mod error;
pub mod fields;
pub mod grid;
pub mod locator;
pub mod query;
pub mod record;
pub mod testdata;
pub mod time;

pub use averager::SpatialAverager;
pub use config::{QueryConfig, ZERO_CELSIUS_IN_KELVIN};
pub use coords::{km_to_lat_degrees, km_to_lon_degrees};
pub use error::{Axis, QueryError, Result};
pub use fields::{FieldKind, FieldSpec};
pub use grid::{axis_resolution, CellValue, GridFile, GridIndex, MaskedGrid, MemoryGrid};
pub use locator::{coverage, locate, nearest_index, validate_coordinate, AxisRange, Coverage};
pub use query::{QueryService, ResolverRegistry, VariableResolver};
pub use record::{ObservationRecord, ObservationValue};
