//! Grid resource abstraction.
//!
//! A [`GridFile`] is one opened grid: 1-D latitude and longitude axes, a
//! per-axis resolution, a scalar observation time and any number of named
//! data variables shaped `(lat, lon)` after the leading time dimension.
//! Missing values are carried explicitly as `(value, missing)` pairs rather
//! than folded into NaN.

use std::collections::HashMap;

use crate::error::{QueryError, Result};

/// Name of the latitude axis variable.
pub const LAT: &str = "lat";
/// Name of the longitude axis variable.
pub const LON: &str = "lon";
/// Name of the observation time variable.
pub const TIME: &str = "time";

/// One cell of a variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellValue {
    pub value: f64,
    pub missing: bool,
}

impl CellValue {
    /// A present value.
    pub fn present(value: f64) -> Self {
        Self {
            value,
            missing: false,
        }
    }

    /// A masked cell. The stored value is meaningless.
    pub fn missing() -> Self {
        Self {
            value: f64::NAN,
            missing: true,
        }
    }

    /// The value, or `None` if the cell is masked.
    pub fn get(&self) -> Option<f64> {
        if self.missing {
            None
        } else {
            Some(self.value)
        }
    }
}

/// A full 2-D variable with its missing-value mask, row-major by latitude.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedGrid {
    n_lat: usize,
    n_lon: usize,
    values: Vec<f64>,
    missing: Vec<bool>,
}

impl MaskedGrid {
    /// Create a grid from values and a mask of the same length.
    pub fn new(n_lat: usize, n_lon: usize, values: Vec<f64>, missing: Vec<bool>) -> Result<Self> {
        let expected = n_lat * n_lon;
        if values.len() != expected || missing.len() != expected {
            return Err(QueryError::invalid_grid(format!(
                "expected {}x{} = {} cells, got {} values and {} mask entries",
                n_lat,
                n_lon,
                expected,
                values.len(),
                missing.len()
            )));
        }
        Ok(Self {
            n_lat,
            n_lon,
            values,
            missing,
        })
    }

    /// Create a grid with nothing masked.
    pub fn from_values(n_lat: usize, n_lon: usize, values: Vec<f64>) -> Result<Self> {
        let missing = vec![false; values.len()];
        Self::new(n_lat, n_lon, values, missing)
    }

    /// Create a grid where `None` marks a missing cell.
    pub fn from_options(n_lat: usize, n_lon: usize, cells: Vec<Option<f64>>) -> Result<Self> {
        let missing = cells.iter().map(Option::is_none).collect();
        let values = cells.into_iter().map(|c| c.unwrap_or(f64::NAN)).collect();
        Self::new(n_lat, n_lon, values, missing)
    }

    pub fn n_lat(&self) -> usize {
        self.n_lat
    }

    pub fn n_lon(&self) -> usize {
        self.n_lon
    }

    /// Get the cell at `(lat_index, lon_index)`.
    pub fn get(&self, lat_index: usize, lon_index: usize) -> Option<CellValue> {
        if lat_index >= self.n_lat || lon_index >= self.n_lon {
            return None;
        }
        let idx = lat_index * self.n_lon + lon_index;
        Some(CellValue {
            value: self.values[idx],
            missing: self.missing[idx],
        })
    }

    /// Iterate over all cells as `(lat_index, lon_index, cell)`.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, CellValue)> + '_ {
        let n_lon = self.n_lon;
        self.values
            .iter()
            .zip(&self.missing)
            .enumerate()
            .map(move |(idx, (&value, &missing))| {
                (idx / n_lon, idx % n_lon, CellValue { value, missing })
            })
    }
}

/// Index of a grid cell along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridIndex {
    pub lat: usize,
    pub lon: usize,
}

/// Read-only access to one opened grid resource.
///
/// Implementations own the underlying handle and release it on drop.
pub trait GridFile {
    /// Cell-center latitudes in degrees.
    fn latitudes(&self) -> &[f64];

    /// Cell-center longitudes in degrees.
    fn longitudes(&self) -> &[f64];

    /// Latitude cell height in degrees.
    fn lat_resolution(&self) -> f64;

    /// Longitude cell width in degrees.
    fn lon_resolution(&self) -> f64;

    /// Raw observation time, seconds since 1981-01-01T00:00:00Z.
    fn time_seconds(&self) -> Option<f64>;

    /// All variable names in storage order, axes included.
    fn variable_names(&self) -> Vec<String>;

    /// The `units` attribute of a variable, if any.
    fn units(&self, name: &str) -> Option<String>;

    /// Read a data variable for the first time step, unpacked and masked.
    fn read_variable(&self, name: &str) -> Result<MaskedGrid>;

    /// Read a flag variable (such as a land/sea mask) as raw integers.
    fn read_flags(&self, name: &str) -> Result<Vec<i64>>;

    /// Whether the grid stores a variable called `name`.
    fn has_variable(&self, name: &str) -> bool {
        self.variable_names().iter().any(|v| v == name)
    }

    /// Read one cell of a data variable.
    fn read_cell(&self, name: &str, index: GridIndex) -> Result<CellValue> {
        let grid = self.read_variable(name)?;
        grid.get(index.lat, index.lon).ok_or_else(|| {
            QueryError::invalid_grid(format!(
                "cell ({}, {}) outside {} of shape {}x{}",
                index.lat,
                index.lon,
                name,
                grid.n_lat(),
                grid.n_lon()
            ))
        })
    }
}

/// Resolution implied by the spacing of the first two coordinates.
pub fn axis_resolution(values: &[f64]) -> f64 {
    match values {
        [first, second, ..] => (second - first).abs(),
        _ => 0.0,
    }
}

#[derive(Debug, Clone)]
enum Stored {
    Data {
        units: Option<String>,
        grid: MaskedGrid,
    },
    Flags(Vec<i64>),
}

/// A grid held entirely in memory.
///
/// Used for tests and for grids assembled by other means than a file.
#[derive(Debug, Clone)]
pub struct MemoryGrid {
    lats: Vec<f64>,
    lons: Vec<f64>,
    lat_res: f64,
    lon_res: f64,
    time_seconds: Option<f64>,
    order: Vec<String>,
    stored: HashMap<String, Stored>,
}

impl MemoryGrid {
    /// Create a grid from its axes. Resolution defaults to the axis spacing.
    pub fn new(lats: Vec<f64>, lons: Vec<f64>) -> Self {
        let lat_res = axis_resolution(&lats);
        let lon_res = axis_resolution(&lons);
        Self {
            lats,
            lons,
            lat_res,
            lon_res,
            time_seconds: None,
            order: vec![LAT.to_string(), LON.to_string()],
            stored: HashMap::new(),
        }
    }

    /// Create a regular grid from its first cell center, spacing and size.
    pub fn regular(
        first_lat: f64,
        first_lon: f64,
        resolution: f64,
        n_lat: usize,
        n_lon: usize,
    ) -> Self {
        let lats = (0..n_lat).map(|i| first_lat + i as f64 * resolution).collect();
        let lons = (0..n_lon).map(|j| first_lon + j as f64 * resolution).collect();
        Self::new(lats, lons).with_resolution(resolution, resolution)
    }

    pub fn with_resolution(mut self, lat_res: f64, lon_res: f64) -> Self {
        self.lat_res = lat_res;
        self.lon_res = lon_res;
        self
    }

    pub fn with_time(mut self, seconds_since_epoch: f64) -> Self {
        if self.time_seconds.is_none() {
            self.order.push(TIME.to_string());
        }
        self.time_seconds = Some(seconds_since_epoch);
        self
    }

    pub fn with_variable(mut self, name: &str, units: Option<&str>, grid: MaskedGrid) -> Self {
        self.insert(
            name,
            Stored::Data {
                units: units.map(str::to_string),
                grid,
            },
        );
        self
    }

    pub fn with_flags(mut self, name: &str, flags: Vec<i64>) -> Self {
        self.insert(name, Stored::Flags(flags));
        self
    }

    pub fn n_lat(&self) -> usize {
        self.lats.len()
    }

    pub fn n_lon(&self) -> usize {
        self.lons.len()
    }

    fn insert(&mut self, name: &str, stored: Stored) {
        if !self.stored.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.stored.insert(name.to_string(), stored);
    }
}

impl GridFile for MemoryGrid {
    fn latitudes(&self) -> &[f64] {
        &self.lats
    }

    fn longitudes(&self) -> &[f64] {
        &self.lons
    }

    fn lat_resolution(&self) -> f64 {
        self.lat_res
    }

    fn lon_resolution(&self) -> f64 {
        self.lon_res
    }

    fn time_seconds(&self) -> Option<f64> {
        self.time_seconds
    }

    fn variable_names(&self) -> Vec<String> {
        self.order.clone()
    }

    fn units(&self, name: &str) -> Option<String> {
        match self.stored.get(name)? {
            Stored::Data { units, .. } => units.clone(),
            Stored::Flags(_) => None,
        }
    }

    fn read_variable(&self, name: &str) -> Result<MaskedGrid> {
        let grid = match self.stored.get(name) {
            Some(Stored::Data { grid, .. }) => grid,
            Some(Stored::Flags(flags)) => {
                return MaskedGrid::from_values(
                    self.n_lat(),
                    self.n_lon(),
                    flags.iter().map(|&f| f as f64).collect(),
                )
            }
            None => return Err(QueryError::missing_variable(name)),
        };
        if grid.n_lat() != self.n_lat() || grid.n_lon() != self.n_lon() {
            return Err(QueryError::invalid_grid(format!(
                "variable {} is {}x{}, grid is {}x{}",
                name,
                grid.n_lat(),
                grid.n_lon(),
                self.n_lat(),
                self.n_lon()
            )));
        }
        Ok(grid.clone())
    }

    fn read_flags(&self, name: &str) -> Result<Vec<i64>> {
        let flags = match self.stored.get(name) {
            Some(Stored::Flags(flags)) => flags.clone(),
            Some(Stored::Data { grid, .. }) => {
                grid.cells().map(|(_, _, c)| c.value as i64).collect()
            }
            None => return Err(QueryError::missing_variable(name)),
        };
        if flags.len() != self.n_lat() * self.n_lon() {
            return Err(QueryError::invalid_grid(format!(
                "flag variable {} has {} cells, grid has {}",
                name,
                flags.len(),
                self.n_lat() * self.n_lon()
            )));
        }
        Ok(flags)
    }
}
