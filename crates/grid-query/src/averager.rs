//! Land/sea aware spatial averaging around a point.
//!
//! The window is a lat/lon box sized from a radius in kilometers. Only cells
//! flagged as water in the land/sea mask and not masked in the variable
//! itself contribute to the mean.

use tracing::{debug, Span};

use crate::coords::{km_to_lat_degrees, km_to_lon_degrees};
use crate::error::{QueryError, Result};
use crate::grid::GridFile;

/// Bit set in the land/sea mask for water cells.
pub const WATER_BIT: i64 = 1;

/// Computes smoothed values of grid variables.
#[derive(Debug, Clone)]
pub struct SpatialAverager {
    land_sea_mask_variable: String,
    span: Span,
}

impl SpatialAverager {
    /// Create an averager reading water flags from `land_sea_mask_variable`.
    pub fn new(land_sea_mask_variable: impl Into<String>, span: Span) -> Self {
        Self {
            land_sea_mask_variable: land_sea_mask_variable.into(),
            span,
        }
    }

    /// Mean of `variable` over water cells within `radius_km` of the center.
    ///
    /// Returns `Ok(None)` when no cell qualifies. The value is in the
    /// variable's native units.
    pub fn average<G: GridFile + ?Sized>(
        &self,
        grid: &G,
        variable: &str,
        center_lat: f64,
        center_lon: f64,
        radius_km: f64,
    ) -> Result<Option<f64>> {
        let delta_lat = km_to_lat_degrees(radius_km);
        let delta_lon = km_to_lon_degrees(radius_km, center_lat);

        // Latitude bounds are inclusive, longitude bounds exclusive.
        let lat_mask: Vec<bool> = grid
            .latitudes()
            .iter()
            .map(|lat| (lat - center_lat).abs() <= delta_lat)
            .collect();
        let lon_mask: Vec<bool> = grid
            .longitudes()
            .iter()
            .map(|lon| {
                let offset = lon - center_lon;
                -delta_lon < offset && offset < delta_lon
            })
            .collect();

        let flags = grid.read_flags(&self.land_sea_mask_variable)?;
        let data = grid.read_variable(variable)?;

        let n_lon = lon_mask.len();
        if flags.len() != lat_mask.len() * n_lon {
            return Err(QueryError::invalid_grid(format!(
                "{} has {} cells, expected {}",
                self.land_sea_mask_variable,
                flags.len(),
                lat_mask.len() * n_lon
            )));
        }

        let mut sum = 0.0;
        let mut count = 0usize;
        for (i, j, cell) in data.cells() {
            let in_window = lat_mask.get(i).copied().unwrap_or(false)
                && lon_mask.get(j).copied().unwrap_or(false);
            let is_water = flags[i * n_lon + j] & WATER_BIT != 0;
            if in_window && is_water && !cell.missing {
                sum += cell.value;
                count += 1;
            }
        }

        debug!(
            parent: &self.span,
            variable,
            center_lat,
            center_lon,
            radius_km,
            delta_lat,
            delta_lon,
            cells = count,
            "Averaged water cells around point"
        );

        if count == 0 {
            return Ok(None);
        }
        Ok(Some(sum / count as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{MaskedGrid, MemoryGrid};
    use test_utils::assert_approx_eq;

    const N: usize = 5;

    /// 5x5 grid at 0.1° spacing centered on (55.0, 12.0).
    fn grid(values: Vec<Option<f64>>, flags: Vec<i64>) -> MemoryGrid {
        MemoryGrid::regular(54.8, 11.8, 0.1, N, N)
            .with_variable(
                "analysed_sst",
                Some("kelvin"),
                MaskedGrid::from_options(N, N, values).unwrap(),
            )
            .with_flags("mask", flags)
    }

    fn averager() -> SpatialAverager {
        SpatialAverager::new("mask", Span::none())
    }

    fn all_water() -> Vec<i64> {
        vec![1; N * N]
    }

    fn ramp() -> Vec<Option<f64>> {
        (0..N * N).map(|k| Some(280.0 + k as f64)).collect()
    }

    #[test]
    fn test_radius_on_land_has_no_mean() {
        let land = vec![2; N * N];
        let result = averager()
            .average(&grid(ramp(), land), "analysed_sst", 55.0, 12.0, 25.0)
            .unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_zero_valued_mean_is_distinct_from_no_mean() {
        let zeros = vec![Some(0.0); N * N];
        let result = averager()
            .average(&grid(zeros, all_water()), "analysed_sst", 55.0, 12.0, 25.0)
            .unwrap();
        assert_eq!(result, Some(0.0));
    }

    #[test]
    fn test_single_water_cell_returns_its_value() {
        let mut flags = vec![0; N * N];
        flags[2 * N + 2] = 1;
        let result = averager()
            .average(&grid(ramp(), flags), "analysed_sst", 55.0, 12.0, 25.0)
            .unwrap();
        assert_eq!(result, Some(292.0));
    }

    #[test]
    fn test_only_bit_zero_marks_water() {
        // 3 = water + another flag bit, 4 = lake-like flag without bit 0
        let mut flags = vec![4; N * N];
        flags[2 * N + 1] = 3;
        flags[2 * N + 3] = 5;
        let result = averager()
            .average(&grid(ramp(), flags), "analysed_sst", 55.0, 12.0, 25.0)
            .unwrap();
        assert_eq!(result, Some((291.0 + 293.0) / 2.0));
    }

    #[test]
    fn test_missing_cells_are_excluded() {
        let mut values = vec![Some(290.0); N * N];
        values[2 * N + 2] = None;
        values[2 * N + 1] = Some(300.0);
        // 25 km spans 0.225° lat and 0.393° lon at 55N, so the whole 5x5 grid
        let result = averager()
            .average(&grid(values, all_water()), "analysed_sst", 55.0, 12.0, 25.0)
            .unwrap()
            .unwrap();
        assert_approx_eq!(result, (290.0 * 23.0 + 300.0) / 24.0, 1e-9);
    }

    #[test]
    fn test_longitude_bound_is_exclusive() {
        // At the equator the longitude delta equals the latitude delta.
        let lats = vec![0.0];
        let lons = vec![-1.0, 0.0, 1.0];
        let values = MaskedGrid::from_values(1, 3, vec![10.0, 20.0, 60.0]).unwrap();
        let grid = MemoryGrid::new(lats, lons)
            .with_resolution(1.0, 1.0)
            .with_variable("v", None, values)
            .with_flags("mask", vec![1, 1, 1]);
        let result = averager()
            .average(&grid, "v", 0.0, 0.0, 111.0)
            .unwrap();
        // lon offsets of exactly ±1° are excluded
        assert_eq!(result, Some(20.0));
    }

    #[test]
    fn test_latitude_exact_bound_included_on_equator() {
        let lats = vec![-1.0, 0.0, 1.0];
        let lons = vec![0.0];
        let values = MaskedGrid::from_values(3, 1, vec![10.0, 20.0, 60.0]).unwrap();
        let grid = MemoryGrid::new(lats, lons)
            .with_resolution(1.0, 1.0)
            .with_variable("v", None, values)
            .with_flags("mask", vec![1, 1, 1]);
        let result = averager()
            .average(&grid, "v", 0.0, 0.0, 111.0)
            .unwrap();
        // lat offsets of exactly ±1° are included
        assert_eq!(result, Some(30.0));
    }

    #[test]
    fn test_window_excludes_cells_beyond_radius() {
        // 10 km: 0.09° lat, so only the center row; 0.157° lon, center three columns
        let result = averager()
            .average(&grid(ramp(), all_water()), "analysed_sst", 55.0, 12.0, 10.0)
            .unwrap();
        assert_eq!(result, Some((291.0 + 292.0 + 293.0) / 3.0));
    }

    #[test]
    fn test_missing_land_sea_mask_is_an_error() {
        let grid = MemoryGrid::regular(54.8, 11.8, 0.1, N, N).with_variable(
            "analysed_sst",
            None,
            MaskedGrid::from_options(N, N, ramp()).unwrap(),
        );
        let err = averager()
            .average(&grid, "analysed_sst", 55.0, 12.0, 25.0)
            .unwrap_err();
        assert!(matches!(err, QueryError::MissingVariable(name) if name == "mask"));
    }
}
