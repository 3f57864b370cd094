//! Nearest-cell lookup on a rectilinear grid.
//!
//! The grid is addressed as the Cartesian product of two independent 1-D
//! searches, one per axis. This only holds for regular lat/lon grids.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Axis, QueryError, Result};
use crate::grid::{GridFile, GridIndex};

/// Inclusive valid range along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// The area a grid covers, cell edges included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    pub lat: AxisRange,
    pub lon: AxisRange,
}

/// Covered range of one axis: center extremes widened by half a cell.
pub fn axis_coverage(centers: &[f64], resolution: f64) -> Option<AxisRange> {
    let edge = resolution / 2.0;
    let min = centers.iter().copied().reduce(f64::min)?;
    let max = centers.iter().copied().reduce(f64::max)?;
    Some(AxisRange {
        min: min - edge,
        max: max + edge,
    })
}

/// Covered area of a grid.
pub fn coverage<G: GridFile + ?Sized>(grid: &G) -> Result<Coverage> {
    let lat = axis_coverage(grid.latitudes(), grid.lat_resolution())
        .ok_or_else(|| QueryError::invalid_grid("latitude axis is empty"))?;
    let lon = axis_coverage(grid.longitudes(), grid.lon_resolution())
        .ok_or_else(|| QueryError::invalid_grid("longitude axis is empty"))?;
    Ok(Coverage { lat, lon })
}

/// Fail with [`QueryError::OutOfRange`] if `(lat, lon)` is outside the grid.
pub fn validate_coordinate<G: GridFile + ?Sized>(grid: &G, lat: f64, lon: f64) -> Result<()> {
    let coverage = coverage(grid)?;
    if !coverage.lat.contains(lat) {
        return Err(QueryError::out_of_range(
            Axis::Latitude,
            lat,
            coverage.lat.min,
            coverage.lat.max,
        ));
    }
    if !coverage.lon.contains(lon) {
        return Err(QueryError::out_of_range(
            Axis::Longitude,
            lon,
            coverage.lon.min,
            coverage.lon.max,
        ));
    }
    Ok(())
}

/// Index of the element closest to `target`. Ties go to the lowest index.
pub fn nearest_index(values: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, value) in values.iter().enumerate() {
        let distance = (value - target).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((idx, distance)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Validate `(lat, lon)` and return the nearest cell.
pub fn locate<G: GridFile + ?Sized>(grid: &G, lat: f64, lon: f64) -> Result<GridIndex> {
    validate_coordinate(grid, lat, lon)?;

    let lat_index = nearest_index(grid.latitudes(), lat)
        .ok_or_else(|| QueryError::invalid_grid("latitude axis is empty"))?;
    let lon_index = nearest_index(grid.longitudes(), lon)
        .ok_or_else(|| QueryError::invalid_grid("longitude axis is empty"))?;

    debug!(
        lat_index,
        lat = grid.latitudes()[lat_index],
        lon_index,
        lon = grid.longitudes()[lon_index],
        "Located nearest grid cell"
    );

    Ok(GridIndex {
        lat: lat_index,
        lon: lon_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MemoryGrid;
    use test_utils::assert_approx_eq;

    fn baltic() -> MemoryGrid {
        // 53.00 .. 53.18 by 0.02, 10.00 .. 10.38 by 0.02
        MemoryGrid::regular(53.0, 10.0, 0.02, 10, 20)
    }

    #[test]
    fn test_nearest_index_ties_resolve_to_lowest_index() {
        assert_eq!(nearest_index(&[1.0, 2.0, 2.0, 3.0], 2.0), Some(1));
        // 1.5 is equidistant from 1.0 and 2.0
        assert_eq!(nearest_index(&[1.0, 2.0, 3.0], 1.5), Some(0));
    }

    #[test]
    fn test_nearest_index_descending_axis() {
        assert_eq!(nearest_index(&[58.0, 57.5, 57.0, 56.5], 57.1), Some(2));
    }

    #[test]
    fn test_nearest_index_empty() {
        assert_eq!(nearest_index(&[], 1.0), None);
    }

    #[test]
    fn test_coverage_includes_half_cell_edges() {
        let coverage = coverage(&baltic()).unwrap();
        assert_approx_eq!(coverage.lat.min, 52.99, 1e-9);
        assert_approx_eq!(coverage.lat.max, 53.19, 1e-9);
        assert_approx_eq!(coverage.lon.min, 9.99, 1e-9);
        assert_approx_eq!(coverage.lon.max, 10.39, 1e-9);
    }

    #[test]
    fn test_validate_accepts_edges() {
        let grid = baltic();
        assert!(validate_coordinate(&grid, 52.995, 9.995).is_ok());
        assert!(validate_coordinate(&grid, 53.185, 10.385).is_ok());
    }

    #[test]
    fn test_validate_names_failing_axis() {
        let grid = baltic();

        let err = validate_coordinate(&grid, 53.2, 10.1).unwrap_err();
        assert_eq!(err.axis(), Some(Axis::Latitude));

        let err = validate_coordinate(&grid, 52.98, 10.1).unwrap_err();
        assert_eq!(err.axis(), Some(Axis::Latitude));

        let err = validate_coordinate(&grid, 53.1, 10.4).unwrap_err();
        assert_eq!(err.axis(), Some(Axis::Longitude));

        match validate_coordinate(&grid, 53.1, 9.9).unwrap_err() {
            QueryError::OutOfRange {
                axis,
                value,
                min,
                max,
            } => {
                assert_eq!(axis, Axis::Longitude);
                assert_eq!(value, 9.9);
                assert_approx_eq!(min, 9.99, 1e-9);
                assert_approx_eq!(max, 10.39, 1e-9);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_latitude_checked_before_longitude() {
        let err = validate_coordinate(&baltic(), 60.0, 30.0).unwrap_err();
        assert_eq!(err.axis(), Some(Axis::Latitude));
    }

    #[test]
    fn test_locate_returns_closest_cell_on_each_axis() {
        let grid = baltic();
        for (lat, lon) in [(53.0, 10.0), (53.071, 10.219), (53.189, 10.389), (53.1, 10.2)] {
            let index = locate(&grid, lat, lon).unwrap();
            let lat_distance = (grid.latitudes()[index.lat] - lat).abs();
            let lon_distance = (grid.longitudes()[index.lon] - lon).abs();
            assert!(grid.latitudes().iter().all(|v| (v - lat).abs() >= lat_distance));
            assert!(grid.longitudes().iter().all(|v| (v - lon).abs() >= lon_distance));
        }
    }

    #[test]
    fn test_locate_rejects_before_searching() {
        let grid = baltic();
        assert!(matches!(
            locate(&grid, 0.0, 0.0),
            Err(QueryError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_locate_empty_axis_is_invalid_grid() {
        let grid = MemoryGrid::new(vec![], vec![10.0]);
        assert!(matches!(
            locate(&grid, 53.0, 10.0),
            Err(QueryError::InvalidGrid(_))
        ));
    }

    #[test]
    fn test_single_cell_grid_with_declared_resolution() {
        let grid = MemoryGrid::new(vec![55.0], vec![12.0]).with_resolution(0.1, 0.2);
        assert_eq!(locate(&grid, 55.04, 12.09).unwrap(), GridIndex { lat: 0, lon: 0 });
        assert!(locate(&grid, 55.06, 12.0).is_err());
    }
}
