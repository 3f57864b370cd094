//! Synthetic grids with known values for tests.
//!
//! The Baltic fixture mimics a DMI L4 SST file: a 0.02° grid from 54N to
//! 56N and 10E to 13E, one time step, Kelvin temperatures, a sea ice
//! fraction masked south of 56N and a land block in the south-west corner.
//!
//! | Variable | Units | Pattern |
//! |----------|-------|---------|
//! | `analysed_sst` | kelvin | `277.15 + 0.01 * row + 0.001 * col`, masked on land |
//! | `analysis_error` | none | `0.25` everywhere |
//! | `sea_ice_fraction` | none | masked below the last row, `0.1` on it |
//! | `mask` | flags | `2` (land) for rows < 20 and cols < 30, `1` (water) elsewhere |

use crate::grid::{MaskedGrid, MemoryGrid};

/// Seconds since 1981-01-01 of 2015-03-13T00:00:00Z.
pub const BALTIC_TIME_SECONDS: f64 = 1_079_049_600.0;

pub const BALTIC_FIRST_LAT: f64 = 54.0;
pub const BALTIC_FIRST_LON: f64 = 10.0;
pub const BALTIC_RESOLUTION: f64 = 0.02;
pub const BALTIC_N_LAT: usize = 101;
pub const BALTIC_N_LON: usize = 151;

const LAND_ROWS: usize = 20;
const LAND_COLS: usize = 30;

/// Whether the fixture cell is land.
pub fn is_land(row: usize, col: usize) -> bool {
    row < LAND_ROWS && col < LAND_COLS
}

/// Temperature of a fixture cell in Kelvin.
pub fn baltic_sst(row: usize, col: usize) -> f64 {
    277.15 + 0.01 * row as f64 + 0.001 * col as f64
}

/// Build the Baltic fixture grid.
pub fn baltic_grid() -> MemoryGrid {
    let (n_lat, n_lon) = (BALTIC_N_LAT, BALTIC_N_LON);
    let cells = || (0..n_lat).flat_map(move |row| (0..n_lon).map(move |col| (row, col)));

    let sst = cells()
        .map(|(row, col)| (!is_land(row, col)).then(|| baltic_sst(row, col)))
        .collect();
    let error = vec![0.25; n_lat * n_lon];
    let ice = cells()
        .map(|(row, _)| (row == n_lat - 1).then_some(0.1))
        .collect();
    let flags = cells()
        .map(|(row, col)| if is_land(row, col) { 2 } else { 1 })
        .collect();

    MemoryGrid::regular(
        BALTIC_FIRST_LAT,
        BALTIC_FIRST_LON,
        BALTIC_RESOLUTION,
        n_lat,
        n_lon,
    )
    .with_time(BALTIC_TIME_SECONDS)
    .with_variable(
        "analysed_sst",
        Some("kelvin"),
        MaskedGrid::from_options(n_lat, n_lon, sst).expect("sst fixture shape"),
    )
    .with_variable(
        "analysis_error",
        None,
        MaskedGrid::from_values(n_lat, n_lon, error).expect("error fixture shape"),
    )
    .with_variable(
        "sea_ice_fraction",
        None,
        MaskedGrid::from_options(n_lat, n_lon, ice).expect("ice fixture shape"),
    )
    .with_flags("mask", flags)
}
