//! Generators for synthetic SST-like grids.
//!
//! Every grid is row-major with latitude as the slow axis, matching the
//! `lat x lon` layout of L4 products.

/// GHRSST land/sea flag for open water.
pub const FLAG_WATER: i64 = 1;
/// GHRSST land/sea flag for land.
const FLAG_LAND: i64 = 2;

/// Returns `n` evenly spaced cell centers starting at `first`.
///
/// # Example
///
/// ```
/// use test_utils::regular_axis;
///
/// let lats = regular_axis(54.0, 0.5, 3);
/// assert_eq!(lats, vec![54.0, 54.5, 55.0]);
/// ```
pub fn regular_axis(first: f64, resolution: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| first + i as f64 * resolution).collect()
}

/// Creates land/sea flags with the first `land_cols` columns as land.
///
/// The rest is open water. This mimics a straight west coast.
pub fn create_coastline_flags(n_lat: usize, n_lon: usize, land_cols: usize) -> Vec<i64> {
    let mut flags = Vec::with_capacity(n_lat * n_lon);
    for _row in 0..n_lat {
        for col in 0..n_lon {
            flags.push(if col < land_cols { FLAG_LAND } else { FLAG_WATER });
        }
    }
    flags
}
