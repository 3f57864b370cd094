//! NetCDF grid provider for L4 sea surface temperature products.
//!
//! [`NetCdfGridFile`] opens a CF-style NetCDF file with 1-D `lat`/`lon` axes
//! and implements [`grid_query::GridFile`] over it, so the query engine never
//! touches libnetcdf directly.
//!
//! # Reading rules
//!
//! - `lat`, `lon` and the first `time` value are read when the file is opened.
//! - Cell resolution comes from the `geospatial_lat_resolution` /
//!   `geospatial_lon_resolution` global attributes, falling back to the axis
//!   spacing.
//! - Data variables are read on demand for the first time step. Values equal
//!   to `_FillValue` or outside `valid_min`/`valid_max` are missing; the rest
//!   are unpacked with `scale_factor` and `add_offset`.
//! - Flag variables (the land/sea mask) are returned as raw integers.
//!
//! # Example
//!
//! ```ignore
//! use grid_query::GridFile;
//! use netcdf_parser::NetCdfGridFile;
//!
//! let grid = NetCdfGridFile::open("20150313000000-DMI-L4_GHRSST-SSTfnd-DMI_OI-NSEABALTIC-v02.0-fv01.0.nc")?;
//! println!("{} x {}", grid.latitudes().len(), grid.longitudes().len());
//! ```

pub mod error;
pub mod grid_file;
pub mod native;

pub use error::{NetCdfError, NetCdfResult};
pub use grid_file::{NetCdfGridFile, LAT_RESOLUTION_ATTR, LON_RESOLUTION_ATTR};
pub use native::{silence_hdf5_errors, Packing};
