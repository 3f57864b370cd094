//! `GridFile` over an opened NetCDF product.

use std::path::{Path, PathBuf};

use grid_query::grid::{LAT, LON, TIME};
use grid_query::{axis_resolution, GridFile, MaskedGrid, QueryError};
use tracing::{debug, instrument};

use crate::error::{NetCdfError, NetCdfResult};
use crate::native::{
    get_global_f64_attr, get_string_attr, read_f64_values, read_i64_values, silence_hdf5_errors,
    Packing,
};

/// Global attribute holding the latitude cell height.
pub const LAT_RESOLUTION_ATTR: &str = "geospatial_lat_resolution";
/// Global attribute holding the longitude cell width.
pub const LON_RESOLUTION_ATTR: &str = "geospatial_lon_resolution";

/// An opened NetCDF file with its axes loaded.
///
/// Data variables are read on demand. The file handle is released when the
/// value is dropped.
pub struct NetCdfGridFile {
    path: PathBuf,
    file: netcdf::File,
    lats: Vec<f64>,
    lons: Vec<f64>,
    lat_resolution: f64,
    lon_resolution: f64,
    time_seconds: Option<f64>,
}

impl NetCdfGridFile {
    /// Open `path` and read its axes, resolutions and observation time.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> NetCdfResult<Self> {
        silence_hdf5_errors();

        let path = path.as_ref();
        if !path.is_file() {
            return Err(NetCdfError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is not a file", path.display()),
            )));
        }
        let file = netcdf::open(path)?;

        let lats = read_axis(&file, LAT)?;
        let lons = read_axis(&file, LON)?;
        let lat_resolution =
            get_global_f64_attr(&file, LAT_RESOLUTION_ATTR).unwrap_or_else(|| axis_resolution(&lats));
        let lon_resolution =
            get_global_f64_attr(&file, LON_RESOLUTION_ATTR).unwrap_or_else(|| axis_resolution(&lons));
        let time_seconds = read_time(&file)?;

        debug!(
            n_lat = lats.len(),
            n_lon = lons.len(),
            lat_resolution,
            lon_resolution,
            ?time_seconds,
            "Opened grid file"
        );

        Ok(Self {
            path: path.to_path_buf(),
            file,
            lats,
            lons,
            lat_resolution,
            lon_resolution,
            time_seconds,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn variable(&self, name: &str) -> NetCdfResult<netcdf::Variable<'_>> {
        self.file
            .variable(name)
            .ok_or_else(|| NetCdfError::missing(name))
    }

    /// Number of values in one lat x lon slice of `var`, after checking its
    /// trailing dimensions match the axes.
    fn slice_len(&self, var: &netcdf::Variable) -> NetCdfResult<usize> {
        let dims: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        let (n_lat, n_lon) = (self.lats.len(), self.lons.len());
        match dims.as_slice() {
            [leading @ .., lat, lon] if *lat == n_lat && *lon == n_lon => {
                if leading.iter().product::<usize>() == 0 {
                    return Err(NetCdfError::invalid(format!(
                        "variable {} has no time steps",
                        var.name()
                    )));
                }
                Ok(n_lat * n_lon)
            }
            _ => Err(NetCdfError::invalid(format!(
                "variable {} has shape {:?}, expected [.., {}, {}]",
                var.name(),
                dims,
                n_lat,
                n_lon
            ))),
        }
    }

    fn read_masked(&self, name: &str) -> NetCdfResult<MaskedGrid> {
        let var = self.variable(name)?;
        let len = self.slice_len(&var)?;
        let packing = Packing::from_variable(&var);
        let mut raw = read_f64_values(&var)?;
        raw.truncate(len);

        let cells: Vec<Option<f64>> = raw.into_iter().map(|v| packing.unpack(v)).collect();
        let missing = cells.iter().filter(|c| c.is_none()).count();
        debug!(variable = name, cells = len, missing, "Read variable");

        MaskedGrid::from_options(self.lats.len(), self.lons.len(), cells)
            .map_err(|e| NetCdfError::invalid(e.to_string()))
    }

    fn read_flag_slice(&self, name: &str) -> NetCdfResult<Vec<i64>> {
        let var = self.variable(name)?;
        let len = self.slice_len(&var)?;
        let mut flags = read_i64_values(&var)?;
        flags.truncate(len);
        Ok(flags)
    }
}

impl std::fmt::Debug for NetCdfGridFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetCdfGridFile")
            .field("path", &self.path)
            .field("n_lat", &self.lats.len())
            .field("n_lon", &self.lons.len())
            .field("time_seconds", &self.time_seconds)
            .finish()
    }
}

impl GridFile for NetCdfGridFile {
    fn latitudes(&self) -> &[f64] {
        &self.lats
    }

    fn longitudes(&self) -> &[f64] {
        &self.lons
    }

    fn lat_resolution(&self) -> f64 {
        self.lat_resolution
    }

    fn lon_resolution(&self) -> f64 {
        self.lon_resolution
    }

    fn time_seconds(&self) -> Option<f64> {
        self.time_seconds
    }

    fn variable_names(&self) -> Vec<String> {
        self.file.variables().map(|v| v.name()).collect()
    }

    fn units(&self, name: &str) -> Option<String> {
        let var = self.file.variable(name)?;
        get_string_attr(&var, "units")
    }

    fn read_variable(&self, name: &str) -> grid_query::Result<MaskedGrid> {
        self.read_masked(name).map_err(QueryError::from)
    }

    fn read_flags(&self, name: &str) -> grid_query::Result<Vec<i64>> {
        self.read_flag_slice(name).map_err(QueryError::from)
    }
}

fn read_axis(file: &netcdf::File, name: &str) -> NetCdfResult<Vec<f64>> {
    let var = file
        .variable(name)
        .ok_or_else(|| NetCdfError::missing(name))?;
    if var.dimensions().len() != 1 {
        return Err(NetCdfError::invalid(format!(
            "{} must be one-dimensional, found {} dimensions",
            name,
            var.dimensions().len()
        )));
    }
    let packing = Packing::from_variable(&var);
    read_f64_values(&var)?
        .into_iter()
        .map(|v| {
            packing
                .unpack(v)
                .ok_or_else(|| NetCdfError::invalid(format!("{} has a missing coordinate", name)))
        })
        .collect()
}

/// First value of the time variable, if the file has one.
fn read_time(file: &netcdf::File) -> NetCdfResult<Option<f64>> {
    let Some(var) = file.variable(TIME) else {
        return Ok(None);
    };
    let packing = Packing::from_variable(&var);
    let values = read_f64_values(&var)?;
    Ok(values.first().and_then(|&v| packing.unpack(v)))
}
