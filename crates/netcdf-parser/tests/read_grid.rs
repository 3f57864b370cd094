//! Round trips through real NetCDF files written to a temp directory.

use std::path::{Path, PathBuf};

use grid_query::{GridFile, GridIndex, QueryConfig, QueryError, QueryService};
use netcdf_parser::{NetCdfError, NetCdfGridFile};
use test_utils::{
    assert_approx_eq, create_coastline_flags, products, regular_axis, temp_test_dir, FLAG_WATER,
};
use tracing::Span;

const N_LAT: usize = 6;
const N_LON: usize = 8;
const FILL: i16 = -32768;

/// Packed SST: 0.01 K steps on top of 273.15 K, like DMI products.
fn packed_sst(row: usize, col: usize) -> i16 {
    (400 + 10 * row + col) as i16
}

fn write_product(dir: &Path, with_time: bool, with_resolution: bool) -> PathBuf {
    let path = dir.join(products::dmi_filename("20150313000000"));
    let mut file = netcdf::create(&path).unwrap();

    file.add_dimension("time", 1).unwrap();
    file.add_dimension("lat", N_LAT).unwrap();
    file.add_dimension("lon", N_LON).unwrap();
    if with_resolution {
        file.add_attribute("geospatial_lat_resolution", 0.05f32).unwrap();
        file.add_attribute("geospatial_lon_resolution", "0.05 degree").unwrap();
    }

    if with_time {
        let mut time = file.add_variable::<i32>("time", &["time"]).unwrap();
        time.put_attribute("units", "seconds since 1981-01-01 00:00:00").unwrap();
        time.put_values(&[products::REFERENCE_TIME_SECONDS as i32], ..)
            .unwrap();
    }

    let mut lat = file.add_variable::<f32>("lat", &["lat"]).unwrap();
    lat.put_values(&regular_axis(55.0, 0.05, N_LAT).iter().map(|&v| v as f32).collect::<Vec<_>>(), ..)
        .unwrap();
    let mut lon = file.add_variable::<f32>("lon", &["lon"]).unwrap();
    lon.put_values(&regular_axis(12.0, 0.05, N_LON).iter().map(|&v| v as f32).collect::<Vec<_>>(), ..)
        .unwrap();

    let flags = create_coastline_flags(N_LAT, N_LON, 2);
    let mut sst = Vec::with_capacity(N_LAT * N_LON);
    for row in 0..N_LAT {
        for col in 0..N_LON {
            sst.push(if flags[row * N_LON + col] == FLAG_WATER {
                packed_sst(row, col)
            } else {
                FILL
            });
        }
    }
    // one out-of-range cell in open water
    sst[N_LON + 5] = 5000;

    let mut var = file
        .add_variable::<i16>("analysed_sst", &["time", "lat", "lon"])
        .unwrap();
    var.put_attribute("units", "kelvin").unwrap();
    var.put_attribute("_FillValue", FILL).unwrap();
    var.put_attribute("scale_factor", 0.01f32).unwrap();
    var.put_attribute("add_offset", 273.15f32).unwrap();
    var.put_attribute("valid_min", -300i16).unwrap();
    var.put_attribute("valid_max", 4500i16).unwrap();
    var.put_values(&sst, ..).unwrap();

    let mask: Vec<i8> = flags.iter().map(|&f| f as i8).collect();
    let mut var = file.add_variable::<i8>("mask", &["time", "lat", "lon"]).unwrap();
    var.put_values(&mask, ..).unwrap();

    let mut var = file.add_variable::<f32>("lat_lon_only", &["lat", "lon"]).unwrap();
    var.put_values(&vec![1.5f32; N_LAT * N_LON], ..).unwrap();

    path
}

#[test]
fn test_open_reads_axes_and_time() {
    let dir = temp_test_dir();
    let path = write_product(dir.path(), true, true);
    let grid = NetCdfGridFile::open(&path).unwrap();

    assert_eq!(grid.latitudes().len(), N_LAT);
    assert_eq!(grid.longitudes().len(), N_LON);
    assert_approx_eq!(grid.latitudes()[0], 55.0, 1e-5);
    assert_approx_eq!(grid.lat_resolution(), 0.05, 1e-6);
    assert_approx_eq!(grid.lon_resolution(), 0.05, 1e-12);
    assert_eq!(
        grid.time_seconds(),
        Some(products::REFERENCE_TIME_SECONDS as f64)
    );
    assert_eq!(grid.path(), path.as_path());
}

#[test]
fn test_resolution_falls_back_to_axis_spacing() {
    let dir = temp_test_dir();
    let grid = NetCdfGridFile::open(write_product(dir.path(), false, false)).unwrap();
    assert_approx_eq!(grid.lat_resolution(), 0.05, 1e-5);
    assert_eq!(grid.time_seconds(), None);
}

#[test]
fn test_variables_and_units() {
    let dir = temp_test_dir();
    let grid = NetCdfGridFile::open(write_product(dir.path(), true, true)).unwrap();
    let names = grid.variable_names();
    assert_eq!(names[..3], ["time", "lat", "lon"]);
    assert!(names.iter().any(|n| n == "analysed_sst"));
    assert_eq!(grid.units("analysed_sst").as_deref(), Some("kelvin"));
    assert_eq!(grid.units("mask"), None);
    assert_eq!(grid.units("nope"), None);
}

#[test]
fn test_read_variable_unpacks_and_masks() {
    let dir = temp_test_dir();
    let grid = NetCdfGridFile::open(write_product(dir.path(), true, true)).unwrap();
    let sst = grid.read_variable("analysed_sst").unwrap();

    // land column
    assert_eq!(sst.get(0, 0).and_then(|c| c.get()), None);
    // valid_max exceeded
    assert_eq!(sst.get(1, 5).and_then(|c| c.get()), None);
    let value = sst.get(3, 4).and_then(|c| c.get()).unwrap();
    assert_approx_eq!(value, packed_sst(3, 4) as f64 * 0.01 + 273.15, 1e-4);

    let flat = grid.read_variable("lat_lon_only").unwrap();
    assert_eq!(flat.get(5, 7).and_then(|c| c.get()), Some(1.5));
}

#[test]
fn test_read_flags() {
    let dir = temp_test_dir();
    let grid = NetCdfGridFile::open(write_product(dir.path(), true, true)).unwrap();
    let flags = grid.read_flags("mask").unwrap();
    assert_eq!(flags, create_coastline_flags(N_LAT, N_LON, 2));
}

#[test]
fn test_read_cell_and_missing_variable() {
    let dir = temp_test_dir();
    let grid = NetCdfGridFile::open(write_product(dir.path(), true, true)).unwrap();
    let cell = grid
        .read_cell("analysed_sst", GridIndex { lat: 2, lon: 6 })
        .unwrap();
    assert!(!cell.missing);

    let err = grid.read_variable("sea_ice_fraction").unwrap_err();
    assert!(matches!(err, QueryError::MissingVariable(_)));
    // the time axis is not a lat x lon grid
    let err = grid.read_variable("time").unwrap_err();
    assert!(matches!(err, QueryError::InvalidGrid(_)));
}

#[test]
fn test_open_missing_file() {
    let dir = temp_test_dir();
    let err = NetCdfGridFile::open(dir.path().join("absent.nc")).unwrap_err();
    assert!(matches!(err, NetCdfError::IoError(_)));
}

#[test]
fn test_open_file_without_lat_axis() {
    let dir = temp_test_dir();
    let path = dir.path().join("no_lat.nc");
    {
        let mut file = netcdf::create(&path).unwrap();
        file.add_dimension("lon", 3).unwrap();
        let mut lon = file.add_variable::<f64>("lon", &["lon"]).unwrap();
        lon.put_values(&[1.0, 2.0, 3.0], ..).unwrap();
    }
    let err = NetCdfGridFile::open(&path).unwrap_err();
    assert!(matches!(&err, NetCdfError::MissingData(name) if name == "lat"));
    let err = QueryError::from(err);
    assert!(matches!(err, QueryError::MissingVariable(name) if name == "lat"));
}

#[test]
fn test_query_service_over_netcdf() {
    let dir = temp_test_dir();
    let grid = NetCdfGridFile::open(write_product(dir.path(), true, true)).unwrap();
    let service = QueryService::new(QueryConfig::default(), Span::none());

    let record = service
        .query(&grid, 55.1, 12.2, &["time", "lat", "lon", "analysed_sst"])
        .unwrap();
    let line = record.project(&[], false).unwrap().unwrap();
    assert_eq!(line[0], "2015-03-13 00:00");
    let sst: f64 = line[3].parse().unwrap();
    assert_approx_eq!(sst, packed_sst(2, 4) as f64 * 0.01, 1e-4);

    let listed = service.available_variables(&grid);
    assert!(listed.contains(&"analysed_sst_smooth".to_string()));
    assert!(!listed.contains(&"mask".to_string()));
}

#[test]
fn test_real_product() {
    let path = test_utils::require_test_file!(&products::dmi_filename("20150313000000"));
    let grid = NetCdfGridFile::open(path).unwrap();
    for name in products::DMI_VARIABLES {
        assert!(grid.has_variable(name), "missing {}", name);
    }
}
