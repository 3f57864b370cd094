//! Low-level helpers over the native netcdf library.
//!
//! Attribute lookups, CF packing (`scale_factor`, `add_offset`, `_FillValue`,
//! `valid_min`/`valid_max`) and type-tolerant value reads live here so the
//! grid reader only deals with shapes.

use std::sync::Once;

use crate::error::{NetCdfError, NetCdfResult};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when a read is retried with
/// another element type). This creates confusing log spam like:
///
/// ```text
/// HDF5-DIAG: Error detected in HDF5 (1.10.8) thread 3:
///   #003: ../../../src/H5Adense.c line 397 in H5A__dense_open(): can't locate attribute in name index
/// ```
///
/// Only needs to be called once per process, but is safe to call multiple times.
/// Call it before the first file is opened.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
pub(crate) fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Numeric variable attribute as f64.
pub(crate) fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

/// String variable attribute.
pub(crate) fn get_string_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

/// Numeric global attribute as f64.
///
/// Some producers write resolutions as text (`"0.02 degree"`); the leading
/// number is used then.
pub(crate) fn get_global_f64_attr(file: &netcdf::File, name: &str) -> Option<f64> {
    if !file.attributes().any(|attr| attr.name() == name) {
        return None;
    }
    match file.attribute(name)?.value().ok()? {
        netcdf::AttributeValue::Str(s) => leading_number(&s),
        other => f64::try_from(other).ok(),
    }
}

fn leading_number(text: &str) -> Option<f64> {
    text.split_whitespace().next()?.parse().ok()
}

/// Try element types in order and widen the first read the library accepts.
macro_rules! read_widened {
    ($var:expr => $out:ty: $($ty:ty),+) => {{
        let result: Result<Vec<$out>, Option<netcdf::Error>> = Err(None);
        $(
            let result = result.or_else(|_| {
                $var.get_values::<$ty, _>(..)
                    .map(|values| values.into_iter().map(|v| v as $out).collect())
                    .map_err(Some)
            });
        )+
        result
    }};
}

/// Read every value of a numeric variable widened to f64.
///
/// The stored element type is not known up front; reads are attempted from
/// the widest type down.
pub(crate) fn read_f64_values(var: &netcdf::Variable) -> NetCdfResult<Vec<f64>> {
    read_widened!(var => f64: f64, f32, i64, i32, i16, i8, u8, u16, u32)
        .map_err(|last| read_failure(var, last))
}

/// Read every value of an integer variable widened to i64.
pub(crate) fn read_i64_values(var: &netcdf::Variable) -> NetCdfResult<Vec<i64>> {
    read_widened!(var => i64: i64, i32, i16, i8, u8, u16, u32)
        .map_err(|last| read_failure(var, last))
}

fn read_failure(var: &netcdf::Variable, last: Option<netcdf::Error>) -> NetCdfError {
    match last {
        Some(e) => NetCdfError::Netcdf(e),
        None => NetCdfError::invalid(format!("variable {} has no numeric type", var.name())),
    }
}

/// CF packing and validity attributes of one variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Packing {
    pub scale_factor: f64,
    pub add_offset: f64,
    pub fill_value: Option<f64>,
    pub valid_min: Option<f64>,
    pub valid_max: Option<f64>,
}

impl Default for Packing {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            add_offset: 0.0,
            fill_value: None,
            valid_min: None,
            valid_max: None,
        }
    }
}

impl Packing {
    pub(crate) fn from_variable(var: &netcdf::Variable) -> Self {
        Self {
            scale_factor: get_f64_attr(var, "scale_factor").unwrap_or(1.0),
            add_offset: get_f64_attr(var, "add_offset").unwrap_or(0.0),
            fill_value: get_f64_attr(var, "_FillValue")
                .or_else(|| get_f64_attr(var, "missing_value")),
            valid_min: get_f64_attr(var, "valid_min"),
            valid_max: get_f64_attr(var, "valid_max"),
        }
    }

    /// Unpack a stored value, or `None` when it is fill or outside the valid range.
    ///
    /// Validity is checked on the packed value, as CF prescribes.
    pub fn unpack(&self, raw: f64) -> Option<f64> {
        if raw.is_nan() || self.fill_value == Some(raw) {
            return None;
        }
        if self.valid_min.is_some_and(|min| raw < min) {
            return None;
        }
        if self.valid_max.is_some_and(|max| raw > max) {
            return None;
        }
        Some(raw * self.scale_factor + self.add_offset)
    }
}
