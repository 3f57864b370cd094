//! Common fixtures for SST point-query tests.

/// Product file names and reference times.
pub mod products {
    /// Seconds from 1981-01-01 to 2015-03-13T00:00:00Z.
    pub const REFERENCE_TIME_SECONDS: i64 = 1_079_049_600;

    /// Builds a DMI L4 product name for a timestamp prefix like `20150313000000`.
    pub fn dmi_filename(stamp: &str) -> String {
        format!(
            "{}-DMI-L4_GHRSST-SSTfnd-DMI_OI-NSEABALTIC-v02.0-fv01.0.nc",
            stamp
        )
    }

    /// Variables every DMI L4 SST product carries.
    pub const DMI_VARIABLES: [&str; 4] =
        ["analysed_sst", "analysis_error", "sea_ice_fraction", "mask"];
}
