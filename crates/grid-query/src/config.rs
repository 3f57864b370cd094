//! Configuration for point queries.

use serde::{Deserialize, Serialize};

/// Offset between degrees Celsius and Kelvin.
pub const ZERO_CELSIUS_IN_KELVIN: f64 = 273.15;

/// Configuration for the query service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Radius of the smoothing window in kilometers.
    pub smooth_radius_km: f64,

    /// Suffix marking a smoothed variable (`analysed_sst` -> `analysed_sst_smooth`).
    pub smooth_suffix: String,

    /// Base variables whose smoothed form is listed as available.
    pub smoothable_variables: Vec<String>,

    /// Variables reported in Celsius regardless of their units attribute.
    pub kelvin_variables: Vec<String>,

    /// Flag variable holding the land/sea mask (bit 0 set for water).
    pub land_sea_mask_variable: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            smooth_radius_km: 25.0,
            smooth_suffix: "_smooth".to_string(),
            smoothable_variables: vec!["analysed_sst".to_string()],
            kelvin_variables: Vec::new(),
            land_sea_mask_variable: "mask".to_string(),
        }
    }
}

impl QueryConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("SAT_SMOOTH_RADIUS_KM") {
            if let Ok(radius) = val.parse() {
                config.smooth_radius_km = radius;
            }
        }

        if let Ok(val) = std::env::var("SAT_SMOOTH_SUFFIX") {
            config.smooth_suffix = val;
        }

        if let Ok(val) = std::env::var("SAT_SMOOTHABLE_VARIABLES") {
            config.smoothable_variables = split_list(&val);
        }

        if let Ok(val) = std::env::var("SAT_KELVIN_VARIABLES") {
            config.kelvin_variables = split_list(&val);
        }

        if let Ok(val) = std::env::var("SAT_LAND_SEA_MASK_VARIABLE") {
            config.land_sea_mask_variable = val;
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.smooth_radius_km.is_finite() || self.smooth_radius_km <= 0.0 {
            return Err("smooth_radius_km must be a positive number".to_string());
        }

        if self.smooth_suffix.is_empty() {
            return Err("smooth_suffix must not be empty".to_string());
        }

        if self.land_sea_mask_variable.is_empty() {
            return Err("land_sea_mask_variable must not be empty".to_string());
        }

        Ok(())
    }

    /// Name of the smoothed form of `base`.
    pub fn smoothed_name(&self, base: &str) -> String {
        format!("{}{}", base, self.smooth_suffix)
    }
}

fn split_list(val: &str) -> Vec<String> {
    val.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
