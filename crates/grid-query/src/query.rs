//! Point queries against one grid.
//!
//! Every variable name is mapped once to a [`VariableResolver`] describing
//! how its value is obtained at the located cell. The registry is built per
//! grid, since the set of variables differs between files.

use tracing::{debug, Span};

use crate::averager::SpatialAverager;
use crate::config::{QueryConfig, ZERO_CELSIUS_IN_KELVIN};
use crate::error::{QueryError, Result};
use crate::fields::FieldSpec;
use crate::grid::{GridFile, GridIndex, LAT, LON, TIME};
use crate::locator::locate;
use crate::record::{ObservationRecord, ObservationValue};
use crate::time::timestamp_from_epoch_seconds;

/// How the value of one variable is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableResolver {
    /// Latitude of the located cell.
    LatitudeAxis,
    /// Longitude of the located cell.
    LongitudeAxis,
    /// Observation time of the grid.
    Time,
    /// Water-only mean of `base` around the query point.
    Smoothed { base: String },
    /// Value of the variable at the located cell.
    Cell,
}

#[derive(Debug, Clone)]
struct Registered {
    name: String,
    resolver: VariableResolver,
    listed: bool,
    celsius: bool,
}

/// Resolvers for every variable a grid can answer.
#[derive(Debug, Clone)]
pub struct ResolverRegistry {
    entries: Vec<Registered>,
}

impl ResolverRegistry {
    /// Register the variables of `grid`.
    ///
    /// Stored variables come first in storage order (the land/sea mask is
    /// left out), then a smoothed form of each data variable. Only smoothed
    /// forms of configured variables are listed as available, the others
    /// can still be requested by name.
    pub fn for_grid<G: GridFile + ?Sized>(grid: &G, config: &QueryConfig) -> Self {
        let names = grid.variable_names();
        let mut entries = Vec::with_capacity(names.len() * 2);

        for name in &names {
            if *name == config.land_sea_mask_variable {
                continue;
            }
            let resolver = match name.as_str() {
                LAT => VariableResolver::LatitudeAxis,
                LON => VariableResolver::LongitudeAxis,
                TIME => VariableResolver::Time,
                _ => VariableResolver::Cell,
            };
            let celsius = resolver == VariableResolver::Cell && is_kelvin(grid, config, name);
            entries.push(Registered {
                name: name.clone(),
                resolver,
                listed: true,
                celsius,
            });
        }

        let data_variables: Vec<&String> = names
            .iter()
            .filter(|n| {
                !matches!(n.as_str(), LAT | LON | TIME) && **n != config.land_sea_mask_variable
            })
            .collect();
        let mut synthetic: Vec<Registered> = data_variables
            .into_iter()
            .map(|base| (config.smoothed_name(base), base))
            .filter(|(smoothed, _)| !names.contains(smoothed))
            .map(|(smoothed, base)| Registered {
                name: smoothed,
                resolver: VariableResolver::Smoothed { base: base.clone() },
                listed: config.smoothable_variables.contains(base),
                celsius: is_kelvin(grid, config, base),
            })
            .collect();
        // listed smoothed names first, each group keeps storage order
        synthetic.sort_by_key(|entry| !entry.listed);
        entries.extend(synthetic);

        Self { entries }
    }

    /// Names a caller sees as available, in order.
    pub fn available(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.listed)
            .map(|e| e.name.clone())
            .collect()
    }

    /// The resolver for `name`.
    pub fn get(&self, name: &str) -> Option<&VariableResolver> {
        self.find(name).map(|e| &e.resolver)
    }

    /// Whether values of `name` are converted from Kelvin to Celsius.
    pub fn is_celsius(&self, name: &str) -> bool {
        self.find(name).is_some_and(|e| e.celsius)
    }

    fn find(&self, name: &str) -> Option<&Registered> {
        self.entries.iter().find(|e| e.name == name)
    }
}

fn is_kelvin<G: GridFile + ?Sized>(grid: &G, config: &QueryConfig, name: &str) -> bool {
    if config.kelvin_variables.iter().any(|v| v == name) {
        return true;
    }
    grid.units(name)
        .map(|units| {
            let units = units.trim();
            units.eq_ignore_ascii_case("kelvin") || units == "K"
        })
        .unwrap_or(false)
}

/// Resolves point observations from a grid.
#[derive(Debug, Clone)]
pub struct QueryService {
    config: QueryConfig,
    averager: SpatialAverager,
    span: Span,
}

impl QueryService {
    /// Create a service emitting its diagnostics under `span`.
    pub fn new(config: QueryConfig, span: Span) -> Self {
        let averager = SpatialAverager::new(config.land_sea_mask_variable.clone(), span.clone());
        Self {
            config,
            averager,
            span,
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Variables that can be requested from `grid`.
    pub fn available_variables<G: GridFile + ?Sized>(&self, grid: &G) -> Vec<String> {
        ResolverRegistry::for_grid(grid, &self.config).available()
    }

    /// Resolve `requested` variables at the cell nearest to `(lat, lon)`.
    ///
    /// An empty request resolves every available variable.
    pub fn query<G: GridFile + ?Sized, S: AsRef<str>>(
        &self,
        grid: &G,
        lat: f64,
        lon: f64,
        requested: &[S],
    ) -> Result<ObservationRecord> {
        let _entered = self.span.enter();

        let stored = grid.variable_names();
        for required in [LAT, LON] {
            if !stored.iter().any(|name| name == required) {
                return Err(QueryError::missing_variable(required));
            }
        }

        let registry = ResolverRegistry::for_grid(grid, &self.config);
        let names: Vec<String> = if requested.is_empty() {
            registry.available()
        } else {
            requested.iter().map(|s| s.as_ref().to_string()).collect()
        };
        if let Some(absent) = names.iter().find(|name| registry.get(name).is_none()) {
            return Err(QueryError::missing_variable(absent.as_str()));
        }

        let index = locate(grid, lat, lon)?;
        debug!(lat, lon, lat_index = index.lat, lon_index = index.lon, "Resolving point");

        let mut record = ObservationRecord::new();
        for name in &names {
            let Some(resolver) = registry.get(name) else {
                continue;
            };
            let value = self.resolve(grid, resolver, name, index, lat, lon)?;
            let value = match value {
                ObservationValue::Float(v) if registry.is_celsius(name) => {
                    ObservationValue::Float(v - ZERO_CELSIUS_IN_KELVIN)
                }
                other => other,
            };
            debug!(variable = %name, value = %value, "Resolved variable");
            record.set(name.as_str(), value);
        }

        Ok(record)
    }

    /// Resolve the variables read by `specs`, each once, in first-use order.
    ///
    /// No specs resolves every available variable. Specs that read no data
    /// still validate the point but resolve nothing.
    pub fn query_fields<G: GridFile + ?Sized>(
        &self,
        grid: &G,
        lat: f64,
        lon: f64,
        specs: &[FieldSpec],
    ) -> Result<ObservationRecord> {
        if specs.is_empty() {
            return self.query::<G, &str>(grid, lat, lon, &[]);
        }

        let mut requested: Vec<&str> = Vec::new();
        for spec in specs.iter().filter(|s| s.reads_data()) {
            if !requested.contains(&spec.name.as_str()) {
                requested.push(&spec.name);
            }
        }
        if requested.is_empty() {
            let _entered = self.span.enter();
            locate(grid, lat, lon)?;
            return Ok(ObservationRecord::new());
        }
        self.query(grid, lat, lon, &requested)
    }

    fn resolve<G: GridFile + ?Sized>(
        &self,
        grid: &G,
        resolver: &VariableResolver,
        name: &str,
        index: GridIndex,
        lat: f64,
        lon: f64,
    ) -> Result<ObservationValue> {
        let value = match resolver {
            VariableResolver::LatitudeAxis => ObservationValue::Float(grid.latitudes()[index.lat]),
            VariableResolver::LongitudeAxis => {
                ObservationValue::Float(grid.longitudes()[index.lon])
            }
            // registered only when stored, so an absent value is a fill
            VariableResolver::Time => grid
                .time_seconds()
                .and_then(timestamp_from_epoch_seconds)
                .map_or(ObservationValue::Missing, ObservationValue::Timestamp),
            VariableResolver::Smoothed { base } => self
                .averager
                .average(grid, base, lat, lon, self.config.smooth_radius_km)?
                .into(),
            VariableResolver::Cell => grid.read_cell(name, index)?.into(),
        };
        Ok(value)
    }
}
