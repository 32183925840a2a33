use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use uom::si::{f64::ThermodynamicTemperature, thermodynamic_temperature::degree_fahrenheit};

use crate::{
    config::Config,
    cop_table::CopTable,
    cost::real_cost_per_therm,
    crossover::{CrossoverError, find_crossover},
    regression::{FitError, LinearModel},
};

/// Errors that can occur while running a comparison.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not fit COP samples")]
    Fit(#[from] FitError),

    #[error("crossover scan failed")]
    Crossover(#[from] CrossoverError),
}

/// Every intermediate result of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    /// Line fitted to the COP samples.
    pub model: LinearModel,

    /// Predicted COP over the scanned temperatures.
    pub cop_table: CopTable,

    /// Gas cost per usable therm after furnace loss.
    pub furnace_cost_per_therm: f64,

    /// Lowest scanned temperature, in °F, where the heat pump is cheaper.
    pub crossover: Option<i32>,

    start_temperature: i32,
    end_temperature: i32,
}

impl Analysis {
    /// Returns the crossover as a unit-aware temperature.
    #[must_use]
    pub fn crossover_temperature(&self) -> Option<ThermodynamicTemperature> {
        self.crossover
            .map(|t| ThermodynamicTemperature::new::<degree_fahrenheit>(f64::from(t)))
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.crossover {
            Some(temperature) => write!(
                f,
                "heat pump is cheaper than gas when the outdoors is {temperature}F and above"
            ),
            None => write!(
                f,
                "gas is cheaper than the heat pump at every temperature from {}F to {}F",
                self.start_temperature, self.end_temperature
            ),
        }
    }
}

/// Runs the full comparison and keeps every intermediate result.
///
/// The pipeline fits the COP samples, extrapolates COP across the configured
/// temperature range, realizes the furnace cost, and scans for the crossover.
///
/// # Errors
///
/// Returns an [`Error`] if the samples cannot be fitted or the extrapolated
/// COP becomes non-positive before a crossover is found.
pub fn analyze(config: &Config) -> Result<Analysis, Error> {
    let model = LinearModel::fit(config.samples().map(|(t, cop)| (f64::from(t), cop)))?;
    debug!(
        slope = model.slope(),
        intercept = model.intercept(),
        "fitted COP model"
    );

    let range = config.temperature_range();
    let cop_table = CopTable::extrapolate(&model, range.start, range.end, config.granularity());
    debug!(entries = cop_table.len(), "extrapolated COP table");

    let furnace_cost_per_therm = real_cost_per_therm(config.gas_cost_per_therm(), config.afue());
    debug!(furnace_cost_per_therm, "realized furnace cost");

    let crossover = find_crossover(
        &cop_table,
        furnace_cost_per_therm,
        config.electric_cost_per_kwh(),
    )?;
    match crossover {
        Some(temperature) => info!(temperature, "heat pump crossover found"),
        None => info!("gas is cheaper at every scanned temperature"),
    }

    Ok(Analysis {
        model,
        cop_table,
        furnace_cost_per_therm,
        crossover,
        start_temperature: range.start,
        end_temperature: range.end,
    })
}

/// Returns the lowest scanned temperature where the heat pump is cheaper.
///
/// `Ok(None)` means gas is cheaper at every scanned temperature.
///
/// # Errors
///
/// See [`analyze`].
pub fn estimate(config: &Config) -> Result<Option<i32>, Error> {
    analyze(config).map(|analysis| analysis.crossover)
}
