use thiserror::Error;
use tracing::trace;

use crate::{cop_table::CopTable, cost::heat_pump_cost_per_therm};

/// Errors that can occur while scanning for the crossover temperature.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CrossoverError {
    /// The table predicts a COP that cannot be used as a divisor.
    ///
    /// Usually caused by extrapolating far outside the sampled temperatures.
    #[error("predicted COP {cop} at {temperature}F is not positive")]
    InvalidCop { temperature: i32, cop: f64 },
}

/// Finds the lowest temperature at which the heat pump is cheaper to run.
///
/// Scans `table` in ascending temperature order and stops at the first entry
/// whose heat pump cost per therm is strictly below `furnace_cost_per_therm`.
/// Returns `Ok(None)` if gas is cheaper at every tabulated temperature.
///
/// # Errors
///
/// Returns [`CrossoverError::InvalidCop`] for the first entry scanned whose
/// COP is zero, negative, or NaN.
pub fn find_crossover(
    table: &CopTable,
    furnace_cost_per_therm: f64,
    electric_cost_per_kwh: f64,
) -> Result<Option<i32>, CrossoverError> {
    for (temperature, cop) in table.iter() {
        if cop.is_nan() || cop <= 0.0 {
            return Err(CrossoverError::InvalidCop { temperature, cop });
        }

        let heat_pump_cost = heat_pump_cost_per_therm(electric_cost_per_kwh, cop);
        trace!(temperature, cop, heat_pump_cost, furnace_cost_per_therm);

        if heat_pump_cost < furnace_cost_per_therm {
            return Ok(Some(temperature));
        }
    }

    Ok(None)
}
