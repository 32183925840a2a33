//! Heat pump versus gas furnace operating cost comparison.
//!
//! Given local energy prices, a furnace AFUE rating, and a few observed
//! heat pump COP samples, this crate finds the outdoor temperature above
//! which the heat pump is cheaper to run than the furnace.
//!
//! The computation is a single forward pipeline:
//!
//! - [`LinearModel`]: least-squares fit of COP against temperature
//! - [`CopTable`]: the fitted COP evaluated over a stepped temperature range
//! - [`real_cost_per_therm`]: gas price adjusted for furnace loss
//! - [`find_crossover`]: first temperature where the heat pump wins
//!
//! [`analyze`] and [`estimate`] run all stages from a validated [`Config`].
//!
//! # Example
//!
//! ```
//! use pump_or_burn_core::{Config, estimate};
//!
//! let config = Config::new(2.40, 0.45, 80.0, [(17, 2.44), (45, 3.62)], 5, -20..75).unwrap();
//! assert_eq!(estimate(&config).unwrap(), Some(65));
//! ```

pub mod config;
pub mod cop_table;
pub mod cost;
pub mod crossover;
pub mod pipeline;
pub mod regression;

pub use config::{Config, ConfigError};
pub use cop_table::{CopTable, round_to_hundredths};
pub use cost::{KWH_PER_THERM, heat_pump_cost_per_therm, real_cost_per_therm, therm_to_kwh};
pub use crossover::{CrossoverError, find_crossover};
pub use pipeline::{Analysis, Error, analyze, estimate};
pub use regression::{FitError, LinearModel};
