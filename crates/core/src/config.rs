use std::{collections::BTreeMap, num::NonZeroU32, ops::Range};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest number of temperatures a single scan may cover.
pub const MAX_TABLE_ENTRIES: u64 = 1_000_000;

/// Validated inputs for a heat pump versus furnace comparison.
///
/// Construct with [`Config::new`], or deserialize from any serde format.
/// Deserialized values go through the same validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawConfig", into = "RawConfig")]
pub struct Config {
    gas_cost_per_therm: f64,
    electric_cost_per_kwh: f64,
    afue: f64,
    samples: BTreeMap<i32, f64>,
    granularity: NonZeroU32,
    temperature_range: Range<i32>,
}

/// Errors that can occur when validating a [`Config`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("gas cost must be finite and non-negative, got {0}")]
    GasCost(f64),

    #[error("electric cost must be finite and non-negative, got {0}")]
    ElectricCost(f64),

    #[error("AFUE must be in (0, 100], got {0}")]
    Afue(f64),

    #[error("temperature {0}F appears more than once in the samples")]
    DuplicateSample(i32),

    #[error("sample COP at {temperature}F must be finite and positive, got {cop}")]
    SampleCop { temperature: i32, cop: f64 },

    #[error("at least two samples at distinct temperatures are required, got {0}")]
    TooFewSamples(usize),

    #[error("granularity must be a positive number of degrees")]
    Granularity,

    #[error("temperature range {start}F..{end}F is empty")]
    EmptyRange { start: i32, end: i32 },

    #[error(
        "scan would cover {entries} temperatures, more than the limit of {max}",
        max = MAX_TABLE_ENTRIES
    )]
    RangeTooLarge { entries: u64 },
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(2.40, 0.45, 80.0, [(17, 2.44), (45, 3.62)], 5, -20..75).unwrap()
    }
}

impl Config {
    /// Creates a new config, validating every input.
    ///
    /// `temperature_range` is the half-open span of outdoor temperatures,
    /// in degrees Fahrenheit, to scan in steps of `granularity`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first invalid input.
    pub fn new(
        gas_cost_per_therm: f64,
        electric_cost_per_kwh: f64,
        afue: f64,
        samples: impl IntoIterator<Item = (i32, f64)>,
        granularity: u32,
        temperature_range: Range<i32>,
    ) -> Result<Self, ConfigError> {
        if !gas_cost_per_therm.is_finite() || gas_cost_per_therm < 0.0 {
            return Err(ConfigError::GasCost(gas_cost_per_therm));
        }
        if !electric_cost_per_kwh.is_finite() || electric_cost_per_kwh < 0.0 {
            return Err(ConfigError::ElectricCost(electric_cost_per_kwh));
        }
        if !afue.is_finite() || afue <= 0.0 || afue > 100.0 {
            return Err(ConfigError::Afue(afue));
        }

        let mut sample_map = BTreeMap::new();
        for (temperature, cop) in samples {
            if !cop.is_finite() || cop <= 0.0 {
                return Err(ConfigError::SampleCop { temperature, cop });
            }
            if sample_map.insert(temperature, cop).is_some() {
                return Err(ConfigError::DuplicateSample(temperature));
            }
        }
        if sample_map.len() < 2 {
            return Err(ConfigError::TooFewSamples(sample_map.len()));
        }

        let granularity = NonZeroU32::new(granularity).ok_or(ConfigError::Granularity)?;

        if temperature_range.is_empty() {
            return Err(ConfigError::EmptyRange {
                start: temperature_range.start,
                end: temperature_range.end,
            });
        }

        let span = i64::from(temperature_range.end) - i64::from(temperature_range.start);
        let entries = span.unsigned_abs().div_ceil(u64::from(granularity.get()));
        if entries > MAX_TABLE_ENTRIES {
            return Err(ConfigError::RangeTooLarge { entries });
        }

        Ok(Self {
            gas_cost_per_therm,
            electric_cost_per_kwh,
            afue,
            samples: sample_map,
            granularity,
            temperature_range,
        })
    }

    /// Returns the nominal gas price per therm.
    #[must_use]
    pub fn gas_cost_per_therm(&self) -> f64 {
        self.gas_cost_per_therm
    }

    /// Returns the electricity price per kWh.
    #[must_use]
    pub fn electric_cost_per_kwh(&self) -> f64 {
        self.electric_cost_per_kwh
    }

    /// Returns the furnace AFUE rating as a percentage.
    #[must_use]
    pub fn afue(&self) -> f64 {
        self.afue
    }

    /// Iterates over observed `(temperature, cop)` samples in ascending temperature order.
    pub fn samples(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.samples.iter().map(|(&temperature, &cop)| (temperature, cop))
    }

    /// Returns the temperature step between table entries.
    #[must_use]
    pub fn granularity(&self) -> NonZeroU32 {
        self.granularity
    }

    /// Returns the half-open span of temperatures to scan.
    #[must_use]
    pub fn temperature_range(&self) -> Range<i32> {
        self.temperature_range.clone()
    }
}

/// Unvalidated serde form of [`Config`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawConfig {
    gas_cost_per_therm: f64,
    electric_cost_per_kwh: f64,
    afue: f64,
    samples: Vec<(i32, f64)>,
    #[serde(default = "default_granularity")]
    granularity: u32,
    #[serde(default = "default_start_temperature")]
    start_temperature: i32,
    #[serde(default = "default_end_temperature")]
    end_temperature: i32,
}

fn default_granularity() -> u32 {
    5
}

fn default_start_temperature() -> i32 {
    -20
}

fn default_end_temperature() -> i32 {
    75
}

impl TryFrom<RawConfig> for Config {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        Self::new(
            raw.gas_cost_per_therm,
            raw.electric_cost_per_kwh,
            raw.afue,
            raw.samples,
            raw.granularity,
            raw.start_temperature..raw.end_temperature,
        )
    }
}

impl From<Config> for RawConfig {
    fn from(config: Config) -> Self {
        Self {
            gas_cost_per_therm: config.gas_cost_per_therm,
            electric_cost_per_kwh: config.electric_cost_per_kwh,
            afue: config.afue,
            samples: config.samples.into_iter().collect(),
            granularity: config.granularity.get(),
            start_temperature: config.temperature_range.start,
            end_temperature: config.temperature_range.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_samples(samples: &[(i32, f64)]) -> Result<Config, ConfigError> {
        Config::new(2.40, 0.45, 80.0, samples.iter().copied(), 5, -20..75)
    }

    #[test]
    fn default_matches_reference_values() {
        let config = Config::default();

        assert_eq!(config.gas_cost_per_therm(), 2.40);
        assert_eq!(config.electric_cost_per_kwh(), 0.45);
        assert_eq!(config.afue(), 80.0);
        assert_eq!(
            config.samples().collect::<Vec<_>>(),
            vec![(17, 2.44), (45, 3.62)]
        );
        assert_eq!(config.granularity().get(), 5);
        assert_eq!(config.temperature_range(), -20..75);
    }

    #[test]
    fn samples_are_sorted_by_temperature() {
        let config = with_samples(&[(45, 3.62), (-5, 1.9), (17, 2.44)]).unwrap();
        let temperatures: Vec<i32> = config.samples().map(|(t, _)| t).collect();
        assert_eq!(temperatures, vec![-5, 17, 45]);
    }

    #[test]
    fn rejects_single_sample() {
        assert_eq!(
            with_samples(&[(17, 2.44)]),
            Err(ConfigError::TooFewSamples(1))
        );
    }

    #[test]
    fn rejects_duplicate_temperature() {
        assert_eq!(
            with_samples(&[(17, 2.44), (17, 2.50)]),
            Err(ConfigError::DuplicateSample(17))
        );
    }

    #[test]
    fn rejects_non_positive_sample_cop() {
        assert_eq!(
            with_samples(&[(17, 0.0), (45, 3.62)]),
            Err(ConfigError::SampleCop {
                temperature: 17,
                cop: 0.0
            })
        );
        assert!(matches!(
            with_samples(&[(17, 2.44), (45, f64::NAN)]),
            Err(ConfigError::SampleCop { temperature: 45, .. })
        ));
    }

    #[test]
    fn rejects_afue_outside_percentage() {
        let samples = [(17, 2.44), (45, 3.62)];
        for afue in [0.0, -10.0, 100.5, f64::NAN] {
            let result = Config::new(2.40, 0.45, afue, samples, 5, -20..75);
            assert!(
                matches!(result, Err(ConfigError::Afue(_))),
                "AFUE {afue} should be rejected"
            );
        }
        assert!(Config::new(2.40, 0.45, 100.0, samples, 5, -20..75).is_ok());
    }

    #[test]
    fn rejects_invalid_costs() {
        let samples = [(17, 2.44), (45, 3.62)];
        assert_eq!(
            Config::new(-1.0, 0.45, 80.0, samples, 5, -20..75),
            Err(ConfigError::GasCost(-1.0))
        );
        assert_eq!(
            Config::new(2.40, f64::INFINITY, 80.0, samples, 5, -20..75),
            Err(ConfigError::ElectricCost(f64::INFINITY))
        );
    }

    #[test]
    fn rejects_zero_granularity() {
        let samples = [(17, 2.44), (45, 3.62)];
        assert_eq!(
            Config::new(2.40, 0.45, 80.0, samples, 0, -20..75),
            Err(ConfigError::Granularity)
        );
    }

    #[test]
    fn rejects_empty_range() {
        let samples = [(17, 2.44), (45, 3.62)];
        assert_eq!(
            Config::new(2.40, 0.45, 80.0, samples, 5, 75..-20),
            Err(ConfigError::EmptyRange { start: 75, end: -20 })
        );
        assert_eq!(
            Config::new(2.40, 0.45, 80.0, samples, 5, 10..10),
            Err(ConfigError::EmptyRange { start: 10, end: 10 })
        );
    }

    #[test]
    fn rejects_range_too_large_to_tabulate() {
        let samples = [(17, 2.44), (45, 3.62)];
        assert_eq!(
            Config::new(2.40, 5.0, 80.0, samples, 1, i32::MIN..i32::MAX),
            Err(ConfigError::RangeTooLarge {
                entries: u64::from(u32::MAX)
            })
        );

        // A coarser step brings the same span back under the limit.
        assert!(Config::new(2.40, 5.0, 80.0, samples, 10_000, i32::MIN..i32::MAX).is_ok());
        assert!(Config::new(2.40, 0.45, 80.0, samples, 1, 0..1_000_000).is_ok());
        assert!(Config::new(2.40, 0.45, 80.0, samples, 1, 0..1_000_001).is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{
            "gas_cost_per_therm": 2.40,
            "electric_cost_per_kwh": 0.45,
            "afue": 80,
            "samples": [[17, 2.44], [45, 3.62]]
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn deserialization_is_validated() {
        let json = r#"{
            "gas_cost_per_therm": 2.40,
            "electric_cost_per_kwh": 0.45,
            "afue": 80,
            "samples": [[17, 2.44], [17, 3.62]]
        }"#;

        let err = serde_json::from_str::<Config>(json).unwrap_err();
        assert!(err.to_string().contains("more than once"), "{err}");
    }

    #[test]
    fn serializes_to_raw_form() {
        let value = serde_json::to_value(Config::default()).unwrap();

        assert_eq!(value["samples"], serde_json::json!([[17, 2.44], [45, 3.62]]));
        assert_eq!(value["granularity"], 5);
        assert_eq!(value["start_temperature"], -20);
        assert_eq!(value["end_temperature"], 75);
    }
}
