use std::num::NonZeroU32;

use serde::Serialize;

use crate::regression::LinearModel;

/// Predicted COP at evenly stepped outdoor temperatures.
///
/// Entries are stored in ascending temperature order and each COP is rounded
/// to two decimal places with [`round_to_hundredths`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CopTable {
    entries: Vec<(i32, f64)>,
}

impl CopTable {
    /// Evaluates `model` at every temperature in `[start, end)` spaced by `step`.
    ///
    /// Produces an empty table if `start >= end`.
    #[must_use]
    pub fn extrapolate(model: &LinearModel, start: i32, end: i32, step: NonZeroU32) -> Self {
        let step = usize::try_from(step.get()).unwrap_or(usize::MAX);
        let entries = (start..end)
            .step_by(step)
            .map(|temperature| {
                let cop = model.predict(f64::from(temperature));
                (temperature, round_to_hundredths(cop))
            })
            .collect();

        Self { entries }
    }

    /// Iterates over `(temperature, cop)` pairs in ascending temperature order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Returns the tabulated COP at `temperature`, if it is a table entry.
    #[must_use]
    pub fn get(&self, temperature: i32) -> Option<f64> {
        self.entries
            .binary_search_by_key(&temperature, |&(t, _)| t)
            .ok()
            .map(|index| self.entries[index].1)
    }

    /// Number of tabulated temperatures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no temperatures were tabulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rounds to two decimal places, with ties away from zero.
#[must_use]
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
