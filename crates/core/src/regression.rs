//! Ordinary least-squares fit of heat pump COP against outdoor temperature.
//!
//! The fit has a single independent variable, so the normal equations reduce
//! to the familiar closed form:
//!
//! ```text
//! slope     = Σ(x - x̄)(y - ȳ) / Σ(x - x̄)²
//! intercept = ȳ - slope · x̄
//! ```

use serde::Serialize;
use thiserror::Error;

/// A fitted line `cop = slope · temperature + intercept`.
///
/// Immutable once fitted and only used for point evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearModel {
    slope: f64,
    intercept: f64,
}

/// Errors that can occur when fitting a [`LinearModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FitError {
    #[error("at least two distinct temperatures are required to fit a line, got {0}")]
    TooFewPoints(usize),

    #[error("fitted coefficients are not finite")]
    NonFinite,
}

impl LinearModel {
    /// Fits a line through `(temperature, cop)` points by least squares.
    ///
    /// # Errors
    ///
    /// Returns [`FitError::TooFewPoints`] if fewer than two distinct
    /// temperatures are supplied, or [`FitError::NonFinite`] if the data
    /// produce non-finite coefficients.
    pub fn fit<I>(points: I) -> Result<Self, FitError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let points: Vec<(f64, f64)> = points.into_iter().collect();

        let distinct = distinct_count(points.iter().map(|&(x, _)| x));
        if distinct < 2 {
            return Err(FitError::TooFewPoints(distinct));
        }

        #[allow(clippy::cast_precision_loss)]
        let n = points.len() as f64;
        let mean_x = points.iter().map(|&(x, _)| x).sum::<f64>() / n;
        let mean_y = points.iter().map(|&(_, y)| y).sum::<f64>() / n;

        let (sxx, sxy) = points.iter().fold((0.0, 0.0), |(sxx, sxy), &(x, y)| {
            let dx = x - mean_x;
            (sxx + dx * dx, sxy + dx * (y - mean_y))
        });

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;
        if !slope.is_finite() || !intercept.is_finite() {
            return Err(FitError::NonFinite);
        }

        Ok(Self { slope, intercept })
    }

    /// Predicted COP at `temperature`.
    #[must_use]
    pub fn predict(&self, temperature: f64) -> f64 {
        self.slope * temperature + self.intercept
    }

    /// Change in COP per degree.
    #[must_use]
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// COP at zero degrees.
    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

fn distinct_count(values: impl Iterator<Item = f64>) -> usize {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    values.len()
}
