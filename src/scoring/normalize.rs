use crate::error::{RankingError, Result};

/// Linear rescale of `value` into `[0, 1]` over `[min, max]`.
///
/// Values at or below `min` map to 0 and values at or above `max` map to 1.
/// A degenerate range (`max <= min`) acts as a step at `min`. NaN maps to 0.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    if max <= min {
        return if value >= min { 1.0 } else { 0.0 };
    }
    if value <= min {
        return 0.0;
    }
    if value >= max {
        return 1.0;
    }
    (value - min) / (max - min)
}

/// Calibration range for one raw metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationRange {
    min: f64,
    max: f64,
}

impl CalibrationRange {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(min.is_finite() && max.is_finite()) || max <= min {
            return Err(RankingError::DegenerateRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Unchecked constructor for the built-in constants; see
    /// [`crate::scoring::factors::check_calibration`].
    pub(crate) const fn from_bounds(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn normalize(&self, value: f64) -> f64 {
        normalize(value, self.min, self.max)
    }
}
