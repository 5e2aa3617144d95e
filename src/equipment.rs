//! Equipment weight limits.
//!
//! Every weight the engine emits passes through [`WeightLimits::clamp`], so
//! recommendations are always loadable on the machine.

use serde::{Deserialize, Serialize};

/// Loadable weight range of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightLimits {
    /// Lightest selectable weight
    pub min: f64,
    /// Heaviest selectable weight
    pub max: f64,
    /// Step between selectable weights
    pub increment: f64,
}

impl Default for WeightLimits {
    fn default() -> Self {
        Self {
            min: 5.0,
            max: 200.0,
            increment: 5.0,
        }
    }
}

impl WeightLimits {
    /// Finite bounds in order and a finite, positive increment.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min <= self.max
            && self.increment.is_finite()
            && self.increment > 0.0
    }

    /// Round to the nearest increment, then clamp to `[min, max]`.
    ///
    /// Idempotent for limits whose bounds are multiples of the increment.
    /// Limits that fail [`is_valid`](Self::is_valid) are ordered first, with
    /// a non-finite bound falling back to the other one.
    pub fn clamp(&self, weight: f64) -> f64 {
        let (lo, hi) = self.bounds();
        if !weight.is_finite() {
            return lo;
        }
        let rounded = self.round(weight);
        if !rounded.is_finite() {
            return lo;
        }
        rounded.clamp(lo, hi)
    }

    /// Round to the nearest increment without clamping.
    pub fn round(&self, weight: f64) -> f64 {
        if !self.increment.is_finite() || self.increment <= 0.0 {
            return weight;
        }
        (weight / self.increment).round() * self.increment
    }

    /// Move `steps` increments from `weight`, clamped.
    pub fn step(&self, weight: f64, steps: i32) -> f64 {
        let increment = if self.increment.is_finite() { self.increment } else { 0.0 };
        self.clamp(weight + steps as f64 * increment)
    }

    fn bounds(&self) -> (f64, f64) {
        let (lo, hi) = match (self.min.is_finite(), self.max.is_finite()) {
            (true, true) => (self.min, self.max),
            (true, false) => (self.min, self.min),
            (false, true) => (self.max, self.max),
            (false, false) => (0.0, 0.0),
        };
        if lo <= hi {
            (lo, hi)
        } else {
            (hi, lo)
        }
    }
}
