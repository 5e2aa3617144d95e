//! Ordinary least-squares line fitting.

use serde::{Deserialize, Serialize};

/// Below this the x values are treated as identical.
const SINGULAR_EPSILON: f64 = 1e-10;

/// Result of fitting `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination, floored at 0
    pub r_squared: f64,
    /// False when fewer than 2 points or no spread in x
    pub is_fitted: bool,
}

/// Linear regression on (x, y) pairs.
///
/// Degenerate input never fails: with fewer than two points, or all x equal,
/// the fit is flat through the mean of y with R² of 0.
pub fn linear_regression(points: &[(f64, f64)]) -> LinearFit {
    let n = points.len() as f64;
    if points.is_empty() {
        return LinearFit {
            slope: 0.0,
            intercept: 0.0,
            r_squared: 0.0,
            is_fitted: false,
        };
    }

    let sum_x: f64 = points.iter().map(|(x, _)| x).sum();
    let sum_y: f64 = points.iter().map(|(_, y)| y).sum();
    let mean_x = sum_x / n;
    let mean_y = sum_y / n;

    let sxx: f64 = points.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
    let sxy: f64 = points
        .iter()
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();

    if points.len() < 2 || sxx.abs() < SINGULAR_EPSILON {
        return LinearFit {
            slope: 0.0,
            intercept: mean_y,
            r_squared: 0.0,
            is_fitted: false,
        };
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let ss_tot: f64 = points.iter().map(|(_, y)| (y - mean_y).powi(2)).sum();
    let ss_res: f64 = points
        .iter()
        .map(|(x, y)| {
            let predicted = slope * x + intercept;
            (y - predicted).powi(2)
        })
        .sum();

    let r_squared = if ss_tot > 0.0 {
        (1.0 - ss_res / ss_tot).max(0.0)
    } else {
        0.0
    };

    LinearFit {
        slope,
        intercept,
        r_squared,
        is_fitted: true,
    }
}
