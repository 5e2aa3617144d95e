//! Individual load-velocity profile and 1RM estimation.
//!
//! Velocity is regressed on weight; the estimated 1RM is the weight at which
//! the fitted line reaches the minimum velocity threshold (MVT). A profile is
//! immutable: adding an observation rebuilds it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::regression::{linear_regression, LinearFit};
use crate::analytics::effort::Confidence;
use crate::config::VbtConfig;
use crate::error::{VbtError, VbtResult};
use crate::prescription::TrainingGoal;

/// One (weight, velocity) observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadVelocityDataPoint {
    pub weight: f64,
    /// Mean concentric velocity (m/s)
    pub velocity: f64,
    pub timestamp: Option<DateTime<Utc>>,
}

impl LoadVelocityDataPoint {
    pub fn new(weight: f64, velocity: f64) -> Self {
        Self {
            weight,
            velocity,
            timestamp: None,
        }
    }

    fn validate(&self) -> VbtResult<()> {
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(VbtError::InvalidInput(format!(
                "load-velocity weight must be positive, got {}",
                self.weight
            )));
        }
        if !self.velocity.is_finite() || self.velocity < 0.0 {
            return Err(VbtError::InvalidInput(format!(
                "load-velocity velocity must be non-negative, got {}",
                self.velocity
            )));
        }
        Ok(())
    }
}

/// Whether the regression produced a usable line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitStatus {
    /// Negative slope from at least two distinct weights
    Fitted,
    /// Too few points, no weight spread, or a non-negative slope
    Degenerate,
}

/// Individual load-velocity relationship for one exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadVelocityProfile {
    pub points: Vec<LoadVelocityDataPoint>,
    /// Velocity change per unit weight (negative for a valid profile)
    pub slope: f64,
    /// Velocity at zero weight
    pub intercept: f64,
    pub r_squared: f64,
    /// Estimated one-rep max, 0 without data
    pub estimated_one_rm: f64,
    pub confidence: Confidence,
    pub fit_status: FitStatus,
    pub minimum_velocity_threshold: f64,
    pub created_at: DateTime<Utc>,
}

impl LoadVelocityProfile {
    /// Fit a profile from observations.
    pub fn from_points(
        points: Vec<LoadVelocityDataPoint>,
        config: &VbtConfig,
        created_at: DateTime<Utc>,
    ) -> VbtResult<Self> {
        for point in &points {
            point.validate()?;
        }

        let pairs: Vec<(f64, f64)> = points.iter().map(|p| (p.weight, p.velocity)).collect();
        let fit = linear_regression(&pairs);
        let fit_status = if fit.is_fitted && fit.slope < 0.0 {
            FitStatus::Fitted
        } else {
            FitStatus::Degenerate
        };

        let mvt = config.profile.minimum_velocity_threshold;
        let estimated_one_rm = estimate_one_rm(&points, &fit, fit_status, mvt, config);
        let confidence = classify_confidence(&points, &fit, fit_status, config);

        tracing::debug!(
            "Load-velocity profile: {} points, slope {:.5}, R² {:.3}, 1RM {} ({})",
            points.len(),
            fit.slope,
            fit.r_squared,
            estimated_one_rm,
            confidence
        );

        Ok(Self {
            points,
            slope: fit.slope,
            intercept: fit.intercept,
            r_squared: fit.r_squared,
            estimated_one_rm,
            confidence,
            fit_status,
            minimum_velocity_threshold: mvt,
            created_at,
        })
    }

    /// Empty profile.
    pub fn empty(config: &VbtConfig, created_at: DateTime<Utc>) -> Self {
        Self {
            points: Vec::new(),
            slope: 0.0,
            intercept: 0.0,
            r_squared: 0.0,
            estimated_one_rm: 0.0,
            confidence: Confidence::Low,
            fit_status: FitStatus::Degenerate,
            minimum_velocity_threshold: config.profile.minimum_velocity_threshold,
            created_at,
        }
    }

    /// New profile with one more observation.
    pub fn with_point(
        &self,
        point: LoadVelocityDataPoint,
        config: &VbtConfig,
        created_at: DateTime<Utc>,
    ) -> VbtResult<Self> {
        let mut points = self.points.clone();
        points.push(point);
        Self::from_points(points, config, created_at)
    }

    /// Whether the profile is still gathering data.
    pub fn is_degenerate(&self) -> bool {
        self.fit_status == FitStatus::Degenerate
    }

    /// Heaviest weight actually lifted.
    pub fn heaviest_weight(&self) -> Option<f64> {
        self.points.iter().map(|p| p.weight).reduce(f64::max)
    }

    /// Weight for a percentage of the estimated 1RM; 0 without an estimate.
    pub fn weight_for_percent(&self, percent_1rm: f64, config: &VbtConfig) -> f64 {
        if self.estimated_one_rm <= 0.0 || percent_1rm <= 0.0 {
            return 0.0;
        }
        config
            .equipment
            .clamp(self.estimated_one_rm * percent_1rm / 100.0)
    }

    /// Weight at which the fitted line predicts `velocity`.
    ///
    /// `None` for degenerate profiles, where the line cannot be inverted.
    pub fn weight_for_velocity(&self, velocity: f64, config: &VbtConfig) -> Option<f64> {
        if self.fit_status != FitStatus::Fitted || self.slope >= 0.0 {
            return None;
        }
        let weight = (velocity - self.intercept) / self.slope;
        if !weight.is_finite() || weight <= 0.0 {
            return None;
        }
        Some(config.equipment.clamp(weight))
    }

    /// Predicted velocity at a weight, never negative.
    pub fn velocity_at_weight(&self, weight: f64) -> f64 {
        (self.slope * weight + self.intercept).max(0.0)
    }

    /// Working weight for a goal: the middle of the goal's %1RM range.
    pub fn recommend_working_weight(
        &self,
        goal: TrainingGoal,
        config: &VbtConfig,
    ) -> VbtResult<Option<f64>> {
        if self.estimated_one_rm <= 0.0 {
            return Ok(None);
        }
        let profile = config.goals.get(goal)?;
        let percent = (profile.intensity_min_percent + profile.intensity_max_percent) / 2.0;
        Ok(Some(self.weight_for_percent(percent, config)))
    }
}

fn estimate_one_rm(
    points: &[LoadVelocityDataPoint],
    fit: &LinearFit,
    fit_status: FitStatus,
    mvt: f64,
    config: &VbtConfig,
) -> f64 {
    let Some(heaviest) = points.iter().map(|p| p.weight).reduce(f64::max) else {
        return 0.0;
    };

    let projected = match fit_status {
        FitStatus::Fitted => (mvt - fit.intercept) / fit.slope,
        FitStatus::Degenerate => heaviest,
    };

    let rounded = config.equipment.round(projected).max(heaviest);
    config.equipment.clamp(rounded)
}

fn classify_confidence(
    points: &[LoadVelocityDataPoint],
    fit: &LinearFit,
    fit_status: FitStatus,
    config: &VbtConfig,
) -> Confidence {
    if fit_status == FitStatus::Degenerate {
        return Confidence::Low;
    }

    let t = &config.profile;
    let n = points.len();
    let weight_spread = spread(points.iter().map(|p| p.weight));
    let velocity_spread = spread(points.iter().map(|p| p.velocity));

    if n >= t.high_min_points
        && fit.r_squared >= t.high_min_r_squared
        && weight_spread >= t.high_min_weight_spread
    {
        Confidence::High
    } else if n >= t.medium_min_points
        && fit.r_squared >= t.medium_min_r_squared
        && (weight_spread >= t.medium_min_weight_spread
            || velocity_spread >= t.medium_min_velocity_spread)
    {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

fn spread(values: impl Iterator<Item = f64>) -> f64 {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if max >= min {
        max - min
    } else {
        0.0
    }
}

/// 1RM from a single set using the general velocity-at-%1RM table.
pub fn estimate_one_rm_from_single(
    weight: f64,
    velocity: f64,
    config: &VbtConfig,
) -> VbtResult<f64> {
    LoadVelocityDataPoint::new(weight, velocity).validate()?;
    let percent = config
        .velocity_percent
        .percent_for_velocity(velocity)
        .ok_or_else(|| VbtError::Configuration("velocity-at-%1RM table is empty".to_string()))?;
    let estimate = config.equipment.round(weight * 100.0 / percent).max(weight);
    Ok(config.equipment.clamp(estimate))
}
