//! Deload triggers and the prescribed deload week.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::history::SessionHistory;
use crate::config::DeloadSettings;
use crate::equipment::WeightLimits;
use crate::prescription::ExercisePrescription;

/// Why a deload is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeloadTriggerKind {
    /// Too many weeks since the last deload
    TimeBased,
    /// Velocity loss rising session over session
    VelocityLossTrend,
    /// Repeated sessions below minimum reps
    MissedMinimum,
}

impl DeloadTriggerKind {
    pub fn code(&self) -> &'static str {
        match self {
            DeloadTriggerKind::TimeBased => "time_based",
            DeloadTriggerKind::VelocityLossTrend => "velocity_loss_trend",
            DeloadTriggerKind::MissedMinimum => "missed_minimum",
        }
    }
}

impl std::fmt::Display for DeloadTriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A detected deload cause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeloadTrigger {
    pub kind: DeloadTriggerKind,
    /// `None` for program-wide triggers
    pub exercise_id: Option<String>,
}

/// A reduced-load week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeloadWeek {
    pub start: NaiveDate,
    /// Last day of the deload (inclusive)
    pub end: NaiveDate,
    /// Load reduction (%)
    pub intensity_reduction_percent: f64,
    /// Set reduction (%)
    pub volume_reduction_percent: f64,
    pub triggers: Vec<DeloadTrigger>,
}

impl DeloadWeek {
    pub fn new(start: NaiveDate, settings: &DeloadSettings, triggers: Vec<DeloadTrigger>) -> Self {
        let span = settings.duration_days.max(1) as u64 - 1;
        Self {
            start,
            end: start.checked_add_days(Days::new(span)).unwrap_or(start),
            intensity_reduction_percent: settings.intensity_reduction_percent,
            volume_reduction_percent: settings.volume_reduction_percent,
            triggers,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Reduced version of a prescription for this week.
    ///
    /// Weight and sets are cut by the configured percentages (at least one
    /// set remains) and bonus sets are switched off.
    pub fn apply(&self, prescription: &ExercisePrescription, limits: &WeightLimits) -> ExercisePrescription {
        let mut reduced = prescription.clone();
        reduced.weight =
            limits.clamp(prescription.weight * (1.0 - self.intensity_reduction_percent / 100.0));
        let sets = (prescription.sets as f64 * (1.0 - self.volume_reduction_percent / 100.0)).round();
        reduced.sets = (sets.max(1.0)) as u32;
        reduced.adaptive.allow_bonus_sets = false;
        reduced
    }
}

/// Every consecutive pair strictly increases. False below two values.
pub fn strictly_increasing(values: &[f64]) -> bool {
    values.len() >= 2 && values.windows(2).all(|w| w[1] > w[0])
}

/// Every consecutive pair strictly decreases. False below two values.
pub fn strictly_decreasing(values: &[f64]) -> bool {
    values.len() >= 2 && values.windows(2).all(|w| w[1] < w[0])
}

/// Performance-based deload triggers for one exercise.
pub fn scan_history(history: &SessionHistory, settings: &DeloadSettings) -> Vec<DeloadTriggerKind> {
    let mut found = Vec::new();

    let window = settings.trend_sessions;
    if window >= 2 && history.len() >= window {
        let losses: Vec<f64> = history
            .recent(window)
            .filter_map(|s| s.velocity_loss)
            .collect();
        if losses.len() == window && strictly_increasing(&losses) {
            found.push(DeloadTriggerKind::VelocityLossTrend);
        }
    }

    let missed = settings.missed_minimum_sessions;
    if missed > 0
        && history.len() >= missed
        && history.recent(missed).all(|s| !s.hit_minimum)
    {
        found.push(DeloadTriggerKind::MissedMinimum);
    }

    found
}
