//! Session summaries and the bounded per-exercise history.

use std::collections::VecDeque;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::adaptive::AdaptiveSessionState;
use crate::error::{VbtError, VbtResult};
use crate::prescription::RepRange;

/// One exercise as performed in one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSessionSummary {
    pub exercise_id: String,
    pub date: NaiveDate,
    /// Working weight
    pub weight: f64,
    pub sets: u32,
    pub total_reps: u32,
    /// Average velocity loss across sets (%)
    pub velocity_loss: Option<f64>,
    /// Reps in reserve on the last set
    pub rir: Option<f64>,
    /// Average reps per set reached the bottom of the rep range
    pub hit_minimum: bool,
    /// Average reps per set reached the top of the rep range
    pub hit_top: bool,
}

impl ExerciseSessionSummary {
    /// Build a summary, deriving the hit flags from the rep range.
    pub fn new(
        exercise_id: impl Into<String>,
        date: NaiveDate,
        weight: f64,
        sets: u32,
        total_reps: u32,
        rep_range: RepRange,
    ) -> Self {
        let reps_per_set = if sets == 0 {
            0.0
        } else {
            total_reps as f64 / sets as f64
        };
        Self {
            exercise_id: exercise_id.into(),
            date,
            weight,
            sets,
            total_reps,
            velocity_loss: None,
            rir: None,
            hit_minimum: reps_per_set >= rep_range.min as f64,
            hit_top: reps_per_set >= rep_range.max as f64,
        }
    }

    pub fn with_velocity_loss(mut self, velocity_loss: f64) -> Self {
        self.velocity_loss = Some(velocity_loss);
        self
    }

    pub fn with_rir(mut self, rir: f64) -> Self {
        self.rir = Some(rir);
        self
    }

    /// Summarize a finished adaptive session.
    ///
    /// The weight is the heaviest weight lifted; velocity loss is averaged
    /// over the sets that reported it.
    pub fn from_session(state: &AdaptiveSessionState, date: NaiveDate) -> VbtResult<Self> {
        if state.sets.is_empty() {
            return Err(VbtError::InvalidInput(format!(
                "{} has no completed sets",
                state.exercise_id
            )));
        }

        let weight = state
            .sets
            .iter()
            .map(|s| s.weight)
            .fold(f64::MIN, f64::max);
        let losses: Vec<f64> = state.sets.iter().filter_map(|s| s.velocity_loss).collect();
        let velocity_loss =
            (!losses.is_empty()).then(|| losses.iter().sum::<f64>() / losses.len() as f64);
        let rir = state.sets.last().and_then(|s| s.rir);

        let mut summary = Self::new(
            state.exercise_id.clone(),
            date,
            weight,
            state.completed_sets(),
            state.total_reps,
            state.planned_reps,
        );
        summary.velocity_loss = velocity_loss;
        summary.rir = rir;
        Ok(summary)
    }

    /// Average reps per set.
    pub fn reps_per_set(&self) -> f64 {
        if self.sets == 0 {
            return 0.0;
        }
        self.total_reps as f64 / self.sets as f64
    }
}

/// Fixed-capacity history; the oldest session is evicted first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionHistory {
    sessions: VecDeque<ExerciseSessionSummary>,
    capacity: usize,
}

impl SessionHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            sessions: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a session, returning the evicted one if the history was full.
    pub fn push(&mut self, session: ExerciseSessionSummary) -> Option<ExerciseSessionSummary> {
        self.sessions.push_back(session);
        if self.sessions.len() > self.capacity {
            self.sessions.pop_front()
        } else {
            None
        }
    }

    pub fn latest(&self) -> Option<&ExerciseSessionSummary> {
        self.sessions.back()
    }

    pub fn oldest(&self) -> Option<&ExerciseSessionSummary> {
        self.sessions.front()
    }

    /// The last `n` sessions, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &ExerciseSessionSummary> {
        let skip = self.sessions.len().saturating_sub(n);
        self.sessions.iter().skip(skip)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExerciseSessionSummary> {
        self.sessions.iter()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
