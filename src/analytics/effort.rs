//! RPE / RIR estimation from velocity loss.

use serde::{Deserialize, Serialize};

use crate::config::EffortTable;
use crate::error::{VbtError, VbtResult};

/// Confidence tier shared by effort estimates, intent detection and profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn label(&self) -> &'static str {
        match self {
            Confidence::Low => "Low",
            Confidence::Medium => "Medium",
            Confidence::High => "High",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// How an effort estimate was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffortBasis {
    /// Looked up from the bracket table
    VelocityLoss,
    /// Rep was faster than the reference; fixed fresh estimate
    Fresh,
    /// Intent not confirmed; RIR inflated toward the safety ceiling
    IntentUnconfirmed,
}

/// Proximity-to-failure estimate for a rep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffortEstimate {
    /// Reps in reserve
    pub rir: f64,
    /// Rate of perceived exertion (1-10)
    pub rpe: f64,
    pub confidence: Confidence,
    pub basis: EffortBasis,
}

/// Estimate RIR/RPE from velocity loss.
///
/// `maximal_intent` asserts the lifter moved every rep as fast as possible.
/// Without it, low-RIR estimates are inflated and confidence is low, since
/// pacing also produces low velocity loss.
pub fn estimate_effort(
    velocity_loss: f64,
    maximal_intent: bool,
    table: &EffortTable,
) -> VbtResult<EffortEstimate> {
    if velocity_loss < 0.0 {
        return Ok(EffortEstimate {
            rir: table.fresh.rir,
            rpe: table.fresh.rpe,
            confidence: Confidence::Low,
            basis: EffortBasis::Fresh,
        });
    }

    let bracket = table
        .bracket_for_loss(velocity_loss)
        .ok_or_else(|| VbtError::Configuration("effort table has no brackets".to_string()))?;

    if !maximal_intent && bracket.rir < table.rir_safety_ceiling {
        let rir = (bracket.rir + table.unconfirmed_rir_inflation).min(table.rir_safety_ceiling);
        return Ok(EffortEstimate {
            rir,
            rpe: 10.0 - rir,
            confidence: Confidence::Low,
            basis: EffortBasis::IntentUnconfirmed,
        });
    }

    let confidence = if !maximal_intent {
        Confidence::Low
    } else if velocity_loss > table.high_confidence_loss {
        Confidence::High
    } else if velocity_loss > table.medium_confidence_loss {
        Confidence::Medium
    } else {
        Confidence::Low
    };

    Ok(EffortEstimate {
        rir: bracket.rir,
        rpe: bracket.rpe,
        confidence,
        basis: EffortBasis::VelocityLoss,
    })
}
