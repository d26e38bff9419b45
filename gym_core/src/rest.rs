//! Rest-time policy.
//!
//! Recommended rest per machine and goal, plus the fixed rest values the
//! session uses between sets and between exercises.

use crate::{Catalog, Error, Goal, Result};

/// Fallback rest between sets when a plan entry carries no rest time
pub const INTER_SET_REST_SECONDS: u32 = 90;

/// Fixed rest when moving on to the next machine
pub const INTER_EXERCISE_REST_SECONDS: u32 = 120;

/// Floor for goal-adjusted recommendations
pub const MIN_REST_SECONDS: u32 = 30;

/// Goal adjustment applied to a machine's default rest
const GOAL_ADJUSTMENT_SECONDS: u32 = 15;

/// Rest times offered by the rest picker
pub const REST_TIME_PRESETS: [u32; 9] = [30, 45, 60, 75, 90, 105, 120, 150, 180];

/// Recommended rest for a machine given the user's goal
///
/// - lose_weight: `max(30, base - 15)`
/// - muscle_gain: `base + 15`
/// - maintain: `base`
pub fn recommended_rest_time(catalog: &Catalog, machine_id: &str, goal: Goal) -> Result<u32> {
    let machine = catalog
        .get(machine_id)
        .ok_or_else(|| Error::UnknownMachine(machine_id.to_string()))?;
    let base = machine.default_rest_time_seconds;

    let recommended = match goal {
        Goal::LoseWeight => base
            .saturating_sub(GOAL_ADJUSTMENT_SECONDS)
            .max(MIN_REST_SECONDS),
        Goal::MuscleGain => base + GOAL_ADJUSTMENT_SECONDS,
        Goal::Maintain => base,
    };

    tracing::debug!(
        "Recommended rest for {} ({}): {}s (base {}s)",
        machine_id,
        goal,
        recommended,
        base
    );
    Ok(recommended)
}

/// Coarse label for a rest duration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestBand {
    Short,
    Standard,
    Long,
}

impl RestBand {
    pub fn classify(seconds: u32) -> Self {
        match seconds {
            0..=45 => RestBand::Short,
            46..=90 => RestBand::Standard,
            _ => RestBand::Long,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RestBand::Short => "short",
            RestBand::Standard => "standard",
            RestBand::Long => "long",
        }
    }
}
