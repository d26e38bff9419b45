//! Core domain types for the gym workout wizard.
//!
//! This module defines the fundamental types used throughout the system:
//! - Machines and their safe weight ranges
//! - User profiles (experience level, training goal)
//! - Generated plan entries
//! - Rest-time overrides and progress summaries

use crate::Error;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Machine Types
// ============================================================================

/// Inclusive weight range (kg) a machine can be loaded with
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeightRange {
    pub min: u32,
    pub max: u32,
}

impl WeightRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Clamp a weight into this range
    pub fn clamp(&self, weight: u32) -> u32 {
        weight.max(self.min).min(self.max)
    }

    pub fn contains(&self, weight: u32) -> bool {
        (self.min..=self.max).contains(&weight)
    }
}

/// A gym machine definition (e.g., "Chest Press")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Machine {
    pub id: String,
    pub name: String,
    pub body_part: String,
    pub weight_range: WeightRange,
    pub default_sets: u32,
    pub default_rest_time_seconds: u32,
}

// ============================================================================
// Profile Types
// ============================================================================

/// Training experience level
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Experience {
    Beginner,
    Intermediate,
    Advanced,
}

impl Experience {
    pub const ALL: [Experience; 3] = [
        Experience::Beginner,
        Experience::Intermediate,
        Experience::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Experience::Beginner => "beginner",
            Experience::Intermediate => "intermediate",
            Experience::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Experience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Experience {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Experience::Beginner),
            "intermediate" => Ok(Experience::Intermediate),
            "advanced" => Ok(Experience::Advanced),
            other => Err(Error::InvalidInput(format!(
                "unknown experience level '{}'",
                other
            ))),
        }
    }
}

/// Training goal
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    LoseWeight,
    MuscleGain,
    Maintain,
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::LoseWeight, Goal::MuscleGain, Goal::Maintain];

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::LoseWeight => "lose_weight",
            Goal::MuscleGain => "muscle_gain",
            Goal::Maintain => "maintain",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Goal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "lose_weight" => Ok(Goal::LoseWeight),
            "muscle_gain" => Ok(Goal::MuscleGain),
            "maintain" => Ok(Goal::Maintain),
            other => Err(Error::InvalidInput(format!("unknown goal '{}'", other))),
        }
    }
}

/// Profile entered by the user before a plan is generated
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub age: u32,
    pub weight_kg: f64,
    pub experience: Experience,
    pub goal: Goal,
}

// ============================================================================
// Plan Types
// ============================================================================

/// One machine's prescribed weight/reps/sets/rest for a given user
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkoutPlanEntry {
    pub machine_id: String,
    pub machine_name: String,
    pub body_part: String,
    pub weight_kg: u32,
    pub reps: u32,
    pub sets: u32,
    pub rest_time_seconds: u32,
}

/// Per-machine rest-time overrides (seconds), keyed by machine id
///
/// Persisted on its own so a user's choices survive plan regeneration.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct RestTimeOverrides(BTreeMap<String, u32>);

impl RestTimeOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override value for a machine; zero is treated as absent
    pub fn get(&self, machine_id: &str) -> Option<u32> {
        self.0.get(machine_id).copied().filter(|s| *s > 0)
    }

    pub fn set(&mut self, machine_id: impl Into<String>, seconds: u32) -> crate::Result<()> {
        if seconds == 0 {
            return Err(Error::InvalidInput(
                "rest time override must be positive".into(),
            ));
        }
        self.0.insert(machine_id.into(), seconds);
        Ok(())
    }

    pub fn remove(&mut self, machine_id: &str) -> Option<u32> {
        self.0.remove(machine_id).filter(|s| *s > 0)
    }

    /// Stored overrides in machine-id order, skipping zero values
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0
            .iter()
            .filter(|(_, v)| **v > 0)
            .map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Session Types
// ============================================================================

/// Lifecycle status of a workout session
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Paused,
    Completed,
}

/// Which kind of rest period the session is in
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RestKind {
    /// Between two sets on the same machine (entry's rest time)
    BetweenSets,
    /// Moving to the next machine (fixed transition rest)
    BetweenExercises,
}

/// Set-count progress through a session
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Progress {
    pub total_sets: u32,
    pub completed_sets: u32,
    pub percentage: u32,
}

// ============================================================================
// Catalog Type
// ============================================================================

/// The static catalog of machines
#[derive(Clone, Debug)]
pub struct Catalog {
    pub machines: HashMap<String, Machine>,
    /// Display order (insertion order of the definitions)
    pub order: Vec<String>,
}
