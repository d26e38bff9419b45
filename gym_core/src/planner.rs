//! Plan generator for turning a user profile into a machine workout.
//!
//! For each selected machine, in selection order:
//! - Weight = body weight × experience multiplier, rounded to the nearest kg
//!   and clamped into the machine's weight range
//! - Reps/sets come from the goal table
//! - Rest = stored override for the machine, else the machine's default

use crate::{
    Catalog, Error, Experience, Goal, Result, RestTimeOverrides, UserProfile, WorkoutPlanEntry,
};

/// Fraction of body weight used as the starting load
pub fn weight_multiplier(experience: Experience) -> f64 {
    match experience {
        Experience::Beginner => 0.3,
        Experience::Intermediate => 0.5,
        Experience::Advanced => 0.7,
    }
}

/// `(reps, sets)` prescribed for a goal
pub fn goal_parameters(goal: Goal) -> (u32, u32) {
    match goal {
        Goal::LoseWeight => (12, 3),
        Goal::MuscleGain => (8, 3),
        Goal::Maintain => (10, 2),
    }
}

/// Goal-based rest time
///
/// Not used by `generate_plan`, which takes rest from the machine (or an
/// override). Kept for presentation layers that show a goal-level hint.
pub fn goal_rest_seconds(goal: Goal) -> u32 {
    match goal {
        Goal::LoseWeight => 30,
        Goal::MuscleGain => 90,
        Goal::Maintain => 60,
    }
}

/// Check a profile before planning
pub fn validate_profile(profile: &UserProfile) -> Result<()> {
    if profile.age == 0 {
        return Err(Error::InvalidInput("age must be positive".into()));
    }
    if !profile.weight_kg.is_finite() || profile.weight_kg <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "body weight must be a positive number, got {}",
            profile.weight_kg
        )));
    }
    Ok(())
}

/// Generate a workout plan for the selected machines
///
/// Deterministic: identical inputs always produce identical plans.
pub fn generate_plan<S: AsRef<str>>(
    catalog: &Catalog,
    profile: &UserProfile,
    selected: &[S],
    overrides: Option<&RestTimeOverrides>,
) -> Result<Vec<WorkoutPlanEntry>> {
    if selected.is_empty() {
        return Err(Error::InvalidInput("no machines selected".into()));
    }
    validate_profile(profile)?;

    let multiplier = weight_multiplier(profile.experience);
    let (reps, sets) = goal_parameters(profile.goal);
    // Saturating float-to-int cast; anything above u32::MAX is clamped below anyway
    let base_weight = (profile.weight_kg * multiplier).round() as u32;

    let plan = selected
        .iter()
        .map(|id| {
            let id = id.as_ref();
            let machine = catalog.get(id).ok_or_else(|| {
                Error::InvalidInput(format!("selected machine '{}' is not in the catalog", id))
            })?;
            if machine.weight_range.min > machine.weight_range.max {
                return Err(Error::InvalidInput(format!(
                    "machine '{}' has an empty weight range {}-{}kg",
                    id, machine.weight_range.min, machine.weight_range.max
                )));
            }
            if machine.default_rest_time_seconds == 0 {
                return Err(Error::InvalidInput(format!(
                    "machine '{}' has no default rest time",
                    id
                )));
            }

            let rest_time_seconds = overrides
                .and_then(|o| o.get(id))
                .unwrap_or(machine.default_rest_time_seconds);

            Ok(WorkoutPlanEntry {
                machine_id: machine.id.clone(),
                machine_name: machine.name.clone(),
                body_part: machine.body_part.clone(),
                weight_kg: machine.weight_range.clamp(base_weight),
                reps,
                sets,
                rest_time_seconds,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::info!(
        "Generated plan with {} exercises ({} experience, {} goal)",
        plan.len(),
        profile.experience,
        profile.goal
    );
    for entry in &plan {
        tracing::debug!(
            "  {}: {}kg x {} reps x {} sets, rest {}s",
            entry.machine_id,
            entry.weight_kg,
            entry.reps,
            entry.sets,
            entry.rest_time_seconds
        );
    }

    Ok(plan)
}

/// Return a copy of the plan with stored overrides applied
pub fn apply_rest_overrides(
    plan: &[WorkoutPlanEntry],
    overrides: &RestTimeOverrides,
) -> Vec<WorkoutPlanEntry> {
    plan.iter()
        .map(|entry| WorkoutPlanEntry {
            rest_time_seconds: overrides
                .get(&entry.machine_id)
                .unwrap_or(entry.rest_time_seconds),
            ..entry.clone()
        })
        .collect()
}

/// Return a copy of the plan with one machine's rest time changed
pub fn set_entry_rest_time(
    plan: &[WorkoutPlanEntry],
    machine_id: &str,
    seconds: u32,
) -> Result<Vec<WorkoutPlanEntry>> {
    if seconds == 0 {
        return Err(Error::InvalidInput("rest time must be positive".into()));
    }
    if !plan.iter().any(|e| e.machine_id == machine_id) {
        return Err(Error::UnknownMachine(machine_id.to_string()));
    }

    Ok(plan
        .iter()
        .map(|entry| {
            if entry.machine_id == machine_id {
                WorkoutPlanEntry {
                    rest_time_seconds: seconds,
                    ..entry.clone()
                }
            } else {
                entry.clone()
            }
        })
        .collect())
}

/// Rough workout length in minutes
///
/// Assumes 30 seconds per set, the entry's rest between its sets, and one
/// minute to move between machines.
pub fn estimate_duration_minutes(plan: &[WorkoutPlanEntry]) -> u32 {
    let exercise_minutes: f64 = plan
        .iter()
        .map(|entry| {
            let set_time = entry.sets as f64 * 0.5;
            let rest_time =
                entry.sets.saturating_sub(1) as f64 * entry.rest_time_seconds as f64 / 60.0;
            set_time + rest_time
        })
        .sum();
    let transition_minutes = plan.len().saturating_sub(1) as f64;

    (exercise_minutes + transition_minutes).round() as u32
}
