//! Progress accounting derived from session state.

use crate::{Progress, WorkoutSession};

/// Completed/total set counts and rounded percentage
pub fn compute_progress(session: &WorkoutSession) -> Progress {
    let total_sets: u32 = session.plan().iter().map(|e| e.sets).sum();
    let completed_sets: u32 = session
        .completed_sets()
        .values()
        .map(|sets| sets.len() as u32)
        .sum();

    let percentage = if total_sets > 0 {
        (100.0 * completed_sets as f64 / total_sets as f64).round() as u32
    } else {
        0
    };

    Progress {
        total_sets,
        completed_sets,
        percentage,
    }
}

/// 1-based index of the current exercise and the exercise count
pub fn exercise_position(session: &WorkoutSession) -> (usize, usize) {
    (session.current_exercise_index() + 1, session.plan().len())
}

/// Format seconds as `m:ss`
pub fn format_clock(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
