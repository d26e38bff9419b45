//! Workout session state machine.
//!
//! A session walks through the plan one set at a time:
//!
//! ```text
//!   active ──complete_set──▶ active+resting ──rest_tick (to 0) / skip_rest──▶ active
//!     │  ▲                                                                     │
//!  toggle_pause                                         last set of last exercise
//!     ▼  │                                                                     ▼
//!   paused                                                                 completed
//! ```
//!
//! Every transition takes `&self` and returns a new session, so a failed
//! operation never leaves a half-updated value behind. Timing is external:
//! a scheduler calls [`WorkoutSession::tick`] once per second.

use crate::rest::{INTER_EXERCISE_REST_SECONDS, INTER_SET_REST_SECONDS};
use crate::{Error, RestKind, Result, SessionStatus, WorkoutPlanEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Runtime state of an in-progress workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawSession")]
pub struct WorkoutSession {
    id: Uuid,
    plan: Vec<WorkoutPlanEntry>,
    current_exercise_index: usize,
    current_set: u32,
    completed_sets: BTreeMap<usize, Vec<u32>>,
    status: SessionStatus,
    is_resting: bool,
    rest_remaining_seconds: u32,
    rest_duration_seconds: u32,
    rest_kind: Option<RestKind>,
    inter_exercise_rest_seconds: u32,
    elapsed_seconds: u64,
    started_at: DateTime<Utc>,
}

/// Unchecked wire form of [`WorkoutSession`]
#[derive(Deserialize)]
struct RawSession {
    id: Uuid,
    plan: Vec<WorkoutPlanEntry>,
    current_exercise_index: usize,
    current_set: u32,
    completed_sets: BTreeMap<usize, Vec<u32>>,
    status: SessionStatus,
    is_resting: bool,
    rest_remaining_seconds: u32,
    rest_duration_seconds: u32,
    rest_kind: Option<RestKind>,
    inter_exercise_rest_seconds: u32,
    elapsed_seconds: u64,
    started_at: DateTime<Utc>,
}

impl TryFrom<RawSession> for WorkoutSession {
    type Error = Error;

    fn try_from(raw: RawSession) -> Result<Self> {
        validate_plan(&raw.plan)?;

        let Some(entry) = raw.plan.get(raw.current_exercise_index) else {
            return Err(Error::InvalidInput(format!(
                "exercise index {} is outside a plan of {} entries",
                raw.current_exercise_index,
                raw.plan.len()
            )));
        };
        if raw.current_set == 0 || raw.current_set > entry.sets {
            return Err(Error::InvalidInput(format!(
                "set {} is outside 1..={} for '{}'",
                raw.current_set, entry.sets, entry.machine_id
            )));
        }
        if raw.inter_exercise_rest_seconds == 0 {
            return Err(Error::InvalidInput(
                "inter-exercise rest must be positive".into(),
            ));
        }
        if let Some(index) = raw.completed_sets.keys().find(|i| **i >= raw.plan.len()) {
            return Err(Error::InvalidInput(format!(
                "completed sets recorded for missing exercise {}",
                index
            )));
        }
        if raw.is_resting
            && (raw.rest_kind.is_none() || raw.rest_remaining_seconds > raw.rest_duration_seconds)
        {
            return Err(Error::InvalidInput("inconsistent rest state".into()));
        }

        Ok(Self {
            id: raw.id,
            plan: raw.plan,
            current_exercise_index: raw.current_exercise_index,
            current_set: raw.current_set,
            completed_sets: raw.completed_sets,
            status: raw.status,
            is_resting: raw.is_resting,
            rest_remaining_seconds: raw.rest_remaining_seconds,
            rest_duration_seconds: raw.rest_duration_seconds,
            rest_kind: raw.rest_kind,
            inter_exercise_rest_seconds: raw.inter_exercise_rest_seconds,
            elapsed_seconds: raw.elapsed_seconds,
            started_at: raw.started_at,
        })
    }
}

fn validate_plan(plan: &[WorkoutPlanEntry]) -> Result<()> {
    if plan.is_empty() {
        return Err(Error::InvalidInput(
            "cannot start a workout with an empty plan".into(),
        ));
    }
    if let Some(entry) = plan.iter().find(|e| e.sets == 0) {
        return Err(Error::InvalidInput(format!(
            "plan entry '{}' has zero sets",
            entry.machine_id
        )));
    }
    Ok(())
}

/// Start a session now
pub fn create_session(plan: Vec<WorkoutPlanEntry>) -> Result<WorkoutSession> {
    WorkoutSession::start(plan, Utc::now())
}

impl WorkoutSession {
    /// Start a session for a confirmed plan
    ///
    /// Entries with a zero rest time fall back to the standard inter-set rest.
    pub fn start(plan: Vec<WorkoutPlanEntry>, started_at: DateTime<Utc>) -> Result<Self> {
        validate_plan(&plan)?;

        let plan: Vec<_> = plan
            .into_iter()
            .map(|entry| {
                if entry.rest_time_seconds == 0 {
                    WorkoutPlanEntry {
                        rest_time_seconds: INTER_SET_REST_SECONDS,
                        ..entry
                    }
                } else {
                    entry
                }
            })
            .collect();

        let session = Self {
            id: Uuid::new_v4(),
            plan,
            current_exercise_index: 0,
            current_set: 1,
            completed_sets: BTreeMap::new(),
            status: SessionStatus::Active,
            is_resting: false,
            rest_remaining_seconds: 0,
            rest_duration_seconds: 0,
            rest_kind: None,
            inter_exercise_rest_seconds: INTER_EXERCISE_REST_SECONDS,
            elapsed_seconds: 0,
            started_at,
        };

        tracing::info!(
            "Started workout session {} with {} exercises",
            session.id,
            session.plan.len()
        );
        Ok(session)
    }

    /// Use a different fixed rest when moving between machines
    pub fn with_inter_exercise_rest(mut self, seconds: u32) -> Result<Self> {
        if seconds == 0 {
            return Err(Error::InvalidInput(
                "inter-exercise rest must be positive".into(),
            ));
        }
        self.inter_exercise_rest_seconds = seconds;
        Ok(self)
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Record the current set as done and move on
    pub fn complete_set(&self) -> Result<Self> {
        self.ensure_not_completed("complete a set")?;
        if self.status == SessionStatus::Paused {
            return Err(Error::InvalidState(
                "cannot complete a set while paused".into(),
            ));
        }
        if self.is_resting {
            return Err(Error::InvalidState(
                "cannot complete a set while resting".into(),
            ));
        }

        let mut next = self.clone();
        next.completed_sets
            .entry(self.current_exercise_index)
            .or_default()
            .push(self.current_set);

        let entry = self.current_exercise();
        let is_last_exercise = self.current_exercise_index + 1 >= self.plan.len();

        if self.current_set < entry.sets {
            next.current_set += 1;
            next.begin_rest(entry.rest_time_seconds, RestKind::BetweenSets);
            tracing::debug!(
                "Completed set {}/{} of {}, resting {}s",
                self.current_set,
                entry.sets,
                entry.machine_id,
                entry.rest_time_seconds
            );
        } else if !is_last_exercise {
            next.current_exercise_index += 1;
            next.current_set = 1;
            next.begin_rest(self.inter_exercise_rest_seconds, RestKind::BetweenExercises);
            tracing::debug!(
                "Finished {}, moving to {} after {}s",
                entry.machine_id,
                next.current_exercise().machine_id,
                self.inter_exercise_rest_seconds
            );
        } else {
            next.status = SessionStatus::Completed;
            next.end_rest();
            tracing::info!(
                "Workout session {} completed in {}s",
                self.id,
                self.elapsed_seconds
            );
        }

        Ok(next)
    }

    /// Count down one second of rest
    ///
    /// Ticks that arrive after the rest has ended are ignored.
    pub fn rest_tick(&self) -> Result<Self> {
        self.ensure_not_completed("tick the rest timer")?;
        if self.status == SessionStatus::Paused {
            return Err(Error::InvalidState(
                "rest timer does not run while paused".into(),
            ));
        }

        let mut next = self.clone();
        if !self.is_resting {
            tracing::trace!("Ignoring stale rest tick");
            return Ok(next);
        }

        next.rest_remaining_seconds = self.rest_remaining_seconds.saturating_sub(1);
        if next.rest_remaining_seconds == 0 {
            next.end_rest();
            tracing::debug!("Rest finished");
        }
        Ok(next)
    }

    /// End the current rest immediately
    pub fn skip_rest(&self) -> Result<Self> {
        self.ensure_not_completed("skip rest")?;

        let mut next = self.clone();
        if self.is_resting {
            tracing::debug!("Skipping rest with {}s left", self.rest_remaining_seconds);
            next.end_rest();
        }
        Ok(next)
    }

    /// Switch between active and paused
    pub fn toggle_pause(&self) -> Result<Self> {
        self.ensure_not_completed("pause or resume")?;

        let mut next = self.clone();
        next.status = match self.status {
            SessionStatus::Active => SessionStatus::Paused,
            _ => SessionStatus::Active,
        };
        tracing::info!("Workout session {} is now {:?}", self.id, next.status);
        Ok(next)
    }

    /// Count one second of workout time; paused time is not counted
    pub fn elapsed_tick(&self) -> Self {
        let mut next = self.clone();
        if self.status == SessionStatus::Active {
            next.elapsed_seconds += 1;
        }
        next
    }

    /// One scheduler second: advance elapsed time and any running rest
    pub fn tick(&self) -> Self {
        if self.status != SessionStatus::Active {
            return self.clone();
        }
        let next = self.elapsed_tick();
        // Active sessions cannot fail a rest tick
        next.rest_tick().unwrap_or(next)
    }

    fn begin_rest(&mut self, seconds: u32, kind: RestKind) {
        self.is_resting = true;
        self.rest_remaining_seconds = seconds;
        self.rest_duration_seconds = seconds;
        self.rest_kind = Some(kind);
    }

    fn end_rest(&mut self) {
        self.is_resting = false;
        self.rest_remaining_seconds = 0;
        self.rest_kind = None;
    }

    fn ensure_not_completed(&self, action: &str) -> Result<()> {
        if self.status == SessionStatus::Completed {
            return Err(Error::InvalidState(format!(
                "cannot {}: workout is already completed",
                action
            )));
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn plan(&self) -> &[WorkoutPlanEntry] {
        &self.plan
    }

    pub fn current_exercise_index(&self) -> usize {
        self.current_exercise_index
    }

    /// Plan entry being worked (the last one once completed)
    pub fn current_exercise(&self) -> &WorkoutPlanEntry {
        &self.plan[self.current_exercise_index]
    }

    /// 1-based set number within the current exercise
    pub fn current_set(&self) -> u32 {
        self.current_set
    }

    pub fn completed_sets(&self) -> &BTreeMap<usize, Vec<u32>> {
        &self.completed_sets
    }

    /// Completed set numbers for one exercise
    pub fn completed_sets_for(&self, exercise_index: usize) -> &[u32] {
        self.completed_sets
            .get(&exercise_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    pub fn is_paused(&self) -> bool {
        self.status == SessionStatus::Paused
    }

    pub fn is_resting(&self) -> bool {
        self.is_resting
    }

    pub fn rest_remaining_seconds(&self) -> u32 {
        self.rest_remaining_seconds
    }

    /// Length of the current (or most recent) rest period
    pub fn rest_duration_seconds(&self) -> u32 {
        self.rest_duration_seconds
    }

    pub fn rest_kind(&self) -> Option<RestKind> {
        self.rest_kind
    }

    pub fn inter_exercise_rest_seconds(&self) -> u32 {
        self.inter_exercise_rest_seconds
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}
