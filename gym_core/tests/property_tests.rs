//! Property-based tests for plan generation and the session state machine.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use chrono::Utc;
use gym_core::planner::goal_parameters;
use gym_core::*;
use proptest::prelude::*;

prop_compose! {
    fn arbitrary_experience()(variant in 0..3usize) -> Experience {
        Experience::ALL[variant]
    }
}

prop_compose! {
    fn arbitrary_goal()(variant in 0..3usize) -> Goal {
        Goal::ALL[variant]
    }
}

prop_compose! {
    fn arbitrary_profile()(
        age in 1..100u32,
        weight_kg in 1.0..300.0f64,
        experience in arbitrary_experience(),
        goal in arbitrary_goal(),
    ) -> UserProfile {
        UserProfile { age, weight_kg, experience, goal }
    }
}

prop_compose! {
    fn arbitrary_selection()(
        picks in prop::collection::vec(0..6usize, 1..8)
    ) -> Vec<String> {
        let order = &get_default_catalog().order;
        picks.into_iter().map(|i| order[i].clone()).collect()
    }
}

/// Operations a user (or the scheduler) can apply to a session
#[derive(Clone, Copy, Debug)]
enum Op {
    CompleteSet,
    Tick,
    SkipRest,
    TogglePause,
}

prop_compose! {
    fn arbitrary_ops()(raw in prop::collection::vec(0..4u8, 0..200)) -> Vec<Op> {
        raw.into_iter()
            .map(|v| match v {
                0 => Op::CompleteSet,
                1 => Op::Tick,
                2 => Op::SkipRest,
                _ => Op::TogglePause,
            })
            .collect()
    }
}

fn apply(session: &WorkoutSession, op: Op) -> WorkoutSession {
    let result = match op {
        Op::CompleteSet => session.complete_set(),
        Op::Tick => Ok(session.tick()),
        Op::SkipRest => session.skip_rest(),
        Op::TogglePause => session.toggle_pause(),
    };
    match result {
        Ok(next) => next,
        Err(Error::InvalidState(_)) => session.clone(),
        Err(other) => panic!("unexpected error {:?}", other),
    }
}

proptest! {
    #[test]
    fn weight_always_within_machine_range(
        profile in arbitrary_profile(),
        selection in arbitrary_selection(),
    ) {
        let catalog = get_default_catalog();
        let plan = generate_plan(catalog, &profile, &selection, None).unwrap();

        prop_assert_eq!(plan.len(), selection.len());
        for entry in &plan {
            let range = catalog.get(&entry.machine_id).unwrap().weight_range;
            prop_assert!(range.contains(entry.weight_kg));
        }
    }

    #[test]
    fn reps_and_sets_match_goal_table(
        profile in arbitrary_profile(),
        selection in arbitrary_selection(),
    ) {
        let plan = generate_plan(get_default_catalog(), &profile, &selection, None).unwrap();
        let (reps, sets) = goal_parameters(profile.goal);

        for entry in &plan {
            prop_assert_eq!(entry.reps, reps);
            prop_assert_eq!(entry.sets, sets);
        }
    }

    #[test]
    fn plan_generation_is_idempotent(
        profile in arbitrary_profile(),
        selection in arbitrary_selection(),
    ) {
        let catalog = get_default_catalog();
        let first = generate_plan(catalog, &profile, &selection, None).unwrap();
        let second = generate_plan(catalog, &profile, &selection, None).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn completions_are_append_only_and_progress_monotonic(
        profile in arbitrary_profile(),
        selection in arbitrary_selection(),
        ops in arbitrary_ops(),
    ) {
        let plan = generate_plan(get_default_catalog(), &profile, &selection, None).unwrap();
        let mut session = WorkoutSession::start(plan, Utc::now()).unwrap();
        let mut last_percentage = compute_progress(&session).percentage;

        for op in ops {
            let next = apply(&session, op);

            for (index, sets) in session.completed_sets() {
                let after = next.completed_sets_for(*index);
                prop_assert!(after.starts_with(sets), "lost completions for {}", index);
            }

            let progress = compute_progress(&next);
            prop_assert!(progress.percentage >= last_percentage);
            prop_assert!(progress.completed_sets <= progress.total_sets);
            last_percentage = progress.percentage;

            // Current pointer stays inside the plan
            prop_assert!(next.current_exercise_index() < next.plan().len());
            prop_assert!(next.current_set() >= 1);
            prop_assert!(next.current_set() <= next.current_exercise().sets);

            session = next;
        }
    }

    #[test]
    fn each_set_number_recorded_at_most_once(
        profile in arbitrary_profile(),
        selection in arbitrary_selection(),
        ops in arbitrary_ops(),
    ) {
        let plan = generate_plan(get_default_catalog(), &profile, &selection, None).unwrap();
        let mut session = WorkoutSession::start(plan, Utc::now()).unwrap();

        for op in ops {
            session = apply(&session, op);
        }

        for sets in session.completed_sets().values() {
            let mut sorted = sets.clone();
            sorted.dedup();
            prop_assert_eq!(&sorted, sets);
        }
    }
}

#[test]
fn scenario_single_machine_two_sets() {
    let plan = vec![WorkoutPlanEntry {
        machine_id: "chest_press".into(),
        machine_name: "Chest Press".into(),
        body_part: "chest".into(),
        weight_kg: 35,
        reps: 10,
        sets: 2,
        rest_time_seconds: 90,
    }];
    let session = create_session(plan).unwrap();

    let session = session.complete_set().unwrap();
    assert!(session.is_resting());
    assert_eq!(session.current_set(), 2);
    assert_eq!(session.status(), SessionStatus::Active);

    let session = session.skip_rest().unwrap().complete_set().unwrap();
    assert_eq!(session.status(), SessionStatus::Completed);
    assert!(!session.is_resting());
    assert_eq!(compute_progress(&session).percentage, 100);
}

#[test]
fn scenario_last_rest_tick_ends_rest() {
    let catalog = get_default_catalog();
    let profile = UserProfile {
        age: 30,
        weight_kg: 70.0,
        experience: Experience::Intermediate,
        goal: Goal::Maintain,
    };
    let plan = generate_plan(catalog, &profile, &["bicep_curl"], None).unwrap();
    let mut session = create_session(plan).unwrap().complete_set().unwrap();

    // bicep curl rests 60s between sets
    for _ in 0..59 {
        session = session.rest_tick().unwrap();
    }
    assert_eq!(session.rest_remaining_seconds(), 1);
    assert!(session.is_resting());

    session = session.rest_tick().unwrap();
    assert_eq!(session.rest_remaining_seconds(), 0);
    assert!(!session.is_resting());
}
