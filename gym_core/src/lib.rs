#![forbid(unsafe_code)]

//! Core domain model and business logic for the gym workout wizard.
//!
//! This crate provides:
//! - Domain types (machines, profiles, plan entries)
//! - The static machine catalog
//! - Plan generation and rest-time policy
//! - The workout session state machine and progress accounting
//! - Preference persistence (rest-time overrides)

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod rest;
pub mod planner;
pub mod session;
pub mod progress;
pub mod store;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use rest::{recommended_rest_time, INTER_EXERCISE_REST_SECONDS, INTER_SET_REST_SECONDS};
pub use planner::{estimate_duration_minutes, generate_plan};
pub use session::{create_session, WorkoutSession};
pub use progress::{compute_progress, format_clock};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
