//! Core domain logic for the workout tracker.
//! This crate owns the workout model, its store contract and the CRUD
//! resource served over any `Transport`.

pub mod db;
pub mod logging;
pub mod model;
pub mod resource;
pub mod store;
pub mod transport;

pub use logging::{default_log_level, init_logging, logging_status, LogDestination};
pub use model::workout::{
    FieldError, NewWorkout, Workout, WorkoutChanges, WorkoutDraft, WorkoutId, WorkoutPatch,
    WorkoutValidationError,
};
pub use resource::workout_resource::{ResourceError, ResourceResult, WorkoutResource};
pub use store::workout_store::{SqliteWorkoutStore, StoreError, StoreResult, WorkoutStore};
pub use transport::controller::WorkoutController;
pub use transport::exchange::Exchange;
pub use transport::{Operation, Transport};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
