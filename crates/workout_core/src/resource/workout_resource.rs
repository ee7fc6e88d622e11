//! Workout resource: the five CRUD operations over the workout collection.
//!
//! # Invariants
//! - The resource keeps no state besides the injected store.
//! - Malformed and absent ids both surface as `ResourceError::NotFound`.
//! - Store failures other than malformed ids propagate as
//!   `ResourceError::Store`, never swallowed.
//! - Update and delete issue exactly one store call each.

use crate::model::workout::{Workout, WorkoutDraft, WorkoutPatch, WorkoutValidationError};
use crate::store::workout_store::{StoreError, WorkoutStore};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ResourceResult<T> = Result<T, ResourceError>;

/// Caller-facing failure of a resource operation.
#[derive(Debug)]
pub enum ResourceError {
    /// Client-correctable input problem.
    Validation(WorkoutValidationError),
    /// The id does not resolve to a live workout.
    NotFound,
    /// The store failed; not client-correctable.
    Store(StoreError),
}

impl Display for ResourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound => write!(f, "No such workout"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ResourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<WorkoutValidationError> for ResourceError {
    fn from(value: WorkoutValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ResourceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::MalformedId(_) => Self::NotFound,
            other => {
                warn!("event=store_failure module=resource status=error error={other}");
                Self::Store(other)
            }
        }
    }
}

/// CRUD operations over workouts, backed by an injected store.
pub struct WorkoutResource<S: WorkoutStore> {
    store: S,
}

impl<S: WorkoutStore> WorkoutResource<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists every workout, most recently created first.
    pub fn list_all(&self) -> ResourceResult<Vec<Workout>> {
        Ok(self.store.find_all_sorted_by_created_at_desc()?)
    }

    /// Fetches one workout by id.
    pub fn get_one(&self, id: &str) -> ResourceResult<Workout> {
        self.store.find_by_id(id)?.ok_or(ResourceError::NotFound)
    }

    /// Validates the draft and inserts it.
    ///
    /// # Errors
    /// - `Validation` listing every missing or invalid field.
    /// - `Store` when the insert is rejected.
    pub fn create(&self, draft: &WorkoutDraft) -> ResourceResult<Workout> {
        let workout = draft.validate()?;
        Ok(self.store.insert(&workout)?)
    }

    /// Applies the supplied fields to an existing workout.
    ///
    /// An unresolvable id is reported as `NotFound` ahead of any field
    /// error. A valid patch is applied with one atomic store call that
    /// checks existence and writes together.
    pub fn update(&self, id: &str, patch: &WorkoutPatch) -> ResourceResult<Workout> {
        let changes = match patch.validate() {
            Ok(changes) => changes,
            Err(errors) => {
                self.get_one(id)?;
                return Err(errors.into());
            }
        };
        self.store
            .find_and_update_by_id(id, &changes)?
            .ok_or(ResourceError::NotFound)
    }

    /// Removes a workout and returns its final state.
    pub fn delete(&self, id: &str) -> ResourceResult<Workout> {
        self.store
            .find_and_delete_by_id(id)?
            .ok_or(ResourceError::NotFound)
    }
}
