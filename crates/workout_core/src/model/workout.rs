//! Workout domain model and field validation.
//!
//! # Responsibility
//! - Define the persisted `Workout` record and its JSON shape.
//! - Turn loosely-typed drafts/patches into validated write inputs.
//!
//! # Invariants
//! - `id` and `created_at` are assigned by the store and never rewritten.
//! - `title` is non-blank, `load` is finite, `reps` fits in `u32`.
//! - Validation reports every failing field, not only the first one.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Store-assigned identifier of a workout.
pub type WorkoutId = Uuid;

pub const FIELD_TITLE: &str = "title";
pub const FIELD_LOAD: &str = "load";
pub const FIELD_REPS: &str = "reps";

/// Canonical stored workout record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: WorkoutId,
    pub title: String,
    /// Weight or other numeric load; always finite.
    pub load: f64,
    pub reps: u32,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Refreshed by every update.
    pub updated_at: i64,
}

impl Workout {
    /// Checks persisted field state against the model constraints.
    ///
    /// Read paths use this to reject rows that violate the invariants.
    pub fn validate(&self) -> Result<(), WorkoutValidationError> {
        let mut errors = WorkoutValidationError::default();
        if let Err(message) = check_title(&self.title) {
            errors.push(FIELD_TITLE, message);
        }
        if let Err(message) = check_load(self.load) {
            errors.push(FIELD_LOAD, message);
        }
        errors.into_result(())
    }
}

/// One failing field with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Aggregated field errors for one write request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkoutValidationError {
    errors: Vec<FieldError>,
}

impl WorkoutValidationError {
    /// Creates an error holding a single field failure.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Appends failures from `other` for fields not already reported.
    pub fn merge(&mut self, other: WorkoutValidationError) {
        for error in other.errors {
            if !self.contains(&error.field) {
                self.errors.push(error);
            }
        }
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Field names in the order they were reported.
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|error| error.field.as_str()).collect()
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl Display for WorkoutValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid workout fields: {}", self.fields().join(", "))
    }
}

impl Error for WorkoutValidationError {}

/// Validated input for inserting a new workout.
///
/// Fields are private so an instance always satisfies the model constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkout {
    title: String,
    load: f64,
    reps: u32,
}

impl NewWorkout {
    pub fn new(
        title: impl Into<String>,
        load: f64,
        reps: i64,
    ) -> Result<Self, WorkoutValidationError> {
        WorkoutDraft {
            title: Some(title.into()),
            load: Some(load),
            reps: Some(reps),
        }
        .validate()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn load(&self) -> f64 {
        self.load
    }

    pub fn reps(&self) -> u32 {
        self.reps
    }
}

/// Unvalidated create input; `None` means the field was not supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutDraft {
    pub title: Option<String>,
    pub load: Option<f64>,
    pub reps: Option<i64>,
}

impl WorkoutDraft {
    /// Requires every field and checks each constraint.
    pub fn validate(&self) -> Result<NewWorkout, WorkoutValidationError> {
        let mut errors = WorkoutValidationError::default();

        let title = match self.title.as_deref() {
            Some(title) => check_title(title)
                .map(|()| title.to_string())
                .map_err(|message| errors.push(FIELD_TITLE, message))
                .ok(),
            None => {
                errors.push(FIELD_TITLE, "is required");
                None
            }
        };

        let load = match self.load {
            Some(load) => check_load(load)
                .map(|()| load)
                .map_err(|message| errors.push(FIELD_LOAD, message))
                .ok(),
            None => {
                errors.push(FIELD_LOAD, "is required");
                None
            }
        };

        let reps = match self.reps {
            Some(reps) => check_reps(reps)
                .map_err(|message| errors.push(FIELD_REPS, message))
                .ok(),
            None => {
                errors.push(FIELD_REPS, "is required");
                None
            }
        };

        match (title, load, reps) {
            (Some(title), Some(load), Some(reps)) if errors.is_empty() => {
                Ok(NewWorkout { title, load, reps })
            }
            _ => Err(errors),
        }
    }
}

/// Validated partial update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutChanges {
    title: Option<String>,
    load: Option<f64>,
    reps: Option<u32>,
}

impl WorkoutChanges {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn load(&self) -> Option<f64> {
        self.load
    }

    pub fn reps(&self) -> Option<u32> {
        self.reps
    }

    /// Returns whether no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.load.is_none() && self.reps.is_none()
    }
}

/// Unvalidated update input; `None` means the field was not supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutPatch {
    pub title: Option<String>,
    pub load: Option<f64>,
    pub reps: Option<i64>,
}

impl WorkoutPatch {
    /// Checks only the supplied fields.
    pub fn validate(&self) -> Result<WorkoutChanges, WorkoutValidationError> {
        let mut errors = WorkoutValidationError::default();
        let mut changes = WorkoutChanges::default();

        if let Some(title) = self.title.as_deref() {
            match check_title(title) {
                Ok(()) => changes.title = Some(title.to_string()),
                Err(message) => errors.push(FIELD_TITLE, message),
            }
        }
        if let Some(load) = self.load {
            match check_load(load) {
                Ok(()) => changes.load = Some(load),
                Err(message) => errors.push(FIELD_LOAD, message),
            }
        }
        if let Some(reps) = self.reps {
            match check_reps(reps) {
                Ok(reps) => changes.reps = Some(reps),
                Err(message) => errors.push(FIELD_REPS, message),
            }
        }

        errors.into_result(changes)
    }
}

fn check_title(title: &str) -> Result<(), &'static str> {
    if title.trim().is_empty() {
        return Err("must not be empty");
    }
    Ok(())
}

fn check_load(load: f64) -> Result<(), &'static str> {
    if !load.is_finite() {
        return Err("must be a finite number");
    }
    Ok(())
}

fn check_reps(reps: i64) -> Result<u32, &'static str> {
    if reps < 0 {
        return Err("must not be negative");
    }
    u32::try_from(reps).map_err(|_| "is too large")
}
