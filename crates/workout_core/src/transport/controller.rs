//! Workout controller: drives `WorkoutResource` through a `Transport`.
//!
//! # Responsibility
//! - Read the id parameter and body an operation needs.
//! - Encode results as JSON with the matching status code.
//!
//! # Invariants
//! - Success is always `200` with the workout (or list) as payload.
//! - `NotFound` bodies are identical for malformed and absent ids.

use super::payload::{parse_draft, parse_patch};
use super::{
    Operation, Transport, ID_PARAM, STATUS_BAD_REQUEST, STATUS_INTERNAL_ERROR, STATUS_NOT_FOUND,
    STATUS_OK,
};
use crate::resource::workout_resource::{ResourceError, ResourceResult, WorkoutResource};
use crate::store::workout_store::{StoreError, WorkoutStore};
use log::{info, warn};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Instant;

const NOT_FOUND_MESSAGE: &str = "No such workout";

pub struct WorkoutController<S: WorkoutStore> {
    resource: WorkoutResource<S>,
}

impl<S: WorkoutStore> WorkoutController<S> {
    pub fn new(resource: WorkoutResource<S>) -> Self {
        Self { resource }
    }

    /// Runs one operation and writes its response to the transport.
    pub fn handle<T: Transport + ?Sized>(&self, operation: Operation, transport: &mut T) {
        let started_at = Instant::now();
        let (status, payload) = match self.execute(operation, transport) {
            Ok(payload) => (STATUS_OK, payload),
            Err(err) => error_response(&err),
        };

        if status == STATUS_INTERNAL_ERROR {
            warn!(
                "event=workout_request module=transport status=error op={operation} status_code={status} duration_ms={}",
                started_at.elapsed().as_millis()
            );
        } else {
            info!(
                "event=workout_request module=transport status={} op={operation} status_code={status} duration_ms={}",
                if status == STATUS_OK { "ok" } else { "rejected" },
                started_at.elapsed().as_millis()
            );
        }

        transport.respond(status, payload);
    }

    fn execute<T: Transport + ?Sized>(
        &self,
        operation: Operation,
        transport: &T,
    ) -> ResourceResult<Value> {
        match operation {
            Operation::List => encode(&self.resource.list_all()?),
            Operation::Get => encode(&self.resource.get_one(require_id(transport)?)?),
            Operation::Create => {
                let draft = parse_draft(transport.body())?;
                encode(&self.resource.create(&draft)?)
            }
            Operation::Update => {
                let id = require_id(transport)?;
                let patch = match parse_patch(transport.body()) {
                    Ok(patch) => patch,
                    Err(errors) => {
                        self.resource.get_one(id)?;
                        return Err(errors.into());
                    }
                };
                encode(&self.resource.update(id, &patch)?)
            }
            Operation::Delete => encode(&self.resource.delete(require_id(transport)?)?),
        }
    }
}

/// Returns the status code and JSON body for a failed operation.
pub fn error_response(err: &ResourceError) -> (u16, Value) {
    match err {
        ResourceError::Validation(errors) => (
            STATUS_BAD_REQUEST,
            json!({ "error": errors.to_string(), "errors": errors.errors() }),
        ),
        ResourceError::NotFound => (STATUS_NOT_FOUND, json!({ "error": NOT_FOUND_MESSAGE })),
        ResourceError::Store(store_err) => (
            STATUS_INTERNAL_ERROR,
            json!({ "error": store_err.to_string() }),
        ),
    }
}

fn require_id<T: Transport + ?Sized>(transport: &T) -> ResourceResult<&str> {
    transport.param(ID_PARAM).ok_or(ResourceError::NotFound)
}

fn encode<V: Serialize>(value: &V) -> ResourceResult<Value> {
    serde_json::to_value(value).map_err(|err| {
        ResourceError::Store(StoreError::InvalidData(format!(
            "failed to encode response: {err}"
        )))
    })
}
