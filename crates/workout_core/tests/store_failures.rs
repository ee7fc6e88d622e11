use workout_core::{
    Exchange, NewWorkout, Operation, ResourceError, StoreError, StoreResult, Workout,
    WorkoutChanges, WorkoutController, WorkoutDraft, WorkoutResource, WorkoutStore,
};

/// Store whose every call fails as if the backend were unreachable.
struct UnreachableStore;

impl UnreachableStore {
    fn fail<T>() -> StoreResult<T> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

impl WorkoutStore for UnreachableStore {
    fn insert(&self, _workout: &NewWorkout) -> StoreResult<Workout> {
        Self::fail()
    }

    fn find_by_id(&self, _id: &str) -> StoreResult<Option<Workout>> {
        Self::fail()
    }

    fn find_all_sorted_by_created_at_desc(&self) -> StoreResult<Vec<Workout>> {
        Self::fail()
    }

    fn find_and_update_by_id(
        &self,
        _id: &str,
        _changes: &WorkoutChanges,
    ) -> StoreResult<Option<Workout>> {
        Self::fail()
    }

    fn find_and_delete_by_id(&self, _id: &str) -> StoreResult<Option<Workout>> {
        Self::fail()
    }
}

#[test]
fn store_failures_propagate_from_every_operation() {
    let resource = WorkoutResource::new(UnreachableStore);
    let draft = WorkoutDraft {
        title: Some("press".to_string()),
        load: Some(30.0),
        reps: Some(5),
    };

    assert!(matches!(resource.list_all(), Err(ResourceError::Store(_))));
    assert!(matches!(resource.get_one("any"), Err(ResourceError::Store(_))));
    assert!(matches!(resource.create(&draft), Err(ResourceError::Store(_))));
    assert!(matches!(resource.delete("any"), Err(ResourceError::Store(_))));
}

#[test]
fn validation_runs_before_the_store_is_touched() {
    let resource = WorkoutResource::new(UnreachableStore);

    let err = resource.create(&WorkoutDraft::default()).unwrap_err();
    assert!(matches!(err, ResourceError::Validation(_)));
}

#[test]
fn store_failure_maps_to_internal_error_with_message() {
    let controller = WorkoutController::new(WorkoutResource::new(UnreachableStore));
    let mut exchange = Exchange::new();

    controller.handle(Operation::List, &mut exchange);

    assert_eq!(exchange.status(), Some(500));
    let message = exchange.payload().unwrap()["error"].as_str().unwrap();
    assert!(message.contains("connection refused"));
}
