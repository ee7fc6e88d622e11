use std::sync::Arc;
use std::thread;
use workout_core::{SqliteWorkoutStore, WorkoutDraft, WorkoutPatch, WorkoutResource};

#[test]
fn concurrent_updates_leave_one_written_state() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteWorkoutStore::open(dir.path().join("workouts.db")).unwrap();
    let resource = Arc::new(WorkoutResource::new(store));

    let created = resource
        .create(&WorkoutDraft {
            title: Some("pull-up".to_string()),
            load: Some(0.0),
            reps: Some(10),
        })
        .unwrap();
    let id = created.id.to_string();

    for _ in 0..20 {
        let handles: Vec<_> = [1_i64, 2]
            .into_iter()
            .map(|reps| {
                let resource = Arc::clone(&resource);
                let id = id.clone();
                thread::spawn(move || {
                    resource
                        .update(
                            &id,
                            &WorkoutPatch {
                                reps: Some(reps),
                                ..WorkoutPatch::default()
                            },
                        )
                        .unwrap()
                })
            })
            .collect();

        for handle in handles {
            let updated = handle.join().unwrap();
            assert!(updated.reps == 1 || updated.reps == 2);
        }

        let current = resource.get_one(&id).unwrap();
        assert!(current.reps == 1 || current.reps == 2);
        assert_eq!(current.title, created.title);
        assert_eq!(current.load, created.load);
        assert_eq!(current.created_at, created.created_at);
    }
}

#[test]
fn concurrent_delete_succeeds_exactly_once() {
    let store = SqliteWorkoutStore::open_in_memory().unwrap();
    let resource = Arc::new(WorkoutResource::new(store));
    let id = resource
        .create(&WorkoutDraft {
            title: Some("dip".to_string()),
            load: Some(10.0),
            reps: Some(8),
        })
        .unwrap()
        .id
        .to_string();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let resource = Arc::clone(&resource);
            let id = id.clone();
            thread::spawn(move || resource.delete(&id).is_ok())
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .filter(|deleted| *deleted)
        .count();
    assert_eq!(successes, 1);
}
