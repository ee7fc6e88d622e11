//! Workout store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/find/update/delete primitives over `workouts` storage.
//! - Assign `id`, `created_at` and `updated_at` on the write path.
//!
//! # Invariants
//! - Read paths reject invalid persisted rows instead of masking them.
//! - `find_and_update_by_id` and `find_and_delete_by_id` never split the
//!   existence check from the write.

use crate::db::{open_db, open_db_in_memory, DbError, DbResult};
use crate::model::workout::{NewWorkout, Workout, WorkoutChanges, WorkoutId};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

const WORKOUT_COLUMNS: &str = "id, title, load, reps, created_at, updated_at";

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level failure for workout persistence and queries.
#[derive(Debug)]
pub enum StoreError {
    /// The id does not match the store's id format.
    MalformedId(String),
    Db(DbError),
    InvalidData(String),
    /// The store cannot serve requests at all.
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedId(id) => write!(f, "malformed workout id `{id}`"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted workout data: {message}"),
            Self::Unavailable(message) => write!(f, "workout store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::MalformedId(_) | Self::InvalidData(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Document-collection contract over workout records.
///
/// Ids arrive as caller-supplied text; implementations decide what a
/// well-formed id looks like.
pub trait WorkoutStore: Send + Sync {
    fn insert(&self, workout: &NewWorkout) -> StoreResult<Workout>;
    fn find_by_id(&self, id: &str) -> StoreResult<Option<Workout>>;
    /// Newest first; records created in the same millisecond keep
    /// reverse insertion order.
    fn find_all_sorted_by_created_at_desc(&self) -> StoreResult<Vec<Workout>>;
    fn find_and_update_by_id(
        &self,
        id: &str,
        changes: &WorkoutChanges,
    ) -> StoreResult<Option<Workout>>;
    fn find_and_delete_by_id(&self, id: &str) -> StoreResult<Option<Workout>>;
}

/// SQLite-backed workout store.
///
/// The connection is owned behind a mutex so one store can be shared across
/// threads; every operation holds the lock for exactly one statement.
pub struct SqliteWorkoutStore {
    conn: Mutex<Connection>,
}

impl SqliteWorkoutStore {
    /// Wraps a connection that already has migrations applied.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Opens (and migrates) a file database.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens (and migrates) a private in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("connection lock poisoned".to_string()))
    }
}

impl WorkoutStore for SqliteWorkoutStore {
    fn insert(&self, workout: &NewWorkout) -> StoreResult<Workout> {
        let now = now_epoch_ms();
        let created = Workout {
            id: Uuid::new_v4(),
            title: workout.title().to_string(),
            load: workout.load(),
            reps: workout.reps(),
            created_at: now,
            updated_at: now,
        };

        self.conn()?.execute(
            "INSERT INTO workouts (id, title, load, reps, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                created.id.to_string(),
                created.title.as_str(),
                created.load,
                created.reps,
                created.created_at,
                created.updated_at,
            ],
        )?;

        debug!("event=workout_insert module=store status=ok id={}", created.id);
        Ok(created)
    }

    fn find_by_id(&self, id: &str) -> StoreResult<Option<Workout>> {
        let id = parse_id(id)?;
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare_cached(&format!("SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;

        if let Some(row) = rows.next()? {
            return Ok(Some(parse_workout_row(row)?));
        }

        Ok(None)
    }

    fn find_all_sorted_by_created_at_desc(&self) -> StoreResult<Vec<Workout>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts ORDER BY created_at DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut workouts = Vec::new();

        while let Some(row) = rows.next()? {
            workouts.push(parse_workout_row(row)?);
        }

        Ok(workouts)
    }

    fn find_and_update_by_id(
        &self,
        id: &str,
        changes: &WorkoutChanges,
    ) -> StoreResult<Option<Workout>> {
        let id = parse_id(id)?;
        let conn = self.conn()?;
        let updated = conn
            .query_row(
                &format!(
                    "UPDATE workouts
                     SET
                        title = COALESCE(?1, title),
                        load = COALESCE(?2, load),
                        reps = COALESCE(?3, reps),
                        updated_at = ?4
                     WHERE id = ?5
                     RETURNING {WORKOUT_COLUMNS};"
                ),
                params![
                    changes.title(),
                    changes.load(),
                    changes.reps(),
                    now_epoch_ms(),
                    id.to_string(),
                ],
                |row| Ok(parse_workout_row(row)),
            )
            .optional()?
            .transpose()?;

        debug!(
            "event=workout_update module=store status=ok id={id} found={}",
            updated.is_some()
        );
        Ok(updated)
    }

    fn find_and_delete_by_id(&self, id: &str) -> StoreResult<Option<Workout>> {
        let id = parse_id(id)?;
        let conn = self.conn()?;
        let deleted = conn
            .query_row(
                &format!("DELETE FROM workouts WHERE id = ?1 RETURNING {WORKOUT_COLUMNS};"),
                [id.to_string()],
                |row| Ok(parse_workout_row(row)),
            )
            .optional()?
            .transpose()?;

        debug!(
            "event=workout_delete module=store status=ok id={id} found={}",
            deleted.is_some()
        );
        Ok(deleted)
    }
}

fn parse_id(id: &str) -> StoreResult<WorkoutId> {
    Uuid::parse_str(id.trim()).map_err(|_| StoreError::MalformedId(id.to_string()))
}

fn parse_workout_row(row: &Row<'_>) -> StoreResult<Workout> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{id_text}` in workouts.id"))
    })?;

    let reps_value: i64 = row.get("reps")?;
    let reps = u32::try_from(reps_value).map_err(|_| {
        StoreError::InvalidData(format!("invalid reps value `{reps_value}` in workouts.reps"))
    })?;

    let workout = Workout {
        id,
        title: row.get("title")?,
        load: row.get("load")?,
        reps,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    workout
        .validate()
        .map_err(|err| StoreError::InvalidData(format!("workout {id}: {err}")))?;
    Ok(workout)
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
