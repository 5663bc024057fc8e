//! Storage layer for campboard.
//!
//! This module provides `SQLite`-based persistent storage for campers,
//! activities and signups. Every write runs inside its own transaction:
//! field validation happens inside that transaction before anything is
//! written, and any failure rolls the whole operation back.
//!
//! Deleting a camper or an activity first deletes the signups that reference
//! it, then the record itself, in the same transaction.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Entity, Error, Result};
use crate::models::{
    Activity, Camper, CamperPatch, NewActivity, NewCamper, NewSignup, Signup, SignupDetail,
};
use crate::validation::{self, Collector};

/// Storage engine for camp records.
///
/// Holds a single connection behind a mutex, so the handle can be shared
/// between request handlers. Each public method is one unit of work.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Mutex<Connection>,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // Enable WAL mode for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        Self::prepare(conn, path.clone()).inspect(|_| {
            info!("Database opened successfully at {}", path.display());
        })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        Self::prepare(conn, PathBuf::from(":memory:"))
    }

    fn prepare(conn: Connection, path: PathBuf) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::internal("storage connection lock poisoned"))
    }

    /// Run `op` in a transaction, committing on success and rolling back on error.
    fn write<T>(&self, name: &str, op: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        match op(&tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                debug!("Rolling back {}: {}", name, err);
                if let Err(rollback_err) = tx.rollback() {
                    warn!("Rollback of {} failed: {}", name, rollback_err);
                }
                Err(err)
            }
        }
    }

    // === Campers ===

    /// Create a camper.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] listing every invalid field, or a
    /// database error. Nothing is written on failure.
    pub fn create_camper(&self, input: &NewCamper) -> Result<Camper> {
        self.write("create_camper", |conn| {
            let mut checks = Collector::default();
            let name = checks.check(validation::camper_name(input.name.as_deref()));
            let age = checks.check(validation::camper_age(input.age));
            checks.finish()?;

            let name = name
                .ok_or_else(|| Error::internal("validated camper name missing"))?
                .to_string();
            let age = age.flatten();

            conn.execute(
                "INSERT INTO campers (name, age) VALUES (?1, ?2)",
                params![name, age],
            )?;
            let id = conn.last_insert_rowid();
            debug!("Inserted camper with id {}", id);

            Ok(Camper { id, name, age })
        })
    }

    /// List all campers ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_campers(&self) -> Result<Vec<Camper>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, name, age FROM campers ORDER BY id")?;
        let campers = stmt
            .query_map([], row_to_camper)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(campers)
    }

    /// Get a camper by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_camper(&self, id: i64) -> Result<Option<Camper>> {
        let conn = self.lock()?;
        fetch_camper(&conn, id)
    }

    /// Get a camper together with their signups, read under one lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn camper_with_signups(&self, id: i64) -> Result<Option<(Camper, Vec<Signup>)>> {
        let conn = self.lock()?;
        let Some(camper) = fetch_camper(&conn, id)? else {
            return Ok(None);
        };
        let signups = query_signups(&conn, "camper_id", id)?;
        Ok(Some((camper, signups)))
    }

    /// Apply a partial update to a camper.
    ///
    /// Fields present in the patch are validated exactly as on creation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the camper does not exist,
    /// [`Error::Validation`] if a patched field is invalid, or a database
    /// error. The camper is left unchanged on failure.
    pub fn update_camper(&self, id: i64, patch: &CamperPatch) -> Result<Camper> {
        self.write("update_camper", |conn| {
            let mut camper = fetch_camper(conn, id)?.ok_or(Error::NotFound(Entity::Camper))?;

            let mut checks = Collector::default();
            if let Some(name) = patch.name.as_deref() {
                if let Some(name) = checks.check(validation::camper_name(Some(name))) {
                    camper.name = name.to_string();
                }
            }
            if patch.age.is_some() {
                if let Some(age) = checks.check(validation::camper_age(patch.age)) {
                    camper.age = age;
                }
            }
            checks.finish()?;

            if patch.is_empty() {
                return Ok(camper);
            }

            conn.execute(
                "UPDATE campers SET name = ?1, age = ?2 WHERE id = ?3",
                params![camper.name, camper.age, camper.id],
            )?;
            debug!("Updated camper {}", id);

            Ok(camper)
        })
    }

    /// Delete a camper and every signup that references it.
    ///
    /// Returns the number of signups removed alongside the camper.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the camper does not exist, or a
    /// database error.
    pub fn delete_camper(&self, id: i64) -> Result<usize> {
        self.write("delete_camper", |conn| {
            if fetch_camper(conn, id)?.is_none() {
                return Err(Error::NotFound(Entity::Camper));
            }

            let removed = conn.execute("DELETE FROM signups WHERE camper_id = ?1", [id])?;
            conn.execute("DELETE FROM campers WHERE id = ?1", [id])?;

            info!("Deleted camper {} and {} signups", id, removed);
            Ok(removed)
        })
    }

    // === Activities ===

    /// Create an activity.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn create_activity(&self, input: &NewActivity) -> Result<Activity> {
        self.write("create_activity", |conn| {
            conn.execute(
                "INSERT INTO activities (name, difficulty) VALUES (?1, ?2)",
                params![input.name, input.difficulty],
            )?;
            let id = conn.last_insert_rowid();
            debug!("Inserted activity with id {}", id);

            Ok(Activity {
                id,
                name: input.name.clone(),
                difficulty: input.difficulty,
            })
        })
    }

    /// List all activities ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_activities(&self) -> Result<Vec<Activity>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, name, difficulty FROM activities ORDER BY id")?;
        let activities = stmt
            .query_map([], row_to_activity)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(activities)
    }

    /// Get an activity by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_activity(&self, id: i64) -> Result<Option<Activity>> {
        let conn = self.lock()?;
        fetch_activity(&conn, id)
    }

    /// Delete an activity and every signup that references it.
    ///
    /// Returns the number of signups removed alongside the activity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the activity does not exist, or a
    /// database error.
    pub fn delete_activity(&self, id: i64) -> Result<usize> {
        self.write("delete_activity", |conn| {
            if fetch_activity(conn, id)?.is_none() {
                return Err(Error::NotFound(Entity::Activity));
            }

            let removed = conn.execute("DELETE FROM signups WHERE activity_id = ?1", [id])?;
            conn.execute("DELETE FROM activities WHERE id = ?1", [id])?;

            info!("Deleted activity {} and {} signups", id, removed);
            Ok(removed)
        })
    }

    // === Signups ===

    /// Create a signup after resolving both of its references.
    ///
    /// References are checked before the time is validated, so a request
    /// with both a missing reference and a bad time reports the reference.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingReference`] if the camper or activity does not
    /// exist, [`Error::Validation`] if the time is out of range, or a
    /// database error. No signup is created on failure.
    pub fn create_signup(&self, input: &NewSignup) -> Result<SignupDetail> {
        self.write("create_signup", |conn| {
            let camper = match input.camper_id {
                Some(id) => fetch_camper(conn, id)?,
                None => None,
            };
            let activity = match input.activity_id {
                Some(id) => fetch_activity(conn, id)?,
                None => None,
            };
            let (Some(camper), Some(activity)) = (camper, activity) else {
                return Err(Error::MissingReference);
            };

            let time = validation::signup_time(input.time)?;

            conn.execute(
                "INSERT INTO signups (time, camper_id, activity_id) VALUES (?1, ?2, ?3)",
                params![time, camper.id, activity.id],
            )?;
            let id = conn.last_insert_rowid();
            debug!(
                "Inserted signup {} (camper {}, activity {})",
                id, camper.id, activity.id
            );

            Ok(SignupDetail {
                signup: Signup {
                    id,
                    time,
                    camper_id: camper.id,
                    activity_id: activity.id,
                },
                camper,
                activity,
            })
        })
    }

    /// Get a signup by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_signup(&self, id: i64) -> Result<Option<Signup>> {
        let conn = self.lock()?;
        let signup = conn
            .query_row(
                "SELECT id, time, camper_id, activity_id FROM signups WHERE id = ?1",
                [id],
                row_to_signup,
            )
            .optional()?;
        Ok(signup)
    }

    /// List all signups ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_signups(&self) -> Result<Vec<Signup>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT id, time, camper_id, activity_id FROM signups ORDER BY id")?;
        let signups = stmt
            .query_map([], row_to_signup)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(signups)
    }

    /// Get a camper's signups ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn signups_for_camper(&self, camper_id: i64) -> Result<Vec<Signup>> {
        let conn = self.lock()?;
        query_signups(&conn, "camper_id", camper_id)
    }

    /// Get an activity's signups ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn signups_for_activity(&self, activity_id: i64) -> Result<Vec<Signup>> {
        let conn = self.lock()?;
        query_signups(&conn, "activity_id", activity_id)
    }

    // === Maintenance ===

    /// Delete every record and restart id generation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn clear(&self) -> Result<()> {
        self.write("clear", |conn| {
            conn.execute_batch(
                r"
                DELETE FROM signups;
                DELETE FROM campers;
                DELETE FROM activities;
                DELETE FROM sqlite_sequence WHERE name IN ('signups', 'campers', 'activities');
                ",
            )?;
            info!("Cleared all records");
            Ok(())
        })
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let conn = self.lock()?;
        let count = |table: &str| -> Result<i64> {
            let n = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })?;
            Ok(n)
        };

        let campers = count("campers")?;
        let activities = count("activities")?;
        let signups = count("signups")?;

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            campers,
            activities,
            signups,
            db_size_bytes,
        })
    }
}

/// Record counts and size of the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageStats {
    /// Number of campers.
    pub campers: i64,
    /// Number of activities.
    pub activities: i64,
    /// Number of signups.
    pub signups: i64,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

fn fetch_camper(conn: &Connection, id: i64) -> Result<Option<Camper>> {
    let camper = conn
        .query_row(
            "SELECT id, name, age FROM campers WHERE id = ?1",
            [id],
            row_to_camper,
        )
        .optional()?;
    Ok(camper)
}

fn fetch_activity(conn: &Connection, id: i64) -> Result<Option<Activity>> {
    let activity = conn
        .query_row(
            "SELECT id, name, difficulty FROM activities WHERE id = ?1",
            [id],
            row_to_activity,
        )
        .optional()?;
    Ok(activity)
}

/// Signups whose `column` (`camper_id` or `activity_id`) equals `id`.
fn query_signups(conn: &Connection, column: &str, id: i64) -> Result<Vec<Signup>> {
    let sql = format!(
        "SELECT id, time, camper_id, activity_id FROM signups WHERE {column} = ?1 ORDER BY id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let signups = stmt
        .query_map([id], row_to_signup)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(signups)
}

fn row_to_camper(row: &rusqlite::Row) -> rusqlite::Result<Camper> {
    Ok(Camper {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
    })
}

fn row_to_activity(row: &rusqlite::Row) -> rusqlite::Result<Activity> {
    Ok(Activity {
        id: row.get(0)?,
        name: row.get(1)?,
        difficulty: row.get(2)?,
    })
}

fn row_to_signup(row: &rusqlite::Row) -> rusqlite::Result<Signup> {
    Ok(Signup {
        id: row.get(0)?,
        time: row.get(1)?,
        camper_id: row.get(2)?,
        activity_id: row.get(3)?,
    })
}
