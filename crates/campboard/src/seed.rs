//! Sample data for a fresh database.
//!
//! Everything goes through the regular store operations, so seeded records
//! satisfy the same validation rules as records created over HTTP.

use tracing::info;

use crate::error::Result;
use crate::models::{NewActivity, NewCamper, NewSignup};
use crate::storage::{Storage, StorageStats};

const ACTIVITIES: &[(&str, i64)] = &[
    ("Archery", 2),
    ("Canoeing", 3),
    ("Rock Climbing", 5),
    ("Swimming", 1),
    ("Arts and Crafts", 1),
];

const CAMPERS: &[(&str, i64)] = &[
    ("Ava Reyes", 12),
    ("Ben Okafor", 9),
    ("Caleb Park", 15),
    ("Dana Whitfield", 17),
    ("Eli Novak", 8),
    ("Farah Haddad", 11),
];

/// (camper index, activity index, hour)
const SIGNUPS: &[(usize, usize, i64)] = &[
    (0, 0, 9),
    (0, 1, 14),
    (1, 3, 10),
    (2, 2, 8),
    (2, 1, 15),
    (3, 4, 13),
    (4, 3, 11),
    (5, 0, 16),
];

/// Insert the sample data set.
///
/// With `reset`, every existing record is removed first and ids restart at 1.
///
/// # Errors
///
/// Returns an error if any insert fails.
pub fn seed(storage: &Storage, reset: bool) -> Result<StorageStats> {
    if reset {
        storage.clear()?;
    }

    let activities = ACTIVITIES
        .iter()
        .map(|&(name, difficulty)| storage.create_activity(&NewActivity::new(name, difficulty)))
        .collect::<Result<Vec<_>>>()?;

    let campers = CAMPERS
        .iter()
        .map(|&(name, age)| storage.create_camper(&NewCamper::new(name, age)))
        .collect::<Result<Vec<_>>>()?;

    for &(camper, activity, hour) in SIGNUPS {
        storage.create_signup(&NewSignup::new(
            campers[camper].id,
            activities[activity].id,
            hour,
        ))?;
    }

    info!(
        "Seeded {} activities, {} campers and {} signups",
        activities.len(),
        campers.len(),
        SIGNUPS.len()
    );
    storage.stats()
}
