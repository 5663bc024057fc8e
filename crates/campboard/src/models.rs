//! Record types for campboard.
//!
//! Stored records ([`Camper`], [`Activity`], [`Signup`]) always carry their
//! generated id. The write inputs (`New*`, [`CamperPatch`]) are what callers
//! hand to the store; they are deserialized straight from request bodies, so
//! every field is optional and checked by the validation layer instead.
//!
//! Relationships are plain foreign-key ids. Use
//! [`Storage::signups_for_camper`](crate::Storage::signups_for_camper) and
//! [`Storage::signups_for_activity`](crate::Storage::signups_for_activity) to
//! walk them.

use serde::Deserialize;

/// A camper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Camper {
    /// Generated identifier.
    pub id: i64,
    /// Non-empty display name.
    pub name: String,
    /// Age in years, within 8..=18 when set.
    pub age: Option<i64>,
}

/// A camp activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    /// Generated identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Difficulty rating.
    pub difficulty: i64,
}

/// A camper's signup for an activity at a given hour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signup {
    /// Generated identifier.
    pub id: i64,
    /// Hour of day, within 0..=23 when set.
    pub time: Option<i64>,
    /// The camper who signed up.
    pub camper_id: i64,
    /// The activity signed up for.
    pub activity_id: i64,
}

/// A freshly created signup together with the records it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupDetail {
    /// The signup.
    pub signup: Signup,
    /// The camper it belongs to.
    pub camper: Camper,
    /// The activity it is for.
    pub activity: Activity,
}

/// Input for creating a camper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewCamper {
    /// Required; must be non-empty.
    #[serde(default)]
    pub name: Option<String>,
    /// Optional; must be within 8..=18 when set.
    #[serde(default)]
    pub age: Option<i64>,
}

impl NewCamper {
    /// Convenience constructor for a camper with a known age.
    #[must_use]
    pub fn new(name: impl Into<String>, age: i64) -> Self {
        Self {
            name: Some(name.into()),
            age: Some(age),
        }
    }
}

/// Partial update of a camper. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CamperPatch {
    /// Replacement name.
    #[serde(default)]
    pub name: Option<String>,
    /// Replacement age.
    #[serde(default)]
    pub age: Option<i64>,
}

impl CamperPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none()
    }
}

/// Input for creating an activity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewActivity {
    /// Display name.
    pub name: String,
    /// Difficulty rating.
    pub difficulty: i64,
}

impl NewActivity {
    /// Create an activity input.
    #[must_use]
    pub fn new(name: impl Into<String>, difficulty: i64) -> Self {
        Self {
            name: name.into(),
            difficulty,
        }
    }
}

/// Input for creating a signup.
///
/// Missing ids are treated the same as ids that do not resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewSignup {
    /// The camper signing up.
    #[serde(default)]
    pub camper_id: Option<i64>,
    /// The activity being signed up for.
    #[serde(default)]
    pub activity_id: Option<i64>,
    /// Hour of day.
    #[serde(default)]
    pub time: Option<i64>,
}

impl NewSignup {
    /// Create a signup input with all fields set.
    #[must_use]
    pub fn new(camper_id: i64, activity_id: i64, time: i64) -> Self {
        Self {
            camper_id: Some(camper_id),
            activity_id: Some(activity_id),
            time: Some(time),
        }
    }
}
