//! JSON shapes for camp records.
//!
//! Each view is a plain `Serialize` struct built from stored records. The
//! nesting is fixed by the types: a camper detail carries basic signups
//! (activity id only), and a created signup carries basic camper and activity
//! views, neither of which can nest signups again. Expansion therefore stops
//! one hop from the root and never walks back across the edge it came from.

use serde::Serialize;

use crate::models::{Activity, Camper, Signup, SignupDetail};

/// Basic camper mapping: `{id, name, age}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CamperView {
    /// Record id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: Option<i64>,
}

impl From<&Camper> for CamperView {
    fn from(camper: &Camper) -> Self {
        Self {
            id: camper.id,
            name: camper.name.clone(),
            age: camper.age,
        }
    }
}

/// Basic activity mapping: `{id, name, difficulty}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityView {
    /// Record id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Difficulty rating.
    pub difficulty: i64,
}

impl From<&Activity> for ActivityView {
    fn from(activity: &Activity) -> Self {
        Self {
            id: activity.id,
            name: activity.name.clone(),
            difficulty: activity.difficulty,
        }
    }
}

/// Basic signup mapping: `{id, time, activity_id}`.
///
/// `camper_id` is only emitted when the signup is shown outside its camper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupView {
    /// Record id.
    pub id: i64,
    /// Owning camper, omitted under the camper itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camper_id: Option<i64>,
    /// Referenced activity.
    pub activity_id: i64,
    /// Hour of day.
    pub time: Option<i64>,
}

impl SignupView {
    /// The signup as listed under its own camper.
    #[must_use]
    pub fn under_camper(signup: &Signup) -> Self {
        Self {
            id: signup.id,
            camper_id: None,
            activity_id: signup.activity_id,
            time: signup.time,
        }
    }

    /// The signup on its own, with both references.
    #[must_use]
    pub fn standalone(signup: &Signup) -> Self {
        Self {
            camper_id: Some(signup.camper_id),
            ..Self::under_camper(signup)
        }
    }
}

/// Camper detail: basic camper fields plus the camper's signups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CamperDetailView {
    /// The camper's own fields.
    #[serde(flatten)]
    pub camper: CamperView,
    /// The camper's signups, without nested activities.
    pub signups: Vec<SignupView>,
}

impl CamperDetailView {
    /// Build the detail view from a camper and their signups.
    #[must_use]
    pub fn new(camper: &Camper, signups: &[Signup]) -> Self {
        Self {
            camper: CamperView::from(camper),
            signups: signups.iter().map(SignupView::under_camper).collect(),
        }
    }
}

/// Response to creating a signup: both references plus the nested records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupCreatedView {
    /// The signup's own fields.
    #[serde(flatten)]
    pub signup: SignupView,
    /// The activity signed up for.
    pub activity: ActivityView,
    /// The camper who signed up.
    pub camper: CamperView,
}

impl From<&SignupDetail> for SignupCreatedView {
    fn from(detail: &SignupDetail) -> Self {
        Self {
            signup: SignupView::standalone(&detail.signup),
            activity: ActivityView::from(&detail.activity),
            camper: CamperView::from(&detail.camper),
        }
    }
}

/// `{"campers": [...]}` envelope for the camper list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CamperList {
    /// Every camper.
    pub campers: Vec<CamperView>,
}

impl CamperList {
    /// Wrap basic views of `campers`.
    #[must_use]
    pub fn new(campers: &[Camper]) -> Self {
        Self {
            campers: campers.iter().map(CamperView::from).collect(),
        }
    }
}

/// `{"camper": {...}}` envelope for a single camper detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CamperEnvelope {
    /// The camper detail.
    pub camper: CamperDetailView,
}
