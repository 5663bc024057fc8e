//! Field-level validation for camp records.
//!
//! Every validator takes a candidate value and either hands it back unchanged
//! or fails with a [`ValidationError`] naming the field. The store calls these
//! before any write so a rejected value never reaches the database.

use std::fmt;
use std::ops::RangeInclusive;

use thiserror::Error;

/// Allowed camper ages, inclusive.
pub const CAMPER_AGE_RANGE: RangeInclusive<i64> = 8..=18;

/// Allowed signup hours, inclusive.
pub const SIGNUP_TIME_RANGE: RangeInclusive<i64> = 0..=23;

const CAMPER_NAME_MESSAGE: &str = "Camper must have a name";
const CAMPER_AGE_MESSAGE: &str = "Camper age must be between 8 and 18";
const SIGNUP_TIME_MESSAGE: &str = "Signup time must be between 0 and 23";

/// A validated record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// `Camper.name`
    CamperName,
    /// `Camper.age`
    CamperAge,
    /// `Signup.time`
    SignupTime,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CamperName => write!(f, "name"),
            Self::CamperAge => write!(f, "age"),
            Self::SignupTime => write!(f, "time"),
        }
    }
}

/// A field value that violates its invariant.
///
/// Displays as the user-facing message, which is what ends up in the
/// `errors` array of a 400 response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    field: Field,
    message: String,
}

impl ValidationError {
    /// Create a validation error for `field`.
    #[must_use]
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// The field that failed.
    #[must_use]
    pub fn field(&self) -> Field {
        self.field
    }

    /// The reason it failed.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Validate a camper name: it must be present and non-empty.
///
/// # Errors
///
/// Returns a [`Field::CamperName`] error if the name is absent or empty.
pub fn camper_name(name: Option<&str>) -> Result<&str, ValidationError> {
    match name {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(ValidationError::new(Field::CamperName, CAMPER_NAME_MESSAGE)),
    }
}

/// Validate a camper age: if present it must lie in [`CAMPER_AGE_RANGE`].
///
/// # Errors
///
/// Returns a [`Field::CamperAge`] error if the age is out of range.
pub fn camper_age(age: Option<i64>) -> Result<Option<i64>, ValidationError> {
    match age {
        Some(age) if !CAMPER_AGE_RANGE.contains(&age) => {
            Err(ValidationError::new(Field::CamperAge, CAMPER_AGE_MESSAGE))
        }
        _ => Ok(age),
    }
}

/// Validate a signup time: if present it must lie in [`SIGNUP_TIME_RANGE`].
///
/// # Errors
///
/// Returns a [`Field::SignupTime`] error if the hour is out of range.
pub fn signup_time(time: Option<i64>) -> Result<Option<i64>, ValidationError> {
    match time {
        Some(time) if !SIGNUP_TIME_RANGE.contains(&time) => {
            Err(ValidationError::new(Field::SignupTime, SIGNUP_TIME_MESSAGE))
        }
        _ => Ok(time),
    }
}

/// Collects failures across the fields of one record.
#[derive(Debug, Default)]
pub(crate) struct Collector {
    errors: Vec<ValidationError>,
}

impl Collector {
    /// Record the outcome of one field check, keeping the value on success.
    pub(crate) fn check<T>(&mut self, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.errors.push(err);
                None
            }
        }
    }

    /// Finish, failing if any field check failed.
    pub(crate) fn finish(self) -> crate::Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(crate::Error::Validation(self.errors))
        }
    }
}
