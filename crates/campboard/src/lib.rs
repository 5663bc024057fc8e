//! `campboard` - A JSON API for camp signups
//!
//! This library provides the record store, validation, cascade deletes and
//! JSON shaping behind a small API over campers, activities and signups.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod models;
pub mod seed;
pub mod serialize;
pub mod storage;
pub mod validation;

pub use config::Config;
pub use error::{Entity, Error, Result};
pub use logging::init_logging;
pub use models::{Activity, Camper, CamperPatch, NewActivity, NewCamper, NewSignup, Signup};
pub use storage::{Storage, StorageStats};
pub use validation::{Field, ValidationError};
