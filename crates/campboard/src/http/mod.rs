//! HTTP API for campboard.
//!
//! JSON over HTTP with axum: campers, activities and signups, plus the error
//! mapping and the server that binds it all to a socket.

pub mod error;
pub mod routes;
pub mod server;

use crate::storage::Storage;

pub use error::{ApiError, ApiResult};
pub use routes::routes;
pub use server::HttpServer;

/// State shared by all request handlers.
#[derive(Debug)]
pub struct AppState {
    /// The record store.
    pub storage: Storage,
}

impl AppState {
    /// Wrap a store.
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }
}
