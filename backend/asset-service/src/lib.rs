//! Asset Service
//!
//! Accepts thumbnail and video uploads for existing video records, stores the
//! asset (local disk, inline data URI, or S3) and writes the resulting URL back
//! onto the record.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

// Public re-exports
pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;
