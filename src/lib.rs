//! Car Rental Syria
//!
//! REST JSON API for a car rental agency: a public fleet catalogue with
//! availability search, customer booking requests with server-side pricing,
//! and the back-office lifecycle that takes a booking from request to return.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod rental;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
