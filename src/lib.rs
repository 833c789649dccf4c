//! Top-destination recommendations for the Coco travel app.
//!
//! Destinations from the Coco backend are enriched with a representative
//! activity (title, price range and image) picked from activity search
//! results, and served as display-ready cards.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use error::{AppError, AppResult};
