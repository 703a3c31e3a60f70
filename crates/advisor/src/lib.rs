//! Fertilizer advisor HTTP service
//!
//! Serves the landing page, the recommendation form and the JSON
//! prediction endpoint on top of [`advisor_lib`].

pub mod api;
pub mod config;
pub mod error;
pub mod pages;

pub use api::{create_router, AppState};
pub use config::AdvisorConfig;
pub use error::ApiError;
