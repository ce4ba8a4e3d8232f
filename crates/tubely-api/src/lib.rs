//! Tubely API Library
//!
//! HTTP surface of the upload-and-publish pipeline: routing, bearer
//! authentication, the upload orchestrator and application setup.

mod api_doc;
pub mod auth;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;
pub mod utils;

pub use error::{ErrorResponse, HttpAppError};
pub use state::{AppState, MediaState, UploadLimits};
