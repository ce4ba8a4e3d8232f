//! Tubely Database Layer
//!
//! Metadata store for video records.

pub mod db;

pub use db::{PostgresVideoRepository, VideoRepository};
