//! Database repositories for data access layer
//
// Video records (ownership, stored video and thumbnail references)
pub mod video;

pub use video::{PostgresVideoRepository, VideoRepository};
