//! Domain models

pub mod location;
pub mod orientation;
pub mod video;

pub use location::ObjectLocation;
pub use orientation::{Dimensions, Orientation};
pub use video::{CreateVideoParams, CreateVideoRequest, ThumbnailRef, VideoRecord, VideoResponse};
