pub mod publish;
pub mod upload;

pub use publish::{publish, publish_all};
pub use upload::UploadService;
