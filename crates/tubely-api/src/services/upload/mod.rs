mod service;

pub use service::UploadService;
