/// Prefix shared by every JSON route
pub const API_PREFIX: &str = "/api";

/// Path the local backend's signed URLs resolve under
pub const ASSETS_PREFIX: &str = "/assets";

/// Multipart field carrying a video upload
pub const VIDEO_FIELD: &str = "video";

/// Multipart field carrying a thumbnail upload
pub const THUMBNAIL_FIELD: &str = "thumbnail";

/// Slack added to per-route body limits for multipart framing
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;
