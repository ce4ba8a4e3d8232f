//! Route groups

use crate::constants::{API_PREFIX, ASSETS_PREFIX, MULTIPART_OVERHEAD_BYTES};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub(super) fn video_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let limits = state.media.limits;

    Router::new()
        .route(
            &format!("{}/videos", API_PREFIX),
            post(handlers::videos::create_video).get(handlers::videos::list_videos),
        )
        .route(
            &format!("{}/videos/{{id}}", API_PREFIX),
            get(handlers::videos::get_video).delete(handlers::videos::delete_video),
        )
        .route(
            &format!("{}/videos/{{id}}/thumbnail", API_PREFIX),
            post(handlers::thumbnail_upload::upload_thumbnail).layer(DefaultBodyLimit::max(
                limits.max_thumbnail_bytes + MULTIPART_OVERHEAD_BYTES,
            )),
        )
        .route(
            &format!("{}/videos/{{id}}/video", API_PREFIX),
            post(handlers::video_upload::upload_video).layer(DefaultBodyLimit::max(
                limits.max_video_bytes + MULTIPART_OVERHEAD_BYTES,
            )),
        )
}

/// Signed-URL asset route, mounted only when a signer is configured.
pub(super) fn asset_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    if state.assets.is_none() {
        return Router::new();
    }

    Router::new().route(
        &format!("{}/{{bucket}}/{{*key}}", ASSETS_PREFIX),
        get(handlers::assets::serve_asset),
    )
}
