pub mod annotation;
pub mod health;
pub mod video;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /videos                         list videos
/// /video_data/{video}             folders, tasks, names, existing annotations
/// /annotate                       save one annotation (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(video::router())
        .merge(annotation::router())
}
