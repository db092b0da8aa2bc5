//! Route definitions for video discovery.
//!
//! ```text
//! GET  /videos                  list_videos
//! GET  /video_data/{video}      get_video_data
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::video;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/videos", get(video::list_videos))
        .route("/video_data/{video}", get(video::get_video_data))
}
