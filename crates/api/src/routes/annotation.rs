//! Route definitions for saving annotations.
//!
//! ```text
//! POST /annotate                save_annotation
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::annotation;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/annotate", post(annotation::save_annotation))
}
