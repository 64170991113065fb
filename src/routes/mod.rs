//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One pentagon per page key. The page script fetches geometry or SVG,
//! forwards pointer events, and round-trips the encoded lock state through
//! its URL fragment via `/api/state`.

pub mod locks;
pub mod pentagon;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/pentagon/{page}", get(pentagon::get_pentagon))
        .route("/api/pentagon/{page}/events", post(pentagon::post_event))
        .route("/api/pentagon/{page}/svg", get(pentagon::get_svg))
        .route("/api/state", get(locks::get_state).put(locks::put_state))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
