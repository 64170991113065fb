//! Encoded lock state: read and replace the whole store as a hash string.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};
use shards::store::MemoryStore;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct StateBody {
    pub hash: String,
}

/// `GET /api/state`: every page's caps in hash-string form.
pub async fn get_state(State(state): State<AppState>) -> Json<StateBody> {
    let registry = state.registry.read().await;
    Json(StateBody { hash: registry.store.encode() })
}

/// `PUT /api/state`: replace the store; live sessions are rebuilt on next use.
///
/// Responds with the normalized encoding of what was stored.
pub async fn put_state(
    State(state): State<AppState>,
    body: Result<Json<StateBody>, JsonRejection>,
) -> Result<Json<StateBody>, ApiError> {
    let Json(body) = body?;
    let store = MemoryStore::decode(body.hash.trim()).map_err(ApiError::InvalidState)?;
    let mut registry = state.registry.write().await;
    registry.replace_store(&state.config, store)?;
    Ok(Json(StateBody { hash: registry.store.encode() }))
}
