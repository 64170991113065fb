//! Pentagon routes: geometry, interaction events and SVG.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use shards::cascade::{Action, Fill, ShardEvent};
use shards::geometry::{Frame, Outline, Point};
use shards::store::{Caps, PageKey};
use shards::widget::PentagonWidget;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ShardView {
    pub edge: usize,
    pub level: u32,
    pub ring: u32,
    pub points: Vec<Point>,
    pub fill: Fill,
    pub color: &'static str,
    pub stroke_width: u32,
    pub stroke_dasharray: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PentagonView {
    pub page: PageKey,
    pub outline: Outline,
    pub center: Point,
    pub frame: Frame,
    pub num_levels: u32,
    pub caps: Caps,
    pub shards: Vec<ShardView>,
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub actions: Vec<Action>,
    pub caps: Caps,
}

fn to_view(page: PageKey, widget: &PentagonWidget) -> PentagonView {
    let pentagon = widget.pentagon();
    let cascade = widget.cascade();
    let shards = pentagon
        .shards
        .iter()
        .map(|shard| {
            let fill = cascade.fill(shard.id).unwrap_or_default();
            ShardView {
                edge: shard.id.edge,
                level: shard.id.level,
                ring: shard.ring,
                points: shard.polygon.clone(),
                fill,
                color: fill.color(),
                stroke_width: shard.stroke.width,
                stroke_dasharray: shard.stroke.dasharray(),
            }
        })
        .collect();

    PentagonView {
        page,
        outline: pentagon.outline,
        center: pentagon.center,
        frame: pentagon.frame,
        num_levels: pentagon.layout.num_levels,
        caps: cascade.caps(),
        shards,
    }
}

fn parse_page(raw: &str) -> Result<PageKey, ApiError> {
    PageKey::parse(raw).map_err(ApiError::InvalidPage)
}

/// `GET /api/pentagon/{page}`: geometry with current fills and caps.
pub async fn get_pentagon(State(state): State<AppState>, Path(page): Path<String>) -> Result<Json<PentagonView>, ApiError> {
    let page = parse_page(&page)?;
    let registry = state.registry.read().await;
    let view = registry.view(&state.config, &page, |widget| to_view(page.clone(), widget))?;
    Ok(Json(view))
}

/// `POST /api/pentagon/{page}/events`: apply one pointer interaction.
pub async fn post_event(
    State(state): State<AppState>,
    Path(page): Path<String>,
    body: Result<Json<ShardEvent>, JsonRejection>,
) -> Result<Json<EventResponse>, ApiError> {
    let page = parse_page(&page)?;
    let Json(event) = body.inspect_err(|e| warn!(%page, error = %e, "event body rejected"))?;
    let mut registry = state.registry.write().await;
    let actions = match registry.handle(&state.config, &page, event) {
        Ok(actions) => actions,
        Err(e) => {
            warn!(%page, ?event, error = %e, "event rejected");
            return Err(e);
        }
    };
    let caps = registry.store.caps(&page);
    debug!(%page, ?event, changes = actions.len(), "event applied");
    Ok(Json(EventResponse { actions, caps }))
}

/// `GET /api/pentagon/{page}/svg`: rendered SVG document.
pub async fn get_svg(State(state): State<AppState>, Path(page): Path<String>) -> Result<Response, ApiError> {
    let page = parse_page(&page)?;
    let registry = state.registry.read().await;
    let svg = registry.view(&state.config, &page, PentagonWidget::svg)?;
    Ok(([(CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}
