use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use super::*;
use crate::state::test_helpers::test_app_state;

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.expect("body");
    (status, bytes.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::get(uri).body(Body::empty()).expect("request");
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).expect("json"))
}

async fn send_json(app: &Router, method: &str, uri: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).expect("json"))
}

async fn event(app: &Router, page: &str, kind: &str, edge: usize, level: u32) -> (StatusCode, Value) {
    let body = json!({ "kind": kind, "edge": edge, "level": level });
    send_json(app, "POST", &format!("/api/pentagon/{page}/events"), &body).await
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = app(test_app_state());
    let request = Request::get("/healthz").body(Body::empty()).expect("request");
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn get_pentagon_returns_geometry() {
    let app = app(test_app_state());
    let (status, view) = get_json(&app, "/api/pentagon/values").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["page"], "values");
    assert_eq!(view["num_levels"], 3);
    assert_eq!(view["shards"].as_array().expect("shards").len(), 15);
    assert_eq!(view["outline"][0], json!({ "x": 50.0, "y": 0.0 }));
    assert_eq!(view["frame"], json!({ "width": 100.0, "height": 100.0 }));
    assert_eq!(view["caps"], json!([0, 0, 0, 0, 0]));

    let first = &view["shards"][0];
    assert_eq!(first["edge"], 0);
    assert_eq!(first["ring"], 1);
    assert_eq!(first["level"], 3);
    assert_eq!(first["fill"], "normal");
    assert_eq!(first["color"], "#009b90");
}

#[tokio::test]
async fn enter_click_leave_round_trip() {
    let app = app(test_app_state());

    let (status, body) = event(&app, "values", "enter", 2, 2).await;
    assert_eq!(status, StatusCode::OK);
    let actions = body["actions"].as_array().expect("actions");
    assert_eq!(actions.len(), 2);
    assert!(actions.iter().all(|a| a["type"] == "fill_changed" && a["fill"] == "highlight"));

    let (_, body) = event(&app, "values", "click", 2, 2).await;
    assert_eq!(body["actions"], json!([{ "type": "cap_changed", "edge": 2, "cap": 2 }]));
    assert_eq!(body["caps"], json!([0, 0, 2, 0, 0]));

    let (_, body) = event(&app, "values", "leave", 2, 2).await;
    assert_eq!(body["actions"], json!([]));

    let (_, state) = get_json(&app, "/api/state").await;
    assert_eq!(state["hash"], "values=0.0.2.0.0");

    let (_, view) = get_json(&app, "/api/pentagon/values").await;
    let lit: Vec<&Value> = view["shards"]
        .as_array()
        .expect("shards")
        .iter()
        .filter(|s| s["fill"] == "highlight")
        .collect();
    assert_eq!(lit.len(), 2);
    assert!(lit.iter().all(|s| s["edge"] == 2));
}

#[tokio::test]
async fn double_click_clears_lock() {
    let app = app(test_app_state());
    event(&app, "values", "click", 0, 1).await;
    let (status, body) = event(&app, "values", "double_click", 0, 1).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["caps"], json!([0, 0, 0, 0, 0]));

    let (_, state) = get_json(&app, "/api/state").await;
    assert_eq!(state["hash"], "");
}

#[tokio::test]
async fn svg_has_image_content_type() {
    let app = app(test_app_state());
    let request = Request::get("/api/pentagon/values/svg").body(Body::empty()).expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/svg+xml");

    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let svg = String::from_utf8(bytes.to_vec()).expect("utf8");
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"id="J-svg-pentagon""#));
    assert_eq!(svg.matches("class=\"shard ").count(), 15);
}

#[tokio::test]
async fn invalid_page_is_rejected() {
    let app = app(test_app_state());
    let (status, body) = get_json(&app, "/api/pentagon/bad.page").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E_INVALID_PAGE");
}

#[tokio::test]
async fn missing_shard_is_rejected() {
    let app = app(test_app_state());
    let (status, body) = event(&app, "values", "enter", 5, 1).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E_INVALID_ARGUMENT");

    let (status, body) = event(&app, "values", "click", 0, 4).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E_INVALID_ARGUMENT");

    let (_, state) = get_json(&app, "/api/state").await;
    assert_eq!(state["hash"], "");
}

#[tokio::test]
async fn put_state_replaces_locks() {
    let app = app(test_app_state());
    let (status, body) = send_json(&app, "PUT", "/api/state", &json!({ "hash": "#b=0.0.0.0.0&a=1.0.0.0.3" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hash"], "a=1.0.0.0.3");

    let (_, view) = get_json(&app, "/api/pentagon/a").await;
    assert_eq!(view["caps"], json!([1, 0, 0, 0, 3]));
}

#[tokio::test]
async fn put_state_rejects_bad_hash() {
    let app = app(test_app_state());
    let (status, body) = send_json(&app, "PUT", "/api/state", &json!({ "hash": "a=1.2" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E_INVALID_STATE");

    let (status, body) = send_json(&app, "PUT", "/api/state", &json!({ "hash": "a=9.0.0.0.0" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "E_LOCKS_DO_NOT_FIT");
}

#[tokio::test]
async fn malformed_event_body_is_rejected() {
    let app = app(test_app_state());
    let uri = "/api/pentagon/values/events";
    for body in [
        json!({ "kind": "hover", "edge": 0, "level": 1 }),
        json!({ "kind": "enter", "edge": -1, "level": 1 }),
        json!({ "kind": "enter", "edge": 0 }),
    ] {
        let (status, reply) = send_json(&app, "POST", uri, &body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(reply["code"], "E_INVALID_ARGUMENT", "{body}");
    }

    let request = Request::post(uri).body(Body::from("{}")).expect("request");
    let (status, bytes) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let reply: Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(reply["code"], "E_INVALID_ARGUMENT");
}

#[tokio::test]
async fn malformed_state_body_is_rejected() {
    let app = app(test_app_state());
    let (status, reply) = send_json(&app, "PUT", "/api/state", &json!({ "state": "a=1.0.0.0.0" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(reply["code"], "E_INVALID_ARGUMENT");
}

#[tokio::test]
async fn reads_leave_no_sessions_behind() {
    let state = test_app_state();
    let app = app(state.clone());
    for i in 0..20 {
        let (status, _) = get_json(&app, &format!("/api/pentagon/p{i}")).await;
        assert_eq!(status, StatusCode::OK);
        let request = Request::get(format!("/api/pentagon/s{i}/svg")).body(Body::empty()).expect("request");
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
    }
    assert!(state.registry.read().await.widgets.is_empty());

    event(&app, "values", "enter", 1, 3).await;
    let (_, view) = get_json(&app, "/api/pentagon/values").await;
    let lit = view["shards"].as_array().expect("shards").iter().filter(|s| s["fill"] == "highlight").count();
    assert_eq!(lit, 1);

    event(&app, "values", "leave", 1, 3).await;
    assert!(state.registry.read().await.widgets.is_empty());
}
