#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use std::{
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

use toolroom::InventoryOps;
use toolroom::config::Config;
use toolroom::router::{ToolroomState, toolroom_router};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A fresh SQLite file under the system temp dir, removed on drop.
pub struct TempDb {
    pub path: PathBuf,
}

impl TempDb {
    pub fn new(label: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!(
            "toolroom-{label}-{}-{}-{}.sqlite",
            std::process::id(),
            nanos,
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        Self { path }
    }

    pub fn url(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm", "-journal"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", self.path.display()));
        }
    }
}

pub async fn ops(db: &TempDb) -> InventoryOps {
    InventoryOps::connect(&db.url())
        .await
        .expect("failed to open test database")
}

pub fn test_config() -> Config {
    Config {
        admin_username: "keeper".to_string(),
        admin_password: "wrench".to_string(),
        insecure_cookie: true,
        ..Config::default()
    }
}

pub async fn app(db: &TempDb) -> (Router, InventoryOps) {
    app_with_config(db, &test_config()).await
}

pub async fn app_with_config(db: &TempDb, cfg: &Config) -> (Router, InventoryOps) {
    let ops = ops(db).await;
    let state = ToolroomState::from_config(cfg, ops.clone()).expect("state");
    (toolroom_router(state), ops)
}

/// Current quantity on hand for `tool_id`, via the public listing.
pub async fn quantity_of(ops: &InventoryOps, tool_id: &str) -> i64 {
    ops.list_tools()
        .await
        .expect("list tools")
        .into_iter()
        .find(|t| t.tool_id == tool_id)
        .map(|t| t.quantity)
        .unwrap_or_else(|| panic!("{tool_id} is not registered"))
}

/// Raw `Set-Cookie` header for the session cookie, attributes included.
pub fn session_set_cookie(resp: &Response<Body>) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("toolroom_session="))
        .map(str::to_string)
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(c) = cookie {
        builder = builder.header(header::COOKIE, c);
    }
    builder.body(Body::empty()).expect("failed to build request")
}

pub fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(c) = cookie {
        builder = builder.header(header::COOKIE, c);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.expect("request failed")
}

pub async fn body_string(resp: Response<Body>) -> String {
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(body.to_vec()).expect("response body was not utf-8")
}

pub fn location(resp: &Response<Body>) -> Option<String> {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// `name=value` of the session cookie set by `resp`, if any.
pub fn session_cookie(resp: &Response<Body>) -> Option<String> {
    session_set_cookie(resp)
        .and_then(|v| v.split(';').next().map(str::to_string))
}

pub async fn login(app: &Router) -> String {
    let resp = send(app, post_form("/login", "username=keeper&password=wrench", None)).await;
    session_cookie(&resp).expect("login should set a session cookie")
}
