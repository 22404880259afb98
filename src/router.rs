use std::sync::Arc;

use axum::{Router, extract::FromRef, routing::get};
use axum_extra::extract::cookie::Key;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::ToolroomError;
use crate::handlers::{auth, dashboard, inventory};
use crate::middleware::auth::AdminCredentials;
use crate::service::inventory::InventoryOps;
use crate::views::Views;

/// Shared per-process handles, cloned into every request.
#[derive(Clone)]
pub struct ToolroomState {
    pub ops: InventoryOps,
    pub views: Views,
    pub credentials: Arc<AdminCredentials>,
    pub insecure_cookie: bool,
    key: Key,
}

impl ToolroomState {
    pub fn new(
        ops: InventoryOps,
        views: Views,
        credentials: AdminCredentials,
        key: Key,
        insecure_cookie: bool,
    ) -> Self {
        Self {
            ops,
            views,
            credentials: Arc::new(credentials),
            insecure_cookie,
            key,
        }
    }

    pub fn from_config(cfg: &Config, ops: InventoryOps) -> Result<Self, ToolroomError> {
        Ok(Self::new(
            ops,
            Views::new()?,
            cfg.credentials(),
            cfg.cookie_key()?,
            cfg.insecure_cookie,
        ))
    }
}

impl FromRef<ToolroomState> for Key {
    fn from_ref(state: &ToolroomState) -> Self {
        state.key.clone()
    }
}

pub fn toolroom_router(state: ToolroomState) -> Router {
    Router::new()
        .route("/", get(auth::login_page).post(auth::login_submit))
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/logout", get(auth::logout))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/sop", get(dashboard::sop))
        .route(
            "/tools",
            get(inventory::tools_page).post(inventory::create_tool),
        )
        .route(
            "/technicians",
            get(inventory::technicians_page).post(inventory::create_technician),
        )
        .route(
            "/issue",
            get(inventory::issues_page).post(inventory::create_issue),
        )
        .route("/movements", get(inventory::movements_page))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
