use axum::{extract::State, response::Html};
use chrono::Local;
use minijinja::context;

use crate::error::ToolroomError;
use crate::middleware::auth::RequireLogin;
use crate::router::ToolroomState;

/// GET /dashboard -> counts computed fresh against the local clock.
pub async fn dashboard(
    State(state): State<ToolroomState>,
    _auth: RequireLogin,
) -> Result<Html<String>, ToolroomError> {
    let metrics = state.ops.dashboard(Local::now().naive_local()).await?;
    state
        .views
        .render("dashboard.html", context! { nav => true, metrics })
}

pub async fn sop(
    State(state): State<ToolroomState>,
    _auth: RequireLogin,
) -> Result<Html<String>, ToolroomError> {
    state.views.render("sop.html", context! { nav => true })
}
