use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use chrono::{Local, NaiveDateTime};
use minijinja::context;
use serde::Serialize;
use tracing::warn;

use crate::db::models::{Issue, Tool};
use crate::error::ToolroomError;
use crate::middleware::auth::RequireLogin;
use crate::router::ToolroomState;
use crate::types::forms::{IssueForm, TechnicianForm, ToolForm};

const TOOLS_PATH: &str = "/tools";
const TECHNICIANS_PATH: &str = "/technicians";
const ISSUE_PATH: &str = "/issue";

/// A tool row with its low-stock flag precomputed for the template.
#[derive(Serialize)]
struct ToolRow {
    #[serde(flatten)]
    tool: Tool,
    needs_reorder: bool,
}

impl From<Tool> for ToolRow {
    fn from(tool: Tool) -> Self {
        Self {
            needs_reorder: tool.needs_reorder(),
            tool,
        }
    }
}

#[derive(Serialize)]
struct IssueRow {
    #[serde(flatten)]
    issue: Issue,
    overdue: bool,
}

impl IssueRow {
    fn new(issue: Issue, now: NaiveDateTime) -> Self {
        Self {
            overdue: issue.is_overdue(now),
            issue,
        }
    }
}

pub async fn tools_page(
    State(state): State<ToolroomState>,
    _auth: RequireLogin,
) -> Result<Response, ToolroomError> {
    render_tools(&state, ToolForm::default(), None).await
}

/// POST /tools -> redirect back to the list, or re-render with the error.
pub async fn create_tool(
    State(state): State<ToolroomState>,
    _auth: RequireLogin,
    Form(form): Form<ToolForm>,
) -> Result<Response, ToolroomError> {
    match state.ops.register_tool(form.clone()).await {
        Ok(_) => Ok(Redirect::to(TOOLS_PATH).into_response()),
        Err(err) if err.is_user_facing() => {
            warn!(tool_id = %form.tool_id, error = %err, "tool registration rejected");
            render_tools(&state, form, Some(err)).await
        }
        Err(err) => Err(err),
    }
}

async fn render_tools(
    state: &ToolroomState,
    form: ToolForm,
    error: Option<ToolroomError>,
) -> Result<Response, ToolroomError> {
    let tools: Vec<ToolRow> = state
        .ops
        .list_tools()
        .await?
        .into_iter()
        .map(ToolRow::from)
        .collect();
    let page = state.views.render(
        "tools.html",
        context! {
            nav => true,
            tools,
            form,
            error => error.as_ref().map(ToString::to_string),
        },
    )?;
    Ok(with_status(page, error.as_ref()))
}

pub async fn technicians_page(
    State(state): State<ToolroomState>,
    _auth: RequireLogin,
) -> Result<Response, ToolroomError> {
    render_technicians(&state, TechnicianForm::default(), None).await
}

pub async fn create_technician(
    State(state): State<ToolroomState>,
    _auth: RequireLogin,
    Form(form): Form<TechnicianForm>,
) -> Result<Response, ToolroomError> {
    match state.ops.register_technician(form.clone()).await {
        Ok(_) => Ok(Redirect::to(TECHNICIANS_PATH).into_response()),
        Err(err) if err.is_user_facing() => {
            warn!(error = %err, "technician registration rejected");
            render_technicians(&state, form, Some(err)).await
        }
        Err(err) => Err(err),
    }
}

async fn render_technicians(
    state: &ToolroomState,
    form: TechnicianForm,
    error: Option<ToolroomError>,
) -> Result<Response, ToolroomError> {
    let technicians = state.ops.list_technicians().await?;
    let page = state.views.render(
        "technicians.html",
        context! {
            nav => true,
            technicians,
            form,
            error => error.as_ref().map(ToString::to_string),
        },
    )?;
    Ok(with_status(page, error.as_ref()))
}

pub async fn issues_page(
    State(state): State<ToolroomState>,
    _auth: RequireLogin,
) -> Result<Response, ToolroomError> {
    render_issues(&state, IssueForm::default(), None).await
}

/// POST /issue -> records the issue and its stock side effects atomically.
pub async fn create_issue(
    State(state): State<ToolroomState>,
    _auth: RequireLogin,
    Form(form): Form<IssueForm>,
) -> Result<Response, ToolroomError> {
    match state.ops.issue_tool(form.clone()).await {
        Ok(_) => Ok(Redirect::to(ISSUE_PATH).into_response()),
        Err(err) if err.is_user_facing() => {
            warn!(tool_id = %form.tool_id, error = %err, "issue rejected");
            render_issues(&state, form, Some(err)).await
        }
        Err(err) => Err(err),
    }
}

async fn render_issues(
    state: &ToolroomState,
    form: IssueForm,
    error: Option<ToolroomError>,
) -> Result<Response, ToolroomError> {
    let now = Local::now().naive_local();
    let issues: Vec<IssueRow> = state
        .ops
        .list_issues()
        .await?
        .into_iter()
        .map(|issue| IssueRow::new(issue, now))
        .collect();
    let tools = state.ops.list_tools().await?;
    let technicians = state.ops.list_technicians().await?;
    let page = state.views.render(
        "issue.html",
        context! {
            nav => true,
            issues,
            tools,
            technicians,
            form,
            error => error.as_ref().map(ToString::to_string),
        },
    )?;
    Ok(with_status(page, error.as_ref()))
}

pub async fn movements_page(
    State(state): State<ToolroomState>,
    _auth: RequireLogin,
) -> Result<Response, ToolroomError> {
    let movements = state.ops.list_movements().await?;
    let page = state
        .views
        .render("movements.html", context! { nav => true, movements })?;
    Ok(page.into_response())
}

fn with_status(page: impl IntoResponse, error: Option<&ToolroomError>) -> Response {
    match error {
        Some(err) => (err.status(), page).into_response(),
        None => page.into_response(),
    }
}
