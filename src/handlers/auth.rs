use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use minijinja::context;
use tracing::{info, warn};

use crate::error::ToolroomError;
use crate::middleware::auth::{LOGIN_PATH, end_session, is_authenticated, start_session};
use crate::router::ToolroomState;
use crate::types::forms::LoginForm;

const DASHBOARD_PATH: &str = "/dashboard";

/// GET / and GET /login
pub async fn login_page(
    State(state): State<ToolroomState>,
    jar: PrivateCookieJar,
) -> Result<Response, ToolroomError> {
    if is_authenticated(&jar) {
        return Ok(Redirect::to(DASHBOARD_PATH).into_response());
    }
    Ok(state.views.render("login.html", context! {})?.into_response())
}

/// POST / and POST /login
pub async fn login_submit(
    State(state): State<ToolroomState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, ToolroomError> {
    match state.credentials.verify(&form.username, &form.password) {
        Ok(()) => {
            info!(username = %form.username, "login succeeded");
            let jar = start_session(jar, state.insecure_cookie);
            Ok((jar, Redirect::to(DASHBOARD_PATH)).into_response())
        }
        Err(err) => {
            warn!(username = %form.username, "login rejected");
            let page = state.views.render(
                "login.html",
                context! { username => form.username, error => err.to_string() },
            )?;
            Ok((StatusCode::UNAUTHORIZED, page).into_response())
        }
    }
}

/// GET /logout -> always clears the session.
pub async fn logout(jar: PrivateCookieJar) -> impl IntoResponse {
    (end_session(jar), Redirect::to(LOGIN_PATH))
}
