//! HTML rendering. Templates are compiled into the binary and only ever
//! see plain serializable values.

use std::sync::Arc;

use axum::response::Html;
use minijinja::Environment;
use serde::Serialize;

use crate::error::ToolroomError;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("login.html", include_str!("../templates/login.html")),
    ("dashboard.html", include_str!("../templates/dashboard.html")),
    ("tools.html", include_str!("../templates/tools.html")),
    ("technicians.html", include_str!("../templates/technicians.html")),
    ("issue.html", include_str!("../templates/issue.html")),
    ("movements.html", include_str!("../templates/movements.html")),
    ("sop.html", include_str!("../templates/sop.html")),
];

#[derive(Clone)]
pub struct Views {
    env: Arc<Environment<'static>>,
}

impl Views {
    pub fn new() -> Result<Self, ToolroomError> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env: Arc::new(env) })
    }

    pub fn render<C: Serialize>(&self, name: &str, ctx: C) -> Result<Html<String>, ToolroomError> {
        let template = self.env.get_template(name)?;
        Ok(Html(template.render(ctx)?))
    }
}
