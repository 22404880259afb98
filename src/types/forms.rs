//! Typed form payloads and their validated counterparts.
//!
//! Every field arrives as a string so that malformed numbers or dates are
//! reported as validation messages on the form instead of extractor
//! rejections.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ToolroomError;

pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolForm {
    pub tool_id: String,
    pub name: String,
    pub quantity: String,
    pub reorder_level: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTool {
    pub tool_id: String,
    pub name: String,
    pub quantity: i64,
    pub reorder_level: i64,
}

impl TryFrom<ToolForm> for NewTool {
    type Error = ToolroomError;

    fn try_from(form: ToolForm) -> Result<Self, Self::Error> {
        Ok(Self {
            tool_id: required("tool_id", &form.tool_id)?,
            name: required("name", &form.name)?,
            quantity: non_negative("quantity", &form.quantity)?,
            reorder_level: non_negative("reorder_level", &form.reorder_level)?,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicianForm {
    pub name: String,
    pub contact: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTechnician {
    pub name: String,
    pub contact: String,
}

impl TryFrom<TechnicianForm> for NewTechnician {
    type Error = ToolroomError;

    fn try_from(form: TechnicianForm) -> Result<Self, Self::Error> {
        Ok(Self {
            name: required("name", &form.name)?,
            contact: form.contact.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueForm {
    pub tool_id: String,
    pub technician: String,
    pub due_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub tool_id: String,
    /// Free-text name; not required to match a registered technician.
    pub technician: String,
    /// Midnight of the submitted date.
    pub due_date: NaiveDateTime,
}

impl TryFrom<IssueForm> for NewIssue {
    type Error = ToolroomError;

    fn try_from(form: IssueForm) -> Result<Self, Self::Error> {
        Ok(Self {
            tool_id: required("tool_id", &form.tool_id)?,
            technician: required("technician", &form.technician)?,
            due_date: parse_due_date(&form.due_date)?,
        })
    }
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Parse a `YYYY-MM-DD` due date into midnight of that day.
pub fn parse_due_date(raw: &str) -> Result<NaiveDateTime, ToolroomError> {
    let raw = raw.trim();
    let invalid = || {
        ToolroomError::validation(format!(
            "due_date must be a date in YYYY-MM-DD format, got '{raw}'"
        ))
    };
    // Fixed-width only: due dates are stored as text and compared lexically.
    if !is_iso_date_shape(raw) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(raw, DUE_DATE_FORMAT)
        .map(|d| d.and_time(NaiveTime::MIN))
        .map_err(|_| invalid())
}

fn is_iso_date_shape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

fn required(field: &str, raw: &str) -> Result<String, ToolroomError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ToolroomError::validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn non_negative(field: &str, raw: &str) -> Result<i64, ToolroomError> {
    let raw = raw.trim();
    let value: i64 = raw.parse().map_err(|_| {
        ToolroomError::validation(format!("{field} must be a whole number, got '{raw}'"))
    })?;
    if value < 0 {
        return Err(ToolroomError::validation(format!(
            "{field} must not be negative"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool_form(quantity: &str, reorder_level: &str) -> ToolForm {
        ToolForm {
            tool_id: " T1 ".to_string(),
            name: "Torque wrench".to_string(),
            quantity: quantity.to_string(),
            reorder_level: reorder_level.to_string(),
        }
    }

    #[test]
    fn tool_form_trims_and_parses() {
        let tool = NewTool::try_from(tool_form("5", " 2 ")).expect("valid form");
        assert_eq!(tool.tool_id, "T1");
        assert_eq!(tool.quantity, 5);
        assert_eq!(tool.reorder_level, 2);
    }

    #[test]
    fn tool_form_rejects_non_numeric_quantity() {
        let err = NewTool::try_from(tool_form("five", "2")).unwrap_err();
        assert!(matches!(err, ToolroomError::Validation(_)));
        assert!(err.to_string().contains("quantity"));
    }

    #[test]
    fn tool_form_rejects_negative_reorder_level() {
        let err = NewTool::try_from(tool_form("5", "-1")).unwrap_err();
        assert!(matches!(err, ToolroomError::Validation(_)));
    }

    #[test]
    fn tool_form_requires_tool_id() {
        let mut form = tool_form("5", "2");
        form.tool_id = "   ".to_string();
        let err = NewTool::try_from(form).unwrap_err();
        assert_eq!(err.to_string(), "tool_id is required");
    }

    #[test]
    fn technician_contact_is_optional() {
        let tech = NewTechnician::try_from(TechnicianForm {
            name: "Ada".to_string(),
            contact: String::new(),
        })
        .expect("valid form");
        assert_eq!(tech.contact, "");
    }

    #[test]
    fn due_date_is_midnight_of_the_day() {
        let due = parse_due_date("2024-03-09").expect("valid date");
        assert_eq!(due.to_string(), "2024-03-09 00:00:00");
    }

    #[test]
    fn malformed_due_dates_are_rejected() {
        for raw in [
            "13/40/2024",
            "2024-13-01",
            "2024-02-30",
            "",
            "tomorrow",
            "+10000-01-01",
            "-0001-01-01",
            "2024-3-09",
            "02024-03-09",
        ] {
            let err = parse_due_date(raw).unwrap_err();
            assert!(matches!(err, ToolroomError::Validation(_)), "{raw}");
        }
    }

    #[test]
    fn login_form_debug_hides_password() {
        let form = LoginForm {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(!format!("{form:?}").contains("hunter2"));
    }
}
