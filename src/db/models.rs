use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Tool {
    pub id: i64,
    pub tool_id: String,
    pub name: String,
    pub quantity: i64,
    pub reorder_level: i64,
}

impl Tool {
    pub fn needs_reorder(&self) -> bool {
        self.quantity <= self.reorder_level
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Technician {
    pub id: i64,
    pub name: String,
    pub contact: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Issue {
    pub id: i64,
    pub tool_id: String,
    pub technician: String,
    pub due_date: NaiveDateTime,
    pub returned: bool,
}

impl Issue {
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        !self.returned && self.due_date < now
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct StockMovement {
    pub id: i64,
    pub tool_id: String,
    pub action: String,
    pub timestamp: DateTime<Utc>,
}

/// Counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq, FromRow)]
pub struct DashboardMetrics {
    pub total_tools: i64,
    pub issued: i64,
    pub overdue: i64,
    pub reorder: i64,
}
