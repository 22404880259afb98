use crate::db::models::{DashboardMetrics, Issue, StockMovement, Technician, Tool};
use crate::db::sqlite::ToolroomStorage;
use crate::error::ToolroomError;
use crate::types::forms::{IssueForm, NewIssue, NewTechnician, NewTool, TechnicianForm, ToolForm};
use chrono::NaiveDateTime;
use tracing::info;

/// Domain operations over the tool room store.
///
/// Forms are validated here, before any query runs.
#[derive(Clone)]
pub struct InventoryOps {
    storage: ToolroomStorage,
}

impl InventoryOps {
    pub fn new(storage: ToolroomStorage) -> Self {
        Self { storage }
    }

    pub async fn connect(database_url: &str) -> Result<Self, ToolroomError> {
        let storage = ToolroomStorage::connect(database_url).await?;
        Ok(Self::new(storage))
    }

    pub async fn register_tool(&self, form: ToolForm) -> Result<Tool, ToolroomError> {
        let new_tool = NewTool::try_from(form)?;
        let tool = self.storage.insert_tool(&new_tool).await?;
        info!(
            tool_id = %tool.tool_id,
            quantity = tool.quantity,
            reorder_level = tool.reorder_level,
            "tool registered"
        );
        Ok(tool)
    }

    pub async fn list_tools(&self) -> Result<Vec<Tool>, ToolroomError> {
        self.storage.list_tools().await
    }

    pub async fn register_technician(
        &self,
        form: TechnicianForm,
    ) -> Result<Technician, ToolroomError> {
        let new_tech = NewTechnician::try_from(form)?;
        let tech = self.storage.insert_technician(&new_tech).await?;
        info!(id = tech.id, name = %tech.name, "technician registered");
        Ok(tech)
    }

    pub async fn list_technicians(&self) -> Result<Vec<Technician>, ToolroomError> {
        self.storage.list_technicians().await
    }

    /// Issue one unit of a tool. Rejects unknown or out-of-stock tools.
    pub async fn issue_tool(&self, form: IssueForm) -> Result<Issue, ToolroomError> {
        let new_issue = NewIssue::try_from(form)?;
        let issue = self.storage.issue_tool(&new_issue).await?;
        info!(
            issue_id = issue.id,
            tool_id = %issue.tool_id,
            technician = %issue.technician,
            due_date = %issue.due_date.date(),
            "tool issued"
        );
        Ok(issue)
    }

    pub async fn list_issues(&self) -> Result<Vec<Issue>, ToolroomError> {
        self.storage.list_issues().await
    }

    pub async fn list_movements(&self) -> Result<Vec<StockMovement>, ToolroomError> {
        self.storage.list_movements().await
    }

    pub async fn dashboard(&self, now: NaiveDateTime) -> Result<DashboardMetrics, ToolroomError> {
        self.storage.dashboard(now).await
    }
}
