use crate::db::models::{DashboardMetrics, Issue, StockMovement, Technician, Tool};
use crate::db::schema::SQLITE_INIT;
use crate::error::ToolroomError;
use crate::types::forms::{NewIssue, NewTechnician, NewTool};
use chrono::{NaiveDateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type SqlitePool = Pool<Sqlite>;

/// Action label recorded when a tool leaves the store.
pub const ACTION_ISSUED: &str = "Issued";

#[derive(Clone)]
pub struct ToolroomStorage {
    pool: SqlitePool,
    // Serializes multi-statement write transactions on this pool.
    write_gate: Arc<Mutex<()>>,
}

impl ToolroomStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Open (creating if missing) the database at `database_url` and
    /// initialize the schema.
    pub async fn connect(database_url: &str) -> Result<Self, ToolroomError> {
        let connect_opts =
            SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        let storage = Self::new(pool);
        storage.init_schema().await?;
        Ok(storage)
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), ToolroomError> {
        // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert a tool. A repeated `tool_id` maps to `DuplicateTool`.
    pub async fn insert_tool(&self, tool: &NewTool) -> Result<Tool, ToolroomError> {
        let res = sqlx::query_as::<_, Tool>(
            r#"
            INSERT INTO tools (tool_id, name, quantity, reorder_level)
            VALUES (?, ?, ?, ?)
            RETURNING id, tool_id, name, quantity, reorder_level
            "#,
        )
        .bind(&tool.tool_id)
        .bind(&tool.name)
        .bind(tool.quantity)
        .bind(tool.reorder_level)
        .fetch_one(&self.pool)
        .await;

        match res {
            Ok(row) => Ok(row),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(ToolroomError::DuplicateTool(tool.tool_id.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list_tools(&self) -> Result<Vec<Tool>, ToolroomError> {
        let rows = sqlx::query_as::<_, Tool>(
            "SELECT id, tool_id, name, quantity, reorder_level FROM tools ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn insert_technician(
        &self,
        tech: &NewTechnician,
    ) -> Result<Technician, ToolroomError> {
        let row = sqlx::query_as::<_, Technician>(
            "INSERT INTO technicians (name, contact) VALUES (?, ?) RETURNING id, name, contact",
        )
        .bind(&tech.name)
        .bind(&tech.contact)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list_technicians(&self) -> Result<Vec<Technician>, ToolroomError> {
        let rows =
            sqlx::query_as::<_, Technician>("SELECT id, name, contact FROM technicians ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    /// Record an issue in a single transaction:
    /// decrement stock, insert the issue row, append an `Issued` movement.
    ///
    /// Unknown tools and tools with no stock left are rejected before
    /// anything is committed; dropping `tx` rolls back.
    pub async fn issue_tool(&self, issue: &NewIssue) -> Result<Issue, ToolroomError> {
        let _guard = self.write_gate.lock().await;
        // IMMEDIATE takes the write lock up front, so writers on other
        // connections wait on the busy timeout instead of failing mid-transaction.
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let decremented = sqlx::query(
            "UPDATE tools SET quantity = quantity - 1 WHERE tool_id = ? AND quantity > 0",
        )
        .bind(&issue.tool_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if decremented == 0 {
            let known: Option<(i64,)> = sqlx::query_as("SELECT id FROM tools WHERE tool_id = ?")
                .bind(&issue.tool_id)
                .fetch_optional(&mut *tx)
                .await?;
            return Err(match known {
                Some(_) => ToolroomError::OutOfStock(issue.tool_id.clone()),
                None => ToolroomError::ToolNotFound(issue.tool_id.clone()),
            });
        }

        let row = sqlx::query_as::<_, Issue>(
            r#"
            INSERT INTO issues (tool_id, technician, due_date, returned)
            VALUES (?, ?, ?, 0)
            RETURNING id, tool_id, technician, due_date, returned
            "#,
        )
        .bind(&issue.tool_id)
        .bind(&issue.technician)
        .bind(issue.due_date)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO stock_movements (tool_id, action, timestamp) VALUES (?, ?, ?)")
            .bind(&issue.tool_id)
            .bind(ACTION_ISSUED)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row)
    }

    pub async fn list_issues(&self) -> Result<Vec<Issue>, ToolroomError> {
        let rows = sqlx::query_as::<_, Issue>(
            "SELECT id, tool_id, technician, due_date, returned FROM issues ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Audit log, newest first.
    pub async fn list_movements(&self) -> Result<Vec<StockMovement>, ToolroomError> {
        let rows = sqlx::query_as::<_, StockMovement>(
            "SELECT id, tool_id, action, timestamp FROM stock_movements ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// All four dashboard counts in one round trip, relative to `now`.
    pub async fn dashboard(&self, now: NaiveDateTime) -> Result<DashboardMetrics, ToolroomError> {
        let metrics = sqlx::query_as::<_, DashboardMetrics>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM tools) AS total_tools,
                (SELECT COUNT(*) FROM issues WHERE returned = 0) AS issued,
                (SELECT COUNT(*) FROM issues WHERE returned = 0 AND due_date < ?) AS overdue,
                (SELECT COUNT(*) FROM tools WHERE quantity <= reorder_level) AS reorder
            "#,
        )
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(metrics)
    }
}
