use std::{path::Path, str::FromStr, sync::Arc};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow}, Pool, Row, Sqlite};

use crate::domain::{
    repository::TodoRepository,
    todo::{Todo, TodoId},
};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
)";

// created_at is clamped to the newest stored value so insertion order never goes backwards.
const INSERT: &str = "INSERT INTO todos (text, completed, created_at)
    VALUES (?1, 0, MAX(strftime('%Y-%m-%dT%H:%M:%fZ', 'now'), COALESCE((SELECT MAX(created_at) FROM todos), '')))
    RETURNING id, text, completed, created_at";

#[derive(Clone)]
pub struct SqliteTodoRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTodoRepository {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid database url {database_url}"))?
            .create_if_missing(true);

        let pool = if is_in_memory(database_url) {
            // every pooled connection to :memory: would otherwise open its own empty database
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            ensure_parent_dir(database_url)?;
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };
        tracing::debug!(database_url, "sqlite pool ready");
        Ok(Self { pool: Arc::new(pool) })
    }
}

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn init(&self) -> Result<()> {
        sqlx::query(SCHEMA).execute(&*self.pool).await?;
        Ok(())
    }

    async fn insert(&self, text: &str) -> Result<Todo> {
        let row = sqlx::query(INSERT)
            .bind(text)
            .fetch_one(&*self.pool)
            .await?;
        row_to_todo(row)
    }

    async fn list_all(&self) -> Result<Vec<Todo>> {
        let rows = sqlx::query("SELECT id, text, completed, created_at FROM todos ORDER BY created_at DESC, id DESC")
            .fetch_all(&*self.pool)
            .await?;
        rows.into_iter().map(row_to_todo).collect()
    }

    async fn update_completed(&self, id: TodoId, completed: bool) -> Result<Option<Todo>> {
        let row = sqlx::query("UPDATE todos SET completed = ?2 WHERE id = ?1 RETURNING id, text, completed, created_at")
            .bind(id.0)
            .bind(completed)
            .fetch_optional(&*self.pool)
            .await?;
        row.map(row_to_todo).transpose()
    }

    async fn delete_by_id(&self, id: TodoId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
            .bind(id.0)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_todo(row: SqliteRow) -> Result<Todo> {
    let id: i64 = row.try_get("id")?;
    let text: String = row.try_get("text")?;
    let completed: bool = row.try_get("completed")?;
    let created_at_str: String = row.try_get("created_at")?;

    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .with_context(|| format!("todo {id} has malformed created_at {created_at_str:?}"))?
        .with_timezone(&Utc);

    Ok(Todo { id: TodoId(id), text, completed, created_at })
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

fn ensure_parent_dir(database_url: &str) -> Result<()> {
    let Some(rest) = database_url.strip_prefix("sqlite://").or_else(|| database_url.strip_prefix("sqlite:")) else {
        return Ok(());
    };
    let path = rest.split('?').next().unwrap_or(rest);
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating database directory {}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_in_memory_urls() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file:todos?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://todos.db"));
    }
}
