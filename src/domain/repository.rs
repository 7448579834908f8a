use async_trait::async_trait;
use super::todo::{Todo, TodoId};

/// Single-table todo storage. The implementation alone assigns `id` and `created_at`.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    async fn init(&self) -> anyhow::Result<()>;
    /// Inserts a new row with `completed = false`.
    async fn insert(&self, text: &str) -> anyhow::Result<Todo>;
    /// Newest first; ties on `created_at` fall back to the higher id.
    async fn list_all(&self) -> anyhow::Result<Vec<Todo>>;
    async fn update_completed(&self, id: TodoId, completed: bool) -> anyhow::Result<Option<Todo>>;
    /// Returns whether a row was removed.
    async fn delete_by_id(&self, id: TodoId) -> anyhow::Result<bool>;
}
