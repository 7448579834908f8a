use crate::domain::error::TodoError;
use crate::domain::repository::TodoRepository;
use crate::domain::todo::{CreateTodo, DeleteOutcome, DeleteTodo, Todo, UpdateTodo};
use async_trait::async_trait;

pub type ServiceResult<T> = Result<T, TodoError>;

#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    async fn create_todo(&self, input: CreateTodo) -> ServiceResult<Todo>;
    async fn get_todos(&self) -> ServiceResult<Vec<Todo>>;
    /// Fails with [`TodoError::NotFound`] when the id does not exist.
    async fn update_todo(&self, input: UpdateTodo) -> ServiceResult<Todo>;
    /// A missing id is reported as `success: false`, not as an error.
    async fn delete_todo(&self, input: DeleteTodo) -> ServiceResult<DeleteOutcome>;
}

#[derive(Clone)]
pub struct TodoServiceImpl<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo } }
}

#[async_trait]
impl<R: TodoRepository> TodoService for TodoServiceImpl<R> {
    async fn create_todo(&self, input: CreateTodo) -> ServiceResult<Todo> {
        let text = input.text.trim();
        if text.is_empty() {
            tracing::warn!("rejected todo with empty text");
            return Err(TodoError::Validation("text must not be empty".into()));
        }
        let todo = self.repo.insert(text).await?;
        tracing::info!(id = %todo.id, "todo created");
        Ok(todo)
    }

    async fn get_todos(&self) -> ServiceResult<Vec<Todo>> {
        let todos = self.repo.list_all().await?;
        tracing::debug!(count = todos.len(), "todos listed");
        Ok(todos)
    }

    async fn update_todo(&self, input: UpdateTodo) -> ServiceResult<Todo> {
        match self.repo.update_completed(input.id, input.completed).await? {
            Some(todo) => {
                tracing::info!(id = %todo.id, completed = todo.completed, "todo updated");
                Ok(todo)
            }
            None => {
                tracing::warn!(id = %input.id, "update of missing todo");
                Err(TodoError::NotFound(input.id))
            }
        }
    }

    async fn delete_todo(&self, input: DeleteTodo) -> ServiceResult<DeleteOutcome> {
        let success = self.repo.delete_by_id(input.id).await?;
        tracing::info!(id = %input.id, success, "todo delete");
        Ok(DeleteOutcome { success })
    }
}
