use axum::{extract::{rejection::JsonRejection, Path, State}, routing::{patch, post}, Json, Router};
use serde::Deserialize;

use crate::{
    application::todo_service::TodoService,
    domain::todo::{CreateTodo, DeleteOutcome, DeleteTodo, Todo, TodoId, UpdateTodo},
    http::types::ApiError,
};

#[derive(Clone)]
pub struct AppState<S: TodoService> { pub service: S }

pub fn router<S: TodoService + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/todos", post(create_todo::<S>).get(list_todos::<S>))
        .route("/todos/:id", patch(update_todo::<S>).delete(delete_todo::<S>))
        .with_state(state)
}

async fn create_todo<S: TodoService>(State(state): State<AppState<S>>, payload: Result<Json<CreateTodo>, JsonRejection>) -> Result<Json<Todo>, ApiError> {
    let Json(payload) = payload?;
    Ok(Json(state.service.create_todo(payload).await?))
}

async fn list_todos<S: TodoService>(State(state): State<AppState<S>>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(state.service.get_todos().await?))
}

#[derive(Deserialize)]
struct UpdateBody { completed: bool }

async fn update_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>, payload: Result<Json<UpdateBody>, JsonRejection>) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&id)?;
    let Json(payload) = payload?;
    let todo = state.service.update_todo(UpdateTodo { id, completed: payload.completed }).await?;
    Ok(Json(todo))
}

async fn delete_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<Json<DeleteOutcome>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.delete_todo(DeleteTodo { id }).await?))
}

fn parse_id(s: &str) -> Result<TodoId, ApiError> {
    s.parse::<i64>().map(TodoId).map_err(|_| ApiError::validation(format!("invalid id {s:?}")))
}
