use lambda_http::{http::StatusCode, Body, Error, Response};
use serde_json::json;

use super::model::{CreateTodoPayload, UpdateTodoStatusPayload};
use super::service::{self, TodoError};
use crate::store::TodoStore;

fn json_error(status: StatusCode, message: &str) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(json!({ "error": message }).to_string().into())
        .map_err(Box::new)?)
}

/// HTTP handler: POST /todo
pub async fn create_todo_handler(
    store: &impl TodoStore,
    user_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: CreateTodoPayload = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(_) => return json_error(StatusCode::BAD_REQUEST, "Invalid field used."),
    };

    match service::create_todo(store, user_id, payload).await {
        Ok(todo) => Ok(Response::builder()
            .status(StatusCode::CREATED)
            .header("Content-Type", "application/json")
            .body(serde_json::to_string(&todo)?.into())
            .map_err(Box::new)?),
        Err(TodoError::Validation(message)) => json_error(StatusCode::BAD_REQUEST, &message),
        Err(err) => {
            tracing::error!("Failed to create todo: {}", err);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Todo creation failed.")
        }
    }
}

/// HTTP handler: GET /todo?completed=true|false
pub async fn list_todos_handler(
    store: &impl TodoStore,
    user_id: &str,
    completed: Option<bool>,
) -> Result<Response<Body>, Error> {
    match service::list_todos(store, user_id, completed).await {
        Ok(todos) => Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "application/json")
            .body(serde_json::to_string(&todos)?.into())
            .map_err(Box::new)?),
        Err(err) => {
            tracing::error!("Failed to fetch todos: {}", err);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch todos.")
        }
    }
}

/// HTTP handler: PATCH /todo/{todoID}
pub async fn update_todo_status_handler(
    store: &impl TodoStore,
    user_id: &str,
    todo_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: UpdateTodoStatusPayload = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(_) => {
            return json_error(
                StatusCode::BAD_REQUEST,
                "Expected a boolean \"completed\" field.",
            )
        }
    };

    match service::set_todo_status(store, user_id, todo_id, payload.completed).await {
        Ok(todo) => Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "application/json")
            .body(serde_json::to_string(&todo)?.into())
            .map_err(Box::new)?),
        Err(TodoError::NotFoundOrForbidden) => json_error(
            StatusCode::NOT_FOUND,
            "Todo not found or unauthorized access.",
        ),
        Err(err) => {
            tracing::error!("Failed to update todo status: {}", err);
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update todo status.",
            )
        }
    }
}

/// HTTP handler: DELETE /todo/{todoID}
pub async fn delete_todo_handler(
    store: &impl TodoStore,
    user_id: &str,
    todo_id: &str,
) -> Result<Response<Body>, Error> {
    match service::delete_todo(store, user_id, todo_id).await {
        Ok(()) => Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "application/json")
            .body(
                json!({ "message": "Todo deleted successfully." })
                    .to_string()
                    .into(),
            )
            .map_err(Box::new)?),
        Err(TodoError::NotFoundOrForbidden) => json_error(
            StatusCode::NOT_FOUND,
            "Todo not found or not authorized to delete.",
        ),
        Err(err) => {
            tracing::error!("Failed to delete todo: {}", err);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete todo.")
        }
    }
}
