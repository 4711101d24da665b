use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use super::model::{CreateTodoPayload, Todo};
use crate::store::{StoreError, TodoStore};

/// Errors surfaced by todo operations.
#[derive(Debug, Error)]
pub enum TodoError {
    /// Request payload failed validation; the message names the violation.
    #[error("{0}")]
    Validation(String),

    /// No todo matched both the id and the calling user. Missing and
    /// not-owned are indistinguishable on purpose, so one user cannot probe
    /// for the existence of another user's todos.
    #[error("todo not found for this user")]
    NotFoundOrForbidden,

    /// The persistence layer failed. Details go to logs, not to clients.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Create a todo owned by `user_id`. The id and creation instant are
/// assigned here, never by the client; `completed` defaults to false.
pub async fn create_todo(
    store: &impl TodoStore,
    user_id: &str,
    payload: CreateTodoPayload,
) -> Result<Todo, TodoError> {
    if payload.name.trim().is_empty() {
        return Err(TodoError::Validation(
            "name must be a non-empty string".to_string(),
        ));
    }

    let todo = Todo {
        todo_id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        name: payload.name,
        completed: payload.completed.unwrap_or(false),
        created_at: Utc::now().to_rfc3339(),
    };

    Ok(store.insert(todo).await?)
}

/// All todos owned by `user_id`, oldest first, optionally filtered by
/// completion state. An empty list is a normal result, not an error.
pub async fn list_todos(
    store: &impl TodoStore,
    user_id: &str,
    completed: Option<bool>,
) -> Result<Vec<Todo>, TodoError> {
    Ok(store.find_owned(user_id, completed).await?)
}

/// Set the completed flag on one of `user_id`'s todos. Idempotent:
/// repeating with the same value succeeds with the same resulting state.
pub async fn set_todo_status(
    store: &impl TodoStore,
    user_id: &str,
    todo_id: &str,
    completed: bool,
) -> Result<Todo, TodoError> {
    store
        .update_if_owned(user_id, todo_id, completed)
        .await?
        .ok_or(TodoError::NotFoundOrForbidden)
}

/// Delete one of `user_id`'s todos. A repeat delete reports
/// `NotFoundOrForbidden`, which callers treat as a normal outcome.
pub async fn delete_todo(
    store: &impl TodoStore,
    user_id: &str,
    todo_id: &str,
) -> Result<(), TodoError> {
    match store.delete_if_owned(user_id, todo_id).await? {
        0 => Err(TodoError::NotFoundOrForbidden),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryTodoStore;

    fn payload(name: &str) -> CreateTodoPayload {
        CreateTodoPayload {
            name: name.to_string(),
            completed: None,
        }
    }

    #[tokio::test]
    async fn create_defaults_completed_to_false_and_assigns_id() {
        let store = InMemoryTodoStore::new();

        let todo = create_todo(&store, "alice", payload("Buy milk"))
            .await
            .unwrap();

        assert_eq!(todo.user_id, "alice");
        assert_eq!(todo.name, "Buy milk");
        assert!(!todo.completed);
        assert!(!todo.todo_id.is_empty());
        assert!(!todo.created_at.is_empty());

        let other = create_todo(&store, "alice", payload("Buy bread"))
            .await
            .unwrap();
        assert_ne!(todo.todo_id, other.todo_id);
    }

    #[tokio::test]
    async fn create_rejects_empty_or_blank_name() {
        let store = InMemoryTodoStore::new();

        let err = create_todo(&store, "alice", payload("")).await.unwrap_err();
        assert!(matches!(err, TodoError::Validation(_)));

        let err = create_todo(&store, "alice", payload("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, TodoError::Validation(_)));

        assert!(list_todos(&store, "alice", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_honors_explicit_completed_flag() {
        let store = InMemoryTodoStore::new();

        let todo = create_todo(
            &store,
            "alice",
            CreateTodoPayload {
                name: "Already done".to_string(),
                completed: Some(true),
            },
        )
        .await
        .unwrap();

        assert!(todo.completed);
    }

    #[tokio::test]
    async fn owners_cannot_touch_each_others_todos() {
        let store = InMemoryTodoStore::new();
        let todo = create_todo(&store, "alice", payload("secret"))
            .await
            .unwrap();

        let err = set_todo_status(&store, "bob", &todo.todo_id, true)
            .await
            .unwrap_err();
        assert!(matches!(err, TodoError::NotFoundOrForbidden));

        let err = delete_todo(&store, "bob", &todo.todo_id)
            .await
            .unwrap_err();
        assert!(matches!(err, TodoError::NotFoundOrForbidden));

        assert!(list_todos(&store, "bob", None).await.unwrap().is_empty());

        // Alice still sees the todo untouched
        let mine = list_todos(&store, "alice", None).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert!(!mine[0].completed);
    }

    #[tokio::test]
    async fn set_status_is_idempotent() {
        let store = InMemoryTodoStore::new();
        let todo = create_todo(&store, "alice", payload("laundry"))
            .await
            .unwrap();

        let first = set_todo_status(&store, "alice", &todo.todo_id, true)
            .await
            .unwrap();
        assert!(first.completed);

        let second = set_todo_status(&store, "alice", &todo.todo_id, true)
            .await
            .unwrap();
        assert!(second.completed);

        let back = set_todo_status(&store, "alice", &todo.todo_id, false)
            .await
            .unwrap();
        assert!(!back.completed);
    }

    #[tokio::test]
    async fn listing_returns_creation_order() {
        let store = InMemoryTodoStore::new();
        let first = create_todo(&store, "alice", payload("first"))
            .await
            .unwrap();
        let second = create_todo(&store, "alice", payload("second"))
            .await
            .unwrap();
        let third = create_todo(&store, "alice", payload("third"))
            .await
            .unwrap();

        let todos = list_todos(&store, "alice", None).await.unwrap();
        let ids: Vec<&str> = todos.iter().map(|t| t.todo_id.as_str()).collect();
        assert_eq!(
            ids,
            [
                first.todo_id.as_str(),
                second.todo_id.as_str(),
                third.todo_id.as_str()
            ]
        );
    }

    #[tokio::test]
    async fn completed_filter_partitions_the_list() {
        let store = InMemoryTodoStore::new();
        let done = create_todo(
            &store,
            "alice",
            CreateTodoPayload {
                name: "done".to_string(),
                completed: Some(true),
            },
        )
        .await
        .unwrap();
        let open_a = create_todo(&store, "alice", payload("open a"))
            .await
            .unwrap();
        let open_b = create_todo(&store, "alice", payload("open b"))
            .await
            .unwrap();

        let completed = list_todos(&store, "alice", Some(true)).await.unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].todo_id, done.todo_id);

        let open = list_todos(&store, "alice", Some(false)).await.unwrap();
        let ids: Vec<&str> = open.iter().map(|t| t.todo_id.as_str()).collect();
        assert_eq!(ids, [open_a.todo_id.as_str(), open_b.todo_id.as_str()]);
    }

    #[tokio::test]
    async fn second_delete_reports_not_found() {
        let store = InMemoryTodoStore::new();
        let todo = create_todo(&store, "alice", payload("once"))
            .await
            .unwrap();

        delete_todo(&store, "alice", &todo.todo_id).await.unwrap();

        let err = delete_todo(&store, "alice", &todo.todo_id)
            .await
            .unwrap_err();
        assert!(matches!(err, TodoError::NotFoundOrForbidden));
    }
}
