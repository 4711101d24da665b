use std::future::Future;

use thiserror::Error;

use crate::todos::model::Todo;

mod dynamo;
mod memory;

pub use dynamo::DynamoTodoStore;
pub use memory::InMemoryTodoStore;

/// Error from the persistence backend. The message is for logs only and is
/// never sent to clients.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StoreError(pub String);

/// Persistence boundary for todos. Every operation is scoped by the owning
/// user: a `(user_id, todo_id)` predicate that matches nothing reports "no
/// match" whether the todo is missing or owned by someone else.
///
/// Conditional update/delete resolve races at the store: of a concurrent
/// update and delete on the same todo, whichever write observes the record
/// first wins and the other sees zero matches.
pub trait TodoStore: Send + Sync {
    /// Persists a new todo and returns the stored document.
    fn insert(&self, todo: Todo) -> impl Future<Output = Result<Todo, StoreError>> + Send;

    /// All todos owned by `user_id`, optionally filtered by completion
    /// state, ascending by creation time.
    fn find_owned(
        &self,
        user_id: &str,
        completed: Option<bool>,
    ) -> impl Future<Output = Result<Vec<Todo>, StoreError>> + Send;

    /// Sets the completed flag on the todo matching both `todo_id` and
    /// `user_id`. `None` when no record matches both.
    fn update_if_owned(
        &self,
        user_id: &str,
        todo_id: &str,
        completed: bool,
    ) -> impl Future<Output = Result<Option<Todo>, StoreError>> + Send;

    /// Deletes the todo matching both `todo_id` and `user_id`, returning
    /// the number of records removed (0 or 1).
    fn delete_if_owned(
        &self,
        user_id: &str,
        todo_id: &str,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;
}
