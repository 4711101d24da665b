use std::sync::Arc;

use tokio::sync::RwLock;

use super::{StoreError, TodoStore};
use crate::todos::model::Todo;

/// In-memory todo store for tests and local development. Same contract as
/// the DynamoDB store; records are kept in insertion order behind an async
/// lock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTodoStore {
    todos: Arc<RwLock<Vec<Todo>>>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TodoStore for InMemoryTodoStore {
    async fn insert(&self, todo: Todo) -> Result<Todo, StoreError> {
        let mut todos = self.todos.write().await;
        todos.push(todo.clone());
        Ok(todo)
    }

    async fn find_owned(
        &self,
        user_id: &str,
        completed: Option<bool>,
    ) -> Result<Vec<Todo>, StoreError> {
        let todos = self.todos.read().await;
        let mut owned: Vec<Todo> = todos
            .iter()
            .filter(|t| t.user_id == user_id)
            .filter(|t| completed.map_or(true, |c| t.completed == c))
            .cloned()
            .collect();
        // Stable sort: creation-time ties keep insertion order
        owned.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(owned)
    }

    async fn update_if_owned(
        &self,
        user_id: &str,
        todo_id: &str,
        completed: bool,
    ) -> Result<Option<Todo>, StoreError> {
        let mut todos = self.todos.write().await;
        match todos
            .iter_mut()
            .find(|t| t.todo_id == todo_id && t.user_id == user_id)
        {
            Some(todo) => {
                todo.completed = completed;
                Ok(Some(todo.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_if_owned(&self, user_id: &str, todo_id: &str) -> Result<u64, StoreError> {
        let mut todos = self.todos.write().await;
        let before = todos.len();
        todos.retain(|t| !(t.todo_id == todo_id && t.user_id == user_id));
        Ok((before - todos.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(user_id: &str, todo_id: &str, completed: bool, created_at: &str) -> Todo {
        Todo {
            todo_id: todo_id.to_string(),
            user_id: user_id.to_string(),
            name: format!("todo {}", todo_id),
            completed,
            created_at: created_at.to_string(),
        }
    }

    #[tokio::test]
    async fn update_requires_matching_owner_and_id() {
        let store = InMemoryTodoStore::new();
        store
            .insert(todo("alice", "t1", false, "2026-01-01T00:00:00+00:00"))
            .await
            .unwrap();

        assert!(store
            .update_if_owned("bob", "t1", true)
            .await
            .unwrap()
            .is_none());
        assert!(store
            .update_if_owned("alice", "missing", true)
            .await
            .unwrap()
            .is_none());

        let updated = store
            .update_if_owned("alice", "t1", true)
            .await
            .unwrap()
            .unwrap();
        assert!(updated.completed);
    }

    #[tokio::test]
    async fn delete_counts_only_matching_records() {
        let store = InMemoryTodoStore::new();
        store
            .insert(todo("alice", "t1", false, "2026-01-01T00:00:00+00:00"))
            .await
            .unwrap();

        assert_eq!(store.delete_if_owned("bob", "t1").await.unwrap(), 0);
        assert_eq!(store.delete_if_owned("alice", "t1").await.unwrap(), 1);
        assert_eq!(store.delete_if_owned("alice", "t1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn find_owned_sorts_and_filters() {
        let store = InMemoryTodoStore::new();
        store
            .insert(todo("alice", "t2", true, "2026-01-02T00:00:00+00:00"))
            .await
            .unwrap();
        store
            .insert(todo("alice", "t1", false, "2026-01-01T00:00:00+00:00"))
            .await
            .unwrap();
        store
            .insert(todo("bob", "t3", false, "2026-01-01T12:00:00+00:00"))
            .await
            .unwrap();

        let all = store.find_owned("alice", None).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|t| t.todo_id.as_str()).collect();
        assert_eq!(ids, ["t1", "t2"]);

        let open = store.find_owned("alice", Some(false)).await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].todo_id, "t1");
    }
}
