use std::collections::HashMap;

use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client as DynamoClient;

use super::{StoreError, TodoStore};
use crate::todos::model::Todo;

/// DynamoDB-backed todo store. Single-table layout with
/// `PK = USER#{user_id}` and `SK = TODO#{todo_id}`, so every key predicate
/// is owner-scoped.
#[derive(Debug, Clone)]
pub struct DynamoTodoStore {
    client: DynamoClient,
    table_name: String,
}

impl DynamoTodoStore {
    pub fn new(client: DynamoClient, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

fn user_pk(user_id: &str) -> String {
    format!("USER#{}", user_id)
}

fn todo_sk(todo_id: &str) -> String {
    format!("TODO#{}", todo_id)
}

fn todo_from_item(user_id: &str, todo_id: &str, item: &HashMap<String, AttributeValue>) -> Todo {
    Todo {
        todo_id: todo_id.to_string(),
        user_id: user_id.to_string(),
        name: item
            .get("name")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        completed: item
            .get("completed")
            .and_then(|v| v.as_bool().ok())
            .copied()
            .unwrap_or(false),
        created_at: item
            .get("created_at")
            .and_then(|v| v.as_s().ok())
            .map(|s| s.to_string())
            .unwrap_or_default(),
    }
}

impl TodoStore for DynamoTodoStore {
    async fn insert(&self, todo: Todo) -> Result<Todo, StoreError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .item("PK", AttributeValue::S(user_pk(&todo.user_id)))
            .item("SK", AttributeValue::S(todo_sk(&todo.todo_id)))
            .item("name", AttributeValue::S(todo.name.clone()))
            .item("completed", AttributeValue::Bool(todo.completed))
            .item("created_at", AttributeValue::S(todo.created_at.clone()))
            .send()
            .await
            .map_err(|e| StoreError(format!("DynamoDB put_item error: {}", e)))?;

        Ok(todo)
    }

    async fn find_owned(
        &self,
        user_id: &str,
        completed: Option<bool>,
    ) -> Result<Vec<Todo>, StoreError> {
        let mut query = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
            .expression_attribute_values(":pk", AttributeValue::S(user_pk(user_id)))
            .expression_attribute_values(":sk_prefix", AttributeValue::S("TODO#".to_string()));

        if let Some(completed) = completed {
            query = query
                .filter_expression("#completed = :completed")
                .expression_attribute_names("#completed", "completed")
                .expression_attribute_values(":completed", AttributeValue::Bool(completed));
        }

        let result = query
            .send()
            .await
            .map_err(|e| StoreError(format!("DynamoDB query error: {}", e)))?;

        let mut todos = Vec::new();
        for item in result.items() {
            if let Some(sk) = item.get("SK").and_then(|v| v.as_s().ok()) {
                if let Some(todo_id) = sk.strip_prefix("TODO#") {
                    todos.push(todo_from_item(user_id, todo_id, item));
                }
            }
        }

        // Query returns items in SK (uuid) order; listings are oldest-first
        todos.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        Ok(todos)
    }

    async fn update_if_owned(
        &self,
        user_id: &str,
        todo_id: &str,
        completed: bool,
    ) -> Result<Option<Todo>, StoreError> {
        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(user_pk(user_id)))
            .key("SK", AttributeValue::S(todo_sk(todo_id)))
            .update_expression("SET #completed = :completed")
            .condition_expression("attribute_exists(PK) AND attribute_exists(SK)")
            .expression_attribute_names("#completed", "completed")
            .expression_attribute_values(":completed", AttributeValue::Bool(completed))
            .return_values(ReturnValue::AllNew)
            .send()
            .await;

        match result {
            Ok(output) => {
                let item = output.attributes().ok_or_else(|| {
                    StoreError("DynamoDB update_item returned no attributes".to_string())
                })?;
                Ok(Some(todo_from_item(user_id, todo_id, item)))
            }
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_conditional_check_failed_exception() {
                    // No record matched (missing, or owned by someone else)
                    Ok(None)
                } else {
                    Err(StoreError(format!(
                        "DynamoDB update_item error: {}",
                        service_error
                    )))
                }
            }
        }
    }

    async fn delete_if_owned(&self, user_id: &str, todo_id: &str) -> Result<u64, StoreError> {
        let result = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key("PK", AttributeValue::S(user_pk(user_id)))
            .key("SK", AttributeValue::S(todo_sk(todo_id)))
            .condition_expression("attribute_exists(PK) AND attribute_exists(SK)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(1),
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_conditional_check_failed_exception() {
                    Ok(0)
                } else {
                    Err(StoreError(format!(
                        "DynamoDB delete_item error: {}",
                        service_error
                    )))
                }
            }
        }
    }
}
