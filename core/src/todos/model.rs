use serde::{Deserialize, Serialize};

/// Todo domain model - one to-do item owned by a single user
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Todo {
    /// UUID assigned at creation, never reused; "todoID" on the wire
    #[serde(rename = "todoID")]
    pub todo_id: String,

    /// Owner identity from the verified session; "userID" on the wire
    #[serde(rename = "userID")]
    pub user_id: String,

    pub name: String,

    /// The only field that may change after creation
    pub completed: bool,

    /// RFC 3339 UTC instant; listings sort ascending on this.
    /// Stored as "created_at", "created" on the wire.
    #[serde(rename = "created")]
    pub created_at: String,
}

/// Body of POST /todo. Unknown fields are a 400 ("Invalid field used.").
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTodoPayload {
    pub name: String,
    pub completed: Option<bool>,
}

/// Body of PATCH /todo/{todoID}
#[derive(Debug, Deserialize)]
pub struct UpdateTodoStatusPayload {
    pub completed: bool,
}
