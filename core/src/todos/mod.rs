pub mod http;
pub mod model;
pub mod service;

pub use model::{CreateTodoPayload, Todo, UpdateTodoStatusPayload};
pub use service::*;
