use std::env;
use std::sync::Arc;

use lambda_http::{run, service_fn, Error};
use todox_api_lambda::http_handler::function_handler;
use todox_core::store::DynamoTodoStore;
use todox_shared::AppState;

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_http::tracing::init_default_subscriber();

    let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let dynamo_client = aws_sdk_dynamodb::Client::new(&config);

    let table_name = env::var("TABLE_NAME").unwrap_or_else(|_| "todox".to_string());
    let session_key = env::var("SESSION_SECRET")
        .expect("SESSION_SECRET must be set")
        .into_bytes();

    let state = Arc::new(AppState {
        store: DynamoTodoStore::new(dynamo_client, table_name),
        session_key,
    });

    run(service_fn(move |event| {
        let state = state.clone();
        async move { function_handler(event, state).await }
    }))
    .await
}
