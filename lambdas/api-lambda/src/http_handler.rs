use std::sync::Arc;

use lambda_http::http::header::{HeaderValue, SET_COOKIE, VARY};
use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, RequestExt, Response,
};
use todox_core::store::TodoStore;
use todox_core::todos;
use todox_shared::{auth, AppState};

fn with_cors_headers(mut resp: Response<Body>, request_origin: Option<&str>) -> Response<Body> {
    let cors_origin = auth::get_cors_origin(request_origin);

    let headers = resp.headers_mut();
    headers.insert(
        "Access-Control-Allow-Origin",
        HeaderValue::from_str(&cors_origin)
            .unwrap_or_else(|_| HeaderValue::from_static("https://todox.app")),
    );
    headers.insert(
        "Access-Control-Allow-Credentials",
        HeaderValue::from_static("true"),
    );
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET,POST,PATCH,DELETE,OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type,Cookie"),
    );
    headers.append(VARY, HeaderValue::from_static("Origin"));

    resp
}

fn finalize_response(
    resp: Result<Response<Body>, Error>,
    request_origin: Option<&str>,
) -> Result<Response<Body>, Error> {
    resp.map(|r| with_cors_headers(r, request_origin))
}

fn not_found() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "application/json")
        .body(
            serde_json::json!({"error": "Not found"})
                .to_string()
                .into(),
        )
        .map_err(Box::new)?)
}

fn method_not_allowed() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "application/json")
        .body(
            serde_json::json!({"error": "Method not allowed"})
                .to_string()
                .into(),
        )
        .map_err(Box::new)?)
}

/// Main Lambda handler - verifies the session once per request and routes
/// to the todo endpoints
pub async fn function_handler<S: TodoStore>(
    event: Request,
    state: Arc<AppState<S>>,
) -> Result<Response<Body>, Error> {
    let method = event.method();
    let path = event.uri().path();
    let body = event.body();
    let request_origin = event.headers().get("Origin").and_then(|v| v.to_str().ok());
    tracing::info!("Todox API invoked - Method: {} Path: {}", method, path);

    // Handle CORS preflight
    if method == "OPTIONS" {
        let resp = Response::builder()
            .status(StatusCode::OK)
            .body(Body::Empty)
            .map_err(Box::new)?;
        return Ok(with_cors_headers(resp, request_origin));
    }

    // Logout clears the session cookie; no verification needed
    if path == "/logout" {
        return match method {
            &Method::POST => {
                let resp = Response::builder()
                    .status(StatusCode::OK)
                    .header("Content-Type", "application/json")
                    .header(SET_COOKIE, auth::clear_cookie())
                    .body(serde_json::json!({"message": "ok"}).to_string().into())
                    .map_err(Box::new)?;
                finalize_response(Ok(resp), request_origin)
            }
            _ => finalize_response(method_not_allowed(), request_origin),
        };
    }

    // Todo routes (cookie auth)
    if path == "/todo" || path.starts_with("/todo/") {
        let cookie_header = event.headers().get("Cookie").and_then(|v| v.to_str().ok());

        let auth_ctx = match auth::authenticate_request(cookie_header, &state.session_key) {
            Ok(ctx) => ctx,
            Err(resp) => return Ok(with_cors_headers(resp, request_origin)),
        };

        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let resp = match (method, parts.as_slice()) {
            // POST /todo - create a todo
            (&Method::POST, ["todo"]) => {
                todos::http::create_todo_handler(&state.store, &auth_ctx.user_id, body).await
            }
            // GET /todo?completed=true|false - list the caller's todos
            (&Method::GET, ["todo"]) => {
                let completed = event
                    .query_string_parameters_ref()
                    .and_then(|params| params.first("completed"))
                    .map(|value| value == "true");
                todos::http::list_todos_handler(&state.store, &auth_ctx.user_id, completed).await
            }
            // PATCH /todo/{todoID} - set the completed flag
            (&Method::PATCH, ["todo", todo_id]) => {
                todos::http::update_todo_status_handler(
                    &state.store,
                    &auth_ctx.user_id,
                    todo_id,
                    body,
                )
                .await
            }
            // DELETE /todo/{todoID} - delete a todo
            (&Method::DELETE, ["todo", todo_id]) => {
                todos::http::delete_todo_handler(&state.store, &auth_ctx.user_id, todo_id).await
            }
            _ => not_found(),
        };

        return finalize_response(resp, request_origin);
    }

    // No matching route
    tracing::warn!("No route matched - Method: {} Path: {}", method, path);
    finalize_response(not_found(), request_origin)
}
