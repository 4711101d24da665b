pub mod auth;

use todox_core::store::TodoStore;

/// Long-lived state built once at boot and shared by every invocation.
/// Generic over the store so tests can run against the in-memory fake.
pub struct AppState<S: TodoStore> {
    pub store: S,
    /// HMAC key for session cookies, shared with the identity service.
    pub session_key: Vec<u8>,
}
