//! Session verification for the cookie issued by the identity service.
//!
//! The cookie value is `base64url(user_id) . base64url(hmac_sha256)`; the
//! MAC is computed over the encoded payload with a key shared with the
//! identity service. This module only verifies and clears sessions -
//! issuing them is the identity service's job.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use lambda_http::http::StatusCode;
use lambda_http::{Body, Response};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "todox-session";

const ALLOWED_ORIGINS: &[&str] = &[
    "https://todox.app",
    "http://localhost:3000",
    "http://localhost:5173",
];
const DEFAULT_ORIGIN: &str = "https://todox.app";

/// Identity extracted from a verified session, threaded explicitly into
/// every todo operation.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
}

/// Signs a session token for `user_id`. Production tokens come from the
/// identity service with the same key; this mirrors its format so the
/// backend can verify them (and tests can mint them).
pub fn sign_token(user_id: &str, key: &[u8]) -> String {
    let payload = URL_SAFE_NO_PAD.encode(user_id.as_bytes());
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(payload.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    format!("{}.{}", payload, signature)
}

/// Verifies a session token and returns the user id it names.
/// Any structural or signature failure is a `None` - there is no partially
/// valid session.
pub fn verify_token(token: &str, key: &[u8]) -> Option<String> {
    let (payload, signature) = token.split_once('.')?;

    let mut mac = HmacSha256::new_from_slice(key).ok()?;
    mac.update(payload.as_bytes());
    let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;
    mac.verify_slice(&signature).ok()?;

    let user_id = URL_SAFE_NO_PAD.decode(payload).ok()?;
    String::from_utf8(user_id).ok()
}

fn cookie_value<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header.split(';').map(str::trim).find_map(|pair| {
        let (cookie_name, value) = pair.split_once('=')?;
        (cookie_name == name).then_some(value)
    })
}

/// Authenticates a request from its Cookie header. Returns the verified
/// identity, or the ready-to-send 401 response; a failed verification is
/// terminal for the request.
pub fn authenticate_request(
    cookie_header: Option<&str>,
    key: &[u8],
) -> Result<AuthContext, Response<Body>> {
    let token = cookie_header.and_then(|header| cookie_value(header, SESSION_COOKIE));

    match token.and_then(|token| verify_token(token, key)) {
        Some(user_id) if !user_id.is_empty() => Ok(AuthContext { user_id }),
        _ => Err(unauthorized()),
    }
}

fn unauthorized() -> Response<Body> {
    Response::builder()
        .status(StatusCode::UNAUTHORIZED)
        .header("Content-Type", "application/json")
        .body(
            serde_json::json!({ "error": "Invalid or missing session." })
                .to_string()
                .into(),
        )
        .expect("static response parts are valid")
}

/// Set-Cookie value that expires the session cookie (logout).
pub fn clear_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; Secure; SameSite=None; Max-Age=0",
        SESSION_COOKIE
    )
}

/// Resolves the CORS origin to echo back. Credentials mode forbids `*`, so
/// unknown origins fall back to the production origin.
pub fn get_cors_origin(request_origin: Option<&str>) -> String {
    match request_origin {
        Some(origin) if ALLOWED_ORIGINS.contains(&origin) => origin.to_string(),
        _ => DEFAULT_ORIGIN.to_string(),
    }
}
