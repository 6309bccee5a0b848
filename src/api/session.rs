use axum::http::{HeaderMap, HeaderValue, header};
use uuid::Uuid;

/// Cookie carrying the opaque session id. Each browser session maps to its
/// own in-memory directory copy.
pub const SESSION_COOKIE: &str = "udir_session";

/// Pulls the session id out of the request's Cookie header, tolerating
/// extra cookies and whitespace. A value that isn't a UUID is ignored.
pub fn session_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE {
            Uuid::parse_str(value.trim()).ok()
        } else {
            None
        }
    })
}

/// Set-Cookie value for a freshly created session.
pub fn session_cookie(id: Uuid) -> HeaderValue {
    let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id);
    HeaderValue::from_str(&cookie).expect("session cookie is always valid ASCII")
}
