use axum::http::{HeaderMap, header::COOKIE};

use crate::utils;

pub const SESSION_COOKIE: &str = "sid";

/// Session id from the request's `sid` cookie, if any.
pub fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|header| utils::cookie_value(header, SESSION_COOKIE))
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

pub fn session_cookie(session_id: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, session_id
    )
}

pub fn expired_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}
