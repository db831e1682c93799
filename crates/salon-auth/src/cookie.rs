//! Session and role cookies
//!
//! `access_token` carries the signed session token and is the only
//! authoritative credential. `user_role` mirrors the role claim for the UI
//! and is cleared whenever the session is missing or invalid.

use axum::http::{
    HeaderMap, HeaderValue,
    header::{COOKIE, SET_COOKIE},
};
use salon_db::UserRole;
use tracing::warn;

/// Cookie holding the session token
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
/// Client-readable mirror of the role claim
pub const USER_ROLE_COOKIE: &str = "user_role";

const SHARED_ATTRIBUTES: &str = "Secure; SameSite=Lax; Path=/";

/// Read a cookie from the request headers. An empty value counts as absent.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

fn session_cookie(token: &str, max_age: i64) -> String {
    format!("{ACCESS_TOKEN_COOKIE}={token}; HttpOnly; {SHARED_ATTRIBUTES}; Max-Age={max_age}")
}

fn role_cookie(role: &str, max_age: i64) -> String {
    format!("{USER_ROLE_COOKIE}={role}; {SHARED_ATTRIBUTES}; Max-Age={max_age}")
}

fn append_set_cookie(headers: &mut HeaderMap, cookie: String) {
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            headers.append(SET_COOKIE, value);
        }
        Err(e) => warn!("Dropping unencodable Set-Cookie header: {}", e),
    }
}

/// Set both cookies after a successful login. They share one lifetime.
pub fn set_session_cookies(headers: &mut HeaderMap, token: &str, role: UserRole, max_age: i64) {
    append_set_cookie(headers, session_cookie(token, max_age));
    append_set_cookie(headers, role_cookie(role.as_str(), max_age));
}

/// Set the role mirror alone, used when reconciling it with a verified token
pub fn set_role_cookie(headers: &mut HeaderMap, role: UserRole, max_age: i64) {
    append_set_cookie(headers, role_cookie(role.as_str(), max_age));
}

/// Expire both cookies in the same response
pub fn clear_session_cookies(headers: &mut HeaderMap) {
    append_set_cookie(headers, session_cookie("", 0));
    append_set_cookie(headers, role_cookie("", 0));
}

/// Expire the role mirror when no session cookie was sent
pub fn clear_role_cookie(headers: &mut HeaderMap) {
    append_set_cookie(headers, role_cookie("", 0));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_cookies(headers: &HeaderMap) -> Vec<String> {
        headers
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_read_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; access_token=abc.def.ghi; user_role=admin"),
        );

        assert_eq!(read_cookie(&headers, ACCESS_TOKEN_COOKIE), Some("abc.def.ghi"));
        assert_eq!(read_cookie(&headers, USER_ROLE_COOKIE), Some("admin"));
        assert_eq!(read_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_read_cookie_empty_value_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("access_token=; user_role=customer"));

        assert_eq!(read_cookie(&headers, ACCESS_TOKEN_COOKIE), None);
        assert_eq!(read_cookie(&headers, USER_ROLE_COOKIE), Some("customer"));
    }

    #[test]
    fn test_read_cookie_across_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1"));
        headers.append(COOKIE, HeaderValue::from_static("access_token=tok"));

        assert_eq!(read_cookie(&headers, ACCESS_TOKEN_COOKIE), Some("tok"));
    }

    #[test]
    fn test_set_session_cookies_attributes() {
        let mut headers = HeaderMap::new();
        set_session_cookies(&mut headers, "tok", UserRole::Customer, 2_628_000);

        assert_eq!(
            set_cookies(&headers),
            vec![
                "access_token=tok; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=2628000",
                "user_role=customer; Secure; SameSite=Lax; Path=/; Max-Age=2628000",
            ]
        );
    }

    #[test]
    fn test_clear_session_cookies_expires_both() {
        let mut headers = HeaderMap::new();
        clear_session_cookies(&mut headers);

        assert_eq!(
            set_cookies(&headers),
            vec![
                "access_token=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0",
                "user_role=; Secure; SameSite=Lax; Path=/; Max-Age=0",
            ]
        );
    }

    #[test]
    fn test_clear_role_cookie_leaves_session_alone() {
        let mut headers = HeaderMap::new();
        clear_role_cookie(&mut headers);

        let cookies = set_cookies(&headers);
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].starts_with("user_role=;"));
    }
}
