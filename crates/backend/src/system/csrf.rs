//! Double-submit CSRF protection.
//!
//! `GET /api/csrf` sets the `csrftoken` cookie; every unsafe request must echo
//! the same value in the `X-CSRFToken` header.

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use contracts::domain::a001_memorial::edit::StatusError;
use contracts::shared::csrf::{CsrfTokenResponse, CSRF_COOKIE, CSRF_HEADER};
use rand::Rng;
use subtle::ConstantTimeEq;

const TOKEN_BYTES: usize = 32;

pub fn generate_token() -> String {
    use base64::{engine::general_purpose, Engine as _};
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..TOKEN_BYTES).map(|_| rng.gen::<u8>()).collect();
    general_purpose::URL_SAFE_NO_PAD.encode(&random_bytes)
}

/// Value of the CSRF cookie from the request's `Cookie` headers
pub fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == CSRF_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn header_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Constant-time comparison
pub fn tokens_match(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

fn is_safe(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

pub fn verify(method: &Method, headers: &HeaderMap) -> Result<(), &'static str> {
    if is_safe(method) {
        return Ok(());
    }
    let cookie = cookie_token(headers).ok_or("CSRF cookie not set")?;
    let header = header_token(headers).ok_or("CSRF token missing")?;
    if tokens_match(&cookie, &header) {
        Ok(())
    } else {
        Err("CSRF token incorrect")
    }
}

/// Middleware that rejects unsafe requests without a matching token
pub async fn require_csrf(req: Request<Body>, next: Next) -> Response {
    if let Err(reason) = verify(req.method(), req.headers()) {
        tracing::warn!(
            "CSRF verification failed for {} {}: {}",
            req.method(),
            req.uri().path(),
            reason
        );
        return (
            StatusCode::FORBIDDEN,
            Json(StatusError::new(format!("CSRF verification failed. {}.", reason))),
        )
            .into_response();
    }
    next.run(req).await
}

/// GET /api/csrf
pub async fn issue_token(headers: HeaderMap) -> Response {
    let token = cookie_token(&headers).unwrap_or_else(generate_token);
    let cookie = format!("{}={}; Path=/; SameSite=Lax", CSRF_COOKIE, token);

    let mut response = Json(CsrfTokenResponse { token }).into_response();
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
        Err(e) => tracing::error!("Cannot build CSRF cookie header: {}", e),
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cookie: Option<&str>, token: Option<&str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(cookie) = cookie {
            map.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        }
        if let Some(token) = token {
            map.insert(CSRF_HEADER, HeaderValue::from_str(token).unwrap());
        }
        map
    }

    #[test]
    fn generated_tokens_are_distinct_and_url_safe() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn cookie_is_found_among_others() {
        let map = headers(Some("sessionid=abc; csrftoken=tok123; theme=dark"), None);
        assert_eq!(cookie_token(&map).as_deref(), Some("tok123"));
    }

    #[test]
    fn safe_methods_skip_the_check() {
        assert!(verify(&Method::GET, &HeaderMap::new()).is_ok());
    }

    #[test]
    fn post_requires_matching_header() {
        let ok = headers(Some("csrftoken=tok123"), Some("tok123"));
        assert!(verify(&Method::POST, &ok).is_ok());

        let wrong = headers(Some("csrftoken=tok123"), Some("tok124"));
        assert_eq!(verify(&Method::POST, &wrong), Err("CSRF token incorrect"));

        let missing = headers(Some("csrftoken=tok123"), None);
        assert_eq!(verify(&Method::POST, &missing), Err("CSRF token missing"));

        let no_cookie = headers(None, Some("tok123"));
        assert_eq!(verify(&Method::POST, &no_cookie), Err("CSRF cookie not set"));
    }

    #[test]
    fn token_comparison_needs_identical_bytes() {
        let token = generate_token();
        assert!(tokens_match(&token, &token.clone()));
        assert!(!tokens_match(&token, &token[1..]));
        assert!(!tokens_match("abcdef", "abcdeg"));
        assert!(!tokens_match("", "a"));
        assert!(tokens_match("", ""));
    }
}
