//! CSRF token lookup for mutating requests.
//!
//! Order: `csrftoken` cookie, hidden `csrfmiddlewaretoken` input rendered
//! into the page, then `GET /api/csrf` (which also sets the cookie).

use contracts::shared::csrf::{CsrfTokenResponse, CSRF_COOKIE, CSRF_FORM_FIELD};
use gloo_net::http::Request;
use wasm_bindgen::JsCast;

use crate::shared::api_utils::api_url;
use crate::shared::optimistic_edit::CsrfToken;

/// Value of `name` in a `document.cookie` string
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
}

/// Token already present in the page, without a network call
pub fn read_page_token() -> Option<CsrfToken> {
    let document = web_sys::window()?.document()?;

    let from_cookie = document
        .clone()
        .dyn_into::<web_sys::HtmlDocument>()
        .ok()
        .and_then(|html| html.cookie().ok())
        .and_then(|cookies| cookie_value(&cookies, CSRF_COOKIE))
        .and_then(CsrfToken::new);
    if from_cookie.is_some() {
        return from_cookie;
    }

    document
        .query_selector(&format!("input[name={}]", CSRF_FORM_FIELD))
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok())
        .and_then(|input| CsrfToken::new(input.value()))
}

pub async fn resolve_token() -> Result<CsrfToken, String> {
    if let Some(token) = read_page_token() {
        return Ok(token);
    }

    let response = Request::get(&api_url("/api/csrf"))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    if !response.ok() {
        return Err(format!("CSRF token request failed: {}", response.status()));
    }
    let data = response
        .json::<CsrfTokenResponse>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))?;
    CsrfToken::new(data.token).ok_or_else(|| "Server returned an empty CSRF token".to_string())
}
