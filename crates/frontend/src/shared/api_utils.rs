//! API utilities for frontend-backend communication
//!
//! The backend serves this client, so every request is same-origin.

/// Get the base URL for API requests
///
/// # Returns
/// - The page origin like "http://localhost:3000"
/// - Empty string if window is not available (relative URLs are used then)
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    window.location().origin().unwrap_or_default()
}

/// Build a full API URL from a same-origin path
///
/// # Example
/// ```rust,ignore
/// let url = api_url("/api/memorials");
/// ```
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}
