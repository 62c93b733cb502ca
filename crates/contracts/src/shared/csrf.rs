//! Names shared by the CSRF issuer (server) and the request signer (client).
//!
//! Double-submit scheme: the server sets [`CSRF_COOKIE`], the client echoes
//! it in [`CSRF_HEADER`] on every mutating request.

pub const CSRF_COOKIE: &str = "csrftoken";

pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Hidden form input rendered into server pages
pub const CSRF_FORM_FIELD: &str = "csrfmiddlewaretoken";

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CsrfTokenResponse {
    pub token: String,
}
