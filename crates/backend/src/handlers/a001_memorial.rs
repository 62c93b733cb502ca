use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use contracts::domain::a001_memorial::aggregate::{Memorial, MemorialDto};
use contracts::domain::a001_memorial::edit::{
    BannerUpdated, BiographyUpdated, DatesUpdated, NameUpdated, QuoteUpdated, StatusError,
    UpdateBannerForm, UpdateBiographyForm, UpdateDatesForm, UpdateNameForm, UpdateQuoteRequest,
};
use serde_json::json;
use uuid::Uuid;

use crate::domain::a001_memorial::service::{self, MemorialError};

const STORAGE_FAILURE: &str = "Could not save the memorial. Please try again.";

fn parse_id(id: &str) -> Result<Uuid, MemorialError> {
    Uuid::parse_str(id).map_err(|_| MemorialError::NotFound)
}

fn status_of(e: &MemorialError) -> StatusCode {
    match e {
        MemorialError::NotFound => StatusCode::NOT_FOUND,
        MemorialError::Validation(_) => StatusCode::BAD_REQUEST,
        MemorialError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Text safe to show to the user
fn public_message(e: &MemorialError) -> String {
    match e {
        MemorialError::Storage(_) => STORAGE_FAILURE.to_string(),
        other => other.to_string(),
    }
}

fn log_failure(action: &str, id: &str, e: &MemorialError) {
    match e {
        MemorialError::Storage(err) => tracing::error!("{} {} failed: {:#}", action, id, err),
        other => tracing::warn!("{} {} rejected: {}", action, id, other),
    }
}

/// `{status: "error", message}` with the matching status code
fn status_error(action: &str, id: &str, e: MemorialError) -> Response {
    log_failure(action, id, &e);
    (status_of(&e), Json(StatusError::new(public_message(&e)))).into_response()
}

/// GET /api/memorials
pub async fn list_all() -> Result<Json<Vec<Memorial>>, StatusCode> {
    match service::list_all().await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            log_failure("list", "-", &e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/memorials/:id
pub async fn get_by_id(Path(id): Path<String>) -> Response {
    let result = match parse_id(&id) {
        Ok(uuid) => service::get_by_id(uuid).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(memorial) => Json(memorial).into_response(),
        Err(e) => status_error("get", &id, e),
    }
}

/// POST /api/memorials
pub async fn create(Json(dto): Json<MemorialDto>) -> Response {
    match service::create(dto).await {
        Ok(id) => Json(json!({"id": id.to_string()})).into_response(),
        Err(e) => status_error("create", "-", e),
    }
}

/// POST /api/memorials/testdata
pub async fn insert_test_data() -> StatusCode {
    match service::insert_test_data().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            log_failure("testdata", "-", &e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// POST /memorials/:id/update-name/
pub async fn update_name(Path(id): Path<String>, Form(form): Form<UpdateNameForm>) -> Response {
    let result = match parse_id(&id) {
        Ok(uuid) => service::update_name(uuid, &form).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(new_name) => Json(NameUpdated::new(new_name)).into_response(),
        Err(e) => status_error("update-name", &id, e),
    }
}

/// POST /memorials/:id/update-dates/
pub async fn update_dates(Path(id): Path<String>, Form(form): Form<UpdateDatesForm>) -> Response {
    let result = match parse_id(&id) {
        Ok(uuid) => service::update_dates(uuid, &form).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(new_dates) => Json(DatesUpdated::new(new_dates)).into_response(),
        Err(e) => status_error("update-dates", &id, e),
    }
}

/// Quote arrives as JSON from the page; plain form posts are accepted too
pub fn decode_quote(headers: &HeaderMap, body: &[u8]) -> Result<UpdateQuoteRequest, MemorialError> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if is_json {
        serde_json::from_slice(body)
            .map_err(|e| MemorialError::Validation(format!("Invalid JSON: {}", e)))
    } else {
        serde_qs::from_bytes(body)
            .map_err(|e| MemorialError::Validation(format!("Invalid form data: {}", e)))
    }
}

/// POST /memorials/:id/update-quote/
pub async fn update_quote(Path(id): Path<String>, headers: HeaderMap, body: Bytes) -> Response {
    let result = match (parse_id(&id), decode_quote(&headers, &body)) {
        (Ok(uuid), Ok(request)) => service::update_quote(uuid, &request).await,
        (Err(e), _) | (_, Err(e)) => Err(e),
    };
    match result {
        Ok(quote) => Json(QuoteUpdated::new(quote)).into_response(),
        Err(e) => status_error("update-quote", &id, e),
    }
}

/// POST /memorials/:id/update-banner/
pub async fn update_banner(
    Path(id): Path<String>,
    Form(form): Form<UpdateBannerForm>,
) -> Response {
    let result = match parse_id(&id) {
        Ok(uuid) => service::update_banner(uuid, &form).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(selection) => Json(BannerUpdated::new(
            selection.kind.as_str().to_string(),
            selection.value,
        ))
        .into_response(),
        Err(e) => status_error("update-banner", &id, e),
    }
}

/// POST /memorials/:id/update-biography/
///
/// Answers in the `{success, biography | error}` dialect
pub async fn update_biography(
    Path(id): Path<String>,
    Form(form): Form<UpdateBiographyForm>,
) -> Response {
    let result = match parse_id(&id) {
        Ok(uuid) => service::update_biography(uuid, &form).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(html) => Json(BiographyUpdated::ok(html)).into_response(),
        Err(e) => {
            log_failure("update-biography", &id, &e);
            (
                status_of(&e),
                Json(BiographyUpdated::failed(public_message(&e))),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn errors_map_to_status_codes() {
        assert_eq!(status_of(&MemorialError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(&MemorialError::Validation("x".into())),
            StatusCode::BAD_REQUEST
        );
        let storage = MemorialError::Storage(anyhow::anyhow!("disk I/O error"));
        assert_eq!(status_of(&storage), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(public_message(&storage), STORAGE_FAILURE);
    }

    #[test]
    fn malformed_id_is_not_found() {
        assert!(matches!(parse_id("abc"), Err(MemorialError::NotFound)));
    }

    #[test]
    fn quote_decodes_json_and_form() {
        let mut json_headers = HeaderMap::new();
        json_headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let request = decode_quote(&json_headers, br#"{"quote":" Rest easy "}"#).unwrap();
        assert_eq!(request.quote, " Rest easy ");

        let mut form_headers = HeaderMap::new();
        form_headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        let request = decode_quote(&form_headers, b"quote=Rest%20easy").unwrap();
        assert_eq!(request.quote, "Rest easy");
    }
}
