//! Field serializer: form input -> request body + optimistic rendering.
//!
//! Validation that can fail here fails before anything is shown or sent.
//! The `*_canonical` functions pick the value to commit from a success
//! payload when the server is authoritative.

use contracts::domain::a001_memorial::aggregate::{validate_dates, MemorialId};
use contracts::domain::a001_memorial::banner::BannerSelection;
use contracts::domain::a001_memorial::display;
use contracts::domain::a001_memorial::edit::{
    FieldId, UpdateBannerForm, UpdateBiographyForm, UpdateDatesForm, UpdateNameForm,
    UpdateQuoteRequest,
};

use super::banner_display::BannerDisplay;
use crate::shared::optimistic_edit::{
    CsrfToken, EditError, EditRequest, RequestBody, SuccessPayload,
};

/// Typed payload for one field plus what the page shows while it is pending
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEdit<V> {
    pub field_id: FieldId,
    pub optimistic: V,
    pub body: RequestBody,
}

impl<V> FieldEdit<V> {
    pub fn request(&self, memorial: &MemorialId, csrf_token: &CsrfToken) -> EditRequest {
        EditRequest {
            endpoint: self.field_id.endpoint(memorial),
            body: self.body.clone(),
            csrf_token: csrf_token.clone(),
        }
    }
}

pub fn name(form: &UpdateNameForm) -> Result<FieldEdit<String>, EditError> {
    let form = UpdateNameForm {
        first_name: form.first_name.trim().to_string(),
        middle_name: form.middle_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
    };
    if form.first_name.is_empty() || form.last_name.is_empty() {
        return Err(EditError::Invalid(
            "First and last name are required".into(),
        ));
    }
    Ok(FieldEdit {
        field_id: FieldId::Name,
        optimistic: display::full_name(&form.first_name, &form.middle_name, &form.last_name),
        body: RequestBody::form(&form).map_err(EditError::Invalid)?,
    })
}

pub fn dates(form: &UpdateDatesForm) -> Result<FieldEdit<String>, EditError> {
    let date_of_birth = display::parse_input_date(&form.date_of_birth).map_err(EditError::Invalid)?;
    let date_of_death = display::parse_input_date(&form.date_of_death).map_err(EditError::Invalid)?;
    validate_dates(
        date_of_birth,
        Some(date_of_death),
        chrono::Utc::now().date_naive(),
    )
    .map_err(EditError::Invalid)?;

    let form = UpdateDatesForm {
        date_of_birth: form.date_of_birth.trim().to_string(),
        date_of_death: form.date_of_death.trim().to_string(),
    };
    Ok(FieldEdit {
        field_id: FieldId::Dates,
        optimistic: display::format_dates(date_of_birth, Some(date_of_death)),
        body: RequestBody::form(&form).map_err(EditError::Invalid)?,
    })
}

/// `name_display` is the name as currently shown, for the default quote
pub fn quote(form: &UpdateQuoteRequest, name_display: &str) -> Result<FieldEdit<String>, EditError> {
    let form = UpdateQuoteRequest {
        quote: form.quote.trim().to_string(),
    };
    Ok(FieldEdit {
        field_id: FieldId::Quote,
        optimistic: display::quote_or_default(&form.quote, name_display),
        body: RequestBody::json(&form).map_err(EditError::Invalid)?,
    })
}

pub fn biography(form: &UpdateBiographyForm) -> Result<FieldEdit<String>, EditError> {
    Ok(FieldEdit {
        field_id: FieldId::Biography,
        optimistic: display::biography_html(&form.biography),
        body: RequestBody::form(form).map_err(EditError::Invalid)?,
    })
}

/// Persists the relative path, renders the `/static/` URL
pub fn banner(selection: &BannerSelection) -> Result<FieldEdit<BannerDisplay>, EditError> {
    selection.validate().map_err(EditError::Invalid)?;
    let form = UpdateBannerForm {
        banner_type: selection.kind.as_str().to_string(),
        banner_value: selection.value.clone(),
    };
    Ok(FieldEdit {
        field_id: FieldId::Banner,
        optimistic: BannerDisplay::render(selection),
        body: RequestBody::form(&form).map_err(EditError::Invalid)?,
    })
}

fn non_empty_field(payload: &SuccessPayload, key: &str) -> Option<String> {
    payload
        .str_field(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

pub fn name_canonical(payload: &SuccessPayload, optimistic: String) -> String {
    non_empty_field(payload, "new_name").unwrap_or(optimistic)
}

pub fn dates_canonical(payload: &SuccessPayload, optimistic: String) -> String {
    non_empty_field(payload, "new_dates").unwrap_or(optimistic)
}

/// An empty quote from the server becomes the default memorial line
pub fn quote_canonical(payload: &SuccessPayload, optimistic: String, name_display: &str) -> String {
    match payload.str_field("quote") {
        Some(quote) => display::quote_or_default(quote, name_display),
        None => optimistic,
    }
}

pub fn biography_canonical(payload: &SuccessPayload, optimistic: String) -> String {
    payload
        .str_field("biography")
        .map(ToString::to_string)
        .unwrap_or(optimistic)
}

pub fn banner_canonical(payload: &SuccessPayload, optimistic: BannerDisplay) -> BannerDisplay {
    match (payload.str_field("banner_type"), payload.str_field("banner_value")) {
        (Some(kind), Some(value)) => BannerSelection::from_parts(kind, value)
            .map(|selection| BannerDisplay::render(&selection))
            .unwrap_or(optimistic),
        _ => optimistic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_memorial::banner::BannerKind;
    use serde_json::json;

    #[test]
    fn name_is_trimmed_and_required() {
        let edit = name(&UpdateNameForm {
            first_name: " Jane ".into(),
            middle_name: "".into(),
            last_name: "Doe".into(),
        })
        .unwrap();
        assert_eq!(edit.optimistic, "Jane Doe");
        let sent: UpdateNameForm = serde_qs::from_str(edit.body.as_str()).unwrap();
        assert_eq!(sent.first_name, "Jane");
        assert_eq!(sent.last_name, "Doe");

        let missing = name(&UpdateNameForm::default()).unwrap_err();
        assert!(matches!(missing, EditError::Invalid(_)));
    }

    #[test]
    fn dates_are_validated_before_sending() {
        let bad = dates(&UpdateDatesForm {
            date_of_birth: "1950-13-40".into(),
            date_of_death: "2020-01-01".into(),
        })
        .unwrap_err();
        assert_eq!(bad, EditError::Invalid("Invalid date format. Use YYYY-MM-DD.".into()));

        let reversed = dates(&UpdateDatesForm {
            date_of_birth: "2000-01-01".into(),
            date_of_death: "1990-01-01".into(),
        });
        assert!(reversed.is_err());

        let edit = dates(&UpdateDatesForm {
            date_of_birth: "1950-03-05".into(),
            date_of_death: "2020-12-31".into(),
        })
        .unwrap();
        assert_eq!(edit.optimistic, "March 05, 1950 - December 31, 2020");
    }

    #[test]
    fn quote_is_trimmed_json() {
        let edit = quote(&UpdateQuoteRequest { quote: "  Forever  ".into() }, "Jane Doe").unwrap();
        assert_eq!(edit.body, RequestBody::Json(r#"{"quote":"Forever"}"#.into()));
        assert_eq!(edit.optimistic, "Forever");

        let empty = quote(&UpdateQuoteRequest { quote: "   ".into() }, "Jane Doe").unwrap();
        assert_eq!(empty.optimistic, "In Loving Memory of Jane");
    }

    #[test]
    fn banner_image_persists_relative_path() {
        let edit = banner(&BannerSelection::image("/static/uploads/x.jpg")).unwrap();
        let sent: UpdateBannerForm = serde_qs::from_str(edit.body.as_str()).unwrap();
        assert_eq!(sent.banner_type, "image");
        assert_eq!(sent.banner_value, "uploads/x.jpg");
        assert_eq!(edit.optimistic.selection.value, "uploads/x.jpg");
        assert_eq!(edit.optimistic.image_url.as_deref(), Some("/static/uploads/x.jpg"));
    }

    #[test]
    fn canonical_values_prefer_server() {
        let payload = SuccessPayload(json!({"status": "success", "new_name": "Jane A. Doe"}));
        assert_eq!(name_canonical(&payload, "Jane Doe".into()), "Jane A. Doe");

        let payload = SuccessPayload(json!({"status": "success", "quote": ""}));
        assert_eq!(
            quote_canonical(&payload, "x".into(), "Jane Doe"),
            "In Loving Memory of Jane"
        );

        let payload = SuccessPayload(json!({"status": "success"}));
        assert_eq!(dates_canonical(&payload, "kept".into()), "kept");

        let payload = SuccessPayload(json!({
            "status": "success", "banner_type": "image", "banner_value": "uploads/y.jpg"
        }));
        let optimistic = BannerDisplay::render(&BannerSelection::color("#fff"));
        let committed = banner_canonical(&payload, optimistic);
        assert_eq!(committed.selection.kind, BannerKind::Image);
        assert_eq!(committed.image_url.as_deref(), Some("/static/uploads/y.jpg"));
    }
}
