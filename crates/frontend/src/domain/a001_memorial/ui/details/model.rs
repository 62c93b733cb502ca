use contracts::domain::a001_memorial::aggregate::{Memorial, MemorialId};
use contracts::domain::a001_memorial::banner::BannerSelection;
use contracts::domain::a001_memorial::edit::{
    UpdateBiographyForm, UpdateDatesForm, UpdateNameForm, UpdateQuoteRequest,
};
use contracts::domain::common::AggregateId;
use gloo_net::http::Request;

use crate::domain::a001_memorial::banner_display::BannerDisplay;
use crate::domain::a001_memorial::serializer;
use crate::shared::api_utils::api_url;
use crate::shared::optimistic_edit::{
    CsrfToken, EditController, EditError, FieldSlot, SyncTransport,
};

pub async fn fetch_by_id(id: MemorialId) -> Result<Memorial, String> {
    let response = Request::get(&api_url(&format!("/api/memorials/{}", id.as_string())))
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if response.status() == 404 {
        return Err("Memorial not found".to_string());
    }
    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }

    response
        .json::<Memorial>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn edit_name<T, S>(
    controller: &EditController<T>,
    slot: &S,
    memorial: MemorialId,
    csrf_token: &CsrfToken,
    form: &UpdateNameForm,
) -> Result<String, EditError>
where
    T: SyncTransport,
    S: FieldSlot<String>,
{
    let edit = serializer::name(form)?;
    let request = edit.request(&memorial, csrf_token);
    controller
        .submit(slot, edit.optimistic, request, serializer::name_canonical)
        .await
}

pub async fn edit_dates<T, S>(
    controller: &EditController<T>,
    slot: &S,
    memorial: MemorialId,
    csrf_token: &CsrfToken,
    form: &UpdateDatesForm,
) -> Result<String, EditError>
where
    T: SyncTransport,
    S: FieldSlot<String>,
{
    let edit = serializer::dates(form)?;
    let request = edit.request(&memorial, csrf_token);
    controller
        .submit(slot, edit.optimistic, request, serializer::dates_canonical)
        .await
}

/// `name_display` is read when the edit starts; the default quote uses it
pub async fn edit_quote<T, S>(
    controller: &EditController<T>,
    slot: &S,
    memorial: MemorialId,
    csrf_token: &CsrfToken,
    form: &UpdateQuoteRequest,
    name_display: &str,
) -> Result<String, EditError>
where
    T: SyncTransport,
    S: FieldSlot<String>,
{
    let edit = serializer::quote(form, name_display)?;
    let request = edit.request(&memorial, csrf_token);
    controller
        .submit(slot, edit.optimistic, request, |payload, optimistic| {
            serializer::quote_canonical(payload, optimistic, name_display)
        })
        .await
}

pub async fn edit_biography<T, S>(
    controller: &EditController<T>,
    slot: &S,
    memorial: MemorialId,
    csrf_token: &CsrfToken,
    form: &UpdateBiographyForm,
) -> Result<String, EditError>
where
    T: SyncTransport,
    S: FieldSlot<String>,
{
    let edit = serializer::biography(form)?;
    let request = edit.request(&memorial, csrf_token);
    controller
        .submit(slot, edit.optimistic, request, serializer::biography_canonical)
        .await
}

pub async fn edit_banner<T, S>(
    controller: &EditController<T>,
    slot: &S,
    memorial: MemorialId,
    csrf_token: &CsrfToken,
    selection: &BannerSelection,
) -> Result<BannerDisplay, EditError>
where
    T: SyncTransport,
    S: FieldSlot<BannerDisplay>,
{
    let edit = serializer::banner(selection)?;
    let request = edit.request(&memorial, csrf_token);
    controller
        .submit(slot, edit.optimistic, request, serializer::banner_canonical)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_memorial::banner_display::{BANNER_IMAGE_CLASS, TRANSPARENT};
    use crate::shared::optimistic_edit::controller::tests::{ok, ScriptedTransport};
    use crate::shared::optimistic_edit::{
        EditableField, RawResponse, SyncFailure, GENERIC_FAILURE_MESSAGE,
    };
    use contracts::domain::a001_memorial::edit::FieldId;
    use std::cell::RefCell;
    use uuid::Uuid;

    fn memorial_id() -> MemorialId {
        MemorialId::new(Uuid::nil())
    }

    fn token() -> CsrfToken {
        CsrfToken::new("csrf-secret").unwrap()
    }

    fn text_field(field_id: FieldId, value: &str) -> RefCell<EditableField<String>> {
        RefCell::new(EditableField::new(field_id, value.to_string()))
    }

    #[tokio::test]
    async fn name_update_success_shows_server_name() {
        let controller = EditController::new(ScriptedTransport::replying(vec![ok(
            r#"{"status":"success","new_name":"Jane Ann Doe"}"#,
        )]));
        let slot = text_field(FieldId::Name, "Jane Doe");
        let form = UpdateNameForm {
            first_name: "Jane".into(),
            middle_name: "Ann".into(),
            last_name: "Doe".into(),
        };

        let committed = edit_name(&controller, &slot, memorial_id(), &token(), &form)
            .await
            .unwrap();

        assert_eq!(committed, "Jane Ann Doe");
        assert_eq!(slot.borrow().display(), "Jane Ann Doe");

        let sent = controller_sent(&controller);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].endpoint, FieldId::Name.endpoint(&memorial_id()));
        assert_eq!(sent[0].csrf_token.as_str(), "csrf-secret");
    }

    #[tokio::test]
    async fn dates_update_http_error_keeps_previous_dates() {
        let controller = EditController::new(ScriptedTransport::replying(vec![Ok(RawResponse {
            status: 400,
            body: r#"{"status":"error","message":"Date of death cannot be before date of birth."}"#
                .into(),
        })]));
        let slot = text_field(FieldId::Dates, "March 05, 1950 - December 31, 2020");
        let form = UpdateDatesForm {
            date_of_birth: "1951-01-01".into(),
            date_of_death: "2021-01-01".into(),
        };

        let err = edit_dates(&controller, &slot, memorial_id(), &token(), &form)
            .await
            .unwrap_err();

        assert_eq!(slot.borrow().display(), "March 05, 1950 - December 31, 2020");
        assert!(err
            .user_message()
            .contains("Date of death cannot be before date of birth."));
    }

    #[tokio::test]
    async fn empty_quote_from_server_uses_default_line() {
        let controller = EditController::new(ScriptedTransport::replying(vec![ok(
            r#"{"status":"success","quote":"","message":"Quote updated successfully"}"#,
        )]));
        let slot = text_field(FieldId::Quote, "Gone but not forgotten");
        let form = UpdateQuoteRequest { quote: "   ".into() };

        let committed = edit_quote(&controller, &slot, memorial_id(), &token(), &form, "Jane Doe")
            .await
            .unwrap();

        assert_eq!(committed, "In Loving Memory of Jane");
        assert_eq!(slot.borrow().committed(), "In Loving Memory of Jane");
    }

    #[tokio::test]
    async fn banner_color_to_image_switches_mode() {
        let controller = EditController::new(ScriptedTransport::replying(vec![ok(
            r#"{"status":"success","banner_type":"image","banner_value":"uploads/x.jpg"}"#,
        )]));
        let before = BannerDisplay::render(&BannerSelection::color("#f7e8c9"));
        let slot = RefCell::new(EditableField::new(FieldId::Banner, before));

        let committed = edit_banner(
            &controller,
            &slot,
            memorial_id(),
            &token(),
            &BannerSelection::image("uploads/x.jpg"),
        )
        .await
        .unwrap();

        assert_eq!(committed.class(), BANNER_IMAGE_CLASS);
        assert_eq!(committed.background_color, TRANSPARENT);
        assert_eq!(committed.image_url.as_deref(), Some("/static/uploads/x.jpg"));
        assert_eq!(committed.selection.value, "uploads/x.jpg");
    }

    #[tokio::test]
    async fn banner_failure_restores_full_style() {
        let controller = EditController::new(ScriptedTransport::replying(vec![Err(
            SyncFailure::Network("timeout".into()),
        )]));
        let before = BannerDisplay::render(&BannerSelection::image("banners/sky.jpg"));
        let slot = RefCell::new(EditableField::new(FieldId::Banner, before.clone()));

        let err = edit_banner(
            &controller,
            &slot,
            memorial_id(),
            &token(),
            &BannerSelection::color("#000000"),
        )
        .await
        .unwrap_err();

        assert_eq!(*slot.borrow().display(), before);
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn invalid_input_is_not_sent() {
        let controller = EditController::new(ScriptedTransport::default());
        let slot = text_field(FieldId::Dates, "March 05, 1950");
        let form = UpdateDatesForm {
            date_of_birth: "yesterday".into(),
            date_of_death: "".into(),
        };

        let err = edit_dates(&controller, &slot, memorial_id(), &token(), &form)
            .await
            .unwrap_err();

        assert!(matches!(err, EditError::Invalid(_)));
        assert!(controller_sent(&controller).is_empty());
        assert!(!slot.borrow().is_pending());
    }

    #[tokio::test]
    async fn biography_commits_server_fragment() {
        let controller = EditController::new(ScriptedTransport::replying(vec![ok(
            r#"{"success":true,"biography":"Line one<br>Line two"}"#,
        )]));
        let slot = text_field(FieldId::Biography, "");
        let form = UpdateBiographyForm {
            biography: "Line one\nLine two".into(),
        };

        let committed = edit_biography(&controller, &slot, memorial_id(), &token(), &form)
            .await
            .unwrap();

        assert_eq!(committed, "Line one<br>Line two");
    }

    fn controller_sent(
        controller: &EditController<ScriptedTransport>,
    ) -> Vec<crate::shared::optimistic_edit::EditRequest> {
        controller.transport().sent.borrow().clone()
    }
}
