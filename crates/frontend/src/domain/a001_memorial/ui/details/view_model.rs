use std::future::Future;

use chrono::NaiveDate;
use contracts::domain::a001_memorial::aggregate::{Memorial, MemorialId};
use contracts::domain::a001_memorial::banner::{BannerSelection, DEFAULT_BANNER_COLOR};
use contracts::domain::a001_memorial::display::DATE_INPUT_FORMAT;
use contracts::domain::a001_memorial::edit::{
    FieldId, UpdateBiographyForm, UpdateDatesForm, UpdateNameForm, UpdateQuoteRequest,
};
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use super::model;
use crate::domain::a001_memorial::banner_display::BannerDisplay;
use crate::shared::csrf;
use crate::shared::modal::ModalState;
use crate::shared::notify;
use crate::shared::optimistic_edit::{
    BrowserTransport, CsrfToken, EditController, EditError, EditableField,
};

/// ViewModel for the memorial page: one editable field per inline editor
#[derive(Clone, Copy)]
pub struct MemorialDetailsViewModel {
    pub memorial_id: MemorialId,
    /// Last loaded record, used to prefill edit forms
    pub memorial: RwSignal<Option<Memorial>>,
    pub error: RwSignal<Option<String>>,

    pub banner: RwSignal<EditableField<BannerDisplay>>,
    pub name: RwSignal<EditableField<String>>,
    pub dates: RwSignal<EditableField<String>>,
    pub quote: RwSignal<EditableField<String>>,
    pub biography: RwSignal<EditableField<String>>,

    pub banner_modal: RwSignal<ModalState>,
    pub name_modal: RwSignal<ModalState>,
    pub dates_modal: RwSignal<ModalState>,
    pub quote_modal: RwSignal<ModalState>,

    controller: StoredValue<EditController<BrowserTransport>>,
}

impl MemorialDetailsViewModel {
    pub fn new(memorial_id: MemorialId) -> Self {
        let default_banner = BannerDisplay::render(&BannerSelection::color(DEFAULT_BANNER_COLOR));
        Self {
            memorial_id,
            memorial: RwSignal::new(None),
            error: RwSignal::new(None),
            banner: RwSignal::new(EditableField::new(FieldId::Banner, default_banner)),
            name: RwSignal::new(EditableField::new(FieldId::Name, String::new())),
            dates: RwSignal::new(EditableField::new(FieldId::Dates, String::new())),
            quote: RwSignal::new(EditableField::new(FieldId::Quote, String::new())),
            biography: RwSignal::new(EditableField::new(FieldId::Biography, String::new())),
            banner_modal: RwSignal::new(ModalState::default()),
            name_modal: RwSignal::new(ModalState::default()),
            dates_modal: RwSignal::new(ModalState::default()),
            quote_modal: RwSignal::new(ModalState::default()),
            controller: StoredValue::new(EditController::new(BrowserTransport::default())),
        }
    }

    /// Load the memorial and seed every field from it
    pub fn load(&self) {
        let vm = *self;
        spawn_local(async move {
            match model::fetch_by_id(vm.memorial_id).await {
                Ok(memorial) => vm.seed(&memorial),
                Err(e) => vm.error.set(Some(format!("Failed to load memorial: {}", e))),
            }
        });
    }

    pub fn seed(&self, memorial: &Memorial) {
        self.banner.set(EditableField::new(
            FieldId::Banner,
            BannerDisplay::render(&memorial.banner),
        ));
        self.name
            .set(EditableField::new(FieldId::Name, memorial.full_name()));
        self.dates
            .set(EditableField::new(FieldId::Dates, memorial.dates_display()));
        self.quote
            .set(EditableField::new(FieldId::Quote, memorial.quote_display()));
        self.biography
            .set(EditableField::new(FieldId::Biography, memorial.biography_html()));
        self.memorial.set(Some(memorial.clone()));
        self.error.set(None);
    }

    pub fn name_form(&self) -> UpdateNameForm {
        self.memorial
            .get_untracked()
            .map(|m| UpdateNameForm {
                first_name: m.first_name,
                middle_name: m.middle_name.unwrap_or_default(),
                last_name: m.last_name,
            })
            .unwrap_or_default()
    }

    pub fn dates_form(&self) -> UpdateDatesForm {
        let input = |d: NaiveDate| d.format(DATE_INPUT_FORMAT).to_string();
        self.memorial
            .get_untracked()
            .map(|m| UpdateDatesForm {
                date_of_birth: input(m.date_of_birth),
                date_of_death: m.date_of_death.map(input).unwrap_or_default(),
            })
            .unwrap_or_default()
    }

    pub fn quote_form(&self) -> UpdateQuoteRequest {
        UpdateQuoteRequest {
            quote: self
                .memorial
                .get_untracked()
                .and_then(|m| m.quote)
                .unwrap_or_default(),
        }
    }

    pub fn biography_form(&self) -> UpdateBiographyForm {
        UpdateBiographyForm {
            biography: self
                .memorial
                .get_untracked()
                .and_then(|m| m.biography)
                .unwrap_or_default(),
        }
    }

    pub fn save_name_command(&self, form: UpdateNameForm) {
        let vm = *self;
        let submitted = form.clone();
        self.run_edit(
            Some(self.name_modal),
            move |controller, csrf_token| async move {
                model::edit_name(&controller, &vm.name, vm.memorial_id, &csrf_token, &form).await
            },
            move || {
                vm.memorial.try_update(|m| {
                    if let Some(m) = m {
                        m.first_name = submitted.first_name.trim().to_string();
                        m.middle_name = Some(submitted.middle_name.trim().to_string())
                            .filter(|s| !s.is_empty());
                        m.last_name = submitted.last_name.trim().to_string();
                    }
                });
            },
        );
    }

    pub fn save_dates_command(&self, form: UpdateDatesForm) {
        let vm = *self;
        let submitted = form.clone();
        self.run_edit(
            Some(self.dates_modal),
            move |controller, csrf_token| async move {
                model::edit_dates(&controller, &vm.dates, vm.memorial_id, &csrf_token, &form).await
            },
            move || {
                let parse = |s: &str| NaiveDate::parse_from_str(s, DATE_INPUT_FORMAT).ok();
                vm.memorial.try_update(|m| {
                    if let Some(m) = m {
                        if let Some(birth) = parse(&submitted.date_of_birth) {
                            m.date_of_birth = birth;
                        }
                        m.date_of_death = parse(&submitted.date_of_death);
                    }
                });
            },
        );
    }

    pub fn save_quote_command(&self, form: UpdateQuoteRequest) {
        let vm = *self;
        let submitted = form.quote.trim().to_string();
        let name_display = self.name.with_untracked(|f| f.display().clone());
        self.run_edit(
            Some(self.quote_modal),
            move |controller, csrf_token| async move {
                model::edit_quote(
                    &controller,
                    &vm.quote,
                    vm.memorial_id,
                    &csrf_token,
                    &form,
                    &name_display,
                )
                .await
            },
            move || {
                vm.memorial.try_update(|m| {
                    if let Some(m) = m {
                        m.quote = Some(submitted).filter(|q| !q.is_empty());
                    }
                });
            },
        );
    }

    pub fn save_biography_command(&self, form: UpdateBiographyForm) {
        let vm = *self;
        let submitted = form.biography.clone();
        self.run_edit(
            None,
            move |controller, csrf_token| async move {
                model::edit_biography(&controller, &vm.biography, vm.memorial_id, &csrf_token, &form)
                    .await
            },
            move || {
                vm.memorial.try_update(|m| {
                    if let Some(m) = m {
                        m.biography = Some(submitted);
                    }
                });
            },
        );
    }

    pub fn save_banner_command(&self, selection: BannerSelection) {
        let vm = *self;
        self.run_edit(
            Some(self.banner_modal),
            move |controller, csrf_token| async move {
                model::edit_banner(&controller, &vm.banner, vm.memorial_id, &csrf_token, &selection)
                    .await
            },
            || {},
        );
    }

    /// Resolve the CSRF token, run the edit, then close the dialog or alert
    fn run_edit<V, F, Fut>(
        &self,
        modal: Option<RwSignal<ModalState>>,
        edit: F,
        on_committed: impl FnOnce() + 'static,
    ) where
        V: 'static,
        F: FnOnce(EditController<BrowserTransport>, CsrfToken) -> Fut + 'static,
        Fut: Future<Output = Result<V, EditError>> + 'static,
    {
        let controller = self.controller.get_value();
        spawn_local(async move {
            let csrf_token = match csrf::resolve_token().await {
                Ok(token) => token,
                Err(e) => {
                    log::error!("CSRF token unavailable: {}", e);
                    notify::alert(&e);
                    return;
                }
            };

            let outcome = edit(controller, csrf_token).await;
            if outcome.is_ok() {
                on_committed();
            }

            let mut state = modal
                .and_then(|m| m.try_get_untracked())
                .unwrap_or_default();
            let alert = settle(&outcome, &mut state);
            if let Some(modal) = modal {
                modal.try_set(state);
            }
            if let Some(message) = alert {
                notify::alert(&message);
            }
        });
    }
}

/// Commit closes the dialog silently; a failure keeps it open and yields the
/// alert text. Re-entrant submissions are ignored.
pub fn settle<V>(outcome: &Result<V, EditError>, modal: &mut ModalState) -> Option<String> {
    match outcome {
        Ok(_) => {
            modal.close();
            None
        }
        Err(EditError::InFlight(field_id)) => {
            log::debug!("{}: submission ignored while pending", field_id.as_str());
            None
        }
        Err(e) => Some(e.user_message()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::optimistic_edit::SyncFailure;

    fn open_modal() -> ModalState {
        let mut state = ModalState::default();
        state.open();
        state
    }

    #[test]
    fn commit_closes_modal_without_alert() {
        let mut modal = open_modal();
        let alert = settle(&Ok::<_, EditError>("Jane Doe".to_string()), &mut modal);
        assert_eq!(alert, None);
        assert!(!modal.is_open());
    }

    #[test]
    fn failure_alerts_with_server_text() {
        let mut modal = open_modal();
        let outcome: Result<String, _> = Err(EditError::Sync(SyncFailure::Transport {
            status: 400,
            message: Some("Invalid date format. Use YYYY-MM-DD.".into()),
        }));
        let alert = settle(&outcome, &mut modal);
        assert_eq!(alert.as_deref(), Some("Invalid date format. Use YYYY-MM-DD."));
        assert!(modal.is_open());
    }

    #[test]
    fn in_flight_rejection_is_silent() {
        let mut modal = open_modal();
        let outcome: Result<String, _> = Err(EditError::InFlight(FieldId::Name));
        assert_eq!(settle(&outcome, &mut modal), None);
        assert!(modal.is_open());
    }
}
