use super::view_model::MemorialDetailsViewModel;
use crate::shared::modal::{EditModal, ModalState};
use contracts::domain::a001_memorial::banner::{static_url, BannerKind, BannerSelection};
use contracts::domain::a001_memorial::edit::{
    UpdateBiographyForm, UpdateDatesForm, UpdateNameForm, UpdateQuoteRequest,
};
use leptos::html;
use leptos::prelude::*;

/// Preset banner images shipped under `/static/`
const BANNER_PRESETS: [&str; 4] = [
    "images/banners/sunset.jpg",
    "images/banners/forest.jpg",
    "images/banners/ocean.jpg",
    "images/banners/mountains.jpg",
];

#[component]
pub fn NameEditor(vm: MemorialDetailsViewModel) -> impl IntoView {
    let form = RwSignal::new(UpdateNameForm::default());
    let trigger = NodeRef::<html::Button>::new();
    let pending = move || vm.name.with(|f| f.is_pending());

    let open = move |_| {
        form.set(vm.name_form());
        vm.name_modal.update(ModalState::open);
    };

    view! {
        <button class="button button--icon edit-trigger" node_ref=trigger on:click=open disabled=pending>
            {"Edit"}
        </button>
        <EditModal title="Edit Name" state=vm.name_modal trigger=trigger>
            <div class="form-group">
                <label for="first_name">{"First name"}</label>
                <input
                    type="text"
                    id="first_name"
                    prop:value=move || form.get().first_name
                    on:input=move |ev| form.update(|f| f.first_name = event_target_value(&ev))
                />
            </div>
            <div class="form-group">
                <label for="middle_name">{"Middle name"}</label>
                <input
                    type="text"
                    id="middle_name"
                    prop:value=move || form.get().middle_name
                    on:input=move |ev| form.update(|f| f.middle_name = event_target_value(&ev))
                />
            </div>
            <div class="form-group">
                <label for="last_name">{"Last name"}</label>
                <input
                    type="text"
                    id="last_name"
                    prop:value=move || form.get().last_name
                    on:input=move |ev| form.update(|f| f.last_name = event_target_value(&ev))
                />
            </div>
            <div class="details-actions">
                <button
                    class="btn btn-primary"
                    on:click=move |_| vm.save_name_command(form.get_untracked())
                    disabled=pending
                >
                    {"Save"}
                </button>
            </div>
        </EditModal>
    }
}

#[component]
pub fn DatesEditor(vm: MemorialDetailsViewModel) -> impl IntoView {
    let form = RwSignal::new(UpdateDatesForm::default());
    let trigger = NodeRef::<html::Button>::new();
    let pending = move || vm.dates.with(|f| f.is_pending());

    let open = move |_| {
        form.set(vm.dates_form());
        vm.dates_modal.update(ModalState::open);
    };

    view! {
        <button class="button button--icon edit-trigger" node_ref=trigger on:click=open disabled=pending>
            {"Edit"}
        </button>
        <EditModal title="Edit Dates" state=vm.dates_modal trigger=trigger>
            <div class="form-group">
                <label for="date_of_birth">{"Date of birth"}</label>
                <input
                    type="date"
                    id="date_of_birth"
                    prop:value=move || form.get().date_of_birth
                    on:input=move |ev| form.update(|f| f.date_of_birth = event_target_value(&ev))
                />
            </div>
            <div class="form-group">
                <label for="date_of_death">{"Date of passing"}</label>
                <input
                    type="date"
                    id="date_of_death"
                    prop:value=move || form.get().date_of_death
                    on:input=move |ev| form.update(|f| f.date_of_death = event_target_value(&ev))
                />
            </div>
            <div class="details-actions">
                <button
                    class="btn btn-primary"
                    on:click=move |_| vm.save_dates_command(form.get_untracked())
                    disabled=pending
                >
                    {"Save"}
                </button>
            </div>
        </EditModal>
    }
}

#[component]
pub fn QuoteEditor(vm: MemorialDetailsViewModel) -> impl IntoView {
    let form = RwSignal::new(UpdateQuoteRequest::default());
    let trigger = NodeRef::<html::Button>::new();
    let pending = move || vm.quote.with(|f| f.is_pending());

    let open = move |_| {
        form.set(vm.quote_form());
        vm.quote_modal.update(ModalState::open);
    };

    view! {
        <button class="button button--icon edit-trigger" node_ref=trigger on:click=open disabled=pending>
            {"Edit"}
        </button>
        <EditModal title="Edit Quote" state=vm.quote_modal trigger=trigger>
            <div class="form-group">
                <label for="quote">{"Quote"}</label>
                <textarea
                    id="quote"
                    rows="3"
                    placeholder="Leave empty to use the default dedication"
                    prop:value=move || form.get().quote
                    on:input=move |ev| form.update(|f| f.quote = event_target_value(&ev))
                />
            </div>
            <div class="details-actions">
                <button
                    class="btn btn-primary"
                    on:click=move |_| vm.save_quote_command(form.get_untracked())
                    disabled=pending
                >
                    {"Save"}
                </button>
            </div>
        </EditModal>
    }
}

/// Biography is edited in place, without a dialog
#[component]
pub fn BiographyEditor(vm: MemorialDetailsViewModel) -> impl IntoView {
    let form = RwSignal::new(UpdateBiographyForm::default());
    let editing = RwSignal::new(false);
    let pending = move || vm.biography.with(|f| f.is_pending());

    let save = move |_| {
        editing.set(false);
        vm.save_biography_command(form.get_untracked());
    };

    view! {
        {move || {
            if editing.get() {
                view! {
                    <div class="form-group">
                        <textarea
                            id="biography"
                            rows="10"
                            prop:value=move || form.get().biography
                            on:input=move |ev| form.update(|f| f.biography = event_target_value(&ev))
                        />
                    </div>
                    <div class="details-actions">
                        <button class="btn btn-primary" on:click=save>{"Save"}</button>
                        <button class="btn btn-secondary" on:click=move |_| editing.set(false)>
                            {"Cancel"}
                        </button>
                    </div>
                }
                    .into_any()
            } else {
                view! {
                    <div
                        class="biography-text"
                        inner_html=move || vm.biography.with(|f| f.display().clone())
                    ></div>
                    <button
                        class="button button--icon edit-trigger"
                        disabled=pending
                        on:click=move |_| {
                            form.set(vm.biography_form());
                            editing.set(true);
                        }
                    >
                        {"Edit"}
                    </button>
                }
                    .into_any()
            }
        }}
    }
}

#[component]
pub fn BannerEditor(vm: MemorialDetailsViewModel) -> impl IntoView {
    let color = RwSignal::new(String::new());
    let trigger = NodeRef::<html::Button>::new();
    let pending = move || vm.banner.with(|f| f.is_pending());

    let open = move |_| {
        let current = vm.banner.with_untracked(|f| f.display().selection.clone());
        color.set(match current.kind {
            BannerKind::Color => current.value,
            BannerKind::Image => String::new(),
        });
        vm.banner_modal.update(ModalState::open);
    };

    view! {
        <button class="button button--icon banner-edit" node_ref=trigger on:click=open disabled=pending>
            {"Change banner"}
        </button>
        <EditModal title="Change Banner" state=vm.banner_modal trigger=trigger>
            <div class="banner-presets">
                {BANNER_PRESETS
                    .iter()
                    .map(|path| {
                        let path = *path;
                        view! {
                            <button
                                class="banner-preset"
                                style=format!("background-image: url('{}')", static_url(path))
                                on:click=move |_| vm.save_banner_command(BannerSelection::image(path))
                                disabled=pending
                            ></button>
                        }
                    })
                    .collect_view()}
            </div>
            <div class="form-group">
                <label for="banner_color">{"Colour"}</label>
                <input
                    type="color"
                    id="banner_color"
                    prop:value=move || color.get()
                    on:input=move |ev| color.set(event_target_value(&ev))
                />
            </div>
            <div class="details-actions">
                <button
                    class="btn btn-primary"
                    on:click=move |_| vm.save_banner_command(BannerSelection::color(&color.get_untracked()))
                    disabled=pending
                >
                    {"Use colour"}
                </button>
            </div>
        </EditModal>
    }
}
