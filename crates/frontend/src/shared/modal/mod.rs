//! Edit dialogs. Visibility only: a dialog is closed by default, opened by
//! its trigger, and closed by the close button, by Escape, by a successful
//! save, or by a click outside it that did not land on the trigger.

use leptos::html;
use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModalState {
    open: bool,
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Pointer event somewhere on the page while the dialog may be open
    pub fn pointer_event(&mut self, inside_dialog: bool, on_trigger: bool) {
        if self.open && !inside_dialog && !on_trigger {
            self.open = false;
        }
    }
}

#[component]
pub fn EditModal(
    /// Title of the modal
    #[prop(into)]
    title: String,
    /// Visibility, owned by the caller so a save can close it
    state: RwSignal<ModalState>,
    /// Control that opens the dialog; clicks on it do not count as outside
    #[prop(optional)]
    trigger: Option<NodeRef<html::Button>>,
    /// Modal content
    children: ChildrenFn,
) -> impl IntoView {
    let dialog_ref = NodeRef::<html::Div>::new();

    Effect::new(move |_| {
        let on_click = Closure::wrap(Box::new(move |event: web_sys::Event| {
            if !state.try_get_untracked().is_some_and(|s| s.is_open()) {
                return;
            }
            let target = event
                .target()
                .and_then(|t| t.dyn_into::<web_sys::Node>().ok());
            let inside_dialog = dialog_ref
                .get_untracked()
                .is_some_and(|el| el.contains(target.as_ref()));
            let on_trigger = trigger
                .and_then(|t| t.get_untracked())
                .is_some_and(|el| el.contains(target.as_ref()));
            state.try_update(|s| s.pointer_event(inside_dialog, on_trigger));
        }) as Box<dyn FnMut(_)>);

        let on_keydown = Closure::wrap(Box::new(move |event: web_sys::Event| {
            if let Some(keyboard_event) = event.dyn_ref::<KeyboardEvent>() {
                if keyboard_event.key() == "Escape" {
                    state.try_update(ModalState::close);
                }
            }
        }) as Box<dyn FnMut(_)>);

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref());
            let _ = window
                .add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref());
        }
        on_click.forget();
        on_keydown.forget();
    });

    view! {
        {move || {
            if state.get().is_open() {
                view! {
                    <div class="edit-modal" role="dialog" node_ref=dialog_ref>
                        <div class="modal-header">
                            <h2 class="modal-title">{title.clone()}</h2>
                            <button
                                class="button button--icon modal__close"
                                on:click=move |_| state.update(ModalState::close)
                            >
                                "×"
                            </button>
                        </div>
                        <div class="modal-body">
                            {children()}
                        </div>
                    </div>
                }.into_any()
            } else {
                view! { <></> }.into_any()
            }
        }}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_by_default() {
        assert!(!ModalState::default().is_open());
    }

    #[test]
    fn outside_click_closes_unless_on_trigger() {
        let mut state = ModalState::default();
        state.open();

        state.pointer_event(false, true);
        assert!(state.is_open(), "the opening click must not close it");

        state.pointer_event(true, false);
        assert!(state.is_open());

        state.pointer_event(false, false);
        assert!(!state.is_open());
    }
}
