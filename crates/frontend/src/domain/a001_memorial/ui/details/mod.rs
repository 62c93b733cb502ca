//! Memorial Details UI Module
//!
//! Simplified MVVM pattern implementation:
//! - model.rs: API functions (fetch, per-field edits)
//! - view_model.rs: ViewModel with per-field state and commands
//! - view.rs: Leptos component (pure UI)
//! - editors.rs: inline edit dialogs, one per field

mod editors;
mod model;
mod view;
mod view_model;

pub use view::MemorialDetails;
pub use view_model::MemorialDetailsViewModel;
