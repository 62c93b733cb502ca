pub mod api_utils;
pub mod csrf;
pub mod modal;
pub mod notify;
pub mod optimistic_edit;
