pub mod banner_display;
pub mod serializer;
pub mod ui;
