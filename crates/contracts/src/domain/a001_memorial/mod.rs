pub mod aggregate;
pub mod banner;
pub mod display;
pub mod edit;
