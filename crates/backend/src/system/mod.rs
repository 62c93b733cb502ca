pub mod csrf;
pub mod request_logger;
pub mod tracing;
