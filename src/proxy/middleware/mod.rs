// Middleware module - CORS policy and Axum middleware
pub mod cors;
pub mod logging;

pub use cors::CorsPolicy;
pub use logging::request_logger;
