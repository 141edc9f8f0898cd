// Handlers module - Axum endpoint handlers
pub mod forward;
pub mod health;
