// proxy module - credential-shielding reverse proxy

pub mod config;
pub mod forwarder;
pub mod path_resolver;
pub mod server;
pub mod token_manager;

pub mod common; // Query encoding
pub mod handlers; // Axum endpoint handlers
pub mod middleware; // CORS policy, request logging
pub mod upstream; // Protected API client

pub use config::ProxyConfig;
pub use forwarder::ProxyForwarder;
pub use server::{AppState, AxumServer};
pub use token_manager::TokenManager;
