pub mod config;
pub mod exchange;
pub mod token;

pub use config::AppConfig;
pub use exchange::{ProxyRequest, ProxyResponse};
pub use token::{AccessToken, TokenState};
