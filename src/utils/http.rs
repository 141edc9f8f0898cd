use crate::proxy::config::UpstreamProxyConfig;
use reqwest::{Client, Proxy};

/// Shared client for the token exchange and the protected API.
///
/// `timeout_secs` bounds each whole request, body included; an elapsed
/// timeout surfaces as a reqwest timeout error. An invalid proxy URL is
/// logged and the client is built without it.
pub fn create_client_with_proxy(
    timeout_secs: u64,
    proxy_config: Option<UpstreamProxyConfig>,
) -> Client {
    let mut builder = Client::builder().timeout(std::time::Duration::from_secs(timeout_secs));

    if let Some(config) = proxy_config {
        if config.enabled && !config.url.is_empty() {
            match Proxy::all(&config.url) {
                Ok(proxy) => {
                    builder = builder.proxy(proxy);
                    tracing::info!("HTTP client upstream proxy enabled: {}", config.url);
                }
                Err(e) => {
                    tracing::error!("Invalid proxy address: {}, error: {}", config.url, e);
                }
            }
        }
    }

    builder.build().unwrap_or_else(|_| Client::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_proxy_falls_back() {
        let config = UpstreamProxyConfig {
            enabled: true,
            url: "not a url".into(),
        };
        // Must not panic
        let _client = create_client_with_proxy(5, Some(config));
    }
}
