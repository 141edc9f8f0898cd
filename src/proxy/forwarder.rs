use reqwest::Method;
use std::sync::Arc;

use crate::error::ProxyError;
use crate::models::{ProxyRequest, ProxyResponse};
use crate::proxy::common::encode_query;
use crate::proxy::config::ProxyConfig;
use crate::proxy::middleware::CorsPolicy;
use crate::proxy::token_manager::TokenManager;
use crate::proxy::upstream::UpstreamClient;

const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Translates one inbound call into one upstream call.
///
/// `handle` never fails: every local problem becomes a JSON error response
/// and every upstream status is passed through as-is.
pub struct ProxyForwarder {
    token_manager: Arc<TokenManager>,
    upstream: UpstreamClient,
    cors: CorsPolicy,
}

impl ProxyForwarder {
    pub fn new(token_manager: Arc<TokenManager>, upstream: UpstreamClient, cors: CorsPolicy) -> Self {
        Self {
            token_manager,
            upstream,
            cors,
        }
    }

    pub fn from_config(config: &ProxyConfig) -> Self {
        let http_client = crate::utils::http::create_client_with_proxy(
            config.request_timeout,
            Some(config.upstream_proxy.clone()),
        );

        let token_manager = Arc::new(TokenManager::from_config(config, http_client.clone()));
        let upstream = UpstreamClient::new(http_client, config.api_base_url());
        let cors = CorsPolicy::new(
            config.allowed_origins.clone(),
            parse_methods(&config.allowed_methods),
        );

        Self::new(token_manager, upstream, cors)
    }

    pub fn token_manager(&self) -> &Arc<TokenManager> {
        &self.token_manager
    }

    pub async fn handle(&self, request: ProxyRequest) -> ProxyResponse {
        let origin = request.origin.as_deref();

        // 1. Preflight
        if request.method == Method::OPTIONS {
            return ProxyResponse::new(204).with_headers(self.cors.preflight_headers(origin));
        }

        let response = match self.forward(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("[Proxy] {}", e);
                ProxyResponse::json(e.status_code(), &e.to_envelope())
            }
        };

        response.with_headers(self.cors.headers(origin))
    }

    async fn forward(&self, request: &ProxyRequest) -> Result<ProxyResponse, ProxyError> {
        // 2. Method gate
        if !self.cors.allows_method(&request.method) {
            tracing::warn!("[Proxy] Rejected method {}", request.method);
            return Ok(ProxyResponse::text(405, "Method Not Allowed"));
        }

        // 3. Target path
        let target_path = request
            .resolved_path()
            .ok_or_else(|| ProxyError::Validation("API endpoint parameter is missing.".to_string()))?;

        // 4. Token
        let access_token = self.token_manager.get_token().await?;

        // 5-6. Upstream call
        let query_string = encode_query(&request.query_parameters);
        let upstream_res = self
            .upstream
            .get(target_path, &query_string, &access_token)
            .await?;

        // 7. Pass-through, success or not
        if !upstream_res.is_success() {
            tracing::warn!(
                "[Proxy] API returned a non-OK response. Status: {}",
                upstream_res.status
            );
        }

        let content_type = upstream_res
            .content_type
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        Ok(ProxyResponse::new(upstream_res.status)
            .with_header("Content-Type", content_type)
            .with_body(upstream_res.body))
    }
}

fn parse_methods(names: &[String]) -> Vec<Method> {
    names
        .iter()
        .filter_map(|name| match Method::from_bytes(name.trim().to_uppercase().as_bytes()) {
            Ok(m) => Some(m),
            Err(_) => {
                tracing::warn!("Ignoring invalid HTTP method in config: {:?}", name);
                None
            }
        })
        .collect()
}
