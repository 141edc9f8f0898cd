// Upstream client for the protected API

use bytes::Bytes;
use reqwest::{header, Client};

use crate::error::ProxyError;
use crate::models::AccessToken;

/// Raw upstream answer, kept verbatim for pass-through.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub struct UpstreamClient {
    http_client: Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// `<base><path>?<query>`; the `?` is omitted for an empty query.
    fn build_url(base_url: &str, target_path: &str, query_string: &str) -> String {
        let path = if target_path.starts_with('/') {
            target_path.to_string()
        } else {
            format!("/{}", target_path)
        };

        if query_string.is_empty() {
            format!("{}{}", base_url, path)
        } else {
            format!("{}{}?{}", base_url, path, query_string)
        }
    }

    /// GET a resource with the bearer token. No body, no other headers.
    ///
    /// Only transport failures are errors; every HTTP status comes back as
    /// an [`UpstreamResponse`].
    pub async fn get(
        &self,
        target_path: &str,
        query_string: &str,
        access_token: &AccessToken,
    ) -> Result<UpstreamResponse, ProxyError> {
        let url = Self::build_url(&self.base_url, target_path, query_string);
        tracing::debug!("[Proxy] Making authenticated request to: {}", url);

        let response = self
            .http_client
            .get(&url)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", access_token.as_str()),
            )
            .send()
            .await
            .map_err(|e| ProxyError::UpstreamCall(describe_transport_error(e)))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response
            .bytes()
            .await
            .map_err(|e| ProxyError::UpstreamCall(describe_transport_error(e)))?;

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}

fn describe_transport_error(e: reqwest::Error) -> String {
    // Without the URL: it may carry caller-supplied query values
    let e = e.without_url();
    if e.is_timeout() {
        format!("timed out: {}", e)
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    }
}
