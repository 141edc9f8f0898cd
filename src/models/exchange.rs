use bytes::Bytes;
use reqwest::Method;
use serde_json::Value;

/// Inbound call, already resolved by the routing layer.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub method: Method,
    /// Upstream path to invoke; `None` or empty when routing could not
    /// determine one.
    pub target_path: Option<String>,
    /// Ordered parameters. A repeated name keeps its first position and its
    /// last value.
    pub query_parameters: Vec<(String, String)>,
    /// `Origin` header of the inbound call, used for CORS allow-list matching.
    pub origin: Option<String>,
}

impl ProxyRequest {
    pub fn new(method: Method, target_path: Option<String>) -> Self {
        Self {
            method,
            target_path,
            query_parameters: Vec::new(),
            origin: None,
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_param(name, value);
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.query_parameters.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.query_parameters.push((name, value)),
        }
    }

    /// Trimmed, non-empty target path.
    pub fn resolved_path(&self) -> Option<&str> {
        self.target_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// Outbound result handed back to the host for serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: Vec<(String, String)>,
    /// Sent as-is; upstream bodies are never re-encoded.
    pub body: Bytes,
}

impl ProxyResponse {
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    pub fn json(status_code: u16, body: &Value) -> Self {
        Self::new(status_code)
            .with_header("Content-Type", "application/json")
            .with_body(body.to_string())
    }

    pub fn text(status_code: u16, body: impl Into<String>) -> Self {
        Self::new(status_code)
            .with_header("Content-Type", "text/plain; charset=utf-8")
            .with_body(body.into())
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
