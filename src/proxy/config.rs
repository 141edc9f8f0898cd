use serde::{Deserialize, Serialize};

/// Reverse proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Allow LAN access
    /// - false: local only 127.0.0.1 (default)
    /// - true: 0.0.0.0
    #[serde(default)]
    pub allow_lan_access: bool,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upstream origin, e.g. `https://api.prokerala.com`.
    /// The token endpoint lives at `<api_host>/token`.
    #[serde(default = "default_api_host")]
    pub api_host: String,

    /// Prefix prepended to every resolved target path
    #[serde(default = "default_api_base_path")]
    pub api_base_path: String,

    /// OAuth2 client id
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub client_id: String,

    /// OAuth2 client secret
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub client_secret: String,

    /// CORS allow-list. `*` allows any origin.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Inbound methods accepted by the method gate
    #[serde(default = "default_allowed_methods")]
    pub allowed_methods: Vec<String>,

    /// Query parameter carrying the target path (query-parameter routing)
    #[serde(default = "default_endpoint_param")]
    pub endpoint_param: String,

    /// Mount prefix for path-suffix routing. When set, `/prefix/a/b`
    /// forwards to `/a/b` and `endpoint_param` is ignored.
    #[serde(default)]
    pub route_prefix: Option<String>,

    /// Upstream request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Outbound proxy configuration
    #[serde(default)]
    pub upstream_proxy: UpstreamProxyConfig,
}

/// Outbound proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpstreamProxyConfig {
    /// Enabled
    pub enabled: bool,
    /// Proxy address (http://, https://, socks5://)
    pub url: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            allow_lan_access: false,
            port: default_port(),
            api_host: default_api_host(),
            api_base_path: default_api_base_path(),
            client_id: String::new(),
            client_secret: String::new(),
            allowed_origins: default_allowed_origins(),
            allowed_methods: default_allowed_methods(),
            endpoint_param: default_endpoint_param(),
            route_prefix: None,
            request_timeout: default_request_timeout(),
            upstream_proxy: UpstreamProxyConfig::default(),
        }
    }
}

fn default_port() -> u16 {
    8045
}

fn default_api_host() -> String {
    "https://api.prokerala.com".to_string()
}

fn default_api_base_path() -> String {
    "/v2".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_allowed_methods() -> Vec<String> {
    vec!["GET".to_string()]
}

fn default_endpoint_param() -> String {
    "endpoint".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

impl ProxyConfig {
    /// Get the actual listen address
    pub fn get_bind_address(&self) -> &str {
        if self.allow_lan_access {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        }
    }

    /// `<api_host>/token`
    pub fn token_endpoint(&self) -> String {
        format!("{}/token", self.api_host.trim_end_matches('/'))
    }

    /// `<api_host><api_base_path>`
    pub fn api_base_url(&self) -> String {
        let base = self.api_base_path.trim_matches('/');
        let host = self.api_host.trim_end_matches('/');
        if base.is_empty() {
            host.to_string()
        } else {
            format!("{}/{}", host, base)
        }
    }
}
