// CORS headers for proxied responses
//
// Headers are attached by the forwarder itself rather than a tower layer,
// so every branch (preflight, 405, errors, pass-through) carries them.

use reqwest::Method;

const ALLOW_HEADERS: &str = "Content-Type, Authorization";
const PREFLIGHT_MAX_AGE: &str = "86400";

#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origins: Vec<String>,
    allowed_methods: Vec<Method>,
}

impl CorsPolicy {
    /// An empty origin list is treated as `*`.
    pub fn new(allowed_origins: Vec<String>, allowed_methods: Vec<Method>) -> Self {
        let allowed_origins = if allowed_origins.is_empty() {
            vec!["*".to_string()]
        } else {
            allowed_origins
        };
        Self {
            allowed_origins,
            allowed_methods,
        }
    }

    pub fn permissive(allowed_methods: Vec<Method>) -> Self {
        Self::new(vec!["*".to_string()], allowed_methods)
    }

    pub fn allows_method(&self, method: &Method) -> bool {
        self.allowed_methods.contains(method)
    }

    /// `Access-Control-Allow-Origin` value for a caller.
    ///
    /// Wildcard lists answer `*`. Otherwise a listed origin is echoed back and
    /// anything else gets the first listed origin, which the browser rejects.
    fn allow_origin(&self, origin: Option<&str>) -> &str {
        if self.allowed_origins.iter().any(|o| o == "*") {
            return "*";
        }
        origin
            .and_then(|o| self.allowed_origins.iter().find(|a| a.as_str() == o))
            .unwrap_or(&self.allowed_origins[0])
    }

    fn is_wildcard(&self) -> bool {
        self.allow_origin(None) == "*"
    }

    /// Headers present on every response.
    pub fn headers(&self, origin: Option<&str>) -> Vec<(String, String)> {
        let mut headers = vec![(
            "Access-Control-Allow-Origin".to_string(),
            self.allow_origin(origin).to_string(),
        )];
        if !self.is_wildcard() {
            headers.push(("Vary".to_string(), "Origin".to_string()));
        }
        headers
    }

    /// Headers for an OPTIONS preflight answer.
    pub fn preflight_headers(&self, origin: Option<&str>) -> Vec<(String, String)> {
        let mut methods: Vec<&str> = self.allowed_methods.iter().map(Method::as_str).collect();
        if !methods.contains(&"OPTIONS") {
            methods.push("OPTIONS");
        }

        let mut headers = self.headers(origin);
        headers.push((
            "Access-Control-Allow-Methods".to_string(),
            methods.join(", "),
        ));
        headers.push((
            "Access-Control-Allow-Headers".to_string(),
            ALLOW_HEADERS.to_string(),
        ));
        headers.push((
            "Access-Control-Max-Age".to_string(),
            PREFLIGHT_MAX_AGE.to_string(),
        ));
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_wildcard() {
        let policy = CorsPolicy::permissive(vec![Method::GET]);
        let headers = policy.headers(Some("https://app.example.com"));
        assert_eq!(value(&headers, "Access-Control-Allow-Origin"), Some("*"));
        assert_eq!(value(&headers, "Vary"), None);
    }

    #[test]
    fn test_allow_list_echoes_known_origin() {
        let policy = CorsPolicy::new(
            vec!["https://a.example".into(), "https://b.example".into()],
            vec![Method::GET],
        );
        let headers = policy.headers(Some("https://b.example"));
        assert_eq!(
            value(&headers, "Access-Control-Allow-Origin"),
            Some("https://b.example")
        );
        assert_eq!(value(&headers, "Vary"), Some("Origin"));

        let headers = policy.headers(Some("https://evil.example"));
        assert_eq!(
            value(&headers, "Access-Control-Allow-Origin"),
            Some("https://a.example")
        );
    }

    #[test]
    fn test_preflight_advertises_methods() {
        let policy = CorsPolicy::permissive(vec![Method::GET]);
        let headers = policy.preflight_headers(None);
        assert_eq!(
            value(&headers, "Access-Control-Allow-Methods"),
            Some("GET, OPTIONS")
        );
        assert!(value(&headers, "Access-Control-Allow-Headers").is_some());
    }

    #[test]
    fn test_empty_list_means_any() {
        let policy = CorsPolicy::new(Vec::new(), vec![Method::GET]);
        assert!(policy.allows_method(&Method::GET));
        assert!(!policy.allows_method(&Method::POST));
        assert_eq!(
            value(&policy.headers(None), "Access-Control-Allow-Origin"),
            Some("*")
        );
    }
}
