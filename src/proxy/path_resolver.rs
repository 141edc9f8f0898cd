/// Result of routing one inbound URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub target_path: Option<String>,
    /// Parameters to forward, with any routing-only parameter removed.
    pub query_parameters: Vec<(String, String)>,
}

/// Maps an inbound URL onto the upstream path to call.
///
/// The forwarder never looks at routing; the server picks one resolver at
/// startup and hands the forwarder an already resolved path.
pub trait PathResolver: Send + Sync {
    fn resolve(&self, inbound_path: &str, query_parameters: Vec<(String, String)>)
        -> ResolvedRoute;
}

/// Target path carried in a named query parameter, e.g.
/// `/proxy?endpoint=/astrology/panchang&ayanamsa=1`.
#[derive(Debug, Clone)]
pub struct QueryParamResolver {
    param: String,
}

impl QueryParamResolver {
    pub fn new(param: impl Into<String>) -> Self {
        Self {
            param: param.into(),
        }
    }
}

impl PathResolver for QueryParamResolver {
    fn resolve(
        &self,
        _inbound_path: &str,
        query_parameters: Vec<(String, String)>,
    ) -> ResolvedRoute {
        let mut target_path = None;
        let mut forwarded = Vec::with_capacity(query_parameters.len());

        for (name, value) in query_parameters {
            if name == self.param {
                target_path = Some(value);
            } else {
                forwarded.push((name, value));
            }
        }

        ResolvedRoute {
            target_path: target_path.map(|p| normalize(&p)).filter(|p| p != "/"),
            query_parameters: forwarded,
        }
    }
}

/// Target path is whatever follows a mount prefix, e.g.
/// `/api/proxy/astrology/panchang` with prefix `/api/proxy`.
#[derive(Debug, Clone)]
pub struct PathPrefixResolver {
    prefix: String,
}

impl PathPrefixResolver {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
        }
    }
}

impl PathResolver for PathPrefixResolver {
    fn resolve(
        &self,
        inbound_path: &str,
        query_parameters: Vec<(String, String)>,
    ) -> ResolvedRoute {
        let target_path = inbound_path
            .strip_prefix(self.prefix.as_str())
            .filter(|rest| rest.is_empty() || rest.starts_with('/'))
            .map(normalize)
            .filter(|p| p != "/");

        ResolvedRoute {
            target_path,
            query_parameters,
        }
    }
}

/// Leading slash, no trailing slash, surrounding whitespace removed.
fn normalize(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_query_param_resolver_strips_routing_param() {
        let resolver = QueryParamResolver::new("endpoint");
        let route = resolver.resolve(
            "/proxy",
            params(&[("endpoint", "/astrology/panchang"), ("ayanamsa", "1")]),
        );
        assert_eq!(route.target_path.as_deref(), Some("/astrology/panchang"));
        assert_eq!(route.query_parameters, params(&[("ayanamsa", "1")]));
    }

    #[test]
    fn test_query_param_resolver_adds_leading_slash() {
        let resolver = QueryParamResolver::new("endpoint");
        let route = resolver.resolve("/", params(&[("endpoint", "astrology/kundli/")]));
        assert_eq!(route.target_path.as_deref(), Some("/astrology/kundli"));
    }

    #[test]
    fn test_query_param_resolver_missing_or_empty() {
        let resolver = QueryParamResolver::new("endpoint");
        assert_eq!(resolver.resolve("/", params(&[("a", "1")])).target_path, None);
        assert_eq!(resolver.resolve("/", params(&[("endpoint", " ")])).target_path, None);
    }

    #[test]
    fn test_prefix_resolver() {
        let resolver = PathPrefixResolver::new("/api/proxy/");
        let route = resolver.resolve("/api/proxy/astrology/panchang", params(&[("la", "en")]));
        assert_eq!(route.target_path.as_deref(), Some("/astrology/panchang"));
        assert_eq!(route.query_parameters, params(&[("la", "en")]));

        assert_eq!(resolver.resolve("/api/proxy", Vec::new()).target_path, None);
        assert_eq!(resolver.resolve("/api/proxyx/a", Vec::new()).target_path, None);
        assert_eq!(resolver.resolve("/other/a", Vec::new()).target_path, None);
    }
}
