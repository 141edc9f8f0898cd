// Catch-all proxy handler
use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::Response,
};

use crate::models::{ProxyRequest, ProxyResponse};
use crate::proxy::server::AppState;

/// Resolve the inbound URL, hand it to the forwarder, serialize the result.
pub async fn handle_forward(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let route = state
        .resolver
        .resolve(uri.path(), parse_inbound_query(uri.query()));

    let mut request = ProxyRequest::new(method, route.target_path);
    for (name, value) in route.query_parameters {
        request.set_param(name, value);
    }
    request.origin = headers
        .get(axum::http::header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    into_response(state.forwarder.handle(request).await)
}

/// Decode the inbound query. `+` is kept as a literal plus sign, matching
/// the outbound encoding; spaces must arrive as `%20`.
pub fn parse_inbound_query(query: Option<&str>) -> Vec<(String, String)> {
    let Some(query) = query else {
        return Vec::new();
    };
    let escaped = query.replace('+', "%2B");
    url::form_urlencoded::parse(escaped.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn into_response(proxy_res: ProxyResponse) -> Response {
    let status = StatusCode::from_u16(proxy_res.status_code).unwrap_or(StatusCode::BAD_GATEWAY);

    let mut response = Response::new(Body::from(proxy_res.body));
    *response.status_mut() = status;

    let headers = response.headers_mut();
    for (name, value) in proxy_res.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => tracing::warn!("Dropping invalid response header {:?}", name),
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_plus_is_literal() {
        let params = parse_inbound_query(Some(
            "endpoint=/astrology/panchang&datetime=2025-09-12T12:44:00+05:30&place=New%20Delhi",
        ));
        assert_eq!(
            params,
            vec![
                ("endpoint".to_string(), "/astrology/panchang".to_string()),
                ("datetime".to_string(), "2025-09-12T12:44:00+05:30".to_string()),
                ("place".to_string(), "New Delhi".to_string()),
            ]
        );
    }

    #[test]
    fn test_inbound_encoded_plus() {
        let params = parse_inbound_query(Some("datetime=2025-09-12T12%3A44%3A00%2B05%3A30"));
        assert_eq!(params[0].1, "2025-09-12T12:44:00+05:30");
    }

    #[test]
    fn test_no_query() {
        assert!(parse_inbound_query(None).is_empty());
    }

    #[test]
    fn test_into_response_copies_headers() {
        let res = into_response(
            ProxyResponse::new(404)
                .with_header("Content-Type", "application/json")
                .with_header("Access-Control-Allow-Origin", "*")
                .with_body("{}"),
        );
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(res.headers()["content-type"], "application/json");
        assert_eq!(res.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_into_response_keeps_raw_bytes() {
        let res = into_response(
            ProxyResponse::new(200)
                .with_header("Content-Type", "text/plain; charset=iso-8859-1")
                .with_body(vec![b'c', b'a', b'f', 0xE9]),
        );
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], &[b'c', b'a', b'f', 0xE9]);
    }
}
