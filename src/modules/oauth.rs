use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ProxyError;

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: String,
}

/// Exchange client credentials for an access token.
///
/// Form-encoded POST of `grant_type=client_credentials`, `client_id` and
/// `client_secret` to `token_url`. Non-2xx answers carry the upstream status
/// and body in the returned error for diagnostics.
pub async fn request_client_credentials_token(
    client: &Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<TokenResponse, ProxyError> {
    let params = [
        ("grant_type", "client_credentials"),
        ("client_id", client_id),
        ("client_secret", client_secret),
    ];

    let response = client
        .post(token_url)
        .form(&params)
        .send()
        .await
        .map_err(|e| ProxyError::UpstreamAuth {
            status: None,
            message: format!("token request failed: {}", e),
            body: String::new(),
        })?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        tracing::error!(
            "Token request failed with status {}: {}",
            status.as_u16(),
            error_text
        );
        return Err(ProxyError::UpstreamAuth {
            status: Some(status.as_u16()),
            message: format!("token endpoint returned {}", status.as_u16()),
            body: error_text,
        });
    }

    let token_res = response
        .json::<TokenResponse>()
        .await
        .map_err(|e| ProxyError::UpstreamAuth {
            status: Some(status.as_u16()),
            message: format!("token response parsing failed: {}", e),
            body: String::new(),
        })?;

    tracing::info!(
        "Token exchange successful! access_token: {}..., expires in: {} seconds",
        token_res.access_token.chars().take(8).collect::<String>(),
        token_res.expires_in
    );

    Ok(token_res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_exchange_sends_form_and_parses_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("client_id=my-id"))
            .and(body_string_contains("client_secret=s3cr%2Bt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok-1",
                "expires_in": 3600,
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let token = request_client_credentials_token(
            &Client::new(),
            &format!("{}/token", mock_server.uri()),
            "my-id",
            "s3cr+t",
        )
        .await
        .unwrap();

        assert_eq!(token.access_token, "tok-1");
        assert_eq!(token.expires_in, 3600);
    }

    #[tokio::test]
    async fn test_exchange_rejected_carries_status_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
            .mount(&mock_server)
            .await;

        let err = request_client_credentials_token(
            &Client::new(),
            &format!("{}/token", mock_server.uri()),
            "id",
            "bad",
        )
        .await
        .unwrap_err();

        match err {
            ProxyError::UpstreamAuth { status, body, .. } => {
                assert_eq!(status, Some(401));
                assert_eq!(body, "invalid_client");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_exchange_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let err = request_client_credentials_token(
            &Client::new(),
            &format!("{}/token", mock_server.uri()),
            "id",
            "secret",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ProxyError::UpstreamAuth { status: Some(200), .. }));
    }
}
