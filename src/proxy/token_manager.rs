use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::Client;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::ProxyError;
use crate::models::{AccessToken, TokenState};
use crate::proxy::config::ProxyConfig;
use crate::utils::clock::{Clock, SystemClock};

type RefreshFuture = Shared<BoxFuture<'static, Result<AccessToken, ProxyError>>>;

#[derive(Default)]
struct TokenSlot {
    state: Option<TokenState>,
    /// The one outstanding token exchange, if any. Every caller that finds
    /// the cache stale while this is set awaits a clone of it.
    in_flight: Option<RefreshFuture>,
}

/// Owns the client-credentials exchange and the cached token.
///
/// One instance lives for the whole process and is shared by every request.
/// The slot mutex is never held across an await; the exchange itself runs
/// inside a shared future so that at most one token request is on the wire.
pub struct TokenManager {
    slot: Arc<Mutex<TokenSlot>>,
    http_client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    clock: Arc<dyn Clock>,
}

impl TokenManager {
    pub fn new(
        http_client: Client,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            slot: Arc::new(Mutex::new(TokenSlot::default())),
            http_client,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn from_config(config: &ProxyConfig, http_client: Client) -> Self {
        Self::new(
            http_client,
            config.token_endpoint(),
            config.client_id.clone(),
            config.client_secret.clone(),
        )
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn has_credentials(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }

    /// Get a currently valid bearer token.
    ///
    /// Cache hits return without touching the network. A stale or empty cache
    /// either starts the exchange or joins the one already running; all
    /// joiners observe the same outcome.
    pub async fn get_token(&self) -> Result<AccessToken, ProxyError> {
        if !self.has_credentials() {
            tracing::error!("Client ID or Client Secret is not configured");
            return Err(ProxyError::Configuration(
                "credentials not configured".to_string(),
            ));
        }

        let refresh = {
            let mut slot = lock_slot(&self.slot);

            if let Some(state) = &slot.state {
                if state.is_valid_at(self.clock.now()) {
                    return Ok(state.access_token.clone());
                }
            }

            match slot.in_flight.clone() {
                Some(pending) => {
                    tracing::debug!("Joining in-flight token refresh");
                    pending
                }
                None => {
                    tracing::info!("Token is expired or not available. Fetching a new one.");
                    let pending = self.start_refresh();
                    slot.in_flight = Some(pending.clone());
                    pending
                }
            }
        };

        refresh.await
    }

    /// Snapshot of the cached token, valid or not.
    pub fn cached_state(&self) -> Option<TokenState> {
        lock_slot(&self.slot).state.clone()
    }

    /// Whether a call made now would be served from cache.
    pub fn has_valid_token(&self) -> bool {
        let now = self.clock.now();
        lock_slot(&self.slot)
            .state
            .as_ref()
            .is_some_and(|s| s.is_valid_at(now))
    }

    fn start_refresh(&self) -> RefreshFuture {
        let slot = Arc::clone(&self.slot);
        let clock = Arc::clone(&self.clock);
        let client = self.http_client.clone();
        let token_url = self.token_url.clone();
        let client_id = self.client_id.clone();
        let client_secret = self.client_secret.clone();

        async move {
            let result = crate::modules::oauth::request_client_credentials_token(
                &client,
                &token_url,
                &client_id,
                &client_secret,
            )
            .await;

            let mut slot = lock_slot(&slot);
            slot.in_flight = None;

            // On failure the previous state stays as it was
            let token_res = result?;
            let now = clock.now();
            let state = TokenState::issued(
                AccessToken::new(token_res.access_token),
                now,
                token_res.expires_in,
            )
            .inspect_err(|e| tracing::error!("Rejected token response: {}", e))?;

            if !state.is_valid_at(now) {
                tracing::warn!(
                    "Token lifetime of {}s does not exceed the 300s safety margin; it will be refreshed on every call",
                    token_res.expires_in
                );
            }

            tracing::info!("Successfully fetched new access token.");
            let token = state.access_token.clone();
            slot.state = Some(state);
            Ok::<_, ProxyError>(token)
        }
        .boxed()
        .shared()
    }
}

fn lock_slot(slot: &Mutex<TokenSlot>) -> MutexGuard<'_, TokenSlot> {
    slot.lock().unwrap_or_else(|e| e.into_inner())
}
