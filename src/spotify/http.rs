use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode, header::CONTENT_TYPE};
use serde_json::Value;
use tokio::{sync::Mutex, time::sleep};
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::{Error, Result},
    management::TokenManager,
    spotify::transport::{ApiRequest, Body, Credentials, Method, Transport},
};

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(10);

/// reqwest backed transport against the Spotify Web API.
///
/// Owns the token cache behind an async mutex so refreshes never race with
/// requests reading the access token.
pub struct HttpTransport {
    client: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
    retry_delay: Duration,
}

impl HttpTransport {
    pub fn new(config: &Config, tokens: TokenManager) -> Self {
        Self {
            client: Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            tokens: Mutex::new(tokens),
            retry_delay: RETRY_DELAY,
        }
    }

    /// Loads the token cache and builds a transport from it.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let tokens = TokenManager::load(config).await?;
        Ok(Self::new(config, tokens))
    }

    /// Delay between attempts after a 502 from the provider.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    fn build(&self, request: &ApiRequest, token: &str) -> RequestBuilder {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        let url = format!("{}{}", self.api_url, request.path);

        let mut builder = self.client.request(method, url).bearer_auth(token);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        match &request.body {
            Some(Body::Json(body)) => builder.json(body),
            Some(Body::Jpeg(data)) => builder
                .header(CONTENT_TYPE, "image/jpeg")
                .body(data.clone()),
            None => builder,
        }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        let token = {
            let mut tokens = self.tokens.lock().await;
            if tokens.is_expired() {
                info!(%request, "access token expired, refreshing before request");
                tokens.refresh(&self.client).await?;
            }
            tokens.access_token().to_string()
        };
        let plain_text_ok = matches!(request.body, Some(Body::Jpeg(_)));

        let mut attempt = 1;
        loop {
            debug!(%request, attempt, "sending request");
            let response = self
                .build(&request, &token)
                .send()
                .await
                .map_err(|e| Error::transport(e.status().map(|s| s.as_u16()), e.to_string()))?;

            let status = response.status();
            if status == StatusCode::BAD_GATEWAY && attempt < MAX_ATTEMPTS {
                warn!(%request, attempt, "bad gateway, retrying");
                attempt += 1;
                sleep(self.retry_delay).await;
                continue;
            }

            return read_body(response, plain_text_ok).await;
        }
    }
}

impl Credentials for HttpTransport {
    async fn token_expired(&self) -> Result<bool> {
        Ok(self.tokens.lock().await.is_expired())
    }

    async fn refresh_token(&self) -> Result<()> {
        self.tokens.lock().await.refresh(&self.client).await
    }
}

/// Image uploads answer with an empty or plain text body, so `plain_text_ok`
/// maps an unparseable success body to `Value::Null` instead of an error.
async fn read_body(response: Response, plain_text_ok: bool) -> Result<Value> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| Error::transport(Some(status.as_u16()), e.to_string()))?;

    if !status.is_success() {
        return Err(Error::transport(
            Some(status.as_u16()),
            provider_message(status, &text),
        ));
    }

    if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
        return Ok(Value::Null);
    }

    match serde_json::from_str(&text) {
        Ok(value) => Ok(value),
        Err(_) if plain_text_ok => Ok(Value::Null),
        Err(e) => {
            warn!(status = status.as_u16(), error = %e, "unparseable response body");
            Err(Error::transport(
                Some(status.as_u16()),
                format!("unparseable response body: {e}"),
            ))
        }
    }
}

/// Extracts `error.message` from a provider error body, falling back to the
/// raw body or the status reason.
fn provider_message(status: StatusCode, body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let message = parsed.as_ref().and_then(|v| match &v["error"] {
        Value::Object(error) => error.get("message").and_then(Value::as_str),
        Value::String(error) => v["error_description"].as_str().or(Some(error.as_str())),
        _ => None,
    });

    match message {
        Some(message) => message.to_string(),
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    }
}
