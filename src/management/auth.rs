use std::path::{Path, PathBuf};

use chrono::Utc;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::{Error, Result},
    types::{Token, TokenResponse},
};

/// Seconds before the real expiry at which a token is already treated as
/// expired.
const EXPIRY_MARGIN: u64 = 240;
const DEFAULT_EXPIRES_IN: u64 = 3600;

/// Owns the cached OAuth token and its file on disk.
pub struct TokenManager {
    token: Token,
    path: PathBuf,
    token_url: String,
    client_id: String,
    client_secret: Option<String>,
}

impl TokenManager {
    pub fn new(token: Token, config: &Config) -> Self {
        TokenManager {
            token,
            path: config.token_cache.clone(),
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        }
    }

    /// Reads the token cache configured in `config`.
    pub async fn load(config: &Config) -> Result<Self> {
        let path = &config.token_cache;
        let content = async_fs::read_to_string(path).await.map_err(|e| {
            Error::Auth(format!(
                "no cached token at {} ({e}), run `spotify-mcp auth` first",
                path.display()
            ))
        })?;
        let token: Token = serde_json::from_str(&content)
            .map_err(|e| Error::Auth(format!("unreadable token cache: {e}")))?;

        debug!(path = %path.display(), "loaded token cache");
        Ok(Self::new(token, config))
    }

    pub async fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp() as u64)
    }

    pub fn is_expired_at(&self, now: u64) -> bool {
        let expires_at = (self.token.obtained_at + self.token.expires_in)
            .saturating_sub(EXPIRY_MARGIN);
        now >= expires_at
    }

    /// Exchanges the refresh token for a new access token and persists it.
    ///
    /// The previous refresh token is kept when the provider does not rotate
    /// it. A failure to write the cache is logged but does not fail the
    /// refresh.
    pub async fn refresh(&mut self, client: &Client) -> Result<()> {
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", self.token.refresh_token.as_str()),
            ("client_id", self.client_id.as_str()),
        ];
        let response = token_request(
            client,
            &self.token_url,
            &self.client_id,
            self.client_secret.as_deref(),
            &form,
        )
        .await?;

        let refresh_token = response
            .refresh_token
            .clone()
            .unwrap_or_else(|| self.token.refresh_token.clone());
        let scope = response
            .scope
            .clone()
            .unwrap_or_else(|| self.token.scope.clone());
        self.token = into_token(response, refresh_token, scope);
        info!("access token refreshed");

        if let Err(e) = self.persist().await {
            warn!(error = %e, "failed to persist refreshed token");
        }
        Ok(())
    }

    pub fn access_token(&self) -> &str {
        &self.token.access_token
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Trades an authorization code and its PKCE verifier for a token.
pub async fn exchange_code(config: &Config, code: &str, verifier: &str) -> Result<Token> {
    let form = [
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", config.redirect_uri.as_str()),
        ("client_id", config.client_id.as_str()),
        ("code_verifier", verifier),
    ];
    let response = token_request(
        &Client::new(),
        &config.token_url,
        &config.client_id,
        config.client_secret.as_deref(),
        &form,
    )
    .await?;

    let refresh_token = response.refresh_token.clone().ok_or_else(|| {
        Error::Auth("token endpoint did not return a refresh token".into())
    })?;
    let scope = response.scope.clone().unwrap_or_default();
    Ok(into_token(response, refresh_token, scope))
}

async fn token_request(
    client: &Client,
    token_url: &str,
    client_id: &str,
    client_secret: Option<&str>,
    form: &[(&str, &str)],
) -> Result<TokenResponse> {
    let mut request = client.post(token_url).form(form);
    if let Some(secret) = client_secret {
        request = request.basic_auth(client_id, Some(secret));
    }

    let response = request
        .send()
        .await
        .map_err(|e| Error::Auth(format!("token request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Auth(format!("token endpoint returned {status}: {body}")));
    }

    response
        .json()
        .await
        .map_err(|e| Error::Auth(format!("invalid token response: {e}")))
}

fn into_token(response: TokenResponse, refresh_token: String, scope: String) -> Token {
    Token {
        access_token: response.access_token,
        refresh_token,
        scope,
        expires_in: response.expires_in.unwrap_or(DEFAULT_EXPIRES_IN),
        obtained_at: Utc::now().timestamp() as u64,
    }
}
