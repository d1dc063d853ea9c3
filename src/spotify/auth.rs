use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;
use tracing::{debug, info};
use url::Url;

use crate::{
    config::Config,
    error::{Error, Result},
    management::TokenManager,
    server::{CallbackState, start_api_server},
    success,
    types::{PkceToken, Token},
    utils, warning,
};

const LOGIN_TIMEOUT: Duration = Duration::from_secs(60);
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Runs the OAuth 2.0 PKCE authorization code flow.
///
/// 1. Generates a code verifier and its S256 challenge
/// 2. Starts the local callback server on the configured address
/// 3. Opens the authorization URL in the browser (or prints it)
/// 4. Waits up to 60 seconds for the callback to exchange the code
/// 5. Persists the token to the token cache
///
/// The callback server is shut down once the flow ends, whether a token
/// arrived or not.
pub async fn auth(config: Arc<Config>) -> Result<Token> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    let state = CallbackState {
        pkce: Arc::new(Mutex::new(Some(PkceToken {
            code_verifier,
            token: None,
        }))),
        config: Arc::clone(&config),
    };

    let server_state = state.clone();
    let server = tokio::spawn(async move { start_api_server(server_state).await });

    let auth_url = authorize_url(&config, &code_challenge)?;
    debug!(url = %auth_url, "opening authorization url");
    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let token = wait_for_token(&state.pkce).await;
    server.abort();

    let Some(token) = token else {
        return Err(Error::Auth("authentication failed or timed out".into()));
    };

    let manager = TokenManager::new(token.clone(), &config);
    manager.persist().await?;
    info!(path = %manager.path().display(), "token cached");

    success!("Authentication successful!");
    Ok(token)
}

/// Authorization endpoint URL carrying the PKCE challenge and scopes.
pub fn authorize_url(config: &Config, code_challenge: &str) -> Result<Url> {
    let scope = config.scope();
    Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("code_challenge", code_challenge),
            ("code_challenge_method", "S256"),
            ("scope", scope.as_str()),
        ],
    )
    .map_err(|e| Error::Config(format!("invalid authorization url {}: {e}", config.auth_url)))
}

async fn wait_for_token(state: &Mutex<Option<PkceToken>>) -> Option<Token> {
    let start = Instant::now();

    while start.elapsed() < LOGIN_TIMEOUT {
        if let Some(token) = state.lock().await.as_ref().and_then(|p| p.token.clone()) {
            return Some(token);
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }

    None
}
