//! Configuration management for the Spotify tool server.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a single [`Config`] value that is built
//! once at start-up and passed down to the transport, the token cache and the
//! login flow.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the current working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)

use std::{env, net::SocketAddr, path::PathBuf};

use url::Url;

use crate::error::{Error, Result};

pub const APP_DIR: &str = "spotify-mcp";

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";

/// OAuth scopes requested during login.
pub const SCOPES: &[&str] = &[
    // playback
    "user-read-currently-playing",
    "user-read-playback-state",
    "user-modify-playback-state",
    "app-remote-control",
    "streaming",
    // playlists
    "playlist-read-private",
    "playlist-read-collaborative",
    "playlist-modify-private",
    "playlist-modify-public",
    "ugc-image-upload",
    // library
    "user-library-read",
    "user-library-modify",
    // history
    "user-read-playback-position",
    "user-top-read",
    "user-read-recently-played",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub api_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub server_addr: SocketAddr,
    pub token_cache: PathBuf,
    pub logging_path: Option<PathBuf>,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// Call [`load_env`] first so that `.env` files have been merged into the
    /// environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let client_id = get("SPOTIFY_CLIENT_ID")
            .ok_or_else(|| Error::Config("SPOTIFY_CLIENT_ID must be set".into()))?;

        let redirect_uri = normalize_redirect_uri(
            &get("SPOTIFY_REDIRECT_URI").unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
        )?;

        let server_addr = match get("SERVER_ADDRESS") {
            Some(addr) => addr
                .parse()
                .map_err(|e| Error::Config(format!("invalid SERVER_ADDRESS {addr}: {e}")))?,
            None => callback_addr(&redirect_uri)?,
        };

        let token_cache = get("SPOTIFY_TOKEN_CACHE")
            .map(PathBuf::from)
            .unwrap_or_else(default_token_cache);

        Ok(Self {
            client_id,
            client_secret: get("SPOTIFY_CLIENT_SECRET"),
            redirect_uri,
            api_url: get("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            auth_url: get("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: get("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            server_addr,
            token_cache,
            logging_path: get("LOGGING_PATH").map(PathBuf::from),
        })
    }

    /// Space separated scope list as expected by the authorize endpoint.
    pub fn scope(&self) -> String {
        SCOPES.join(" ")
    }
}

/// Loads environment variables from `.env` files.
///
/// The working directory is consulted first, then the platform-specific
/// local data directory (`spotify-mcp/.env`). Variables that are already set
/// are never overridden, and missing files are skipped.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spotify-mcp/.env`
/// - macOS: `~/Library/Application Support/spotify-mcp/.env`
/// - Windows: `%LOCALAPPDATA%/spotify-mcp/.env`
pub async fn load_env() -> Result<()> {
    let local = PathBuf::from(".env");
    if local.is_file() {
        dotenv::from_path(&local).map_err(|e| Error::Config(e.to_string()))?;
    }

    let path = app_data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }
    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| Error::Config(e.to_string()))?;
    }

    Ok(())
}

/// Rewrites a `localhost` redirect URI to `127.0.0.1`.
///
/// Spotify no longer accepts `localhost` as a loopback redirect host. Port,
/// path and query are kept as written.
pub fn normalize_redirect_uri(uri: &str) -> Result<String> {
    let mut parsed =
        Url::parse(uri).map_err(|e| Error::Config(format!("invalid redirect uri {uri}: {e}")))?;

    // host_str is already lowercased by the parser
    if parsed.host_str() != Some("localhost") {
        return Ok(uri.to_string());
    }

    parsed
        .set_host(Some("127.0.0.1"))
        .map_err(|e| Error::Config(format!("invalid redirect uri {uri}: {e}")))?;
    Ok(parsed.to_string())
}

fn callback_addr(redirect_uri: &str) -> Result<SocketAddr> {
    let parsed = Url::parse(redirect_uri)
        .map_err(|e| Error::Config(format!("invalid redirect uri {redirect_uri}: {e}")))?;
    let host = parsed.host_str().unwrap_or("127.0.0.1");
    let port = parsed.port_or_known_default().unwrap_or(8888);

    format!("{host}:{port}")
        .parse()
        .map_err(|e| Error::Config(format!("redirect uri host is not a socket address: {e}")))
}

fn app_data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

fn default_token_cache() -> PathBuf {
    let mut path = app_data_dir();
    path.push("cache/token.json");
    path
}
