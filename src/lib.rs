//! Spotify Tool Server Library
//!
//! This library adapts the Spotify Web API into a small set of domain
//! operations (playback control, search, queue management and playlist CRUD)
//! for automated callers. Provider payloads are normalized into compact
//! records, and device sensitive operations run behind a session guard that
//! refreshes expired tokens and picks a playback device when none is active.
//!
//! # Modules
//!
//! - `aggregate` - Grouping of multi-kind search results
//! - `api` - HTTP endpoints of the local login callback server
//! - `cli` - Command implementations behind the binary
//! - `config` - Configuration from the environment and `.env` files
//! - `error` - Error taxonomy and caller-facing error reports
//! - `logging` - Tracing subscriber setup
//! - `management` - On-disk token cache
//! - `mcp` - Stdio JSON-RPC tool server
//! - `projection` - Raw payload to record projection
//! - `records` - Normalized domain records
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Domain client, transport and session guard
//! - `types` - Raw provider payload shapes and token types
//! - `utils` - PKCE helpers and the search query builder
//!
//! # Example
//!
//! ```
//! use spotify_mcp::{config::{self, Config}, spotify::{SpotifyClient, http::HttpTransport}};
//!
//! #[tokio::main]
//! async fn main() -> spotify_mcp::Result<()> {
//!     config::load_env().await?;
//!     let config = Config::from_env()?;
//!     let client = SpotifyClient::new(HttpTransport::from_config(&config).await?);
//!     let results = client.search("Never Gonna Give You Up", "track", 10).await?;
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod management;
pub mod mcp;
pub mod projection;
pub mod records;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::{Error, Result};

/// Prints a success message with a green checkmark.
///
/// Used by interactive commands only; the tool server never writes to the
/// console outside of the protocol.
///
/// # Example
///
/// ```
/// success!("Authentication successful!");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a warning message with a yellow exclamation mark to stderr.
///
/// # Example
///
/// ```
/// warning!("Failed to open browser, open {} manually", url);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark to stderr and exits
/// the program with status 1.
///
/// Reserved for start-up failures in the binary, before or outside of the
/// tool protocol.
#[macro_export]
macro_rules! fatal {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}
