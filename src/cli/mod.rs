//! # CLI Module
//!
//! Command implementations behind the `spotify-mcp` binary.
//!
//! - [`auth`] - Interactive OAuth 2.0 PKCE login; stores the token in the
//!   token cache used by every other command.
//! - [`serve`] - Runs the stdio tool server on top of the cached token.
//!
//! ## Usage
//!
//! ```bash
//! spotify-mcp auth         # authorize once, opens a browser
//! spotify-mcp              # serve tools over stdio (default)
//! spotify-mcp completions zsh
//! ```
//!
//! stdout belongs to the tool protocol while serving, so everything a human
//! should read goes through `tracing` (stderr or the log files).

mod auth;
mod serve;

pub use auth::auth;
pub use serve::serve;
