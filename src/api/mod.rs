//! # API Module
//!
//! HTTP endpoints of the local server that runs only while `spotify-mcp auth`
//! is waiting for the OAuth redirect.
//!
//! - [`callback`] - Receives the authorization code, exchanges it together
//!   with the PKCE verifier for a token and hands the token back to the
//!   waiting login flow.
//! - [`health`] - Reports status, name and version.
//!
//! Both are plain axum handlers; routing lives in [`crate::server`].

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
