//! # Spotify Integration Module
//!
//! This module is the adapter between the tool server and the Spotify Web API.
//! It turns the API's nested, inconsistently shaped payloads into the compact
//! records of [`crate::records`] and keeps device sensitive calls working
//! across expired tokens and idle playback devices.
//!
//! ## Architecture
//!
//! ```text
//! Tool server (mcp)
//!          ↓
//! SpotifyClient (playback, library, playlist operations)
//!     ├── SessionGuard (token refresh, device injection)
//!     └── projection / aggregate (payload normalization)
//!          ↓
//! Transport + Credentials (HttpTransport: reqwest, TokenManager)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! - [`transport`] - The call primitive the client is written against and the
//!   request description it takes.
//! - [`http`] - reqwest implementation of [`transport::Transport`] and
//!   [`transport::Credentials`], with bounded retry on bad gateway responses.
//! - [`guard`] - Device selection and the session guard wrapping every device
//!   sensitive operation.
//! - [`auth`] - Interactive OAuth 2.0 PKCE login.
//!
//! The operations themselves are split by area: `playback` (player, queue and
//! devices), `library` (search, lookups, user library) and `playlist`
//! (playlist CRUD and cover images).
//!
//! ## Error Handling
//!
//! Absent entities come back as `None` or empty collections. Every other
//! failure is logged with the operation name and returned unchanged, so a
//! provider status code survives all the way to the tool caller.

pub mod auth;
pub mod guard;
pub mod http;
mod library;
mod playback;
mod playlist;
pub mod transport;

use serde_json::Value;
use tracing::error;

use crate::{
    error::Result,
    spotify::{
        guard::SessionGuard,
        transport::{ApiRequest, Credentials, Transport},
    },
    types::Device,
};

/// Domain client over any transport.
pub struct SpotifyClient<T> {
    transport: T,
}

impl<T> SpotifyClient<T>
where
    T: Transport + Credentials,
{
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn session(&self) -> SessionGuard<'_, T> {
        SessionGuard::new(&self.transport)
    }

    async fn call(&self, operation: &'static str, request: ApiRequest) -> Result<Value> {
        let target = request.to_string();
        self.transport
            .send(request)
            .await
            .inspect_err(|e| error!(operation, request = %target, error = %e, "spotify call failed"))
    }
}

/// Device a guarded call should target: the caller's choice first, then the
/// candidate injected by the guard.
fn target_device(device: Option<&str>, candidate: Option<Device>) -> Option<String> {
    device
        .map(str::to_string)
        .or_else(|| candidate.and_then(|d| d.id))
}
