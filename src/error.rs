//! Error taxonomy shared by every layer of the adapter.
//!
//! Absence of an upstream entity is never an error: the projection layer
//! reports it as `None` or an empty collection. Everything else surfaces as
//! one of the variants below and travels to the caller unchanged. Tool
//! callers receive the serialized [`ErrorReport`], which classifies provider
//! failures into stable [`ErrorCode`]s.

use serde::Serialize;
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::records::EntityKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("spotify api error: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("malformed {kind} payload: {source}")]
    MalformedPayload {
        kind: EntityKind,
        source: serde_json::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Error::InvalidState(message.into())
    }

    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Error::Transport {
            status,
            message: message.into(),
        }
    }

    /// HTTP status of the failed provider call, if the failure had one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Transport { status, .. } => *status,
            _ => None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Error::InvalidArgument(_) => ErrorCode::ValidationError,
            Error::InvalidState(_) => ErrorCode::InvalidState,
            Error::Auth(_) => ErrorCode::AuthenticationFailed,
            Error::Transport { status, message } => classify(*status, message),
            Error::MalformedPayload { .. } | Error::Json(_) => ErrorCode::InvalidRequest,
            Error::Config(_) | Error::Io(_) => ErrorCode::UnknownError,
        }
    }

    pub fn suggestion(&self) -> Option<&'static str> {
        self.code().suggestion()
    }

    pub fn report(&self) -> ErrorReport {
        let mut details = Map::new();
        match self {
            Error::Transport { status, message } => {
                if let Some(status) = status {
                    details.insert("http_status".into(), json!(status));
                }
                details.insert("original_error".into(), json!(message));
            }
            Error::MalformedPayload { kind, .. } => {
                details.insert("kind".into(), json!(kind.as_str()));
            }
            _ => {}
        }

        ErrorReport {
            error: ErrorBody {
                code: self.code(),
                message: self.to_string(),
                details: Value::Object(details),
                suggestion: self.suggestion(),
            },
        }
    }
}

/// Stable, caller-facing classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    AuthenticationFailed,
    TokenExpired,
    InsufficientScope,
    ApiRateLimited,
    ApiUnavailable,
    InvalidRequest,
    NoActiveDevice,
    DeviceNotFound,
    PremiumRequired,
    TrackNotFound,
    PlaylistNotFound,
    UserNotFound,
    PlaybackRestricted,
    UnknownError,
    ValidationError,
    InvalidState,
}

impl ErrorCode {
    pub fn suggestion(self) -> Option<&'static str> {
        match self {
            ErrorCode::TokenExpired => Some("Please re-authenticate with Spotify"),
            ErrorCode::AuthenticationFailed => {
                Some("Check your Spotify API credentials or run `spotify-mcp auth`")
            }
            ErrorCode::PremiumRequired => {
                Some("Upgrade to Spotify Premium to use playback features")
            }
            ErrorCode::InsufficientScope => Some("Re-authenticate with required scopes"),
            ErrorCode::TrackNotFound => Some("Check the track ID and try again"),
            ErrorCode::PlaylistNotFound => Some("Check the playlist ID and try again"),
            ErrorCode::ApiRateLimited => Some("Wait a moment before making more requests"),
            ErrorCode::ApiUnavailable => Some("Try again in a few minutes"),
            ErrorCode::NoActiveDevice => Some("Open Spotify on a device to start playback"),
            ErrorCode::DeviceNotFound => Some("Check available devices and try again"),
            ErrorCode::ValidationError => Some("Check the input parameters and try again"),
            _ => None,
        }
    }
}

fn classify(status: Option<u16>, message: &str) -> ErrorCode {
    let message = message.to_lowercase();

    match status {
        Some(401) if message.contains("token expired") => return ErrorCode::TokenExpired,
        Some(401) => return ErrorCode::AuthenticationFailed,
        Some(403) if message.contains("premium") => return ErrorCode::PremiumRequired,
        Some(403) if message.contains("scope") => return ErrorCode::InsufficientScope,
        Some(403) => return ErrorCode::PlaybackRestricted,
        Some(404) if message.contains("track") => return ErrorCode::TrackNotFound,
        Some(404) if message.contains("playlist") => return ErrorCode::PlaylistNotFound,
        Some(404) if message.contains("user") => return ErrorCode::UserNotFound,
        Some(429) => return ErrorCode::ApiRateLimited,
        Some(s) if s >= 500 => return ErrorCode::ApiUnavailable,
        _ => {}
    }

    if message.contains("no active device") {
        ErrorCode::NoActiveDevice
    } else if message.contains("device not found") {
        ErrorCode::DeviceNotFound
    } else {
        ErrorCode::UnknownError
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<&'static str>,
}
