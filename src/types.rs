//! Serde shapes of the provider's payloads and the OAuth token types.
//!
//! Raw types mirror the Web API's JSON closely but only keep the fields the
//! projection layer reads. `id` and `name` are required on every entity;
//! every other field is optional and defaults to absent when missing.

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    error::{Error, Result},
    records::EntityKind,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// Token endpoint response, for both code exchange and refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// A playback device as reported by the provider.
///
/// Fields the adapter does not interpret are kept verbatim in `extra` so the
/// record round-trips to callers unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_percent: Option<u8>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPage<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub total: Option<u64>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl<T> RawPage<T> {
    pub fn of(items: Vec<T>) -> Self {
        Self {
            items,
            total: None,
            limit: None,
            offset: None,
            next: None,
            previous: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawArtistRef {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTrack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<RawArtistRef>,
    #[serde(default)]
    pub album: Option<RawAlbum>,
    #[serde(default)]
    pub track_number: Option<u32>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub is_playing: Option<bool>,
    #[serde(default)]
    pub is_playable: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAlbum {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<RawArtistRef>,
    #[serde(default)]
    pub tracks: Option<RawPage<Option<RawTrack>>>,
    #[serde(default)]
    pub total_tracks: Option<u32>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawOwner {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// One playlist entry. Local files come back with a null `id`; such
/// entries, and any other track that fails to decode, read as absent so the
/// rest of the playlist survives.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlaylistItem {
    #[serde(default, deserialize_with = "lenient_track")]
    pub track: Option<RawTrack>,
}

fn lenient_track<'de, D>(deserializer: D) -> std::result::Result<Option<RawTrack>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(track) => Ok(Some(track)),
        Err(e) => {
            debug!(error = %e, "skipping undecodable playlist track");
            Ok(None)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPlaylist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub owner: Option<RawOwner>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tracks: Option<RawPage<Option<RawPlaylistItem>>>,
}

/// A raw entity of any kind, tagged by its [`EntityKind`].
#[derive(Debug, Clone)]
pub enum RawEntity {
    Track(RawTrack),
    Album(RawAlbum),
    Artist(RawArtist),
    Playlist(RawPlaylist),
}

impl RawEntity {
    /// Decodes a raw payload of the given kind. JSON `null` decodes to `None`.
    pub fn decode(kind: EntityKind, value: Value) -> Result<Option<Self>> {
        Ok(match kind {
            EntityKind::Track => decode_entity(kind, value)?.map(RawEntity::Track),
            EntityKind::Album => decode_entity(kind, value)?.map(RawEntity::Album),
            EntityKind::Artist => decode_entity(kind, value)?.map(RawEntity::Artist),
            EntityKind::Playlist => decode_entity(kind, value)?.map(RawEntity::Playlist),
        })
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            RawEntity::Track(_) => EntityKind::Track,
            RawEntity::Album(_) => EntityKind::Album,
            RawEntity::Artist(_) => EntityKind::Artist,
            RawEntity::Playlist(_) => EntityKind::Playlist,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSearchResults {
    #[serde(default)]
    pub tracks: Option<RawPage<Option<RawTrack>>>,
    #[serde(default)]
    pub albums: Option<RawPage<Option<RawAlbum>>>,
    #[serde(default)]
    pub artists: Option<RawPage<Option<RawArtist>>>,
    #[serde(default)]
    pub playlists: Option<RawPage<Option<RawPlaylist>>>,
}

/// `/me/player` and `/me/player/currently-playing`.
///
/// `item` stays untyped until `currently_playing_type` says it is a track.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlayback {
    #[serde(default)]
    pub is_playing: Option<bool>,
    #[serde(default)]
    pub currently_playing_type: Option<String>,
    #[serde(default)]
    pub item: Option<Value>,
    #[serde(default)]
    pub progress_ms: Option<u64>,
    #[serde(default)]
    pub device: Option<Device>,
    #[serde(default)]
    pub shuffle_state: Option<bool>,
    #[serde(default)]
    pub repeat_state: Option<String>,
}

impl RawPlayback {
    pub fn track_item(&self) -> Result<Option<RawTrack>> {
        if self.currently_playing_type.as_deref() != Some("track") {
            return Ok(None);
        }
        match &self.item {
            Some(item) => decode_entity(EntityKind::Track, item.clone()),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawQueue {
    #[serde(default)]
    pub queue: Vec<Option<RawTrack>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDevices {
    #[serde(default)]
    pub devices: Vec<Device>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSavedTrack {
    #[serde(default)]
    pub track: Option<RawTrack>,
}

/// Shape shared by `/artists/{id}/top-tracks` and `/recommendations`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTrackList {
    #[serde(default)]
    pub tracks: Vec<Option<RawTrack>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawFollowers {
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub followers: Option<RawFollowers>,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSnapshot {
    #[serde(default)]
    pub snapshot_id: Option<String>,
}

/// Decodes an entity payload, reporting contract violations against `kind`.
pub fn decode_entity<T: DeserializeOwned>(kind: EntityKind, value: Value) -> Result<Option<T>> {
    if value.is_null() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|source| Error::MalformedPayload { kind, source })
}

/// Decodes a non-entity payload. JSON `null` decodes to `None`.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<Option<T>> {
    if value.is_null() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(value)?))
}
