//! Normalized domain records.
//!
//! Every record is a point-in-time snapshot built by the projection layer
//! from a raw provider payload. Records only serialize; they are handed to
//! callers as JSON and never read back.

use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::{
    error::{Error, Result},
    types::{Device, Image},
};

/// The four entity kinds the provider can search and look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Track,
    Album,
    Artist,
    Playlist,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Track,
        EntityKind::Album,
        EntityKind::Artist,
        EntityKind::Playlist,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Track => "track",
            EntityKind::Album => "album",
            EntityKind::Artist => "artist",
            EntityKind::Playlist => "playlist",
        }
    }

    /// Key of this kind's collection in search payloads and results.
    pub fn collection_key(self) -> &'static str {
        match self {
            EntityKind::Track => "tracks",
            EntityKind::Album => "albums",
            EntityKind::Artist => "artists",
            EntityKind::Playlist => "playlists",
        }
    }

    /// Parses a comma delimited kind list such as `"track,album"`.
    ///
    /// Tokens are trimmed and repeated kinds collapse to their first
    /// occurrence. Any unknown or empty token fails the whole list.
    pub fn parse_list(kinds: &str) -> Result<Vec<EntityKind>> {
        let mut parsed = Vec::new();
        for token in kinds.split(',') {
            let kind: EntityKind = token.parse()?;
            if !parsed.contains(&kind) {
                parsed.push(kind);
            }
        }
        Ok(parsed)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "track" => Ok(EntityKind::Track),
            "album" => Ok(EntityKind::Album),
            "artist" => Ok(EntityKind::Artist),
            "playlist" => Ok(EntityKind::Playlist),
            other => Err(Error::invalid_argument(format!(
                "unknown item type '{other}', expected one of track, album, artist, playlist"
            ))),
        }
    }
}

/// Artist credit of a track or album.
///
/// Flattened into the owning record as either `artist` or `artists`, so the
/// two keys can never appear together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Credits {
    #[serde(rename = "artist")]
    Single(String),
    #[serde(rename = "artists")]
    Multiple(Vec<String>),
}

impl Credits {
    pub fn from_names(mut names: Vec<String>) -> Self {
        if names.len() == 1 {
            Credits::Single(names.remove(0))
        } else {
            Credits::Multiple(names)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub credits: Credits,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<Album>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_playing: Option<bool>,
    /// Only ever `Some(false)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_playable: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub credits: Credits,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracks: Option<Vec<Track>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tracks: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub owner: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracks: Option<Vec<Track>>,
}

/// A projected entity of any kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Track(Track),
    Album(Album),
    Artist(Artist),
    Playlist(Playlist),
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::Track(_) => EntityKind::Track,
            Record::Album(_) => EntityKind::Album,
            Record::Artist(_) => EntityKind::Artist,
            Record::Playlist(_) => EntityKind::Playlist,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Record::Track(t) => &t.id,
            Record::Album(a) => &a.id,
            Record::Artist(a) => &a.id,
            Record::Playlist(p) => &p.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Record::Track(t) => &t.name,
            Record::Album(a) => &a.name,
            Record::Artist(a) => &a.name,
            Record::Playlist(p) => &p.name,
        }
    }
}

/// Artist lookup result, extended with the artist's catalogue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistInfo {
    #[serde(flatten)]
    pub artist: Artist,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_tracks: Option<Vec<Track>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub albums: Option<Vec<Album>>,
}

/// Detailed lookup result of a single item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ItemInfo {
    Track(Track),
    Album(Album),
    Artist(ArtistInfo),
    Playlist(Playlist),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlaybackState {
    pub is_playing: bool,
    #[serde(rename = "current_track")]
    pub track: Option<Track>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_percent: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shuffle_state: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Queue {
    pub currently_playing: Option<Track>,
    pub queue: Vec<Track>,
}

/// Receipt of a playlist mutation.
///
/// `snapshot_id` is empty when the provider did not return one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotReceipt {
    pub snapshot_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlaylistPage {
    pub items: Vec<Playlist>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl PlaylistPage {
    pub fn empty(limit: u32, offset: u32) -> Self {
        Self {
            limit,
            offset,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub product: Option<String>,
    pub followers: u64,
    pub images: Vec<Image>,
}
