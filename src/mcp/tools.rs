//! Tool definitions and dispatch.
//!
//! Every tool takes a flat argument object. The `action` field, where a tool
//! has one, is a closed enum so an unknown action fails argument decoding
//! with a message naming it.

use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::info;

use crate::{
    error::{Error, Result},
    records::EntityKind,
    spotify::{
        SpotifyClient,
        transport::{Credentials, Transport},
    },
};

#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Manages the current playback with the following actions:
/// get (current track), start (play a track or resume), pause, skip.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct Playback {
    /// Action to perform.
    pub action: PlaybackAction,
    /// Track to play for the `start` action. If omitted, resumes current playback.
    #[serde(default)]
    pub track_id: Option<String>,
    /// Number of tracks to skip for the `skip` action.
    #[serde(default = "one")]
    pub num_skips: u32,
}

#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackAction {
    Get,
    Start,
    Pause,
    Skip,
}

/// Search for tracks, albums, artists, or playlists on Spotify.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct Search {
    /// Query term.
    pub query: String,
    /// Type of items to search for (track, album, artist, playlist, or a
    /// comma separated combination).
    #[serde(default = "default_qtype")]
    pub qtype: String,
    /// Maximum number of items to return.
    #[serde(default = "default_search_limit")]
    pub limit: u32,
}

/// Manage the playback queue: get the queue or add a track.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct Queue {
    /// Action to perform.
    pub action: QueueAction,
    /// Track to add to the queue (required for `add`).
    #[serde(default)]
    pub track_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QueueAction {
    Add,
    Get,
}

/// Get detailed information about a Spotify item (track, album, artist, or
/// playlist). Albums and playlists include their tracks; artists include
/// their albums and top tracks.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetInfo {
    /// ID of the item.
    pub item_id: String,
    /// Type of item: track, album, artist or playlist.
    #[serde(default = "default_qtype")]
    pub qtype: String,
}

/// Manage playlists: create, update details, or get details of a playlist.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct PlaylistManage {
    /// Action to perform.
    pub action: PlaylistManageAction,
    /// Playlist ID (required for `update_details` and `get`).
    #[serde(default)]
    pub playlist_id: Option<String>,
    /// Playlist name (required for `create`, optional for `update_details`).
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the playlist should be public.
    #[serde(default)]
    pub public: Option<bool>,
}

#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlaylistManageAction {
    Create,
    UpdateDetails,
    Get,
}

/// Manage playlist items: add, remove, or update items in a playlist.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct PlaylistItems {
    /// Action to perform.
    pub action: PlaylistItemsAction,
    pub playlist_id: String,
    /// Spotify track URIs to add, remove or replace the items with.
    pub uris: Vec<String>,
    /// Position to insert tracks at (for `add`).
    #[serde(default)]
    pub position: Option<u32>,
    /// Start index for reordering (for `update`).
    #[serde(default)]
    pub range_start: Option<u32>,
    /// Position to insert before (for `update`).
    #[serde(default)]
    pub insert_before: Option<u32>,
    /// Number of items to move (for `update`).
    #[serde(default)]
    pub range_length: Option<u32>,
    /// The playlist's snapshot ID.
    #[serde(default)]
    pub snapshot_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlaylistItemsAction {
    Add,
    Remove,
    Update,
}

/// Get a user's playlists.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UserPlaylists {
    /// User ID. If omitted, returns the current user's playlists.
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default = "default_playlist_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

/// Manage a playlist's cover image: get it or upload a custom one.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct PlaylistCover {
    /// Action to perform.
    pub action: PlaylistCoverAction,
    pub playlist_id: String,
    /// Base64 encoded JPEG image data (required for `upload`).
    #[serde(default)]
    pub image_data: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlaylistCoverAction {
    Get,
    Upload,
}

fn one() -> u32 {
    1
}

fn default_qtype() -> String {
    EntityKind::Track.as_str().to_string()
}

fn default_search_limit() -> u32 {
    10
}

fn default_playlist_limit() -> u32 {
    20
}

pub fn list_tools() -> Vec<ToolDefinition> {
    vec![
        definition::<Playback>(
            "SpotifyPlayback",
            "Manages the current playback with the following actions: get, start, pause, skip.",
        ),
        definition::<Search>(
            "SpotifySearch",
            "Search for tracks, albums, artists, or playlists on Spotify.",
        ),
        definition::<Queue>(
            "SpotifyQueue",
            "Manage the playback queue - get the queue or add tracks.",
        ),
        definition::<GetInfo>(
            "SpotifyGetInfo",
            "Get detailed information about a Spotify item (track, album, artist, or playlist).",
        ),
        definition::<PlaylistManage>(
            "SpotifyPlaylistManage",
            "Manage playlists - create, update details, or get details of playlists.",
        ),
        definition::<PlaylistItems>(
            "SpotifyPlaylistItems",
            "Manage playlist items - add, remove, or update items in a playlist.",
        ),
        definition::<UserPlaylists>("SpotifyUserPlaylists", "Get a user's playlists."),
        definition::<PlaylistCover>(
            "SpotifyPlaylistCover",
            "Manage playlist cover image - get or upload custom cover.",
        ),
    ]
}

fn definition<A: JsonSchema>(name: &'static str, description: &'static str) -> ToolDefinition {
    ToolDefinition {
        name,
        description,
        input_schema: serde_json::to_value(schema_for!(A)).unwrap_or(Value::Null),
    }
}

/// Runs a tool and returns the text shown to the caller.
pub async fn call_tool<T>(client: &SpotifyClient<T>, name: &str, arguments: Value) -> Result<String>
where
    T: Transport + Credentials,
{
    info!(tool = name, "tool called");

    match name {
        "SpotifyPlayback" => playback(client, parse(name, arguments)?).await,
        "SpotifySearch" => search(client, parse(name, arguments)?).await,
        "SpotifyQueue" => queue(client, parse(name, arguments)?).await,
        "SpotifyGetInfo" => get_info(client, parse(name, arguments)?).await,
        "SpotifyPlaylistManage" => playlist_manage(client, parse(name, arguments)?).await,
        "SpotifyPlaylistItems" => playlist_items(client, parse(name, arguments)?).await,
        "SpotifyUserPlaylists" => user_playlists(client, parse(name, arguments)?).await,
        "SpotifyPlaylistCover" => playlist_cover(client, parse(name, arguments)?).await,
        other => Err(Error::invalid_argument(format!("unknown tool: {other}"))),
    }
}

async fn playback<T>(client: &SpotifyClient<T>, args: Playback) -> Result<String>
where
    T: Transport + Credentials,
{
    match args.action {
        PlaybackAction::Get => match client.current_track().await? {
            Some(track) => pretty(&track),
            None => Ok("No track playing.".into()),
        },
        PlaybackAction::Start => {
            client.start_playback(args.track_id.as_deref(), None).await?;
            Ok("Playback starting with no errors.".into())
        }
        PlaybackAction::Pause => {
            client.pause_playback(None).await?;
            Ok("Playback paused successfully.".into())
        }
        PlaybackAction::Skip => {
            client.skip_track(args.num_skips).await?;
            Ok("Skipped to next track.".into())
        }
    }
}

async fn search<T>(client: &SpotifyClient<T>, args: Search) -> Result<String>
where
    T: Transport + Credentials,
{
    let results = client.search(&args.query, &args.qtype, args.limit).await?;
    pretty(&results)
}

async fn queue<T>(client: &SpotifyClient<T>, args: Queue) -> Result<String>
where
    T: Transport + Credentials,
{
    match args.action {
        QueueAction::Add => {
            let track_id = required(args.track_id.as_deref(), "track_id", "add")?;
            client.add_to_queue(track_id, None).await?;
            Ok("Track added to queue successfully.".into())
        }
        QueueAction::Get => pretty(&client.get_queue().await?),
    }
}

async fn get_info<T>(client: &SpotifyClient<T>, args: GetInfo) -> Result<String>
where
    T: Transport + Credentials,
{
    if args.item_id.trim().is_empty() {
        return Err(Error::invalid_argument("item_id is required"));
    }
    let kind: EntityKind = args.qtype.parse()?;

    match client.get_info(&args.item_id, kind).await? {
        Some(info) => pretty(&info),
        None => Ok(format!("No {kind} found with id {}.", args.item_id)),
    }
}

async fn playlist_manage<T>(client: &SpotifyClient<T>, args: PlaylistManage) -> Result<String>
where
    T: Transport + Credentials,
{
    match args.action {
        PlaylistManageAction::Create => {
            let name = required(args.name.as_deref(), "name", "create")?;
            let user = client
                .current_user()
                .await?
                .ok_or_else(|| Error::invalid_state("failed to get current user id"))?;
            let playlist = client
                .create_playlist(
                    &user.id,
                    name,
                    args.description.as_deref(),
                    args.public.unwrap_or(false),
                )
                .await?;
            pretty(&playlist)
        }
        PlaylistManageAction::UpdateDetails => {
            let playlist_id = required(args.playlist_id.as_deref(), "playlist_id", "update_details")?;
            client
                .update_playlist_details(
                    playlist_id,
                    args.name.as_deref(),
                    args.description.as_deref(),
                    args.public,
                )
                .await?;
            Ok("Playlist details updated successfully.".into())
        }
        PlaylistManageAction::Get => {
            let playlist_id = required(args.playlist_id.as_deref(), "playlist_id", "get")?;
            match client.get_playlist(playlist_id).await? {
                Some(playlist) => pretty(&playlist),
                None => Ok(format!("No playlist found with id {playlist_id}.")),
            }
        }
    }
}

async fn playlist_items<T>(client: &SpotifyClient<T>, args: PlaylistItems) -> Result<String>
where
    T: Transport + Credentials,
{
    if args.playlist_id.trim().is_empty() {
        return Err(Error::invalid_argument("playlist_id is required"));
    }
    if args.uris.is_empty() {
        return Err(Error::invalid_argument("uris must be a non-empty list"));
    }

    let count = args.uris.len();
    match args.action {
        PlaylistItemsAction::Add => {
            let receipt = client
                .add_playlist_items(&args.playlist_id, &args.uris, args.position)
                .await?;
            Ok(format!(
                "Added {count} tracks to playlist. Snapshot ID: {}",
                receipt.snapshot_id
            ))
        }
        PlaylistItemsAction::Remove => {
            let receipt = client
                .remove_playlist_items(&args.playlist_id, &args.uris, args.snapshot_id.as_deref())
                .await?;
            Ok(format!(
                "Removed {count} tracks from playlist. Snapshot ID: {}",
                receipt.snapshot_id
            ))
        }
        PlaylistItemsAction::Update => {
            let receipt = client
                .update_playlist_items(
                    &args.playlist_id,
                    &args.uris,
                    args.range_start,
                    args.insert_before,
                    args.range_length,
                    args.snapshot_id.as_deref(),
                )
                .await?;
            Ok(format!(
                "Updated playlist items. Snapshot ID: {}",
                receipt.snapshot_id
            ))
        }
    }
}

async fn user_playlists<T>(client: &SpotifyClient<T>, args: UserPlaylists) -> Result<String>
where
    T: Transport + Credentials,
{
    let user_id = args.user_id.as_deref().filter(|id| !id.trim().is_empty());
    let page = client
        .user_playlists(user_id, args.limit, args.offset)
        .await?;
    pretty(&page)
}

async fn playlist_cover<T>(client: &SpotifyClient<T>, args: PlaylistCover) -> Result<String>
where
    T: Transport + Credentials,
{
    if args.playlist_id.trim().is_empty() {
        return Err(Error::invalid_argument("playlist_id is required"));
    }

    match args.action {
        PlaylistCoverAction::Get => pretty(&client.playlist_cover_image(&args.playlist_id).await?),
        PlaylistCoverAction::Upload => {
            let image = required(args.image_data.as_deref(), "image_data", "upload")?;
            client
                .upload_playlist_cover_image(&args.playlist_id, image)
                .await?;
            Ok("Playlist cover image uploaded successfully.".into())
        }
    }
}

fn parse<A: DeserializeOwned>(tool: &str, arguments: Value) -> Result<A> {
    let arguments = match arguments {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(arguments)
        .map_err(|e| Error::invalid_argument(format!("{tool}: {e}")))
}

fn required<'a>(value: Option<&'a str>, field: &str, action: &str) -> Result<&'a str> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::invalid_argument(format!("{field} is required for {action} action")))
}

fn pretty<S: Serialize>(value: &S) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
