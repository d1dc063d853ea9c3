use serde_json::{Map, Value, json};
use tracing::info;

use crate::{
    error::{Error, Result},
    projection::project_playlist,
    records::{EntityKind, Playlist, PlaylistPage, SnapshotReceipt},
    spotify::{
        SpotifyClient,
        transport::{ApiRequest, Credentials, Transport},
    },
    types::{Image, RawPage, RawPlaylist, RawSnapshot, decode, decode_entity},
    utils::track_uri,
};

impl<T> SpotifyClient<T>
where
    T: Transport + Credentials,
{
    pub async fn get_playlist(&self, playlist_id: &str) -> Result<Option<Playlist>> {
        let value = self
            .call(
                "get_playlist",
                ApiRequest::get(format!("/playlists/{playlist_id}")),
            )
            .await?;
        let raw = decode_entity::<RawPlaylist>(EntityKind::Playlist, value)?;
        Ok(project_playlist(raw.as_ref(), true))
    }

    /// Playlists of `user_id`, or of the current user when `None`.
    pub async fn user_playlists(
        &self,
        user_id: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<PlaylistPage> {
        let path = match user_id {
            Some(user) => format!("/users/{user}/playlists"),
            None => "/me/playlists".to_string(),
        };
        let request = ApiRequest::get(path)
            .query("limit", limit)
            .query("offset", offset);
        let value = self.call("user_playlists", request).await?;

        let Some(page) = decode::<RawPage<Option<RawPlaylist>>>(value)? else {
            return Ok(PlaylistPage::empty(limit, offset));
        };

        let items: Vec<Playlist> = page
            .items
            .iter()
            .filter_map(|p| project_playlist(p.as_ref(), false))
            .collect();

        Ok(PlaylistPage {
            total: page.total.unwrap_or(items.len() as u64),
            limit: page.limit.unwrap_or(limit),
            offset: page.offset.unwrap_or(offset),
            next: page.next,
            previous: page.previous,
            items,
        })
    }

    pub async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: Option<&str>,
        public: bool,
    ) -> Result<Option<Playlist>> {
        if name.trim().is_empty() {
            return Err(Error::invalid_argument("playlist name must not be empty"));
        }

        let request = ApiRequest::post(format!("/users/{user_id}/playlists")).json(json!({
            "name": name,
            "description": description.unwrap_or_default(),
            "public": public,
        }));
        let value = self.call("create_playlist", request).await?;

        let raw = decode_entity::<RawPlaylist>(EntityKind::Playlist, value)?;
        let playlist = project_playlist(raw.as_ref(), true);
        if let Some(p) = &playlist {
            info!(playlist_id = %p.id, name = %p.name, "playlist created");
        }
        Ok(playlist)
    }

    /// Changes name, description or visibility. Fields left `None` are kept.
    pub async fn update_playlist_details(
        &self,
        playlist_id: &str,
        name: Option<&str>,
        description: Option<&str>,
        public: Option<bool>,
    ) -> Result<()> {
        let mut body = Map::new();
        if let Some(name) = name {
            body.insert("name".into(), json!(name));
        }
        if let Some(description) = description {
            body.insert("description".into(), json!(description));
        }
        if let Some(public) = public {
            body.insert("public".into(), json!(public));
        }
        if body.is_empty() {
            return Err(Error::invalid_argument(
                "at least one of name, description or public must be given",
            ));
        }

        let request =
            ApiRequest::put(format!("/playlists/{playlist_id}")).json(Value::Object(body));
        self.call("update_playlist_details", request).await?;
        info!(playlist_id, "playlist details updated");
        Ok(())
    }

    pub async fn add_playlist_items(
        &self,
        playlist_id: &str,
        uris: &[String],
        position: Option<u32>,
    ) -> Result<SnapshotReceipt> {
        let mut body = json!({ "uris": normalize_uris(uris)? });
        if let Some(position) = position {
            body["position"] = json!(position);
        }

        let request = ApiRequest::post(items_path(playlist_id)).json(body);
        receipt(self.call("add_playlist_items", request).await?)
    }

    pub async fn remove_playlist_items(
        &self,
        playlist_id: &str,
        uris: &[String],
        snapshot_id: Option<&str>,
    ) -> Result<SnapshotReceipt> {
        let tracks: Vec<Value> = normalize_uris(uris)?
            .into_iter()
            .map(|uri| json!({ "uri": uri }))
            .collect();
        let mut body = json!({ "tracks": tracks });
        if let Some(snapshot_id) = snapshot_id {
            body["snapshot_id"] = json!(snapshot_id);
        }

        let request = ApiRequest::delete(items_path(playlist_id)).json(body);
        receipt(self.call("remove_playlist_items", request).await?)
    }

    /// Moves `range_length` items (default 1) starting at `range_start` to
    /// before `insert_before`.
    pub async fn reorder_playlist_items(
        &self,
        playlist_id: &str,
        range_start: u32,
        insert_before: u32,
        range_length: Option<u32>,
        snapshot_id: Option<&str>,
    ) -> Result<SnapshotReceipt> {
        let mut body = json!({
            "range_start": range_start,
            "insert_before": insert_before,
            "range_length": range_length.unwrap_or(1),
        });
        if let Some(snapshot_id) = snapshot_id {
            body["snapshot_id"] = json!(snapshot_id);
        }

        let request = ApiRequest::put(items_path(playlist_id)).json(body);
        receipt(self.call("reorder_playlist_items", request).await?)
    }

    pub async fn replace_playlist_items(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<SnapshotReceipt> {
        let request = ApiRequest::put(items_path(playlist_id))
            .json(json!({ "uris": normalize_uris(uris)? }));
        receipt(self.call("replace_playlist_items", request).await?)
    }

    /// Replaces the items, then reorders them when both `range_start` and
    /// `insert_before` are given. Returns the receipt of the last edit.
    ///
    /// Without an explicit `snapshot_id` the reorder is chained on the
    /// snapshot returned by the replace.
    pub async fn update_playlist_items(
        &self,
        playlist_id: &str,
        uris: &[String],
        range_start: Option<u32>,
        insert_before: Option<u32>,
        range_length: Option<u32>,
        snapshot_id: Option<&str>,
    ) -> Result<SnapshotReceipt> {
        let replaced = self.replace_playlist_items(playlist_id, uris).await?;

        let (Some(range_start), Some(insert_before)) = (range_start, insert_before) else {
            return Ok(replaced);
        };

        let chained = snapshot_id
            .or((!replaced.snapshot_id.is_empty()).then_some(replaced.snapshot_id.as_str()));
        self.reorder_playlist_items(playlist_id, range_start, insert_before, range_length, chained)
            .await
    }

    pub async fn playlist_cover_image(&self, playlist_id: &str) -> Result<Vec<Image>> {
        let value = self
            .call(
                "playlist_cover_image",
                ApiRequest::get(format!("/playlists/{playlist_id}/images")),
            )
            .await?;
        Ok(decode::<Vec<Image>>(value)?.unwrap_or_default())
    }

    /// Uploads a base64 encoded JPEG as the playlist cover.
    pub async fn upload_playlist_cover_image(&self, playlist_id: &str, image: &str) -> Result<()> {
        if image.trim().is_empty() {
            return Err(Error::invalid_argument("image data must not be empty"));
        }

        let request = ApiRequest::put(format!("/playlists/{playlist_id}/images")).jpeg(image.trim());
        self.call("upload_playlist_cover_image", request).await?;
        info!(playlist_id, "playlist cover uploaded");
        Ok(())
    }
}

fn items_path(playlist_id: &str) -> String {
    format!("/playlists/{playlist_id}/tracks")
}

fn normalize_uris(uris: &[String]) -> Result<Vec<String>> {
    if uris.is_empty() {
        return Err(Error::invalid_argument("uris must not be empty"));
    }
    Ok(uris.iter().map(|uri| track_uri(uri)).collect())
}

fn receipt(value: Value) -> Result<SnapshotReceipt> {
    let snapshot_id = match value {
        Value::Object(_) => decode::<RawSnapshot>(value)?.and_then(|s| s.snapshot_id),
        _ => None,
    };
    Ok(SnapshotReceipt {
        snapshot_id: snapshot_id.unwrap_or_default(),
    })
}
