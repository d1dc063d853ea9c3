use crate::{
    aggregate::{SearchResults, aggregate},
    error::{Error, Result},
    projection::{project_album, project_artist, project_playlist, project_track},
    records::{ArtistInfo, EntityKind, ItemInfo, Track, UserProfile},
    spotify::{
        SpotifyClient,
        transport::{ApiRequest, Credentials, Transport},
    },
    types::{
        RawAlbum, RawArtist, RawPage, RawPlaylist, RawSavedTrack, RawSearchResults, RawTrack,
        RawTrackList, RawUser, decode, decode_entity,
    },
};

/// Market used for artist top tracks.
const TOP_TRACKS_MARKET: &str = "US";

impl<T> SpotifyClient<T>
where
    T: Transport + Credentials,
{
    /// Searches one or more kinds at once; `kinds` is a comma delimited list
    /// such as `"track,artist"`.
    pub async fn search(&self, query: &str, kinds: &str, limit: u32) -> Result<SearchResults> {
        if query.trim().is_empty() {
            return Err(Error::invalid_argument("query must not be empty"));
        }
        let parsed = EntityKind::parse_list(kinds)?;
        let types = parsed
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let request = ApiRequest::get("/search")
            .query("q", query)
            .query("type", &types)
            .query("limit", limit);
        let value = self.call("search", request).await?;

        let raw = decode::<RawSearchResults>(value)?;
        aggregate(raw.as_ref(), &types)
    }

    /// Detailed lookup of a single item.
    ///
    /// Artists are extended with their albums and top tracks.
    pub async fn get_info(&self, item_id: &str, kind: EntityKind) -> Result<Option<ItemInfo>> {
        let path = format!("/{}/{item_id}", kind.collection_key());
        let value = self.call("get_info", ApiRequest::get(path)).await?;

        let info = match kind {
            EntityKind::Track => project_track(
                decode_entity::<RawTrack>(kind, value)?.as_ref(),
                true,
            )
            .map(ItemInfo::Track),
            EntityKind::Album => project_album(
                decode_entity::<RawAlbum>(kind, value)?.as_ref(),
                true,
            )
            .map(ItemInfo::Album),
            EntityKind::Playlist => project_playlist(
                decode_entity::<RawPlaylist>(kind, value)?.as_ref(),
                true,
            )
            .map(ItemInfo::Playlist),
            EntityKind::Artist => {
                let raw = decode_entity::<RawArtist>(kind, value)?;
                let Some(artist) = project_artist(raw.as_ref(), true) else {
                    return Ok(None);
                };
                let catalogue = self.artist_catalogue(item_id).await?;
                Some(ItemInfo::Artist(ArtistInfo {
                    artist,
                    top_tracks: catalogue.tracks,
                    albums: catalogue.albums,
                }))
            }
        };

        Ok(info)
    }

    /// Albums and top tracks of an artist, grouped like search results.
    async fn artist_catalogue(&self, artist_id: &str) -> Result<SearchResults> {
        let value = self
            .call(
                "artist_albums",
                ApiRequest::get(format!("/artists/{artist_id}/albums")),
            )
            .await?;
        let albums = decode::<RawPage<Option<RawAlbum>>>(value)?;

        let value = self
            .call(
                "artist_top_tracks",
                ApiRequest::get(format!("/artists/{artist_id}/top-tracks"))
                    .query("market", TOP_TRACKS_MARKET),
            )
            .await?;
        let top_tracks = decode::<RawTrackList>(value)?;

        let raw = RawSearchResults {
            tracks: top_tracks.map(|t| RawPage::of(t.tracks)),
            albums,
            ..RawSearchResults::default()
        };
        aggregate(Some(&raw), "track,album")
    }

    /// Tracks saved in the user's library, newest first.
    pub async fn liked_songs(&self, limit: u32, offset: u32) -> Result<Vec<Track>> {
        let request = ApiRequest::get("/me/tracks")
            .query("limit", limit)
            .query("offset", offset);
        let value = self.call("liked_songs", request).await?;

        let Some(page) = decode::<RawPage<Option<RawSavedTrack>>>(value)? else {
            return Ok(Vec::new());
        };
        Ok(page
            .items
            .iter()
            .flatten()
            .filter_map(|saved| project_track(saved.track.as_ref(), false))
            .collect())
    }

    pub async fn recommendations(
        &self,
        seed_artists: &[String],
        seed_tracks: &[String],
        limit: u32,
    ) -> Result<Vec<Track>> {
        if seed_artists.is_empty() && seed_tracks.is_empty() {
            return Err(Error::invalid_argument(
                "at least one seed artist or seed track is required",
            ));
        }

        let join = |seeds: &[String]| (!seeds.is_empty()).then(|| seeds.join(","));
        let request = ApiRequest::get("/recommendations")
            .query_opt("seed_artists", join(seed_artists))
            .query_opt("seed_tracks", join(seed_tracks))
            .query("limit", limit);
        let value = self.call("recommendations", request).await?;

        Ok(decode::<RawTrackList>(value)?
            .map(|list| {
                list.tracks
                    .iter()
                    .filter_map(|t| project_track(t.as_ref(), false))
                    .collect()
            })
            .unwrap_or_default())
    }

    pub async fn current_user(&self) -> Result<Option<UserProfile>> {
        let value = self.call("current_user", ApiRequest::get("/me")).await?;

        Ok(decode::<RawUser>(value)?.map(|user| UserProfile {
            id: user.id,
            display_name: user.display_name,
            email: user.email,
            country: user.country,
            product: user.product,
            followers: user.followers.and_then(|f| f.total).unwrap_or(0),
            images: user.images,
        }))
    }
}
