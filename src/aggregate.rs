//! Grouping of multi-kind search payloads into per-kind record lists.

use serde::Serialize;

use crate::{
    error::Result,
    projection::{project_album, project_artist, project_playlist, project_track},
    records::{Album, Artist, EntityKind, Playlist, Record, Track},
    types::{RawPage, RawSearchResults},
};

/// Search results keyed by kind.
///
/// A kind is present only when it was requested and the provider returned a
/// collection for it. Records keep the provider's order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracks: Option<Vec<Track>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub albums: Option<Vec<Album>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artists: Option<Vec<Artist>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlists: Option<Vec<Playlist>>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.kinds().is_empty()
    }

    /// Kinds present in the results.
    pub fn kinds(&self) -> Vec<EntityKind> {
        let mut kinds = Vec::new();
        if self.tracks.is_some() {
            kinds.push(EntityKind::Track);
        }
        if self.albums.is_some() {
            kinds.push(EntityKind::Album);
        }
        if self.artists.is_some() {
            kinds.push(EntityKind::Artist);
        }
        if self.playlists.is_some() {
            kinds.push(EntityKind::Playlist);
        }
        kinds
    }

    /// Records of one kind, wrapped in the kind-agnostic [`Record`].
    pub fn records(&self, kind: EntityKind) -> Option<Vec<Record>> {
        match kind {
            EntityKind::Track => wrap(&self.tracks, Record::Track),
            EntityKind::Album => wrap(&self.albums, Record::Album),
            EntityKind::Artist => wrap(&self.artists, Record::Artist),
            EntityKind::Playlist => wrap(&self.playlists, Record::Playlist),
        }
    }
}

/// Projects each requested kind's collection in shallow mode.
///
/// `kinds` is a comma delimited list such as `"track,album"`. A missing
/// payload yields empty results; an unknown kind token is an
/// [`InvalidArgument`](crate::Error::InvalidArgument) error.
pub fn aggregate(raw: Option<&RawSearchResults>, kinds: &str) -> Result<SearchResults> {
    let Some(raw) = raw else {
        return Ok(SearchResults::default());
    };

    let mut results = SearchResults::default();
    for kind in EntityKind::parse_list(kinds)? {
        match kind {
            EntityKind::Track => {
                results.tracks = collect(&raw.tracks, |t| project_track(Some(t), false));
            }
            EntityKind::Album => {
                results.albums = collect(&raw.albums, |a| project_album(Some(a), false));
            }
            EntityKind::Artist => {
                results.artists = collect(&raw.artists, |a| project_artist(Some(a), false));
            }
            EntityKind::Playlist => {
                results.playlists = collect(&raw.playlists, |p| project_playlist(Some(p), false));
            }
        }
    }

    Ok(results)
}

fn collect<R, T>(
    page: &Option<RawPage<Option<R>>>,
    project: impl Fn(&R) -> Option<T>,
) -> Option<Vec<T>> {
    page.as_ref()
        .map(|page| page.items.iter().flatten().filter_map(project).collect())
}

fn wrap<T: Clone>(items: &Option<Vec<T>>, into: fn(T) -> Record) -> Option<Vec<Record>> {
    items
        .as_ref()
        .map(|items| items.iter().cloned().map(into).collect())
}
