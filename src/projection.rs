//! Entity projection: raw provider payloads in, normalized records out.
//!
//! Every projector takes an optional raw record and returns `None` when there
//! is nothing to project, which is how the adapter signals "not found"
//! without an error. The `detailed` flag adds fields and one level of nested
//! records; nested records are always projected shallow, so a detailed album
//! lists its tracks but those tracks do not repeat the album.

use crate::{
    records::{Album, Artist, Credits, Playlist, Record, Track},
    types::{RawAlbum, RawArtist, RawArtistRef, RawEntity, RawPlaylist, RawTrack},
};

pub fn project(raw: Option<&RawEntity>, detailed: bool) -> Option<Record> {
    match raw? {
        RawEntity::Track(t) => project_track(Some(t), detailed).map(Record::Track),
        RawEntity::Album(a) => project_album(Some(a), detailed).map(Record::Album),
        RawEntity::Artist(a) => project_artist(Some(a), detailed).map(Record::Artist),
        RawEntity::Playlist(p) => project_playlist(Some(p), detailed).map(Record::Playlist),
    }
}

pub fn project_track(raw: Option<&RawTrack>, detailed: bool) -> Option<Track> {
    let raw = raw?;

    let mut track = Track {
        id: raw.id.clone(),
        name: raw.name.clone(),
        credits: credits(&raw.artists),
        album: None,
        track_number: None,
        duration_ms: None,
        is_playing: raw.is_playing,
        // non-playable is the exception worth surfacing
        is_playable: (raw.is_playable == Some(false)).then_some(false),
    };

    if detailed {
        track.album = project_album(raw.album.as_ref(), false);
        track.track_number = raw.track_number;
        track.duration_ms = raw.duration_ms;
    }

    Some(track)
}

pub fn project_album(raw: Option<&RawAlbum>, detailed: bool) -> Option<Album> {
    let raw = raw?;

    let mut album = Album {
        id: raw.id.clone(),
        name: raw.name.clone(),
        credits: credits(&raw.artists),
        tracks: None,
        total_tracks: None,
        release_date: None,
        genres: None,
    };

    if detailed {
        album.tracks = raw.tracks.as_ref().map(|page| {
            page.items
                .iter()
                .filter_map(|item| project_track(item.as_ref(), false))
                .collect()
        });
        album.total_tracks = raw.total_tracks;
        album.release_date = raw.release_date.clone();
        album.genres = raw.genres.clone();
    }

    Some(album)
}

pub fn project_artist(raw: Option<&RawArtist>, detailed: bool) -> Option<Artist> {
    let raw = raw?;

    Some(Artist {
        id: raw.id.clone(),
        name: raw.name.clone(),
        genres: if detailed { raw.genres.clone() } else { None },
    })
}

pub fn project_playlist(raw: Option<&RawPlaylist>, detailed: bool) -> Option<Playlist> {
    let raw = raw?;

    let owner = raw
        .owner
        .as_ref()
        .and_then(|o| o.display_name.clone().or_else(|| o.id.clone()))
        .unwrap_or_default();

    let mut playlist = Playlist {
        id: raw.id.clone(),
        name: raw.name.clone(),
        owner,
        description: None,
        tracks: None,
    };

    if detailed {
        playlist.description = raw.description.clone();
        playlist.tracks = raw.tracks.as_ref().map(|page| {
            page.items
                .iter()
                .flatten()
                .filter_map(|item| project_track(item.track.as_ref(), false))
                .collect()
        });
    }

    Some(playlist)
}

fn credits(artists: &[RawArtistRef]) -> Credits {
    Credits::from_names(artists.iter().map(|a| a.name.clone()).collect())
}
