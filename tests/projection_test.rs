mod common;

use std::collections::BTreeSet;

use serde_json::{Value, json};
use spotify_mcp::{
    Error,
    projection::{project, project_album, project_artist, project_playlist, project_track},
    records::{Credits, EntityKind, Record},
    types::{RawAlbum, RawEntity, RawPlaylist, RawTrack},
};

use common::{album_json, track_json};

fn raw<T: serde::de::DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).unwrap()
}

fn keys(record: &impl serde::Serialize) -> BTreeSet<String> {
    match serde_json::to_value(record).unwrap() {
        Value::Object(map) => map.keys().cloned().collect(),
        other => panic!("expected object, got {other}"),
    }
}

fn playlist_json() -> Value {
    json!({
        "id": "pl-1",
        "name": "Road Trip",
        "description": "Songs for the car",
        "owner": { "id": "user-1", "display_name": "Ada" },
        "tracks": {
            "total": 3,
            "items": [
                { "track": track_json("t1", "One", &["Rick Astley"]) },
                { "track": null },
                null,
                { "track": track_json("t2", "Two", &["Daft Punk", "Pharrell Williams"]) }
            ]
        }
    })
}

#[test]
fn test_absent_input_projects_to_nothing() {
    assert!(project(None, false).is_none());
    assert!(project(None, true).is_none());
    assert!(project_track(None, true).is_none());
    assert!(project_album(None, true).is_none());
    assert!(project_artist(None, true).is_none());
    assert!(project_playlist(None, true).is_none());

    for kind in EntityKind::ALL {
        assert!(RawEntity::decode(kind, Value::Null).unwrap().is_none());
    }
}

#[test]
fn test_single_artist_collapses_to_artist_key() {
    let track: RawTrack = raw(track_json("t1", "Never Gonna Give You Up", &["Rick Astley"]));

    for detailed in [false, true] {
        let projected = project_track(Some(&track), detailed).unwrap();
        assert_eq!(projected.credits, Credits::Single("Rick Astley".into()));

        let json = serde_json::to_value(&projected).unwrap();
        assert_eq!(json["artist"], "Rick Astley");
        assert!(json.get("artists").is_none());
    }
}

#[test]
fn test_multiple_artists_use_artists_list() {
    let track: RawTrack = raw(track_json("t2", "Get Lucky", &["Daft Punk", "Pharrell Williams"]));

    let json = serde_json::to_value(project_track(Some(&track), false).unwrap()).unwrap();
    assert_eq!(json["artists"], json!(["Daft Punk", "Pharrell Williams"]));
    assert!(json.get("artist").is_none());

    let album: RawAlbum = raw(album_json("a1", "Random Access Memories", &["Daft Punk", "Nile Rodgers"]));
    let json = serde_json::to_value(project_album(Some(&album), true).unwrap()).unwrap();
    assert_eq!(json["artists"], json!(["Daft Punk", "Nile Rodgers"]));
    assert!(json.get("artist").is_none());
}

#[test]
fn test_no_artists_is_an_empty_list() {
    let track: RawTrack = raw(json!({ "id": "t3", "name": "Untitled" }));
    let projected = project_track(Some(&track), false).unwrap();

    assert_eq!(projected.credits, Credits::Multiple(vec![]));
}

#[test]
fn test_detailed_is_superset_of_shallow() {
    let track: RawTrack = raw(track_json("t1", "One", &["Rick Astley"]));
    assert!(keys(&project_track(Some(&track), false)).is_subset(&keys(&project_track(Some(&track), true))));

    let mut album_value = album_json("a1", "Album", &["Rick Astley"]);
    album_value["genres"] = json!(["pop"]);
    album_value["tracks"] = json!({ "items": [track_json("t1", "One", &["Rick Astley"])] });
    let album: RawAlbum = raw(album_value);
    assert!(keys(&project_album(Some(&album), false)).is_subset(&keys(&project_album(Some(&album), true))));

    let artist = raw(json!({ "id": "ar1", "name": "Rick Astley", "genres": ["dance pop"] }));
    let shallow = keys(&project_artist(Some(&artist), false));
    let detailed = keys(&project_artist(Some(&artist), true));
    assert!(shallow.is_subset(&detailed));
    assert!(detailed.contains("genres"));
    assert!(!shallow.contains("genres"));

    let playlist: RawPlaylist = raw(playlist_json());
    assert!(keys(&project_playlist(Some(&playlist), false)).is_subset(&keys(&project_playlist(Some(&playlist), true))));
}

#[test]
fn test_shallow_track_omits_detail_fields() {
    let track: RawTrack = raw(track_json("t1", "One", &["Rick Astley"]));

    let shallow = keys(&project_track(Some(&track), false));
    assert_eq!(
        shallow,
        ["artist", "id", "name"]
            .into_iter()
            .map(String::from)
            .collect::<BTreeSet<_>>()
    );

    let detailed = project_track(Some(&track), true).unwrap();
    assert_eq!(detailed.track_number, Some(1));
    assert_eq!(detailed.duration_ms, Some(213573));
    assert_eq!(detailed.album.as_ref().unwrap().name, "Whenever You Need Somebody");
}

#[test]
fn test_nested_records_are_shallow() {
    let track: RawTrack = raw(track_json("t1", "One", &["Rick Astley"]));
    let album = project_track(Some(&track), true).unwrap().album.unwrap();
    assert!(album.tracks.is_none());
    assert!(album.release_date.is_none());

    let mut album_value = album_json("a1", "Album", &["Rick Astley"]);
    album_value["tracks"] = json!({
        "items": [track_json("t1", "One", &["Rick Astley"]), null, track_json("t2", "Two", &["Rick Astley"])]
    });
    let album: RawAlbum = raw(album_value);
    let projected = project_album(Some(&album), true).unwrap();

    let tracks = projected.tracks.unwrap();
    assert_eq!(tracks.len(), 2);
    assert!(tracks.iter().all(|t| t.album.is_none() && t.duration_ms.is_none()));
    assert_eq!(projected.release_date.as_deref(), Some("1987-11-12"));
    assert_eq!(projected.total_tracks, Some(10));
}

#[test]
fn test_is_playable_only_surfaces_false() {
    let mut value = track_json("t1", "One", &["Rick Astley"]);
    let playable: RawTrack = raw(value.clone());
    assert!(project_track(Some(&playable), true).unwrap().is_playable.is_none());

    value["is_playable"] = json!(false);
    let blocked: RawTrack = raw(value.clone());
    let json = serde_json::to_value(project_track(Some(&blocked), false).unwrap()).unwrap();
    assert_eq!(json["is_playable"], false);

    value.as_object_mut().unwrap().remove("is_playable");
    let unknown: RawTrack = raw(value);
    let json = serde_json::to_value(project_track(Some(&unknown), false).unwrap()).unwrap();
    assert!(json.get("is_playable").is_none());
}

#[test]
fn test_playlist_projection() {
    let playlist: RawPlaylist = raw(playlist_json());

    let shallow = project_playlist(Some(&playlist), false).unwrap();
    assert_eq!(shallow.owner, "Ada");
    assert!(shallow.description.is_none());
    assert!(shallow.tracks.is_none());

    let detailed = project_playlist(Some(&playlist), true).unwrap();
    assert_eq!(detailed.description.as_deref(), Some("Songs for the car"));
    let names: Vec<_> = detailed.tracks.unwrap().into_iter().map(|t| t.name).collect();
    assert_eq!(names, vec!["One", "Two"]);
}

#[test]
fn test_playlist_skips_local_files() {
    let playlist: RawPlaylist = raw(json!({
        "id": "pl-1",
        "name": "Demos",
        "tracks": {
            "items": [
                { "track": track_json("t1", "One", &["Rick Astley"]) },
                { "track": { "id": null, "name": "My Local Demo", "is_local": true, "album": { "id": null, "name": "" } } }
            ]
        }
    }));

    let detailed = project_playlist(Some(&playlist), true).unwrap();
    let names: Vec<_> = detailed.tracks.unwrap().into_iter().map(|t| t.name).collect();
    assert_eq!(names, vec!["One"]);
}

#[test]
fn test_playlist_owner_falls_back_to_id() {
    let playlist: RawPlaylist = raw(json!({
        "id": "pl-1",
        "name": "Mix",
        "owner": { "id": "user-1", "display_name": null }
    }));
    assert_eq!(project_playlist(Some(&playlist), false).unwrap().owner, "user-1");

    let orphan: RawPlaylist = raw(json!({ "id": "pl-2", "name": "Orphan" }));
    assert_eq!(project_playlist(Some(&orphan), false).unwrap().owner, "");
}

#[test]
fn test_project_dispatches_on_kind() {
    let entity = RawEntity::decode(EntityKind::Album, album_json("a1", "Album", &["Rick Astley"]))
        .unwrap()
        .unwrap();
    assert_eq!(entity.kind(), EntityKind::Album);

    let record = project(Some(&entity), false).unwrap();
    assert!(matches!(record, Record::Album(_)));
    assert_eq!(record.kind(), EntityKind::Album);
    assert_eq!(record.id(), "a1");
    assert_eq!(record.name(), "Album");
}

#[test]
fn test_missing_required_field_is_malformed_payload() {
    let err = RawEntity::decode(EntityKind::Track, json!({ "name": "No id" })).unwrap_err();
    assert!(matches!(err, Error::MalformedPayload { kind: EntityKind::Track, .. }));

    let err = RawEntity::decode(EntityKind::Playlist, json!({ "id": "pl-1" })).unwrap_err();
    assert!(matches!(err, Error::MalformedPayload { kind: EntityKind::Playlist, .. }));
}

#[test]
fn test_missing_optional_fields_do_not_fail() {
    let entity = RawEntity::decode(EntityKind::Track, json!({ "id": "t1", "name": "Bare" }))
        .unwrap()
        .unwrap();
    let Record::Track(track) = project(Some(&entity), true).unwrap() else {
        panic!("expected a track");
    };

    assert!(track.album.is_none());
    assert!(track.track_number.is_none());
    assert!(track.duration_ms.is_none());
}
