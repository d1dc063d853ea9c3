#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use serde_json::{Value, json};
use spotify_mcp::{
    Error, Result,
    spotify::transport::{ApiRequest, Credentials, Method, Transport},
};

#[derive(Debug, Clone)]
enum Reply {
    Json(Value),
    Fail(u16, String),
}

/// In-memory transport that answers from scripted routes and records every
/// call and credential check it sees.
///
/// Unrouted calls answer `null`, like an endpoint returning no content. A
/// route with several replies hands them out in order and repeats the last.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<ApiRequest>>,
    events: Mutex<Vec<String>>,
    expired: Mutex<bool>,
    refresh_fails: bool,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, method: Method, path: &str, body: Value) -> Self {
        self.push(method, path, Reply::Json(body));
        self
    }

    pub fn fail(self, method: Method, path: &str, status: u16, message: &str) -> Self {
        self.push(method, path, Reply::Fail(status, message.to_string()));
        self
    }

    pub fn devices(self, devices: Value) -> Self {
        self.on(Method::Get, "/me/player/devices", json!({ "devices": devices }))
    }

    pub fn expired(self) -> Self {
        *self.expired.lock().unwrap() = true;
        self
    }

    pub fn refresh_fails(mut self) -> Self {
        self.refresh_fails = true;
        self
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls sent to `method path`.
    pub fn sent(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method && c.path == path)
            .collect()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        self.events.lock().unwrap().push(request.to_string());
        self.calls.lock().unwrap().push(request.clone());

        let mut routes = self.routes.lock().unwrap();
        let Some(replies) = routes.get_mut(&(request.method, request.path.clone())) else {
            return Ok(Value::Null);
        };
        let reply = if replies.len() > 1 {
            replies.pop_front().unwrap()
        } else {
            replies.front().cloned().unwrap()
        };

        match reply {
            Reply::Json(body) => Ok(body),
            Reply::Fail(status, message) => Err(Error::transport(Some(status), message)),
        }
    }
}

impl Credentials for FakeTransport {
    async fn token_expired(&self) -> Result<bool> {
        self.events.lock().unwrap().push("token_expired".into());
        Ok(*self.expired.lock().unwrap())
    }

    async fn refresh_token(&self) -> Result<()> {
        self.events.lock().unwrap().push("refresh".into());
        if self.refresh_fails {
            return Err(Error::Auth("refresh rejected".into()));
        }
        *self.expired.lock().unwrap() = false;
        Ok(())
    }
}

pub fn artist_json(name: &str) -> Value {
    json!({ "id": format!("{}-id", name.to_lowercase().replace(' ', "-")), "name": name })
}

pub fn track_json(id: &str, name: &str, artists: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "artists": artists.iter().map(|a| artist_json(a)).collect::<Vec<_>>(),
        "album": album_json("album-1", "Whenever You Need Somebody", artists),
        "track_number": 1,
        "duration_ms": 213573,
        "is_playable": true,
    })
}

pub fn album_json(id: &str, name: &str, artists: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "artists": artists.iter().map(|a| artist_json(a)).collect::<Vec<_>>(),
        "total_tracks": 10,
        "release_date": "1987-11-12",
    })
}

pub fn device_json(id: &str, active: bool) -> Value {
    json!({
        "id": id,
        "name": format!("Device {id}"),
        "is_active": active,
        "type": "Computer",
        "volume_percent": 50,
    })
}

/// `/me/player/currently-playing` payload for a track.
pub fn playing_json(track: Value, is_playing: bool) -> Value {
    json!({
        "is_playing": is_playing,
        "currently_playing_type": "track",
        "progress_ms": 1000,
        "item": track,
    })
}
