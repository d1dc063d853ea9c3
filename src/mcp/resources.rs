use serde::Serialize;
use serde_json::json;

use crate::{
    error::{Error, Result},
    spotify::{
        SpotifyClient,
        transport::{Credentials, Transport},
    },
};

pub const CURRENT_USER: &str = "spotify://user/current";
pub const CURRENT_PLAYBACK: &str = "spotify://playback/current";
pub const AVAILABLE_DEVICES: &str = "spotify://devices/available";
pub const CURRENT_QUEUE: &str = "spotify://queue/current";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDefinition {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub mime_type: &'static str,
}

pub fn list_resources() -> Vec<ResourceDefinition> {
    vec![
        resource(
            CURRENT_USER,
            "Current User Profile",
            "Profile of the authenticated Spotify user",
        ),
        resource(
            CURRENT_PLAYBACK,
            "Current Playback State",
            "Playing track, progress, device, shuffle and repeat state",
        ),
        resource(
            AVAILABLE_DEVICES,
            "Available Devices",
            "Devices available for playback",
        ),
        resource(
            CURRENT_QUEUE,
            "Current Queue",
            "Currently playing track and the upcoming queue",
        ),
    ]
}

fn resource(
    uri: &'static str,
    name: &'static str,
    description: &'static str,
) -> ResourceDefinition {
    ResourceDefinition {
        uri,
        name,
        description,
        mime_type: "application/json",
    }
}

/// Reads a resource as a pretty printed JSON document.
pub async fn read_resource<T>(client: &SpotifyClient<T>, uri: &str) -> Result<String>
where
    T: Transport + Credentials,
{
    let document = match uri {
        CURRENT_USER => match client.current_user().await? {
            Some(user) => serde_json::to_value(user)?,
            None => json!({ "error": "Unable to fetch user information" }),
        },
        CURRENT_PLAYBACK => serde_json::to_value(client.playback_state().await?)?,
        AVAILABLE_DEVICES => json!({ "devices": client.devices().await? }),
        CURRENT_QUEUE => serde_json::to_value(client.get_queue().await?)?,
        other => return Err(Error::invalid_argument(format!("unknown resource: {other}"))),
    };

    Ok(serde_json::to_string_pretty(&document)?)
}

pub fn is_known(uri: &str) -> bool {
    list_resources().iter().any(|r| r.uri == uri)
}
