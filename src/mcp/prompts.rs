//! Playlist curation prompts.
//!
//! Each prompt renders a single user message that walks the model through
//! building a playlist with the server's own tools. Every argument is
//! optional and falls back to a default, so `prompts/get` with no arguments
//! still renders something usable.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

const TRACKS_PER_HOUR: u32 = 15;

#[derive(Debug, Clone, Serialize)]
pub struct PromptArgument {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: Vec<PromptArgument>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptContent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptMessage {
    pub role: &'static str,
    pub content: PromptContent,
}

/// Result of `prompts/get`.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedPrompt {
    pub description: String,
    pub messages: Vec<PromptMessage>,
}

impl RenderedPrompt {
    fn user(description: String, text: String) -> Self {
        Self {
            description,
            messages: vec![PromptMessage {
                role: "user",
                content: PromptContent { kind: "text", text },
            }],
        }
    }
}

pub fn list_prompts() -> Vec<PromptDefinition> {
    vec![
        PromptDefinition {
            name: "create_mood_playlist",
            description: "Create a playlist based on mood and preferences",
            arguments: vec![
                arg("mood", "Mood to capture, e.g. happy, chill, energetic"),
                arg("genre", "Optional genre to focus on"),
                arg("decade", "Optional decade, e.g. 1990s"),
            ],
        },
        PromptDefinition {
            name: "discover_similar_music",
            description: "Discover music similar to an artist or track",
            arguments: vec![
                arg("reference", "Artist or track to start from"),
                arg("discovery_level", "similar, adjacent or deep_cuts"),
            ],
        },
        PromptDefinition {
            name: "party_playlist_generator",
            description: "Generate a playlist for a party",
            arguments: vec![
                arg("party_type", "Kind of party, e.g. house_party, dance_party"),
                arg("duration_hours", "How long the party runs, in hours"),
            ],
        },
        PromptDefinition {
            name: "workout_playlist_builder",
            description: "Build a playlist paced for a workout",
            arguments: vec![
                arg("workout_type", "running, cardio, strength, hiit or yoga"),
                arg("intensity", "low, medium or high"),
            ],
        },
        PromptDefinition {
            name: "focus_music_curator",
            description: "Curate background music for focused work",
            arguments: vec![
                arg("focus_type", "Kind of work, e.g. coding, studying, writing"),
                arg("noise_level", "minimal, moderate or ambient"),
            ],
        },
    ]
}

fn arg(name: &'static str, description: &'static str) -> PromptArgument {
    PromptArgument {
        name,
        description,
        required: false,
    }
}

/// Renders prompt `name` with `arguments`.
///
/// Fails with [`Error::InvalidArgument`] for an unknown prompt or an
/// argument that does not parse.
pub fn get_prompt(name: &str, arguments: &Map<String, Value>) -> Result<RenderedPrompt> {
    let args = Args(arguments);
    match name {
        "create_mood_playlist" => Ok(mood_playlist(&args)),
        "discover_similar_music" => Ok(discover_music(&args)),
        "party_playlist_generator" => party_playlist(&args),
        "workout_playlist_builder" => Ok(workout_playlist(&args)),
        "focus_music_curator" => Ok(focus_music(&args)),
        other => Err(Error::invalid_argument(format!("unknown prompt: {other}"))),
    }
}

struct Args<'a>(&'a Map<String, Value>);

impl Args<'_> {
    fn get(&self, key: &str) -> Option<String> {
        let value = match self.0.get(key)? {
            Value::String(s) => s.trim().to_string(),
            Value::Null => return None,
            other => other.to_string(),
        };
        (!value.is_empty()).then_some(value)
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }
}

fn mood_playlist(args: &Args) -> RenderedPrompt {
    let mood = args.or("mood", "happy");
    let genre = args.get("genre");
    let decade = args.get("decade");

    let mut request = format!("Create a Spotify playlist for a {mood} mood");
    if let Some(genre) = &genre {
        request.push_str(&format!(" with {genre} music"));
    }
    if let Some(decade) = &decade {
        request.push_str(&format!(" from the {decade}"));
    }

    let mut filters = String::new();
    if let Some(genre) = &genre {
        filters.push_str(&format!(" genre:{genre}"));
    }
    if let Some(decade) = &decade {
        filters.push_str(&format!(" year:{decade}"));
    }

    let text = format!(
        "{request}.

Steps:
1. Use SpotifySearch (type \"track\") to find songs that fit a {mood} mood.{search_hint}
2. Create the playlist with SpotifyPlaylistManage (action \"create\") and call it \"{title} Vibes\".
3. Add the chosen tracks with SpotifyPlaylistItems (action \"add\").

Consider:
- Energy level for a {mood} mood
- {genre_line}
- {decade_line}
- 15-20 songs with good flow

Goal: a cohesive listening experience that holds the {mood} mood from start to finish.",
        search_hint = if filters.is_empty() {
            String::new()
        } else {
            format!(" Add filters such as `{}` to the query.", filters.trim())
        },
        title = title_case(&mood),
        genre_line = genre
            .as_ref()
            .map(|g| format!("Focus on {g}"))
            .unwrap_or_else(|| "Genre variety".into()),
        decade_line = decade
            .as_ref()
            .map(|d| format!("Songs from the {d}"))
            .unwrap_or_else(|| "Mix of eras".into()),
    );

    RenderedPrompt::user(format!("Create a {mood} mood playlist"), text)
}

fn discover_music(args: &Args) -> RenderedPrompt {
    let reference = args.or("reference", "your favorite artist");
    let level = args.or("discovery_level", "similar");
    let approach = match level.as_str() {
        "adjacent" => "artists from neighbouring genres that share its energy",
        "deep_cuts" => "lesser-known tracks, B-sides and album cuts from related artists",
        _ => "artists and tracks close to its sound",
    };

    let text = format!(
        "Help me discover new music similar to {reference}.

Discovery level: {level}. Look for {approach}.

Steps:
1. Use SpotifySearch to find {reference} and SpotifyGetInfo to read its details.
2. Search for related artists and pick tracks that match the discovery level.
3. Create a playlist named \"Discover: {reference}\" with SpotifyPlaylistManage (action \"create\").
4. Add 20 tracks with SpotifyPlaylistItems (action \"add\").

Goal: an experience that feels familiar to a {reference} fan but still surprises."
    );

    RenderedPrompt::user(format!("Discover music similar to {reference}"), text)
}

fn party_playlist(args: &Args) -> Result<RenderedPrompt> {
    let party_type = args.or("party_type", "house_party");
    let hours = args.or("duration_hours", "3");
    let hours: u32 = hours
        .parse()
        .ok()
        .filter(|h| *h > 0)
        .ok_or_else(|| {
            Error::invalid_argument(format!(
                "duration_hours must be a positive whole number, got {hours}"
            ))
        })?;
    let tracks = hours * TRACKS_PER_HOUR;

    let text = format!(
        "Build a playlist for a {party_type} lasting {hours} hours.

Steps:
1. Use SpotifySearch to find crowd-pleasing tracks for a {party_type}.
2. Create a playlist named \"{title} Mix\" with SpotifyPlaylistManage (action \"create\").
3. Add about {tracks} tracks with SpotifyPlaylistItems (action \"add\").

Plan the energy curve:
- Warm up with familiar mid-tempo songs
- Peak in the middle with the biggest tracks
- Wind down gently towards the end

Goal: keep the party going for the full {hours} hours without a dull stretch.",
        title = title_case(&party_type),
    );

    Ok(RenderedPrompt::user(
        format!("Generate a {party_type} playlist"),
        text,
    ))
}

fn workout_playlist(args: &Args) -> RenderedPrompt {
    let workout = args.or("workout_type", "running");
    let intensity = args.or("intensity", "medium");
    let bpm = match workout.to_lowercase().as_str() {
        "cardio" => "120-140",
        "running" => "150-170",
        "hiit" => "140-180",
        "strength" => "100-130",
        "yoga" => "60-90",
        _ => "120-150",
    };

    let text = format!(
        "Build a {workout} workout playlist at {intensity} intensity.

Steps:
1. Use SpotifySearch to find tracks with a tempo of roughly {bpm} BPM.
2. Create a playlist named \"{title} Power - {level}\" with SpotifyPlaylistManage (action \"create\").
3. Add 20-25 tracks with SpotifyPlaylistItems (action \"add\").

Consider:
- Start with a warm-up and end with a cool-down
- Keep the tempo near {bpm} BPM during the main set
- Match the energy to {intensity} intensity

Goal: music that keeps the pace of a {workout} session steady.",
        title = title_case(&workout),
        level = title_case(&intensity),
    );

    RenderedPrompt::user(format!("Build a {workout} workout playlist"), text)
}

fn focus_music(args: &Args) -> RenderedPrompt {
    let focus = args.or("focus_type", "studying");
    let noise = args.or("noise_level", "minimal");

    let text = format!(
        "Curate background music for {focus} with a {noise} noise level.

Steps:
1. Use SpotifySearch to find instrumental, ambient or lo-fi tracks.
2. Create a playlist named \"Deep Focus - {title}\" with SpotifyPlaylistManage (action \"create\").
3. Add 25-30 tracks with SpotifyPlaylistItems (action \"add\").

Consider:
- Prefer instrumental tracks; lyrics pull attention away from {focus}
- Keep dynamics {noise} with no sudden changes
- Long tracks with smooth transitions

Goal: a steady focus experience that fades into the background.",
        title = title_case(&focus),
    );

    RenderedPrompt::user(format!("Curate focus music for {focus}"), text)
}

/// `dance_party` becomes `Dance Party`.
fn title_case(value: &str) -> String {
    value
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
