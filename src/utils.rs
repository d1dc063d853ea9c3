use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Turns a bare track id into a track URI. URIs pass through unchanged.
pub fn track_uri(track_id: &str) -> String {
    if track_id.starts_with("spotify:") {
        track_id.to_string()
    } else {
        format!("spotify:track:{track_id}")
    }
}

/// Builder for search queries using the provider's field filters.
///
/// ```text
/// SearchQuery::new("love").artist("Queen").year_range(1975, 1980).build()
///   == "love artist:Queen year:1975-1980"
/// ```
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    parts: Vec<String>,
}

impl SearchQuery {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        let mut parts = Vec::new();
        if !base.trim().is_empty() {
            parts.push(base.trim().to_string());
        }
        Self { parts }
    }

    pub fn artist(self, artist: &str) -> Self {
        self.filter("artist", artist)
    }

    pub fn track(self, track: &str) -> Self {
        self.filter("track", track)
    }

    pub fn album(self, album: &str) -> Self {
        self.filter("album", album)
    }

    pub fn year(self, year: u16) -> Self {
        self.filter("year", &year.to_string())
    }

    pub fn year_range(self, start: u16, end: u16) -> Self {
        self.filter("year", &format!("{start}-{end}"))
    }

    pub fn genre(self, genre: &str) -> Self {
        self.filter("genre", genre)
    }

    /// Restricts to albums with the lowest popularity.
    pub fn hipster(self) -> Self {
        self.filter("tag", "hipster")
    }

    /// Restricts to albums released in the past two weeks.
    pub fn new_releases(self) -> Self {
        self.filter("tag", "new")
    }

    pub fn build(&self) -> String {
        self.parts.join(" ")
    }

    fn filter(mut self, key: &str, value: &str) -> Self {
        self.parts.push(format!("{key}:{value}"));
        self
    }
}
