use sha2::{Digest, Sha256};
use std::fmt;

const KEY_PREFIX: &str = "lyrics_analysis";

/// Identifies a cached analysis by track and artist.
///
/// Both parts are trimmed and lowercased on construction, so
/// `" Hey Jude "`/`"THE BEATLES"` and `"hey jude"`/`"the beatles"` share one
/// entry. Lyrics are not part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnalysisCacheKey {
    track_name: String,
    artist_name: String,
}

impl AnalysisCacheKey {
    pub fn new(track_name: &str, artist_name: &str) -> Self {
        Self {
            track_name: normalize(track_name),
            artist_name: normalize(artist_name),
        }
    }

    /// The key under which the entry is stored in the cache backend:
    /// `lyrics_analysis:<sha256 hex of "track:artist">`.
    pub fn storage_key(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.track_name.as_bytes());
        hasher.update(b":");
        hasher.update(self.artist_name.as_bytes());
        format!("{}:{:x}", KEY_PREFIX, hasher.finalize())
    }
}

impl fmt::Display for AnalysisCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.track_name, self.artist_name)
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
