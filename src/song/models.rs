use serde::{Deserialize, Serialize};

/// A search hit as reported by the song search collaborator, before it is
/// turned into a [`Song`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionItem {
    pub title: String,
    pub artist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
}

/// Display model for a single song.
///
/// The id is derived from title and artist, so two different recordings
/// sharing both collapse onto the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
}

impl Song {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        let title = title.into();
        let artist = artist.into();
        Self {
            id: Self::derive_id(&title, &artist),
            title,
            artist,
            cover_url: None,
        }
    }

    pub fn derive_id(title: &str, artist: &str) -> String {
        format!("{}-{}", title, artist)
    }
}

impl From<SuggestionItem> for Song {
    fn from(item: SuggestionItem) -> Self {
        Song {
            id: Song::derive_id(&item.title, &item.artist),
            title: item.title,
            artist: item.artist,
            cover_url: item.cover_url,
        }
    }
}

/// Summary and country list produced by the AI collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricsAnalysis {
    pub summary: String,
    pub countries_mentioned: Vec<String>,
}

impl LyricsAnalysis {
    pub fn countries_message(&self) -> String {
        if self.countries_mentioned.is_empty() {
            "No countries mentioned in the lyrics".to_string()
        } else {
            format!(
                "Countries mentioned: {}",
                self.countries_mentioned.join(", ")
            )
        }
    }
}

/// Lyrics text plus the copyright line some sources attach to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lyrics {
    pub lyrics: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

/// Paged search hit from the Musixmatch catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub track_id: Option<u64>,
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub album_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub page_size: u32,
    pub total_results: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackPage {
    pub songs: Vec<TrackSummary>,
    pub pagination: Pagination,
}
