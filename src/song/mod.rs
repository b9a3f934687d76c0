//! Song display model and the JSON shapes exchanged with the frontend.

mod models;

pub use models::{
    Lyrics, LyricsAnalysis, Pagination, Song, SuggestionItem, TrackPage, TrackSummary,
};
