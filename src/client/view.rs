//! Text rendering of the client state.

use super::controller::LensState;
use crate::song::Song;
use std::fmt::Write;

/// Which screen the client is on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Browsing,
    ViewingSong(Song),
}

impl ViewState {
    pub fn current_song(&self) -> Option<&Song> {
        match self {
            ViewState::Browsing => None,
            ViewState::ViewingSong(song) => Some(song),
        }
    }
}

pub const NO_RESULTS: &str = "No results found";

/// One numbered line per song, or a placeholder when there is nothing to show.
pub fn render_song_grid(state: &LensState) -> String {
    let Some(songs) = state.search.value() else {
        return "Search for a song to get started".to_string();
    };
    if songs.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut out = String::new();
    for (i, song) in songs.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {} - {}", i + 1, song.title, song.artist);
    }
    out
}

pub fn render_status(state: &LensState) -> Option<String> {
    if let Some(error) = state.error() {
        return Some(format!("Error: {}", error));
    }
    if state.is_loading() {
        return Some("Loading...".to_string());
    }
    None
}

pub fn render_song_panel(song: &Song, state: &LensState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", song.title);
    let _ = writeln!(out, "by {}", song.artist);
    let _ = writeln!(out);

    match state.lyrics.value() {
        Some(Some(lyrics)) => {
            let _ = writeln!(out, "{}", lyrics.trim_end());
        }
        Some(None) => {
            let _ = writeln!(out, "No lyrics available");
        }
        None if state.lyrics.is_loading() => {
            let _ = writeln!(out, "Loading lyrics...");
        }
        None => {}
    }

    if let Some(analysis) = state.analysis.value() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Summary: {}", analysis.summary);
        let _ = writeln!(out, "{}", analysis.countries_message());
    } else if state.analysis.is_loading() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Analyzing lyrics...");
    }
    out
}

/// Whole screen for the current view.
pub fn render(state: &LensState) -> String {
    let body = match state.view.current_song() {
        Some(song) => render_song_panel(song, state),
        None => render_song_grid(state),
    };
    match render_status(state) {
        Some(status) => format!("{}\n{}", status, body),
        None => body,
    }
}
