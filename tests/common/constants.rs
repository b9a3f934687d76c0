//! Shared constants for end-to-end tests
//!
//! When fake collaborator data changes, update only this file.

// ============================================================================
// Known songs served by the fake collaborators
// ============================================================================

pub const KNOWN_TITLE: &str = "Bohemian Rhapsody";
pub const KNOWN_ARTIST: &str = "Queen";
pub const KNOWN_SONG_ID: &str = "Bohemian Rhapsody-Queen";
pub const KNOWN_LYRICS: &str = "Is this the real life?\nIs this just fantasy?";

pub const SECOND_TITLE: &str = "Africa";
pub const SECOND_ARTIST: &str = "Toto";

/// Query for which the song search returns no suggestions.
pub const EMPTY_QUERY: &str = "xyznonexistent123";

/// Query for which the song search collaborator fails.
pub const FAILING_QUERY: &str = "explode";

/// Artist for which the lyrics collaborator fails.
pub const UNKNOWN_ARTIST: &str = "Nobody";

/// Artist for which the lyrics collaborator answers with empty lyrics.
pub const INSTRUMENTAL_ARTIST: &str = "Instrumental";

// ============================================================================
// Fake AI answers
// ============================================================================

pub const ANALYSIS_SUMMARY: &str = "A young man confesses a crime and faces his fate.";

/// Lyrics that make the fake model answer with text that is not JSON.
pub const GARBLED_LYRICS: &str = "please answer in prose";

// ============================================================================
// Timeouts
// ============================================================================

pub const REQUEST_TIMEOUT_SECS: u64 = 10;
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;
