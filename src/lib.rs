//! LyricLens server library
//!
//! Song search, lyrics lookup and cached AI analysis of lyrics, plus the
//! client controller used by `cli-lens`. The modules are public so the
//! binaries and the end-to-end tests can assemble them.

pub mod analysis;
pub mod cache;
pub mod client;
pub mod config;
pub mod providers;
pub mod server;
pub mod song;

// Re-export commonly used types for convenience
pub use analysis::LyricsAnalyzer;
pub use cache::{AnalysisCache, AnalysisCacheKey, CacheBackend};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
pub use song::{LyricsAnalysis, Song, SuggestionItem};
