//! AI summarization of lyrics.

mod analyzer;
pub mod llm;

pub use analyzer::{AnalysisError, AnalysisOutcome, LyricsAnalyzer};
