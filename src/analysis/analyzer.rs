use super::llm::{CompletionOptions, LlmError, LlmProvider, Message};
use crate::cache::{AnalysisCache, AnalysisCacheKey};
use crate::song::LyricsAnalysis;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const SYSTEM_PROMPT: &str = "You are a helpful assistant that analyzes song lyrics to provide \
summaries and extract information. Respond in valid JSON format.";

const DEFAULT_SUMMARY: &str = "No summary available";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Error analyzing lyrics: {0}")]
    Llm(#[from] LlmError),

    #[error("Could not parse analysis from the AI response: {0}")]
    MalformedAnalysis(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutcome {
    pub analysis: LyricsAnalysis,
    pub cached: bool,
}

/// Produces a [`LyricsAnalysis`] for a song, consulting the cache first and
/// filling it after a successful model call.
pub struct LyricsAnalyzer {
    llm: Arc<dyn LlmProvider>,
    cache: Arc<dyn AnalysisCache>,
    cache_ttl: Duration,
    options: CompletionOptions,
}

impl LyricsAnalyzer {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        cache: Arc<dyn AnalysisCache>,
        cache_ttl: Duration,
        request_timeout: Duration,
    ) -> Self {
        Self {
            llm,
            cache,
            cache_ttl,
            options: CompletionOptions {
                timeout: request_timeout,
                json_response: true,
                ..Default::default()
            },
        }
    }

    pub fn cache_backend(&self) -> &'static str {
        self.cache.backend_name()
    }

    pub async fn analyze(
        &self,
        track_name: &str,
        artist_name: &str,
        lyrics: &str,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let key = AnalysisCacheKey::new(track_name, artist_name);

        match self.cache.get(&key).await {
            Ok(Some(analysis)) => {
                info!("Cache hit for '{}'", key);
                return Ok(AnalysisOutcome {
                    analysis,
                    cached: true,
                });
            }
            Ok(None) => info!("Cache miss for '{}'", key),
            Err(e) => warn!("Error getting from cache: {}", e),
        }

        let messages = build_messages(track_name, artist_name, lyrics);
        debug!(
            provider = self.llm.name(),
            model = self.llm.model(),
            "Requesting lyrics analysis"
        );
        let response = self.llm.complete(&messages, &self.options).await?;
        let analysis = parse_analysis(&response.message.content)?;

        match self.cache.set(&key, &analysis, self.cache_ttl).await {
            Ok(()) => info!("Saved to cache: '{}'", key),
            Err(e) => warn!("Error saving to cache: {}", e),
        }

        Ok(AnalysisOutcome {
            analysis,
            cached: false,
        })
    }
}

fn build_messages(track_name: &str, artist_name: &str, lyrics: &str) -> Vec<Message> {
    let prompt = format!(
        r#"Analyze the following song lyrics for '{track_name}' by '{artist_name}':

{lyrics}

Please provide:
1. A concise one-paragraph summary of what the song is about. Capture the main themes and emotional tone without directly quoting large portions of the lyrics.
2. A list of any countries mentioned in the lyrics.

Format your response as JSON with the following structure:
{{
    "summary": "your one-paragraph summary here",
    "countries_mentioned": ["Country1", "Country2"] or [] if no countries are mentioned
}}

If no countries are mentioned, return an empty array for countries_mentioned, not a string."#
    );

    vec![Message::system(SYSTEM_PROMPT), Message::user(prompt)]
}

/// Models sometimes wrap JSON in a markdown fence even when asked not to.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn parse_analysis(content: &str) -> Result<LyricsAnalysis, AnalysisError> {
    let value: serde_json::Value = serde_json::from_str(strip_code_fence(content))
        .map_err(|e| AnalysisError::MalformedAnalysis(e.to_string()))?;

    let object = value.as_object().ok_or_else(|| {
        AnalysisError::MalformedAnalysis("expected a JSON object".to_string())
    })?;

    let summary = object
        .get("summary")
        .and_then(|s| s.as_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(DEFAULT_SUMMARY)
        .to_string();

    let countries_mentioned = object
        .get("countries_mentioned")
        .and_then(|c| c.as_array())
        .map(|countries| {
            countries
                .iter()
                .filter_map(|c| c.as_str())
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Ok(LyricsAnalysis {
        summary,
        countries_mentioned,
    })
}
