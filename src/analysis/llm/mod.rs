//! LLM provider abstraction layer.
//!
//! The analyzer works against the `LlmProvider` trait so the backend
//! (DeepSeek, OpenAI or a fake in tests) is chosen at startup.

mod openai;
mod provider;
mod types;

pub use openai::{OpenAIProvider, DEEPSEEK_API_BASE, DEEPSEEK_MODEL};
pub use provider::{CompletionOptions, LlmError, LlmProvider};
pub use types::{CompletionResponse, FinishReason, Message, MessageRole, TokenUsage};
