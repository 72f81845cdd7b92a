//! Sentiment analysis through a remote chat-completion LLM.
//!
//! - [`RemoteAnalyzer`] - builds the prompt, calls the service, parses the reply
//! - [`ChatCompletion`] - the call itself; [`GroqClient`] talks HTTP
//! - [`parse_completion`] - free text to [`AnalysisResult`](crate::analysis::AnalysisResult)

pub mod analyzer;
pub mod client;
pub mod parser;
pub mod prompt;

pub use analyzer::RemoteAnalyzer;
pub use client::{ChatCompletion, ChatCompletionError, ChatRequest, GroqClient};
pub use parser::parse_completion;
pub use prompt::PromptTemplate;
