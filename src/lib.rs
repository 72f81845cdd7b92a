pub mod analysis;
pub mod core;
mod loaders;
pub mod logging;
pub mod models;
pub mod pipelines;
pub mod remote;
pub mod router;
pub mod server;

pub use analysis::{AnalysisRequest, AnalysisResult, Backend, Sentiment};
pub use crate::core::{AnalysisError, RemoteConfig, ServerConfig};
pub use pipelines::sentiment::{LocalAnalyzer, SentimentAnalysisModel};
pub use remote::{ChatCompletion, RemoteAnalyzer};
pub use router::SentimentRouter;
