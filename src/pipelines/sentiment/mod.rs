//! Local sentiment classification.
//!
//! - [`SentimentAnalysisPipelineBuilder`] - downloads and loads the classifier
//! - [`SentimentAnalysisModel`] - trait implemented by loaded classifiers
//! - [`LocalAnalyzer`] - turns logits into an [`AnalysisResult`](crate::analysis::AnalysisResult),
//!   falling back to neutral when no model is available
//!
//! ```rust,no_run
//! use sentiment_server::pipelines::sentiment::*;
//!
//! # async fn run() {
//! let repo = "artisokka/imdb-fine-tuned-distilbert";
//! let analyzer = SentimentAnalysisPipelineBuilder::distilbert(repo)
//!     .build_analyzer()
//!     .await;
//! let result = analyzer.analyze("I love my new car").await;
//! println!("{} ({:.2})", result.sentiment, result.confidence);
//! # }
//! ```

pub mod builder;
pub mod model;
pub mod pipeline;

pub use builder::SentimentAnalysisPipelineBuilder;
pub use model::SentimentAnalysisModel;
pub use pipeline::{classify_logits, predict, LocalAnalyzer, LocalModelHandle};
