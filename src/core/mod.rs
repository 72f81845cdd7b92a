pub mod config;
pub mod error;
pub mod message;

pub use config::{RemoteConfig, ServerConfig};
pub use error::AnalysisError;
pub use message::{Message, Role};
