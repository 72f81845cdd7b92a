pub mod distilbert;

pub use distilbert::{ClassifierConfig, DistilBertSentimentModel};
