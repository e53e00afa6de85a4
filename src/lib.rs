pub mod cli;
pub mod config;
pub mod document;
pub mod entry;
pub mod error;
pub mod feed;
pub mod filter;
pub mod host;
pub mod pipeline;
pub mod sort;
pub mod util;

#[cfg(test)]
mod test_utils;

pub use config::{FeedConfig, FeedConfigFile};
pub use document::{Document, DocumentExtractor, MarkdownExtractor};
pub use entry::FeedEntry;
pub use error::{ConfigError, Error, Result};
pub use feed::{Feed, FeedDocument, FeedFormat};
pub use filter::BuildContext;
pub use host::{Assets, EmitHook, Host};
pub use pipeline::FeedPipeline;
