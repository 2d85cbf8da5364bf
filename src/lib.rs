// Re-export modules
pub mod config;
pub mod crawler;
pub mod dataset;
pub mod download;
pub mod error;
pub mod extract;
pub mod filter;
pub mod logging;
pub mod render;

// Re-export commonly used types for convenience
pub use config::CrawlerConfig;
pub use crawler::{Crawler, RunSummary};
pub use dataset::{Dataset, DatasetRecord};
pub use error::{DatasetError, DownloadError, PageError, RenderError};
pub use extract::{ImageCandidate, extract, image_filename};
