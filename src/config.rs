use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Configuration for a harvest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Directory downloaded images are written to
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,

    /// Path of the JSON dataset written at the end of the run
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,

    /// Navigation timeout per render attempt, in milliseconds
    #[serde(default = "default_render_timeout_ms")]
    pub render_timeout_ms: u64,

    /// Fixed pause after navigation to let client-side rendering settle
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Total render attempts per page before giving up
    #[serde(default = "default_render_attempts")]
    pub render_attempts: u32,

    /// Pause between pages, in seconds
    #[serde(default = "default_page_pause_secs")]
    pub page_pause_secs: u64,

    /// Timeout for a single image download, in seconds
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,

    /// User-Agent header sent with image requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            images_dir: default_images_dir(),
            output_file: default_output_file(),
            render_timeout_ms: default_render_timeout_ms(),
            settle_ms: default_settle_ms(),
            render_attempts: default_render_attempts(),
            page_pause_secs: default_page_pause_secs(),
            download_timeout_secs: default_download_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl CrawlerConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Apply the WEBDRIVER_URL environment variable override, if set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

/// Default images directory
fn default_images_dir() -> PathBuf {
    PathBuf::from("./images")
}

/// Default dataset output path
fn default_output_file() -> PathBuf {
    PathBuf::from("dataset.json")
}

/// Default navigation timeout (60 seconds)
fn default_render_timeout_ms() -> u64 {
    60_000
}

/// Default post-navigation settle pause (5 seconds)
fn default_settle_ms() -> u64 {
    5_000
}

/// Default number of render attempts per page
fn default_render_attempts() -> u32 {
    3
}

/// Default pause between pages
fn default_page_pause_secs() -> u64 {
    2
}

/// Default image download timeout
fn default_download_timeout_secs() -> u64 {
    30
}

/// Default desktop User-Agent; some hosts reject script-identifying agents
fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36".to_string()
}
