use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::config::CrawlerConfig;
use crate::error::DownloadError;

/// Fetches an image to a local file and reports its dataset path.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    async fn fetch(&self, url: &Url, filename: &str) -> Result<String, DownloadError>;
}

/// HTTP image downloader.
///
/// Uses a single reqwest client with a desktop User-Agent and a fixed request
/// timeout. Bodies are streamed to disk chunk by chunk so peak memory stays
/// bounded for large images.
pub struct Downloader {
    client: reqwest::Client,
    images_dir: PathBuf,
    relative_prefix: String,
}

impl Downloader {
    pub fn new(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.download_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            images_dir: config.images_dir.clone(),
            relative_prefix: relative_prefix(&config.images_dir),
        })
    }
}

/// Dataset paths use the directory's final component so the JSON stays
/// portable alongside the images directory.
fn relative_prefix(images_dir: &Path) -> String {
    let dir_name = images_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "images".to_string());
    format!("./{}", dir_name)
}

impl Fetch for Downloader {
    async fn fetch(&self, url: &Url, filename: &str) -> Result<String, DownloadError> {
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| DownloadError::Transport {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let path = self.images_dir.join(filename);
        let mut file = tokio::fs::File::create(&path)
            .await
            .map_err(|source| DownloadError::Write {
                path: path.clone(),
                source,
            })?;

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|source| DownloadError::Transport {
                url: url.to_string(),
                source,
            })?
        {
            file.write_all(&chunk)
                .await
                .map_err(|source| DownloadError::Write {
                    path: path.clone(),
                    source,
                })?;
        }

        file.flush().await.map_err(|source| DownloadError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(format!("{}/{}", self.relative_prefix, filename))
    }
}
