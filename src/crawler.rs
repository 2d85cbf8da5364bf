use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::config::CrawlerConfig;
use crate::dataset::{Dataset, DatasetRecord};
use crate::download::{Downloader, Fetch};
use crate::error::{DatasetError, PageError};
use crate::extract;
use crate::render::{Render, Renderer};

/// Statistics reported after a completed run
#[derive(Debug)]
pub struct RunSummary {
    pub pages_visited: usize,
    pub images_downloaded: usize,
    pub images_dir: PathBuf,
    pub dataset_file: PathBuf,
}

/// Drives the render, extract, download pipeline over a fixed page list.
///
/// Failures are contained at the narrowest scope: a bad container never aborts
/// a page, a bad page never aborts the run, and whatever was collected is
/// always saved.
pub struct Crawler<R, F> {
    config: CrawlerConfig,
    renderer: R,
    downloader: F,
    dataset: Dataset,
}

impl Crawler<Renderer, Downloader> {
    /// Build a crawler with the production renderer and downloader.
    ///
    /// Creating the images directory is the only fatal setup step.
    pub fn new(config: CrawlerConfig) -> Result<Self, Box<dyn Error>> {
        std::fs::create_dir_all(&config.images_dir)?;
        ::log::info!("Images directory: {}", config.images_dir.display());

        let renderer = Renderer::new(&config);
        let downloader = Downloader::new(&config)?;
        Ok(Self::with_parts(config, renderer, downloader))
    }
}

impl<R: Render, F: Fetch> Crawler<R, F> {
    /// Assemble a crawler from explicit components.
    pub fn with_parts(config: CrawlerConfig, renderer: R, downloader: F) -> Self {
        Self {
            config,
            renderer,
            downloader,
            dataset: Dataset::new(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Crawl the pages in order, then save the dataset.
    ///
    /// Always completes the loop; only a dataset save failure escapes.
    pub async fn run(&mut self, pages: &[&str]) -> Result<RunSummary, DatasetError> {
        ::log::info!("Starting crawl of {} pages", pages.len());

        for (i, url) in pages.iter().enumerate() {
            ::log::info!("[{}/{}] Processing page: {}", i + 1, pages.len(), url);

            if let Err(e) = self.crawl_page(url).await {
                ::log::error!("Page {} failed: {}", url, e);
            }

            // Fixed pacing between pages, skipped after the last one
            if i + 1 < pages.len() && self.config.page_pause_secs > 0 {
                tokio::time::sleep(Duration::from_secs(self.config.page_pause_secs)).await;
            }
        }

        self.dataset.save(&self.config.output_file)?;

        let summary = RunSummary {
            pages_visited: pages.len(),
            images_downloaded: self.dataset.len(),
            images_dir: self.config.images_dir.clone(),
            dataset_file: self.config.output_file.clone(),
        };

        ::log::info!("Crawl complete");
        ::log::info!("  Pages visited: {}", summary.pages_visited);
        ::log::info!("  Images downloaded: {}", summary.images_downloaded);
        ::log::info!("  Images directory: {}", summary.images_dir.display());
        ::log::info!("  Dataset file: {}", summary.dataset_file.display());

        Ok(summary)
    }

    async fn crawl_page(&mut self, url: &str) -> Result<(), PageError> {
        let page_url = Url::parse(url)?;
        let html = self.renderer.render(url).await?;

        let candidates = extract::extract(&html, &page_url);
        for candidate in candidates {
            let filename = extract::image_filename(&candidate.url, self.dataset.len() + 1);

            match self.downloader.fetch(&candidate.url, &filename).await {
                Ok(image) => {
                    self.dataset.push(DatasetRecord {
                        image,
                        caption: candidate.caption.clone(),
                    });
                    ::log::info!(
                        "Image {}: {}",
                        self.dataset.len(),
                        truncate(&candidate.caption, 60)
                    );
                }
                Err(e) => {
                    ::log::warn!("Download failed for {}: {}", candidate.url, e);
                }
            }
        }

        Ok(())
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
