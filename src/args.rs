use caption_harvest::CrawlerConfig;
use clap::Parser;
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "caption-harvest")]
#[command(about = "Harvests image+caption pairs from JavaScript-rendered pages")]
#[command(version)]
pub struct Args {
    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// URL of the WebDriver instance (e.g. ChromeDriver)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Directory downloaded images are written to
    #[arg(long)]
    pub images_dir: Option<PathBuf>,

    /// Path of the JSON dataset written at the end of the run
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Navigation timeout per render attempt, in seconds
    #[arg(long)]
    pub render_timeout: Option<u64>,

    /// Log file (log lines also go to stdout)
    #[arg(long, default_value = "caption-harvest.log")]
    pub log_file: PathBuf,
}

/// Build the run configuration from an optional config file plus CLI overrides
pub fn build_config(args: &Args) -> Result<CrawlerConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => CrawlerConfig::from_file(path)?,
        None => CrawlerConfig::default(),
    };

    if let Some(webdriver_url) = &args.webdriver_url {
        config.webdriver_url = webdriver_url.clone();
    }
    if let Some(images_dir) = &args.images_dir {
        config.images_dir = images_dir.clone();
    }
    if let Some(output) = &args.output {
        config.output_file = output.clone();
    }
    if let Some(render_timeout) = args.render_timeout {
        config.render_timeout_ms = render_timeout * 1000;
    }

    Ok(config.with_env_overrides())
}
