use clap::Parser;

use caption_harvest::{Crawler, logging};

mod args;
use args::{Args, build_config};

/// Standard iGEM wiki page list for the reference deployment
const PAGES: [&str; 16] = [
    "https://2025.igem.wiki/jlu-cp/",
    "https://2025.igem.wiki/jlu-cp/description",
    "https://2025.igem.wiki/jlu-cp/design",
    "https://2025.igem.wiki/jlu-cp/experiments",
    "https://2025.igem.wiki/jlu-cp/results",
    "https://2025.igem.wiki/jlu-cp/engineering",
    "https://2025.igem.wiki/jlu-cp/notebook",
    "https://2025.igem.wiki/jlu-cp/team",
    "https://2025.igem.wiki/jlu-cp/attributions",
    "https://2025.igem.wiki/jlu-cp/safety",
    "https://2025.igem.wiki/jlu-cp/human-practices",
    "https://2025.igem.wiki/jlu-cp/contribution",
    "https://2025.igem.wiki/jlu-cp/model",
    "https://2025.igem.wiki/jlu-cp/implementation",
    "https://2025.igem.wiki/jlu-cp/proof-of-concept",
    "https://2025.igem.wiki/jlu-cp/parts",
];

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging before anything else can emit
    if let Err(e) = logging::init(&args.log_file) {
        eprintln!("Failed to open log file {}: {}", args.log_file.display(), e);
        std::process::exit(1);
    }

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    println!("Note: rendering requires a WebDriver server (e.g. ChromeDriver).");
    println!(
        "Set WEBDRIVER_URL or pass --webdriver-url if not using the default {}",
        config.webdriver_url
    );

    ::log::info!("Harvesting {} pages", PAGES.len());

    let mut crawler = match Crawler::new(config) {
        Ok(crawler) => crawler,
        Err(e) => {
            ::log::error!("Failed to set up crawler: {}", e);
            std::process::exit(1);
        }
    };

    let start_time = std::time::Instant::now();

    match crawler.run(&PAGES).await {
        Ok(summary) => {
            ::log::info!(
                "Finished in {:.2} seconds ({} images from {} pages)",
                start_time.elapsed().as_secs_f64(),
                summary.images_downloaded,
                summary.pages_visited
            );
        }
        Err(e) => {
            ::log::error!("Failed to save dataset: {}", e);
            std::process::exit(1);
        }
    }
}
