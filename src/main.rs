use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

mod config;
mod error;
mod models;
mod pipeline;
mod scraper;
mod store;

use config::Config;
use error::Result;
use pipeline::Pipeline;
use scraper::NewsScraper;
use store::{ArticleStore, KeywordRegistry, SettingsStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (info and up by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    // Check for --ingest flag (feed a scraper JSON dump straight to the pipeline)
    let ingest_path = if args.len() >= 3 && args[1] == "--ingest" {
        Some(PathBuf::from(&args[2]))
    } else {
        None
    };

    // Check for --watch flag (keep running on the configured interval)
    let watch = args.len() >= 2 && args[1] == "--watch";

    // Load configuration
    let config = Config::load()?;

    // Stores live for the whole process and reset on restart; the keyword
    // registry starts out seeded with the default keyword set.
    let articles = Arc::new(ArticleStore::new());
    let keywords = Arc::new(KeywordRegistry::new());
    let settings = Arc::new(SettingsStore::new());

    let scraper = NewsScraper::new(Duration::from_secs(config.request_timeout_secs));
    let pipeline = Pipeline::new(Arc::clone(&articles), Arc::clone(&keywords));

    // If an ingest file is provided, skip the scraper and exit after one run
    if let Some(path) = ingest_path {
        let content = std::fs::read_to_string(&path)?;
        let candidates: Vec<models::RawArticle> = serde_json::from_str(&content)?;
        let ingested = pipeline.ingest(candidates).await?;
        settings.touch_last_ingested();
        report_run(&config, &ingested, &articles);
        return Ok(());
    }

    if watch {
        let mut interval = tokio::time::interval(Duration::from_secs(
            u64::from(config.refresh_interval_minutes) * 60,
        ));
        loop {
            // First tick fires immediately, so a run happens shortly after start.
            interval.tick().await;
            if let Err(e) = run_once(&config, &scraper, &pipeline, &articles, &settings).await {
                tracing::error!("Ingestion run failed: {}", e);
            }
        }
    }

    run_once(&config, &scraper, &pipeline, &articles, &settings).await?;

    Ok(())
}

/// One full ingestion run: scrape, ingest, stamp the settings record,
/// report counts and the current alerts page.
async fn run_once(
    config: &Config,
    scraper: &NewsScraper,
    pipeline: &Pipeline,
    articles: &ArticleStore,
    settings: &SettingsStore,
) -> Result<()> {
    let candidates = scraper.fetch(&config.source_url).await?;
    tracing::info!("Fetched {} candidates from {}", candidates.len(), config.source_url);

    let ingested = pipeline.ingest(candidates).await?;
    settings.touch_last_ingested();
    report_run(config, &ingested, articles);

    Ok(())
}

fn report_run(config: &Config, ingested: &[models::Article], articles: &ArticleStore) {
    let alert_count = ingested.iter().filter(|a| a.alert).count();
    println!(
        "Processed {} articles, {} alerts ({} stored in total)",
        ingested.len(),
        alert_count,
        articles.count()
    );

    for article in articles.list_alerts(config.page_size, 0) {
        println!(
            "  [{}] {} ({})",
            article.matched_keywords.join(", "),
            article.title,
            article.url
        );
    }
}
