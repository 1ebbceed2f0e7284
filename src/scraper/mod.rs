mod fetcher;

pub use fetcher::NewsScraper;
