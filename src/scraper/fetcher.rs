use std::time::Duration;

use chrono::Utc;
use regex::Regex;
use reqwest::Client;

use crate::error::Result;
use crate::models::RawArticle;

const USER_AGENT_STRING: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Tag vocabulary scanned against title + summary.
const POSSIBLE_TAGS: [&str; 38] = [
    "malware", "ransomware", "phishing", "data breach", "vulnerability", "exploit", "zero-day",
    "cve", "hackers", "apt", "attack", "security", "privacy", "threat", "patch", "update",
    "windows", "android", "apple", "ios", "linux", "cloud", "browser", "chrome", "firefox",
    "edge", "safari", "microsoft", "google", "amazon", "aws", "azure", "cybercrime", "ddos",
    "encryption", "blockchain", "cryptocurrency", "bitcoin",
];

/// Scrapes candidate articles from the configured news source page. Produces
/// raw records only; dedup and keyword scoring belong to the pipeline.
pub struct NewsScraper {
    client: Client,
    block_re: Regex,
    link_re: Regex,
    title_re: Regex,
    desc_re: Regex,
    label_re: Regex,
    image_re: Regex,
    date_re: Regex,
}

impl NewsScraper {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT_STRING)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            block_re: Regex::new(r#"<div[^>]*class=["'][^"']*body-post[^"']*["']"#)
                .expect("invalid block pattern"),
            link_re: Regex::new(r#"<a[^>]+href=["']([^"']+)["']"#).expect("invalid link pattern"),
            title_re: Regex::new(r#"(?s)<h2[^>]*class=["'][^"']*home-title[^"']*["'][^>]*>(.*?)</h2>"#)
                .expect("invalid title pattern"),
            desc_re: Regex::new(r#"(?s)<div[^>]*class=["'][^"']*home-desc[^"']*["'][^>]*>(.*?)</div>"#)
                .expect("invalid desc pattern"),
            label_re: Regex::new(r#"(?s)<div[^>]*class=["'][^"']*item-label[^"']*["'][^>]*>(.*?)</div>"#)
                .expect("invalid label pattern"),
            image_re: Regex::new(r#"<img[^>]+src=["']([^"']+)["']"#).expect("invalid image pattern"),
            date_re: Regex::new(r"(\w+ \d+, \d+)").expect("invalid date pattern"),
        }
    }

    /// Fetch the source page and extract candidate articles in page order.
    pub async fn fetch(&self, source_url: &str) -> Result<Vec<RawArticle>> {
        let response = self.client.get(source_url).send().await?;

        if !response.status().is_success() {
            return Err(
                anyhow::anyhow!("Failed to fetch news page: HTTP {}", response.status()).into(),
            );
        }

        let html = response.text().await?;
        let articles = self.parse_page(&html, source_url);
        tracing::debug!("Scraped {} articles from {}", articles.len(), source_url);

        Ok(articles)
    }

    /// Pure extraction over the page HTML, so it is testable offline.
    pub fn parse_page(&self, html: &str, base_url: &str) -> Vec<RawArticle> {
        let starts: Vec<usize> = self.block_re.find_iter(html).map(|m| m.start()).collect();

        let mut articles = Vec::new();
        for (i, &start) in starts.iter().enumerate() {
            let end = starts.get(i + 1).copied().unwrap_or(html.len());
            let block = &html[start..end];

            // Skip sponsored blocks
            if block.contains(r#"class="sponsored""#) || block.contains(r#"class='sponsored'"#) {
                continue;
            }

            if let Some(article) = self.parse_block(block, base_url) {
                articles.push(article);
            }
        }

        articles
    }

    fn parse_block(&self, block: &str, base_url: &str) -> Option<RawArticle> {
        let href = self.link_re.captures(block)?.get(1)?.as_str();
        let url = resolve_url(href, base_url);

        let title_html = self.title_re.captures(block)?.get(1)?.as_str();
        let title = text_from_html(title_html)?;
        if title.is_empty() {
            return None;
        }

        let summary = self
            .desc_re
            .captures(block)
            .and_then(|cap| cap.get(1))
            .and_then(|m| text_from_html(m.as_str()))
            .unwrap_or_default();

        let date = self
            .label_re
            .captures(block)
            .and_then(|cap| cap.get(1))
            .and_then(|m| text_from_html(m.as_str()))
            .and_then(|label| {
                self.date_re
                    .captures(&label)
                    .and_then(|cap| cap.get(1))
                    .map(|m| m.as_str().to_string())
            })
            .unwrap_or_else(|| Utc::now().format("%B %-d, %Y").to_string());

        let image_url = self
            .image_re
            .captures(block)
            .and_then(|cap| cap.get(1))
            .map(|m| resolve_url(m.as_str(), base_url));

        let tags = derive_tags(&title, &summary);

        Some(RawArticle {
            title,
            summary,
            url,
            date,
            tags,
            image_url,
        })
    }
}

impl Default for NewsScraper {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

/// Convert an HTML fragment to trimmed plain text.
fn text_from_html(html: &str) -> Option<String> {
    let text = html2text::from_read(html.as_bytes(), 200).ok()?;
    let cleaned: String = text
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    Some(cleaned)
}

/// Pick tags by scanning the title and summary against the known vocabulary;
/// falls back to a generic tag so every article carries at least one.
fn derive_tags(title: &str, summary: &str) -> Vec<String> {
    let corpus = format!("{} {}", title, summary).to_lowercase();
    let mut tags: Vec<String> = POSSIBLE_TAGS
        .iter()
        .filter(|tag| corpus.contains(*tag))
        .map(|tag| capitalize(tag))
        .collect();
    if tags.is_empty() {
        tags.push("Cybersecurity".to_string());
    }
    tags
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Resolve a potentially relative URL against a base URL
fn resolve_url(href: &str, base_url: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }

    if let Ok(base) = url::Url::parse(base_url) {
        if let Ok(resolved) = base.join(href) {
            return resolved.to_string();
        }
    }

    href.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
    <html><body>
    <div class="blog-posts">
      <div class="body-post clear">
        <a class="story-link" href="https://news.example.com/zero-day-flaw.html">
          <div class="item-label"><span>Jun 12, 2025</span></div>
          <h2 class="home-title">Zero-Day Flaw Exploited in the Wild</h2>
          <div class="home-desc">Attackers exploit a zero-day in a popular browser.</div>
          <img src="/images/flaw.jpg" alt="">
        </a>
      </div>
      <div class="body-post clear">
        <span class="sponsored">Sponsored</span>
        <a href="https://ads.example.com/buy-now"><h2 class="home-title">Buy Our Product</h2></a>
      </div>
      <div class="body-post clear">
        <a href="/routine-patch.html">
          <h2 class="home-title">Routine Patch Tuesday Roundup</h2>
          <div class="home-desc">Nothing unusual this month.</div>
        </a>
      </div>
    </div>
    </body></html>
    "#;

    #[test]
    fn parses_article_blocks_in_page_order() {
        let scraper = NewsScraper::default();
        let articles = scraper.parse_page(PAGE, "https://news.example.com/");

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Zero-Day Flaw Exploited in the Wild");
        assert_eq!(articles[0].url, "https://news.example.com/zero-day-flaw.html");
        assert_eq!(
            articles[0].summary,
            "Attackers exploit a zero-day in a popular browser."
        );
        assert_eq!(articles[0].date, "Jun 12, 2025");
        assert_eq!(
            articles[0].image_url.as_deref(),
            Some("https://news.example.com/images/flaw.jpg")
        );
        assert_eq!(articles[1].title, "Routine Patch Tuesday Roundup");
    }

    #[test]
    fn sponsored_blocks_are_skipped() {
        let scraper = NewsScraper::default();
        let articles = scraper.parse_page(PAGE, "https://news.example.com/");
        assert!(articles.iter().all(|a| !a.title.contains("Buy Our Product")));
    }

    #[test]
    fn relative_links_resolve_against_the_base() {
        let scraper = NewsScraper::default();
        let articles = scraper.parse_page(PAGE, "https://news.example.com/");
        assert_eq!(articles[1].url, "https://news.example.com/routine-patch.html");
    }

    #[test]
    fn missing_date_falls_back_to_today() {
        let scraper = NewsScraper::default();
        let articles = scraper.parse_page(PAGE, "https://news.example.com/");
        let expected = Utc::now().format("%B %-d, %Y").to_string();
        assert_eq!(articles[1].date, expected);
    }

    #[test]
    fn tags_come_from_the_vocabulary_with_a_fallback() {
        assert_eq!(
            derive_tags("Zero-Day in Chrome", "browser exploit patched"),
            vec!["Exploit", "Zero-day", "Patch", "Browser", "Chrome"]
        );
        assert_eq!(derive_tags("Quiet week", "nothing"), vec!["Cybersecurity"]);
    }

    #[test]
    fn capitalize_uppercases_first_letter_only() {
        assert_eq!(capitalize("ddos"), "Ddos");
        assert_eq!(capitalize(""), "");
    }
}
