use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::domain::FetchMode;

use super::PageFetcher;

static A_TAG: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static NEXT_TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)next").unwrap());

/// Follows "next" links from `start_url`, returning at most `max_pages` URLs
/// (the start URL included). Stops quietly on the first fetch failure, page
/// without a next link, or a link back to a page already visited.
pub async fn discover_pages(
    fetcher: &dyn PageFetcher,
    start_url: &str,
    max_pages: usize,
) -> Vec<String> {
    let mut urls = vec![start_url.to_string()];
    let mut current_url = start_url.to_string();

    for _ in 1..max_pages {
        let html = match fetcher.fetch(&current_url, FetchMode::Static, None).await {
            Ok(html) => html,
            Err(e) => {
                log::debug!("Pagination stopped at {}: {}", current_url, e);
                break;
            }
        };

        let Some(next_url) = next_page_url(&html, &current_url) else {
            break;
        };
        if urls.contains(&next_url) {
            break;
        }

        log::info!("Found next page {}", next_url);
        urls.push(next_url.clone());
        current_url = next_url;
    }

    urls
}

/// Expands every seed in order, dropping URLs already produced by an earlier seed.
pub async fn expand_seeds(
    fetcher: &dyn PageFetcher,
    seeds: &[String],
    max_pages: usize,
) -> Vec<String> {
    let mut expanded: Vec<String> = vec![];

    for seed in seeds {
        for url in discover_pages(fetcher, seed, max_pages).await {
            if !expanded.contains(&url) {
                expanded.push(url);
            }
        }
    }

    expanded
}

fn next_page_url(html: &str, current_url: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let by_text = document.select(&A_TAG).find(|a| {
        let text: String = a.text().collect();
        NEXT_TEXT.is_match(&text)
    });
    let next_link = by_text.or_else(|| {
        document.select(&A_TAG).find(|a| {
            a.value()
                .attr("rel")
                .is_some_and(|rel| rel.split_whitespace().any(|r| r.eq_ignore_ascii_case("next")))
        })
    })?;

    let href = next_link.value().attr("href")?;
    let base = Url::parse(current_url).ok()?;
    base.join(href).ok().map(|u| u.to_string())
}
