use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{redirect::Policy, StatusCode};

use crate::domain::{InvalidInputError, UnreachableError};

static URL_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(https?://)?([\w.-]+)\.([a-zA-Z]{2,})(:[0-9]+)?(/[\w\-./?%&=]*)?$").unwrap()
});

/// Adds `http://` where the scheme is missing and checks the result looks like a URL.
pub fn validate_urls(urls: &[String]) -> Result<Vec<String>, InvalidInputError> {
    urls.iter()
        .map(|raw| {
            let raw = raw.trim();
            let lower = raw.to_lowercase();
            let url = match lower.starts_with("http://") || lower.starts_with("https://") {
                true => raw.to_string(),
                false => format!("http://{}", raw),
            };

            match URL_FORMAT.is_match(&url) {
                true => Ok(url),
                false => Err(InvalidInputError(url)),
            }
        })
        .collect()
}

/// HEAD preflight: every URL must answer 200 after redirects.
pub async fn check_reachability(
    urls: &[String],
    timeout: Duration,
) -> Result<Vec<String>, UnreachableError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .redirect(Policy::limited(10))
        .build()
        .map_err(|e| UnreachableError {
            url: String::new(),
            reason: e.to_string(),
        })?;

    let mut reachable = vec![];
    for url in urls {
        match client.head(url).send().await {
            Ok(res) if res.status() == StatusCode::OK => reachable.push(url.clone()),
            Ok(res) => {
                return Err(UnreachableError {
                    url: url.clone(),
                    reason: format!("status {}", res.status().as_u16()),
                })
            }
            Err(e) => {
                return Err(UnreachableError {
                    url: url.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }

    Ok(reachable)
}
