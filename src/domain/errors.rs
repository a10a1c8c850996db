use thiserror::Error;

#[derive(Debug, Error)]
#[error("Invalid URL format: {0}")]
pub struct InvalidInputError(pub String);

#[derive(Debug, Error)]
#[error("URL not reachable: {url} ({reason})")]
pub struct UnreachableError {
    pub url: String,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Failed to fetch {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to fetch {url}: status {status}")]
    Status { url: String, status: u16 },
    #[error("Failed to build http client: {source}")]
    Client {
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid proxy {proxy}: {source}")]
    Proxy {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Renderer failed on {url}: {source}")]
    Renderer {
        url: String,
        #[source]
        source: thirtyfour::error::WebDriverError,
    },
}

#[derive(Debug, Error)]
#[error("No company info found on page {0}")]
pub struct DataExtractionError(pub String);

/// Why a single URL produced no record.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Extraction(#[from] DataExtractionError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: config::ConfigError,
    },
    #[error("Invalid selector for {field}: {selector}")]
    Selector { field: &'static str, selector: String },
    #[error("Invalid regex for {field}: {source}")]
    Regex {
        field: &'static str,
        #[source]
        source: regex::Error,
    },
    #[error("Invalid delay range [{min}, {max}]")]
    Delay { min: f64, max: f64 },
    #[error("Failed to read proxies file {path}: {source}")]
    Proxies {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
