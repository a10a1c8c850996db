use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use thiserror::Error;

use crate::{
    configuration::Settings,
    domain::{
        ConfigError, DelayRange, ExtractionConfig, FetchMode, FieldRules, InvalidInputError,
        RunOptions, RunOutcome, UnreachableError,
    },
};

use super::{
    check_reachability, expand_seeds, validate_urls, write_csv, write_json, Enricher,
    FieldExtractor, HttpFetcher, HunterClient, PageFetcher, Pipeline,
};

/// Everything a caller (CLI or dashboard) can ask of one run.
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    pub urls: Vec<String>,
    pub dynamic: bool,
    pub paginate: bool,
    pub delay: (f64, f64),
    pub proxies_file: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct JobReport {
    pub outcome: RunOutcome,
    pub records: usize,
    pub output_csv: PathBuf,
    pub output_json: PathBuf,
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),
    #[error(transparent)]
    Unreachable(#[from] UnreachableError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("No reachable URLs provided.")]
    NoReachableUrls,
    #[error("No company information could be extracted from the provided URLs.")]
    NoRecords(RunOutcome),
    #[error("Failed to build enrichment client: {0}")]
    EnrichmentClient(#[source] reqwest::Error),
    #[error("Failed to write output: {0}")]
    Output(anyhow::Error),
    #[error("Job stopped unexpectedly: {0}")]
    Aborted(String),
}

/// One proxy per line, blank lines and `#` comments skipped.
pub fn load_proxies(path: &Path) -> Result<Vec<String>, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Proxies {
        path: path.display().to_string(),
        source,
    })?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

pub fn load_rules(path: Option<&Path>) -> Result<FieldRules, ConfigError> {
    match path {
        Some(path) => ExtractionConfig::from_file(path)?.compile(),
        None => Ok(FieldRules::default()),
    }
}

pub async fn run_scrape_job(
    settings: &Settings,
    request: &ScrapeRequest,
) -> Result<JobReport, JobError> {
    let scraper = &settings.scraper;

    let delay = DelayRange::new(request.delay.0, request.delay.1)?;
    let rules = load_rules(request.config_file.as_deref())?;
    let proxies = match &request.proxies_file {
        Some(path) => load_proxies(path)?,
        None => vec![],
    };

    let urls = validate_urls(&request.urls)?;
    let mut urls = check_reachability(&urls, scraper.reachability_timeout()).await?;
    if urls.is_empty() {
        return Err(JobError::NoReachableUrls);
    }

    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher {
        request_timeout: scraper.request_timeout(),
        webdriver_url: scraper.webdriver_url.clone(),
        render_wait: scraper.render_wait(),
    });
    let hunter = HunterClient::new(
        settings.api_keys.hunter.clone(),
        &settings.api_keys.hunter_base_url,
        scraper.enrichment_timeout(),
    )
    .map_err(JobError::EnrichmentClient)?;
    if !hunter.has_api_key() {
        log::warn!("HUNTER_API_KEY is not set, hunter fields will be empty");
    }
    let enricher: Arc<dyn Enricher> = Arc::new(hunter);

    if request.paginate {
        urls = expand_seeds(fetcher.as_ref(), &urls, scraper.max_pages).await;
        log::info!("Pagination expanded seeds to {} urls", urls.len());
    }

    log::info!(
        "Scraping {} urls ({:?}, delay {}-{}s, {} proxies)",
        urls.len(),
        FetchMode::from_dynamic(request.dynamic),
        delay.min(),
        delay.max(),
        proxies.len()
    );
    let options = RunOptions {
        mode: FetchMode::from_dynamic(request.dynamic),
        delay,
        proxies,
    };
    let pipeline = Pipeline::new(fetcher, enricher, FieldExtractor::new(rules));
    let (records, outcome) = pipeline.process(&urls, &options).await;

    if records.is_empty() {
        return Err(JobError::NoRecords(outcome));
    }

    let output_csv = PathBuf::from(&scraper.output_csv);
    let output_json = PathBuf::from(&scraper.output_json);
    write_csv(&records, &output_csv).map_err(JobError::Output)?;
    write_json(&records, &output_json).map_err(JobError::Output)?;

    Ok(JobReport {
        outcome,
        records: records.len(),
        output_csv,
        output_json,
    })
}
