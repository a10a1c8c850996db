use std::time::Duration;

use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::services::HUNTER_BASE_URL;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub scraper: ScraperSettings,
    pub api_keys: ApiKeys,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ScraperSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub request_timeout_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub reachability_timeout_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub enrichment_timeout_secs: u64,
    pub webdriver_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub render_wait_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_pages: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub delay_min_secs: f64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub delay_max_secs: f64,
    pub output_csv: String,
    pub output_json: String,
    pub error_log: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApiKeys {
    pub hunter: Option<String>,
    pub hunter_base_url: String,
}

impl ScraperSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn reachability_timeout(&self) -> Duration {
        Duration::from_secs(self.reachability_timeout_secs)
    }

    pub fn enrichment_timeout(&self) -> Duration {
        Duration::from_secs(self.enrichment_timeout_secs)
    }

    pub fn render_wait(&self) -> Duration {
        Duration::from_secs(self.render_wait_secs)
    }
}

/// Defaults, then `configuration/base.yaml` if present, then `APP_*` env vars.
/// `HUNTER_API_KEY` wins over everything for the enrichment key.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {}", e))
    })?;
    let configuration_directory = base_path.join("configuration");

    config::Config::builder()
        .set_default("application.host", "127.0.0.1")?
        .set_default("application.port", 8000)?
        .set_default("scraper.request_timeout_secs", 10)?
        .set_default("scraper.reachability_timeout_secs", 5)?
        .set_default("scraper.enrichment_timeout_secs", 10)?
        .set_default("scraper.webdriver_url", "http://localhost:4444")?
        .set_default("scraper.render_wait_secs", 3)?
        .set_default("scraper.max_pages", 10)?
        .set_default("scraper.delay_min_secs", 1.0)?
        .set_default("scraper.delay_max_secs", 3.0)?
        .set_default("scraper.output_csv", "output.csv")?
        .set_default("scraper.output_json", "output.json")?
        .set_default("scraper.error_log", "scraper_errors.log")?
        .set_default("api_keys.hunter_base_url", HUNTER_BASE_URL)?
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .set_override_option("api_keys.hunter", std::env::var("HUNTER_API_KEY").ok())?
        .build()?
        .try_deserialize::<Settings>()
}
