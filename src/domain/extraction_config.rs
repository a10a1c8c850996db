use std::path::Path;

use regex::Regex;
use scraper::Selector;
use serde::Deserialize;

use super::errors::ConfigError;

/// Per-field overrides as written in a config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub company_name_selector: Option<String>,
    pub email_selector: Option<String>,
    pub email_regex: Option<String>,
    pub phone_selector: Option<String>,
    pub phone_regex: Option<String>,
}

/// Overrides parsed and compiled, ready to be shared across extractions.
#[derive(Debug, Clone, Default)]
pub struct FieldRules {
    pub company_name_selector: Option<Selector>,
    pub email_selector: Option<Selector>,
    pub email_regex: Option<Regex>,
    pub phone_selector: Option<Selector>,
    pub phone_regex: Option<Regex>,
}

impl ExtractionConfig {
    /// Reads a yaml, json or toml file, picked by extension.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let load_error = |source| ConfigError::Load {
            path: path.display().to_string(),
            source,
        };

        config::Config::builder()
            .add_source(config::File::from(path))
            .build()
            .and_then(|c| c.try_deserialize::<ExtractionConfig>())
            .map_err(load_error)
    }

    pub fn compile(&self) -> Result<FieldRules, ConfigError> {
        Ok(FieldRules {
            company_name_selector: parse_selector(
                "company_name_selector",
                &self.company_name_selector,
            )?,
            email_selector: parse_selector("email_selector", &self.email_selector)?,
            email_regex: parse_regex("email_regex", &self.email_regex)?,
            phone_selector: parse_selector("phone_selector", &self.phone_selector)?,
            phone_regex: parse_regex("phone_regex", &self.phone_regex)?,
        })
    }
}

fn parse_selector(
    field: &'static str,
    raw: &Option<String>,
) -> Result<Option<Selector>, ConfigError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(selector) => Selector::parse(selector)
            .map(Some)
            .map_err(|_| ConfigError::Selector {
                field,
                selector: selector.to_string(),
            }),
    }
}

fn parse_regex(field: &'static str, raw: &Option<String>) -> Result<Option<Regex>, ConfigError> {
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(pattern) => Regex::new(pattern)
            .map(Some)
            .map_err(|source| ConfigError::Regex { field, source }),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::ExtractionConfig;
    use crate::domain::errors::ConfigError;

    #[test]
    fn loads_yaml_overrides() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "company_name_selector: \"h1.brand\"").unwrap();
        writeln!(file, "phone_regex: \"\\\\d{{3}}-\\\\d{{4}}\"").unwrap();

        let config = ExtractionConfig::from_file(file.path()).unwrap();

        assert_eq!(config.company_name_selector.as_deref(), Some("h1.brand"));
        assert_eq!(config.phone_regex.as_deref(), Some(r"\d{3}-\d{4}"));
        assert_eq!(config.email_selector, None);
    }

    #[test]
    fn compile_rejects_bad_selector() {
        let config = ExtractionConfig {
            email_selector: Some("a[[".to_string()),
            ..Default::default()
        };

        match config.compile() {
            Err(ConfigError::Selector { field, .. }) => assert_eq!(field, "email_selector"),
            other => panic!("expected selector error, got {:?}", other),
        }
    }

    #[test]
    fn compile_rejects_bad_regex() {
        let config = ExtractionConfig {
            phone_regex: Some("(\\d+".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            config.compile(),
            Err(ConfigError::Regex {
                field: "phone_regex",
                ..
            })
        ));
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let config = ExtractionConfig {
            company_name_selector: Some("  ".to_string()),
            email_regex: Some("".to_string()),
            ..Default::default()
        };

        let rules = config.compile().unwrap();

        assert!(rules.company_name_selector.is_none());
        assert!(rules.email_regex.is_none());
    }
}
