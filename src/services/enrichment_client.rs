use std::time::Duration;

use async_trait::async_trait;
use itertools::Itertools;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::domain::{expand_us_state, Enrichment};

pub const HUNTER_BASE_URL: &str = "https://api.hunter.io";

/// Supplementary company data keyed by domain. Never fails: anything that
/// goes wrong yields an empty [`Enrichment`].
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn enrich(&self, domain: &str) -> Enrichment;
}

pub struct HunterClient {
    client: Client,
    api_key: Option<String>,
    url: String,
}

#[derive(Serialize)]
struct DomainSearchQuery<'a> {
    domain: &'a str,
    api_key: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    data: DomainData,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct DomainData {
    organization: Option<String>,
    industry: Option<String>,
    emails: Option<Vec<EmailEntry>>,
    country: Option<String>,
    state: Option<String>,
    city: Option<String>,
    phone_number: Option<String>,
    linkedin: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct EmailEntry {
    value: Option<String>,
}

impl From<DomainData> for Enrichment {
    fn from(data: DomainData) -> Self {
        Enrichment {
            company: data.organization.unwrap_or_default(),
            industry: data.industry.unwrap_or_default(),
            emails: data
                .emails
                .unwrap_or_default()
                .into_iter()
                .map(|e| e.value.unwrap_or_default())
                .join(", "),
            country: data.country.unwrap_or_default(),
            state: expand_us_state(&data.state.unwrap_or_default()),
            city: data.city.unwrap_or_default(),
            phone: data.phone_number.unwrap_or_default(),
            linkedin: data.linkedin.unwrap_or_default(),
        }
    }
}

impl HunterClient {
    pub fn new(
        api_key: Option<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        let api_key = api_key.filter(|k| !k.trim().is_empty());

        Ok(HunterClient {
            client,
            api_key,
            url: format!("{}/v2/domain-search", base_url.trim_end_matches('/')),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl Enricher for HunterClient {
    async fn enrich(&self, domain: &str) -> Enrichment {
        let Some(api_key) = self.api_key.as_deref() else {
            log::debug!("No hunter api key, skipping enrichment for {}", domain);
            return Enrichment::default();
        };

        match self
            .client
            .get(self.url.clone())
            .query(&DomainSearchQuery { domain, api_key })
            .send()
            .await
        {
            Ok(res) if res.status() == StatusCode::OK => match res.json::<ApiResponse>().await {
                Ok(json) => json.data.into(),
                Err(e) => {
                    log::warn!("Error when deserializing hunter response for {}: {:?}", domain, e);
                    Enrichment::default()
                }
            },
            Ok(res) => {
                log::warn!("Hunter returned {} for {}", res.status(), domain);
                Enrichment::default()
            }
            Err(e) => {
                log::warn!("Got error from hunter api for {}: {:?}", domain, e);
                Enrichment::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{Enricher, HunterClient};

    fn client(server: &MockServer, key: Option<&str>) -> HunterClient {
        HunterClient::new(
            key.map(str::to_string),
            &server.uri(),
            Duration::from_millis(500),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn maps_domain_search_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/domain-search"))
            .and(query_param("domain", "acme.com"))
            .and(query_param("api_key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "organization": "Acme",
                    "industry": "Manufacturing",
                    "emails": [{"value": "a@acme.com"}, {"value": "b@acme.com"}],
                    "country": "US",
                    "state": "ca",
                    "city": "Burbank",
                    "phone_number": null,
                    "linkedin": "https://linkedin.com/company/acme"
                }
            })))
            .mount(&server)
            .await;

        let enrichment = client(&server, Some("secret")).enrich("acme.com").await;

        assert_eq!(enrichment.company, "Acme");
        assert_eq!(enrichment.industry, "Manufacturing");
        assert_eq!(enrichment.emails, "a@acme.com, b@acme.com");
        assert_eq!(enrichment.state, "California");
        assert_eq!(enrichment.city, "Burbank");
        assert_eq!(enrichment.phone, "");
        assert_eq!(enrichment.linkedin, "https://linkedin.com/company/acme");
    }

    #[tokio::test]
    async fn server_error_degrades_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert!(client(&server, Some("secret")).enrich("acme.com").await.is_empty());
    }

    #[tokio::test]
    async fn timeout_degrades_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": {"organization": "Acme"}}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        assert!(client(&server, Some("secret")).enrich("acme.com").await.is_empty());
    }

    #[tokio::test]
    async fn malformed_body_degrades_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;

        assert!(client(&server, Some("secret")).enrich("acme.com").await.is_empty());
    }

    #[tokio::test]
    async fn missing_key_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let hunter = client(&server, None);

        assert!(!hunter.has_api_key());
        assert!(hunter.enrich("acme.com").await.is_empty());
    }
}
