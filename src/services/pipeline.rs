use std::sync::Arc;

use crate::domain::{registrable_domain, CompanyRecord, RunOptions, RunOutcome, ScrapeError};

use super::{Enricher, FieldExtractor, PageFetcher};

/// Runs fetch, extraction and enrichment over a list of URLs, one at a time.
pub struct Pipeline {
    fetcher: Arc<dyn PageFetcher>,
    enricher: Arc<dyn Enricher>,
    extractor: FieldExtractor,
}

impl Pipeline {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        enricher: Arc<dyn Enricher>,
        extractor: FieldExtractor,
    ) -> Self {
        Pipeline {
            fetcher,
            enricher,
            extractor,
        }
    }

    /// Records come back in input order. A failing URL is logged and counted,
    /// it never stops the loop. The proxy index and the pause only follow
    /// successful URLs.
    pub async fn process(
        &self,
        urls: &[String],
        options: &RunOptions,
    ) -> (Vec<CompanyRecord>, RunOutcome) {
        let mut records = vec![];
        let mut outcome = RunOutcome::default();

        for url in urls {
            let proxy = options.proxy_for(outcome.successes);

            match self.scrape_url(url, options, proxy).await {
                Ok(record) => {
                    log::info!("Extracted {} from {}", record.company_name, url);
                    records.push(record);
                    outcome.record_success();

                    let pause = options.delay.sample();
                    tokio::time::sleep(pause).await;
                }
                Err(e) => {
                    log::error!("Skipping {}: {}", url, e);
                    outcome.record_failure();
                }
            }
        }

        log::info!("{}", outcome);

        (records, outcome)
    }

    async fn scrape_url(
        &self,
        url: &str,
        options: &RunOptions,
        proxy: Option<&str>,
    ) -> Result<CompanyRecord, ScrapeError> {
        let html = self.fetcher.fetch(url, options.mode, proxy).await?;
        let mut record = self.extractor.extract(&html, url)?;

        match registrable_domain(url) {
            Some(domain) => {
                let enrichment = self.enricher.enrich(&domain).await;
                record.merge_enrichment(enrichment);
            }
            None => log::debug!("No registrable domain in {}, skipping enrichment", url),
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::Pipeline;
    use crate::domain::{DelayRange, Enrichment, FetchMode, NetworkError, RunOptions};
    use crate::services::{Enricher, FieldExtractor, PageFetcher};

    /// Serves canned pages; unknown URLs answer with a 503.
    #[derive(Default)]
    struct FakeFetcher {
        pages: HashMap<String, String>,
        calls: Mutex<Vec<(String, FetchMode, Option<String>)>>,
    }

    impl FakeFetcher {
        fn with_pages(pages: &[(&str, &str)]) -> Self {
            FakeFetcher {
                pages: pages
                    .iter()
                    .map(|(url, html)| (url.to_string(), html.to_string()))
                    .collect(),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<(String, FetchMode, Option<String>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for FakeFetcher {
        async fn fetch(
            &self,
            url: &str,
            mode: FetchMode,
            proxy: Option<&str>,
        ) -> Result<String, NetworkError> {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), mode, proxy.map(str::to_string)));

            self.pages.get(url).cloned().ok_or(NetworkError::Status {
                url: url.to_string(),
                status: 503,
            })
        }
    }

    #[derive(Default)]
    struct FakeEnricher {
        domains: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Enricher for FakeEnricher {
        async fn enrich(&self, domain: &str) -> Enrichment {
            self.domains.lock().unwrap().push(domain.to_string());
            Enrichment {
                company: format!("{} Inc", domain),
                ..Default::default()
            }
        }
    }

    struct EmptyEnricher;

    #[async_trait]
    impl Enricher for EmptyEnricher {
        async fn enrich(&self, _domain: &str) -> Enrichment {
            Enrichment::default()
        }
    }

    fn urls(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|u| u.to_string()).collect()
    }

    #[tokio::test]
    async fn failures_are_isolated_and_counted() {
        let fetcher = Arc::new(FakeFetcher::with_pages(&[
            ("http://acme.com", "<title>Acme Co</title>"),
            ("http://empty.com", "<p>nothing to see</p>"),
            ("http://www.globex.com/about", "<a href=\"tel:5551234567\">call</a>"),
        ]));
        let enricher = Arc::new(FakeEnricher::default());
        let pipeline = Pipeline::new(fetcher, enricher.clone(), FieldExtractor::default());
        let input = urls(&[
            "http://down.com",
            "http://acme.com",
            "http://empty.com",
            "http://www.globex.com/about",
        ]);

        let (records, outcome) = pipeline.process(&input, &RunOptions::default()).await;

        assert_eq!(records.len() + outcome.failures, input.len());
        assert_eq!(outcome.successes, 2);
        assert_eq!(outcome.failures, 2);
        assert_eq!(outcome.total, 4);
        assert_eq!(records[0].website, "http://acme.com");
        assert_eq!(records[0].hunter_company, "acme.com Inc");
        assert_eq!(records[1].phone, "5551234567");
        assert_eq!(records[1].hunter_company, "globex.com Inc");
        assert_eq!(
            *enricher.domains.lock().unwrap(),
            vec!["acme.com".to_string(), "globex.com".to_string()]
        );
    }

    #[tokio::test]
    async fn proxy_index_advances_only_on_success() {
        let fetcher = Arc::new(FakeFetcher::with_pages(&[
            ("http://a.com", "<title>A</title>"),
            ("http://c.com", "<title>C</title>"),
            ("http://d.com", "<title>D</title>"),
        ]));
        let pipeline = Pipeline::new(
            fetcher.clone(),
            Arc::new(EmptyEnricher),
            FieldExtractor::default(),
        );
        let options = RunOptions {
            mode: FetchMode::Rendered,
            proxies: vec!["http://p0:80".to_string(), "http://p1:80".to_string()],
            ..Default::default()
        };

        let input = urls(&["http://a.com", "http://b.com", "http://c.com", "http://d.com"]);
        pipeline.process(&input, &options).await;

        let used: Vec<(String, Option<String>)> = fetcher
            .calls()
            .into_iter()
            .map(|(url, mode, proxy)| {
                assert_eq!(mode, FetchMode::Rendered);
                (url, proxy)
            })
            .collect();

        assert_eq!(
            used,
            vec![
                ("http://a.com".to_string(), Some("http://p0:80".to_string())),
                ("http://b.com".to_string(), Some("http://p1:80".to_string())),
                ("http://c.com".to_string(), Some("http://p1:80".to_string())),
                ("http://d.com".to_string(), Some("http://p0:80".to_string())),
            ]
        );
    }

    #[tokio::test]
    async fn empty_enrichment_leaves_hunter_fields_blank() {
        let fetcher = Arc::new(FakeFetcher::with_pages(&[(
            "http://acme.com",
            r#"<title>Acme Co</title><a href="mailto:info@acme.com">Email</a>"#,
        )]));
        let pipeline = Pipeline::new(fetcher, Arc::new(EmptyEnricher), FieldExtractor::default());

        let (records, outcome) = pipeline
            .process(&urls(&["http://acme.com"]), &RunOptions::default())
            .await;

        assert_eq!(outcome.successes, 1);
        assert_eq!(records[0].company_name, "Acme Co");
        assert_eq!(records[0].email, "info@acme.com");
        assert_eq!(records[0].hunter_company, "");
        assert_eq!(records[0].hunter_emails, "");
    }

    #[tokio::test]
    async fn ip_hosts_skip_enrichment() {
        let fetcher = Arc::new(FakeFetcher::with_pages(&[(
            "http://10.0.0.1/",
            "<title>Intranet</title>",
        )]));
        let enricher = Arc::new(FakeEnricher::default());
        let pipeline = Pipeline::new(fetcher, enricher.clone(), FieldExtractor::default());

        let (records, _) = pipeline
            .process(&urls(&["http://10.0.0.1/"]), &RunOptions::default())
            .await;

        assert_eq!(records.len(), 1);
        assert!(enricher.domains.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn every_url_failing_yields_no_records() {
        let pipeline = Pipeline::new(
            Arc::new(FakeFetcher::default()),
            Arc::new(EmptyEnricher),
            FieldExtractor::default(),
        );

        let (records, outcome) = pipeline
            .process(&urls(&["http://a.com", "http://b.com"]), &RunOptions::default())
            .await;

        assert!(records.is_empty());
        assert_eq!(outcome.failures, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn pauses_only_after_successful_urls() {
        let fetcher = Arc::new(FakeFetcher::with_pages(&[
            ("http://a.com", "<title>A</title>"),
            ("http://d.com", "<title>D</title>"),
        ]));
        let pipeline = Pipeline::new(fetcher, Arc::new(EmptyEnricher), FieldExtractor::default());
        let options = RunOptions {
            delay: DelayRange::new(2.0, 2.0).unwrap(),
            ..Default::default()
        };

        let started = tokio::time::Instant::now();
        let (records, outcome) = pipeline
            .process(
                &urls(&["http://a.com", "http://b.com", "http://c.com", "http://d.com"]),
                &options,
            )
            .await;

        assert_eq!(records.len(), 2);
        assert_eq!(outcome.failures, 2);
        assert_eq!(started.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_urls_never_pause() {
        let pipeline = Pipeline::new(
            Arc::new(FakeFetcher::default()),
            Arc::new(EmptyEnricher),
            FieldExtractor::default(),
        );
        let options = RunOptions {
            delay: DelayRange::new(1.0, 3.0).unwrap(),
            ..Default::default()
        };

        let started = tokio::time::Instant::now();
        pipeline
            .process(&urls(&["http://a.com", "http://b.com"]), &options)
            .await;

        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
