use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::domain::{FetchMode, NetworkError};

use super::Droid;

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(
        &self,
        url: &str,
        mode: FetchMode,
        proxy: Option<&str>,
    ) -> Result<String, NetworkError>;
}

/// Fetches pages over plain HTTP or through a WebDriver-controlled browser.
pub struct HttpFetcher {
    pub request_timeout: Duration,
    pub webdriver_url: String,
    pub render_wait: Duration,
}

impl HttpFetcher {
    fn build_client(&self, proxy: Option<&str>) -> Result<Client, NetworkError> {
        let mut builder = Client::builder()
            .user_agent(fake_user_agent::get_rua())
            .timeout(self.request_timeout);

        if let Some(proxy) = proxy {
            let proxy_error = |source| NetworkError::Proxy {
                proxy: proxy.to_string(),
                source,
            };
            let http_proxy = reqwest::Proxy::http(proxy).map_err(proxy_error)?;
            let https_proxy = reqwest::Proxy::https(proxy).map_err(proxy_error)?;
            builder = builder.proxy(http_proxy).proxy(https_proxy);
        }

        builder
            .build()
            .map_err(|source| NetworkError::Client { source })
    }

    async fn fetch_static(&self, url: &str, proxy: Option<&str>) -> Result<String, NetworkError> {
        let transport_error = |source| NetworkError::Transport {
            url: url.to_string(),
            source,
        };

        let res = self
            .build_client(proxy)?
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;

        if !res.status().is_success() {
            return Err(NetworkError::Status {
                url: url.to_string(),
                status: res.status().as_u16(),
            });
        }

        res.text().await.map_err(transport_error)
    }

    async fn fetch_rendered(&self, url: &str, proxy: Option<&str>) -> Result<String, NetworkError> {
        let renderer_error = |source| NetworkError::Renderer {
            url: url.to_string(),
            source,
        };

        let droid = Droid::new(&self.webdriver_url, proxy)
            .await
            .map_err(renderer_error)?;

        droid
            .render(url, self.render_wait)
            .await
            .map_err(renderer_error)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(
        &self,
        url: &str,
        mode: FetchMode,
        proxy: Option<&str>,
    ) -> Result<String, NetworkError> {
        log::debug!("Fetching {} ({:?}, proxy: {:?})", url, mode, proxy);

        match mode {
            FetchMode::Static => self.fetch_static(url, proxy).await,
            FetchMode::Rendered => self.fetch_rendered(url, proxy).await,
        }
    }
}
