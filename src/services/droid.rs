use std::time::Duration;

use thirtyfour::{
    error::WebDriverResult, CapabilitiesHelper, ChromiumLikeCapabilities, DesiredCapabilities, Proxy,
    WebDriver,
};

/// A headless Chrome session used to render JavaScript-heavy pages.
pub struct Droid {
    pub driver: WebDriver,
}

impl Droid {
    pub async fn new(webdriver_url: &str, proxy: Option<&str>) -> WebDriverResult<Self> {
        let mut caps = DesiredCapabilities::chrome();
        caps.set_headless()?;
        caps.set_disable_gpu()?;
        caps.set_no_sandbox()?;

        if let Some(proxy) = proxy {
            caps.set_proxy(Proxy::Manual {
                ftp_proxy: None,
                http_proxy: Some(proxy.to_string()),
                ssl_proxy: Some(proxy.to_string()),
                socks_proxy: None,
                socks_version: None,
                socks_username: None,
                socks_password: None,
                no_proxy: None,
            })?;
        }

        let driver = WebDriver::new(webdriver_url, caps).await?;

        Ok(Droid { driver })
    }

    /// Loads the page, gives scripts `wait` to run, returns the rendered source.
    /// The session is closed whether or not navigation worked.
    pub async fn render(self, url: &str, wait: Duration) -> WebDriverResult<String> {
        let page_source = async {
            self.driver.goto(url).await?;
            tokio::time::sleep(wait).await;
            self.driver.source().await
        }
        .await;

        if let Err(e) = self.driver.quit().await {
            log::error!("Failed to quit webdriver session: {:?}", e);
        }

        page_source
    }
}
