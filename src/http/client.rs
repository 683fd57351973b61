use crate::config::HttpConfig;
use crate::credentials::CredentialProvider;
use crate::http::base_headers;
use crate::ImmoError;
use reqwest::header::{HeaderMap, COOKIE, REFERER};
use reqwest::{Client, Method, Response, StatusCode};
use std::time::Duration;

/// Throttled HTTP session with credential refresh and transient-error retry
///
/// One client is constructed per city scraper and owns its credential
/// provider. All request pacing lives here so callers never sleep themselves.
pub struct HttpClient {
    client: Client,
    credentials: CredentialProvider,
    base_headers: HeaderMap,
    min_delay: Duration,
    max_delay: Duration,
    retry_delay: Duration,
    max_retries: u32,
}

impl HttpClient {
    /// Builds a client from config, an origin for the header set, and a
    /// credential provider
    pub fn new(
        config: &HttpConfig,
        origin: &str,
        credentials: CredentialProvider,
    ) -> Result<Self, ImmoError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            credentials,
            base_headers: base_headers(origin),
            min_delay: Duration::from_millis(config.min_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            max_retries: config.max_retries,
        })
    }

    /// Issues one request with the full retry policy
    ///
    /// # Behavior
    ///
    /// | Outcome | Action |
    /// |---------|--------|
    /// | HTTP 403 | Invalidate credential, retry immediately, up to `max_retries - 1` extra attempts; then `AuthExpired` |
    /// | Timeout / connection error | Sleep `retry_delay`, retry, `max_retries` attempts total; then `NetworkExhausted` |
    /// | Other transport error | Fail immediately |
    /// | Any other response (incl. 4xx/5xx) | Sleep a uniform-random delay in `[min_delay, max_delay]`, return it |
    ///
    /// The throttle sleep happens only on the return path, never before a
    /// 403-triggered retry. Status handling beyond 403 is the caller's job.
    pub async fn request(
        &mut self,
        method: Method,
        url: &str,
        body: Option<String>,
        referer: Option<&str>,
    ) -> Result<Response, ImmoError> {
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let cookie = self.credentials.get().await?.to_string();
            let mut request = self
                .client
                .request(method.clone(), url)
                .headers(self.base_headers.clone())
                .header(COOKIE, cookie);
            if let Some(referer) = referer {
                request = request.header(REFERER, referer);
            }
            if let Some(body) = &body {
                request = request.body(body.clone());
            }

            match request.send().await {
                Ok(response) if response.status() == StatusCode::FORBIDDEN => {
                    if attempt < self.max_retries {
                        tracing::warn!(url, attempt, "403 received, refreshing credential");
                        self.credentials.invalidate();
                        continue;
                    }
                    return Err(ImmoError::AuthExpired {
                        url: url.to_string(),
                    });
                }
                Ok(response) => {
                    self.throttle().await;
                    return Ok(response);
                }
                Err(e) if e.is_timeout() || e.is_connect() => {
                    if attempt < self.max_retries {
                        tracing::warn!(
                            url,
                            attempt,
                            error = %e,
                            "transient network error, retrying in {:?}",
                            self.retry_delay
                        );
                        tokio::time::sleep(self.retry_delay).await;
                        continue;
                    }
                    return Err(ImmoError::NetworkExhausted {
                        url: url.to_string(),
                        attempts: self.max_retries,
                        source: e,
                    });
                }
                Err(e) => {
                    return Err(ImmoError::Http {
                        url: url.to_string(),
                        source: e,
                    });
                }
            }
        }
    }

    /// Sleeps a uniform-random duration in `[min_delay, max_delay]`
    async fn throttle(&self) {
        let min = self.min_delay.as_millis() as u64;
        let max = self.max_delay.as_millis() as u64;
        let wait = if max > min { fastrand::u64(min..=max) } else { min };
        tokio::time::sleep(Duration::from_millis(wait)).await;
    }
}
