use reqwest::blocking::Client;
use std::time::Duration;

use crate::error::ChainError;

/// Download capability used by the resolver: raw response body of an issuer
/// URL, or a `ChainError::Fetch` on network/status failure.
pub trait FetchIssuer {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ChainError>;
}

impl<F: FetchIssuer + ?Sized> FetchIssuer for &F {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ChainError> {
        (**self).fetch(url)
    }
}

/// Blocking HTTP fetcher; one GET per call, bounded by `timeout`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("chainflat/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(timeout)
            .build()?;
        Ok(HttpFetcher { client })
    }
}

impl FetchIssuer for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ChainError> {
        tracing::debug!(url, "GET issuer certificate");
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| ChainError::fetch(url, format!("GET failed: {}", e)))?;
        if !resp.status().is_success() {
            return Err(ChainError::fetch(url, format!("HTTP {}", resp.status())));
        }
        let bytes = resp
            .bytes()
            .map_err(|e| ChainError::fetch(url, format!("failed to read body: {}", e)))?;
        Ok(bytes.to_vec())
    }
}
