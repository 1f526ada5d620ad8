use crate::error::Fl14Error;
use std::time::Duration;

/// Source of the raw PDF bytes.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, Fl14Error>;
}

/// Downloads over HTTP(S) with a blocking client. Failures are not retried.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, Fl14Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fl14/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Fl14Error::Network {
                url: String::new(),
                reason: format!("building HTTP client: {e}"),
            })?;
        Ok(HttpFetcher { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, Fl14Error> {
        let network = |e: reqwest::Error| Fl14Error::Network {
            url: url.to_string(),
            reason: e.to_string(),
        };

        tracing::info!(url, "downloading source document");
        let bytes = self
            .client
            .get(url)
            .send()
            .map_err(network)?
            .error_for_status()
            .map_err(network)?
            .bytes()
            .map_err(network)?;
        tracing::info!(bytes = bytes.len(), "download complete");

        Ok(bytes.to_vec())
    }
}
