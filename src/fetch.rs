//! Source list download.

use crate::error::FetchError;
use crate::Result;

/// Something that can retrieve a rule list body by URL.
pub trait Fetcher {
    /// Fetch the full body of `url` as text.
    fn fetch(&self, url: &str) -> std::result::Result<String, FetchError>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch(&self, url: &str) -> std::result::Result<String, FetchError> {
        (**self).fetch(url)
    }
}

/// Blocking HTTP(S) fetcher.
///
/// Timeouts and redirect handling are the client defaults. No retries.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Create a fetcher with a default client.
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("sbrule/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> std::result::Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
    }
}
