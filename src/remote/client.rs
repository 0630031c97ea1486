//! Blocking HTTP client for fetching JSON dumps.

use crate::parser::dump_reader::load_dump_bytes;
use crate::parser::schema::Profile;
use crate::utils::config::DEFAULT_HTTP_TIMEOUT;
use crate::utils::error::LoadError;
use log::{debug, info};
use reqwest::blocking::Client;
use std::time::Duration;

/// Client for downloading dumps over HTTP(S)
pub struct DumpClient {
    client: Client,
}

impl DumpClient {
    /// Create a client with the default timeout
    pub fn new() -> Result<Self, LoadError> {
        Self::with_timeout(DEFAULT_HTTP_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, LoadError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Download a dump and parse it
    ///
    /// # Errors
    /// * `LoadError::Http` - transport failure
    /// * `LoadError::InvalidDump` - non-success HTTP status
    /// * `LoadError::Json` - body is not a dump
    pub fn fetch(&self, url: &str) -> Result<Profile, LoadError> {
        info!("Fetching dump from {}", url);

        let response = self.client.get(url).send()?;

        if !response.status().is_success() {
            return Err(LoadError::InvalidDump(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let body = response.bytes()?;
        debug!("Received {} bytes", body.len());
        load_dump_bytes(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_host_is_http_error() {
        let client = DumpClient::with_timeout(Duration::from_millis(200)).unwrap();
        assert!(matches!(
            client.fetch("http://127.0.0.1:9/dump.json"),
            Err(LoadError::Http(_))
        ));
    }
}
