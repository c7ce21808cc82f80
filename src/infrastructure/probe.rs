//! Remote image existence checks

use crate::error::{KatalogError, Result};
use reqwest::blocking::Client;
use std::time::Duration;

/// Checks whether a remote image can be fetched
pub trait ImageProbe {
    /// `Ok(())` when the URL answers with a success status
    fn check(&self, url: &str) -> Result<()>;
}

/// ImageProbe backed by a blocking HTTP GET
#[derive(Debug, Clone)]
pub struct HttpImageProbe {
    client: Client,
}

impl HttpImageProbe {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("katalog/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(HttpImageProbe { client })
    }
}

impl ImageProbe for HttpImageProbe {
    fn check(&self, url: &str) -> Result<()> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(KatalogError::ImageUnavailable {
                url: url.to_string(),
                status: status.as_u16(),
            })
        }
    }
}
