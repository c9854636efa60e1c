//! File sizes for the `file:size` asset field, local or over HTTP.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::{header, Client};
use tracing::debug;

use crate::error::{Result, StacError};

/// True for `http://` and `https://` hrefs.
pub fn is_remote(href: &str) -> bool {
    let lower = href.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Local filesystem path of an href, accepting `file://` URLs.
pub fn local_path(href: &str) -> Option<PathBuf> {
    if is_remote(href) {
        return None;
    }
    Some(PathBuf::from(href.strip_prefix("file://").unwrap_or(href)))
}

/// Looks up asset sizes, reusing one HTTP client.
#[derive(Debug, Clone)]
pub struct SizeProbe {
    client: Client,
}

impl SizeProbe {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client })
    }

    /// Size in bytes of the file behind `href`.
    pub async fn file_size(&self, href: &str) -> Result<u64> {
        match local_path(href) {
            Some(path) => local_size(&path).await,
            None => self.remote_size(href).await,
        }
    }

    async fn remote_size(&self, url: &str) -> Result<u64> {
        debug!(url = %url, "HEAD for content length");
        let response = self.client.head(url).send().await?;

        if !response.status().is_success() {
            return Err(StacError::SizeUnavailable {
                href: url.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        response
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| StacError::SizeUnavailable {
                href: url.to_string(),
                reason: "no Content-Length header".to_string(),
            })
    }
}

async fn local_size(path: &Path) -> Result<u64> {
    Ok(tokio::fs::metadata(path).await?.len())
}
