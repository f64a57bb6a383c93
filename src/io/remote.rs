use std::time::Duration;

use crate::io::snapshot::{self, SnapshotError};
use crate::model::event::TimelineData;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for fetching the default document
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        source: Box<ureq::Error>,
    },
    #[error("could not read response from {url}: {source}")]
    Body { url: String, source: std::io::Error },
    #[error("default document from {url} is invalid: {source}")]
    Invalid { url: String, source: SnapshotError },
}

/// Fetch the starter document over HTTP.
pub fn fetch_default(url: &str) -> Result<TimelineData, RemoteError> {
    tracing::debug!(url, "fetching default timeline");
    let response = ureq::get(url)
        .set("Accept", "application/json")
        .set("User-Agent", concat!("vertiline/", env!("CARGO_PKG_VERSION")))
        .timeout(FETCH_TIMEOUT)
        .call()
        .map_err(|e| RemoteError::Request {
            url: url.to_string(),
            source: Box::new(e),
        })?;

    let body = response.into_string().map_err(|e| RemoteError::Body {
        url: url.to_string(),
        source: e,
    })?;

    snapshot::deserialize(&body).map_err(|e| RemoteError::Invalid {
        url: url.to_string(),
        source: e,
    })
}
