//! HTTP playlist source
//!
//! Reqwest-based [`PlaylistSource`] for a JSON playlist API:
//!
//! - `GET {base}/playlists/{id}` — playlist metadata
//! - `GET {base}/playlists/{id}/tracks?offset=N&limit=M` — one page of items
//!
//! The API's offset pagination is mapped onto the collector's cursor
//! contract: the cursor is the next offset rendered as a decimal string.
//! Authentication is a pre-obtained bearer token carried in [`SourceConfig`];
//! acquiring one is the caller's problem.

use async_trait::async_trait;
use serde::Deserialize;

use super::PlaylistSource;
use crate::config::SourceConfig;
use crate::error::{Error, Result};
use crate::types::{PageItem, PlaylistId, PlaylistInfo, TracksPage};

/// Playlist source backed by a JSON REST API
pub struct HttpPlaylistSource {
    client: reqwest::Client,
    base_url: url::Url,
    bearer_token: Option<String>,
    page_size: usize,
}

/// Wire format of one tracks page
#[derive(Debug, Deserialize)]
struct TracksPageDto {
    items: Vec<PageItem>,
    /// Offset of the next page; absent on the last page
    next_offset: Option<u64>,
}

impl HttpPlaylistSource {
    /// Create a new source from configuration
    ///
    /// Fails when the configured base URL does not parse.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        // Trailing slash so Url::join treats the base as a directory
        let normalized = if config.api_base_url.ends_with('/') {
            config.api_base_url.clone()
        } else {
            format!("{}/", config.api_base_url)
        };
        let base_url = url::Url::parse(&normalized)
            .map_err(|e| Error::config("api_base_url", format!("invalid URL: {e}")))?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            bearer_token: config.bearer_token.clone(),
            page_size: config.page_size,
        })
    }

    fn endpoint(&self, path: &str) -> Result<url::Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::Source(format!("invalid endpoint '{path}': {e}")))
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: url::Url) -> Result<T> {
        let mut request = self.client.get(url.clone());
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            // Keep the status code in the message so retry classification
            // can tell 503/429 from permanent failures
            return Err(Error::Source(format!(
                "request to {url} failed with status {status}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::Source(format!("malformed payload from {url}: {e}")))
    }
}

#[async_trait]
impl PlaylistSource for HttpPlaylistSource {
    async fn playlist_info(&self, id: &PlaylistId) -> Result<PlaylistInfo> {
        let url = self.endpoint(&format!("playlists/{}", urlencoding::encode(id.as_str())))?;
        self.get_json(url).await
    }

    async fn tracks_page(&self, id: &PlaylistId, cursor: Option<&str>) -> Result<TracksPage> {
        let offset: u64 = match cursor {
            Some(raw) => raw
                .parse()
                .map_err(|_| Error::Source(format!("invalid page cursor '{raw}'")))?,
            None => 0,
        };

        let mut url = self.endpoint(&format!(
            "playlists/{}/tracks",
            urlencoding::encode(id.as_str())
        ))?;
        url.query_pairs_mut()
            .append_pair("offset", &offset.to_string())
            .append_pair("limit", &self.page_size.to_string());

        let dto: TracksPageDto = self.get_json(url).await?;
        Ok(TracksPage {
            items: dto.items,
            next_cursor: dto.next_offset.map(|n| n.to_string()),
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}
