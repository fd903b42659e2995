use crate::provider::{FetchError, PlaylistEntry, PlaylistSource, GENERIC_UPSTREAM_MESSAGE};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::{debug, info, warn};
use url::Url;

pub const API_BASE: &str = "https://www.googleapis.com/youtube/v3";
const EMBED_BASE: &str = "https://www.youtube-nocookie.com/embed/";

/// Items per page, the API maximum
const PAGE_SIZE: &str = "50";
/// Hard cap on pages fetched (500 entries)
const MAX_PAGES: usize = 10;

const UNTITLED: &str = "Untitled";

pub struct YoutubeProvider {
    api_key: Option<String>,
    api_base: String,
    http: reqwest::Client,
}

/// Decode a field leniently: a null or wrong-typed value becomes the default
/// instead of failing the whole page.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Like [`lenient`] for lists, dropping only the elements that don't decode.
fn lenient_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(values) = value else {
        return Ok(Vec::new());
    };
    Ok(values
        .into_iter()
        .filter_map(|v| T::deserialize(v).ok())
        .collect())
}

#[derive(Deserialize, Default)]
struct YoutubePlaylistItemsResponse {
    #[serde(default, deserialize_with = "lenient_items")]
    items: Vec<YoutubePlaylistItem>,
    #[serde(rename = "nextPageToken", default, deserialize_with = "lenient")]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct YoutubeErrorResponse {
    error: Option<YoutubeErrorBody>,
}

#[derive(Deserialize)]
struct YoutubeErrorBody {
    message: Option<String>,
}

#[derive(Deserialize)]
struct YoutubePlaylistItem {
    #[serde(default, deserialize_with = "lenient")]
    snippet: Option<YoutubeItemSnippet>,
}

#[derive(Deserialize)]
struct YoutubeItemSnippet {
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(rename = "channelTitle", default, deserialize_with = "lenient")]
    channel_title: Option<String>,
    #[serde(rename = "videoOwnerChannelTitle", default, deserialize_with = "lenient")]
    video_owner_channel_title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    thumbnails: YoutubeThumbnails,
    #[serde(rename = "resourceId", default, deserialize_with = "lenient")]
    resource_id: Option<YoutubeResourceId>,
    #[serde(default, deserialize_with = "lenient")]
    position: Option<f64>,
}

#[derive(Deserialize)]
struct YoutubeResourceId {
    #[serde(rename = "videoId", default, deserialize_with = "lenient")]
    video_id: Option<String>,
}

#[derive(Deserialize, Default)]
struct YoutubeThumbnails {
    #[serde(default, deserialize_with = "lenient")]
    maxres: Option<YoutubeThumbnail>,
    #[serde(default, deserialize_with = "lenient")]
    standard: Option<YoutubeThumbnail>,
    #[serde(default, deserialize_with = "lenient")]
    high: Option<YoutubeThumbnail>,
    #[serde(default, deserialize_with = "lenient")]
    medium: Option<YoutubeThumbnail>,
    #[serde(default, deserialize_with = "lenient")]
    default: Option<YoutubeThumbnail>,
}

#[derive(Deserialize)]
struct YoutubeThumbnail {
    #[serde(default, deserialize_with = "lenient")]
    url: Option<String>,
}

impl YoutubeThumbnails {
    /// Best available resolution, or an empty string
    fn best_url(&self) -> String {
        [
            &self.maxres,
            &self.standard,
            &self.high,
            &self.medium,
            &self.default,
        ]
        .into_iter()
        .flatten()
        .filter_map(|thumb| thumb.url.as_deref())
        .find(|url| !url.is_empty())
        .unwrap_or_default()
        .to_string()
    }
}

impl YoutubeItemSnippet {
    fn into_entry(self, fallback_position: usize) -> Option<PlaylistEntry> {
        let video_id = self
            .resource_id
            .and_then(|r| r.video_id)
            .filter(|id| !id.is_empty())?;

        let thumbnail_url = self.thumbnails.best_url();
        // Any finite number counts; negatives clamp to 0
        let position = self
            .position
            .filter(|p| p.is_finite())
            .map(|p| p as u64)
            .unwrap_or(fallback_position as u64);

        Some(PlaylistEntry {
            video_id,
            title: self.title.unwrap_or_else(|| UNTITLED.to_string()),
            channel_title: self
                .video_owner_channel_title
                .or(self.channel_title)
                .unwrap_or_default(),
            thumbnail_url,
            position,
        })
    }
}

/// Privacy-enhanced embed player link that starts playing right away.
pub fn embed_url(video_id: &str) -> Result<String, url::ParseError> {
    let mut url = Url::parse(EMBED_BASE)?.join(video_id)?;
    url.query_pairs_mut()
        .append_pair("autoplay", "1")
        .append_pair("rel", "0")
        .append_pair("modestbranding", "1")
        .append_pair("playsinline", "1");
    Ok(url.into())
}

impl YoutubeProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            api_base: API_BASE.to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    async fn fetch_page(
        &self,
        playlist_id: &str,
        api_key: &str,
        page_token: Option<&str>,
    ) -> Result<YoutubePlaylistItemsResponse, FetchError> {
        let url = format!("{}/playlistItems", self.api_base);

        let mut query = vec![
            ("part", "snippet"),
            ("maxResults", PAGE_SIZE),
            ("playlistId", playlist_id),
            ("key", api_key),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response = self.http.get(&url).query(&query).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<YoutubeErrorResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .and_then(|e| e.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_UPSTREAM_MESSAGE.to_string());
            warn!(%status, %message, "YouTube API request failed");
            return Err(FetchError::Upstream(message));
        }

        // Valid JSON of the wrong shape reads as an empty page
        let value: serde_json::Value = serde_json::from_str(&body)?;
        Ok(YoutubePlaylistItemsResponse::deserialize(value).unwrap_or_default())
    }
}

#[async_trait]
impl PlaylistSource for YoutubeProvider {
    async fn fetch(&self, playlist_id: &str) -> Result<Vec<PlaylistEntry>, FetchError> {
        let api_key = self.api_key.as_deref().ok_or(FetchError::MissingApiKey)?;

        let mut entries = Vec::new();
        let mut page_token: Option<String> = None;

        for page in 0..MAX_PAGES {
            let resp = self
                .fetch_page(playlist_id, api_key, page_token.as_deref())
                .await?;
            let received = resp.items.len();

            for item in resp.items {
                let Some(snippet) = item.snippet else {
                    continue;
                };
                if let Some(entry) = snippet.into_entry(entries.len()) {
                    entries.push(entry);
                }
            }

            debug!(page, received, total = entries.len(), "Fetched playlist page");

            page_token = resp.next_page_token.filter(|t| !t.is_empty());
            if page_token.is_none() {
                break;
            }
        }

        if page_token.is_some() {
            info!(playlist_id, "Stopped at the page limit, playlist is truncated");
        }
        info!(playlist_id, entries = entries.len(), "Fetched playlist");

        Ok(entries)
    }
}
