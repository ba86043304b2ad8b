/// YouTube Data API v3 client.
///
/// Thin pass-through over the `playlistItems`, `videos` and `playlists` endpoints:
/// pagination, batched detail lookups, availability detection and error translation.
/// Read requests are retried with capped exponential backoff; writes are sent once.
use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use futures::{StreamExt, TryStreamExt};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::duration::duration_seconds_or_zero;
use crate::error::CommonError;

/// Maximum page size and id-batch size accepted by the API.
pub const MAX_PAGE_SIZE: usize = 50;

const ITEM_PARTS: &str = "snippet,contentDetails,status";
const DELETED_TITLE: &str = "Deleted video";
const PRIVATE_TITLE: &str = "Private video";

#[derive(Clone, Debug)]
pub struct YouTubeClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    pub default_timeout: Duration,
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub max_error_body_bytes: usize,
    pub detail_concurrency: usize,
}

impl YouTubeClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let parsed = |key: &str| var(key).and_then(|v| v.trim().parse::<u64>().ok());

        let base_url = var("YOUTUBE_API_BASE_URL")
            .unwrap_or_else(|| "https://www.googleapis.com/youtube/v3".to_string());

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: var("YOUTUBE_API_KEY"),
            access_token: var("YOUTUBE_ACCESS_TOKEN"),
            default_timeout: Duration::from_secs(parsed("YOUTUBE_TIMEOUT_SECS").unwrap_or(30)),
            max_retries: parsed("YOUTUBE_MAX_RETRIES").map_or(3, |n| n as u32),
            initial_backoff: Duration::from_millis(parsed("YOUTUBE_RETRY_INITIAL_MS").unwrap_or(200)),
            max_backoff: Duration::from_millis(parsed("YOUTUBE_RETRY_MAX_MS").unwrap_or(5_000)),
            max_error_body_bytes: parsed("YOUTUBE_MAX_ERROR_BODY_BYTES").map_or(8 * 1024, |n| n as usize),
            detail_concurrency: parsed("YOUTUBE_DETAIL_CONCURRENCY").map_or(4, |n| (n as usize).max(1)),
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some() || self.access_token.is_some()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum YouTubeError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid response JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("youtube quota exceeded: {message}")]
    QuotaExceeded { message: String },

    #[error("youtube returned error: status={status} reason={reason} message={message}")]
    Upstream {
        status: StatusCode,
        reason: String,
        message: String,
    },

    #[error("youtube returned non-JSON error: status={status} body={body}")]
    UpstreamBody { status: StatusCode, body: String },
}

// --- Wire types ---

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    pub id: String,
    #[serde(default)]
    pub snippet: PlaylistItemSnippet,
    #[serde(default)]
    pub content_details: PlaylistItemContentDetails,
    #[serde(default)]
    pub status: ItemStatus,
}

impl PlaylistItem {
    pub fn video_id(&self) -> Option<&str> {
        self.content_details
            .video_id
            .as_deref()
            .or_else(|| self.snippet.resource_id.video_id.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    #[serde(default)]
    pub title: String,
    /// When the item was added to the playlist.
    pub published_at: Option<String>,
    pub video_owner_channel_title: Option<String>,
    #[serde(default)]
    pub resource_id: ResourceId,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemContentDetails {
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStatus {
    pub privacy_status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    #[serde(default)]
    pub snippet: VideoSnippet,
    #[serde(default)]
    pub content_details: VideoContentDetails,
    #[serde(default)]
    pub status: ItemStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoContentDetails {
    pub duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedResource {
    id: String,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleErrorObject,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorObject {
    message: Option<String>,
    #[serde(default)]
    errors: Vec<GoogleErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    reason: Option<String>,
}

// --- Joined view ---

/// A playlist entry joined with its video details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistVideo {
    /// Video id.
    pub id: String,
    /// Playlist item id, needed to remove the entry.
    pub playlist_item_id: String,
    pub title: String,
    pub channel: String,
    pub description: String,
    /// Duration in seconds.
    pub duration: u64,
    pub tags: Vec<String>,
    /// RFC 3339 timestamp of when the video was added to the playlist.
    pub added_at: Option<String>,
    pub available: bool,
    /// `deleted`, `private` or `unavailable` when `available` is false.
    pub unavailable_reason: Option<String>,
}

impl PlaylistVideo {
    /// The video as an open JSON record, ready for batch categorization.
    pub fn to_record(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Why a playlist entry cannot be watched, if it cannot.
pub fn unavailable_reason(item: &PlaylistItem, details_found: bool) -> Option<&'static str> {
    if item.snippet.title == DELETED_TITLE {
        return Some("deleted");
    }
    let private_status = item.status.privacy_status.as_deref() == Some("private");
    if item.snippet.title == PRIVATE_TITLE || private_status {
        return Some("private");
    }
    if !details_found {
        return Some("unavailable");
    }
    None
}

fn join_item(item: PlaylistItem, details: Option<&Video>) -> PlaylistVideo {
    let reason = unavailable_reason(&item, details.is_some());
    let video_id = item.video_id().unwrap_or_default().to_string();
    let added_at = item.snippet.published_at.clone();

    match details {
        Some(video) if reason.is_none() => PlaylistVideo {
            id: video_id,
            playlist_item_id: item.id,
            title: video.snippet.title.clone(),
            channel: video.snippet.channel_title.clone(),
            description: video.snippet.description.clone(),
            duration: duration_seconds_or_zero(video.content_details.duration.as_deref()),
            tags: video.snippet.tags.clone(),
            added_at,
            available: true,
            unavailable_reason: None,
        },
        _ => PlaylistVideo {
            id: video_id,
            playlist_item_id: item.id,
            channel: item.snippet.video_owner_channel_title.unwrap_or_default(),
            title: item.snippet.title,
            description: String::new(),
            duration: 0,
            tags: Vec::new(),
            added_at,
            available: false,
            unavailable_reason: reason.map(str::to_string),
        },
    }
}

/// Map a non-success response body onto a typed error.
pub fn translate_error(status: StatusCode, body: &str) -> YouTubeError {
    let Ok(envelope) = serde_json::from_str::<GoogleErrorEnvelope>(body) else {
        return YouTubeError::UpstreamBody {
            status,
            body: body.to_string(),
        };
    };

    let message = envelope
        .error
        .message
        .unwrap_or_else(|| "unknown youtube error".to_string());
    let reason = envelope
        .error
        .errors
        .into_iter()
        .find_map(|e| e.reason)
        .unwrap_or_else(|| "unknown".to_string());

    if matches!(reason.as_str(), "quotaExceeded" | "dailyLimitExceeded") {
        return YouTubeError::QuotaExceeded { message };
    }
    YouTubeError::Upstream {
        status,
        reason,
        message,
    }
}

// --- Client ---

#[derive(Clone)]
pub struct YouTubeClient {
    config: YouTubeClientConfig,
    http: reqwest::Client,
}

impl YouTubeClient {
    pub fn new(config: YouTubeClientConfig) -> Result<Self, YouTubeError> {
        if !config.has_credentials() {
            return Err(CommonError::MissingCredential("YOUTUBE_API_KEY or YOUTUBE_ACCESS_TOKEN").into());
        }
        let http = reqwest::Client::builder()
            .user_agent("watch-later/youtube")
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &YouTubeClientConfig {
        &self.config
    }

    /// List up to `max_results` playlist entries (all of them when `None`).
    pub async fn list_playlist_items(
        &self,
        playlist_id: &str,
        max_results: Option<usize>,
    ) -> Result<Vec<PlaylistItem>, YouTubeError> {
        let mut items: Vec<PlaylistItem> = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page_size = match max_results {
                Some(max) if items.len() >= max => break,
                Some(max) => (max - items.len()).min(MAX_PAGE_SIZE),
                None => MAX_PAGE_SIZE,
            };

            let mut query = vec![
                ("part", ITEM_PARTS.to_string()),
                ("playlistId", playlist_id.to_string()),
                ("maxResults", page_size.to_string()),
            ];
            if let Some(token) = page_token.take() {
                query.push(("pageToken", token));
            }

            let page: ListResponse<PlaylistItem> = self.get_json("playlistItems", &query).await?;
            debug!(playlist_id, fetched = page.items.len(), "playlist page fetched");
            items.extend(page.items);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        if let Some(max) = max_results {
            items.truncate(max);
        }
        Ok(items)
    }

    /// Fetch details for `ids` in batches of 50, several batches in flight at once.
    ///
    /// Results follow input order; ids the API does not return are omitted.
    pub async fn get_video_details(&self, ids: &[String]) -> Result<Vec<Video>, YouTubeError> {
        let id_batches: Vec<String> = ids.chunks(MAX_PAGE_SIZE).map(|chunk| chunk.join(",")).collect();
        let pages: Vec<ListResponse<Video>> = futures::stream::iter(id_batches)
            .map(|id_batch| {
                let query = vec![("part", ITEM_PARTS.to_string()), ("id", id_batch)];
                async move { self.get_json::<ListResponse<Video>>("videos", &query).await }
            })
            .buffered(self.config.detail_concurrency.max(1))
            .try_collect()
            .await?;

        Ok(pages.into_iter().flat_map(|page| page.items).collect())
    }

    /// Fetch a playlist and join every entry with its video details.
    pub async fn fetch_playlist(
        &self,
        playlist_id: &str,
        max_results: Option<usize>,
    ) -> Result<Vec<PlaylistVideo>, YouTubeError> {
        let items = self.list_playlist_items(playlist_id, max_results).await?;
        let ids: Vec<String> = items
            .iter()
            .filter_map(|item| item.video_id().map(str::to_string))
            .collect();
        let details: HashMap<String, Video> = self
            .get_video_details(&ids)
            .await?
            .into_iter()
            .map(|video| (video.id.clone(), video))
            .collect();

        Ok(items
            .into_iter()
            .map(|item| {
                let found = item.video_id().and_then(|id| details.get(id));
                join_item(item, found)
            })
            .collect())
    }

    pub async fn remove_playlist_item(&self, playlist_item_id: &str) -> Result<(), YouTubeError> {
        let url = format!("{}/playlistItems", self.config.base_url);
        let request = self
            .authorize(self.http.delete(&url))
            .query(&[("id", playlist_item_id)]);
        self.send_once(request).await.map(|_| ())
    }

    /// Create a private playlist and return its id.
    pub async fn create_playlist(&self, title: &str, description: &str) -> Result<String, YouTubeError> {
        let url = format!("{}/playlists", self.config.base_url);
        let body = json!({
            "snippet": {"title": title, "description": description},
            "status": {"privacyStatus": "private"},
        });
        let request = self
            .authorize(self.http.post(&url))
            .query(&[("part", "snippet,status")])
            .json(&body);
        let bytes = self.send_once(request).await?;
        let created: CreatedResource = serde_json::from_slice(&bytes)?;
        Ok(created.id)
    }

    pub async fn add_to_playlist(&self, playlist_id: &str, video_id: &str) -> Result<(), YouTubeError> {
        let url = format!("{}/playlistItems", self.config.base_url);
        let body = json!({
            "snippet": {
                "playlistId": playlist_id,
                "resourceId": {"kind": "youtube#video", "videoId": video_id},
            }
        });
        let request = self
            .authorize(self.http.post(&url))
            .query(&[("part", "snippet")])
            .json(&body);
        self.send_once(request).await.map(|_| ())
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match &self.config.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let request = match &self.config.api_key {
            Some(key) => request.query(&[("key", key)]),
            None => request,
        };
        request.timeout(self.config.default_timeout)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, String)],
    ) -> Result<T, YouTubeError> {
        let url = format!("{}/{resource}", self.config.base_url);
        let max_error_bytes = self.config.max_error_body_bytes;
        self.with_retry(|| {
            let request = self.authorize(self.http.get(&url)).query(query);
            async move {
                let bytes = Self::send(request, max_error_bytes).await?;
                Ok(serde_json::from_slice(&bytes)?)
            }
        })
        .await
    }

    async fn send_once(&self, request: RequestBuilder) -> Result<Vec<u8>, YouTubeError> {
        Self::send(request, self.config.max_error_body_bytes).await
    }

    async fn send(request: RequestBuilder, max_error_bytes: usize) -> Result<Vec<u8>, YouTubeError> {
        let resp = request.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.bytes().await?.to_vec());
        }
        let body = match resp.bytes().await {
            Ok(bytes) => {
                let end = bytes.len().min(max_error_bytes);
                String::from_utf8_lossy(&bytes[..end]).into_owned()
            }
            Err(e) => {
                warn!(error = %e, "failed to read youtube error body");
                String::new()
            }
        };
        Err(translate_error(status, &body))
    }

    async fn with_retry<T, F, Fut>(&self, mut attempt_fn: F) -> Result<T, YouTubeError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, YouTubeError>>,
    {
        let mut retries: u32 = 0;
        loop {
            match attempt_fn().await {
                Ok(value) => return Ok(value),
                Err(e) if retries < self.config.max_retries && is_retryable(&e) => {
                    let delay = backoff_delay(self.config.initial_backoff, self.config.max_backoff, retries);
                    retries += 1;
                    warn!(
                        retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "youtube request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn is_retryable(err: &YouTubeError) -> bool {
    match err {
        YouTubeError::Request(e) => e.is_timeout() || e.is_connect() || e.is_body(),
        YouTubeError::Upstream { status, .. } | YouTubeError::UpstreamBody { status, .. } => {
            *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
        }
        YouTubeError::QuotaExceeded { .. } | YouTubeError::InvalidJson(_) | YouTubeError::Common(_) => false,
    }
}

/// `initial * 2^retry`, capped at `max`, plus up to 25% jitter.
fn backoff_delay(initial: Duration, max: Duration, retry: u32) -> Duration {
    let factor = 2u32.checked_pow(retry).unwrap_or(u32::MAX);
    let base = initial.saturating_mul(factor).min(max);
    let jitter_ceiling = (base.as_millis() as u64 / 4).max(1);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64)
        .unwrap_or(0);
    base + Duration::from_millis(nanos % (jitter_ceiling + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn config_defaults_and_overrides() {
        let config = YouTubeClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config.base_url, "https://www.googleapis.com/youtube/v3");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.detail_concurrency, 4);
        assert!(!config.has_credentials());

        let config = YouTubeClientConfig::from_lookup(lookup(&[
            ("YOUTUBE_API_BASE_URL", "http://localhost:9000/v3/"),
            ("YOUTUBE_API_KEY", "key"),
            ("YOUTUBE_ACCESS_TOKEN", "  "),
            ("YOUTUBE_DETAIL_CONCURRENCY", "0"),
            ("YOUTUBE_MAX_RETRIES", "nope"),
        ]));
        assert_eq!(config.base_url, "http://localhost:9000/v3");
        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert_eq!(config.access_token, None);
        assert_eq!(config.detail_concurrency, 1);
        assert_eq!(config.max_retries, 3);
        assert!(config.has_credentials());
    }

    #[test]
    fn client_requires_credentials() {
        let config = YouTubeClientConfig::from_lookup(lookup(&[]));
        let err = YouTubeClient::new(config).err().expect("missing credentials");
        assert!(matches!(err, YouTubeError::Common(CommonError::MissingCredential(_))));
    }

    #[test]
    fn parses_playlist_page() {
        let body = r#"{
            "nextPageToken": "CAUQAA",
            "items": [
                {
                    "id": "UExfaXRlbTE",
                    "snippet": {
                        "title": "Rust in 100 Seconds",
                        "publishedAt": "2024-05-01T10:00:00Z",
                        "videoOwnerChannelTitle": "Fireship",
                        "resourceId": {"kind": "youtube#video", "videoId": "5C_HPTJg5ek"}
                    },
                    "contentDetails": {"videoId": "5C_HPTJg5ek"},
                    "status": {"privacyStatus": "public"}
                },
                {"id": "UExfaXRlbTI", "snippet": {"title": "Deleted video"}}
            ]
        }"#;
        let page: ListResponse<PlaylistItem> = serde_json::from_str(body).unwrap();
        assert_eq!(page.next_page_token.as_deref(), Some("CAUQAA"));
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].video_id(), Some("5C_HPTJg5ek"));
        assert_eq!(page.items[1].video_id(), None);
    }

    #[test]
    fn detects_unavailable_items() {
        let item = |title: &str, privacy: Option<&str>| PlaylistItem {
            id: "item".to_string(),
            snippet: PlaylistItemSnippet {
                title: title.to_string(),
                ..Default::default()
            },
            status: ItemStatus {
                privacy_status: privacy.map(str::to_string),
            },
            ..Default::default()
        };

        assert_eq!(unavailable_reason(&item("Deleted video", None), false), Some("deleted"));
        assert_eq!(unavailable_reason(&item("Private video", None), false), Some("private"));
        assert_eq!(unavailable_reason(&item("Talk", Some("private")), true), Some("private"));
        assert_eq!(unavailable_reason(&item("Talk", Some("public")), false), Some("unavailable"));
        assert_eq!(unavailable_reason(&item("Talk", Some("unlisted")), true), None);
    }

    #[test]
    fn joins_item_with_details() {
        let item: PlaylistItem = serde_json::from_value(json!({
            "id": "pl-1",
            "snippet": {"title": "Talk", "publishedAt": "2024-01-01T00:00:00Z"},
            "contentDetails": {"videoId": "vid-1"}
        }))
        .unwrap();
        let video: Video = serde_json::from_value(json!({
            "id": "vid-1",
            "snippet": {
                "title": "GopherCon Keynote",
                "channelTitle": "Gopher Academy",
                "description": "Opening keynote",
                "tags": ["go", "keynote"]
            },
            "contentDetails": {"duration": "PT45M10S"}
        }))
        .unwrap();

        let joined = join_item(item.clone(), Some(&video));
        assert!(joined.available);
        assert_eq!(joined.title, "GopherCon Keynote");
        assert_eq!(joined.channel, "Gopher Academy");
        assert_eq!(joined.duration, 2710);
        assert_eq!(joined.added_at.as_deref(), Some("2024-01-01T00:00:00Z"));

        let missing = join_item(item, None);
        assert!(!missing.available);
        assert_eq!(missing.title, "Talk");
        assert_eq!(missing.unavailable_reason.as_deref(), Some("unavailable"));
    }

    #[test]
    fn record_uses_duration_field() {
        let video = PlaylistVideo {
            id: "v".to_string(),
            playlist_item_id: "p".to_string(),
            title: "t".to_string(),
            channel: "c".to_string(),
            description: String::new(),
            duration: 90,
            tags: vec![],
            added_at: None,
            available: true,
            unavailable_reason: None,
        };
        let record = video.to_record();
        assert_eq!(record["duration"], json!(90));
        assert_eq!(record["channel"], json!("c"));
    }

    #[test]
    fn translates_quota_errors() {
        let body = r#"{"error": {"code": 403, "message": "The request cannot be completed because you have exceeded your quota.",
            "errors": [{"message": "quota", "domain": "youtube.quota", "reason": "quotaExceeded"}]}}"#;
        let err = translate_error(StatusCode::FORBIDDEN, body);
        assert!(matches!(err, YouTubeError::QuotaExceeded { .. }));
        assert!(!is_retryable(&err));
    }

    #[test]
    fn translates_upstream_errors() {
        let body = r#"{"error": {"code": 404, "message": "Playlist not found", "errors": [{"reason": "playlistNotFound"}]}}"#;
        match translate_error(StatusCode::NOT_FOUND, body) {
            YouTubeError::Upstream { status, reason, message } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(reason, "playlistNotFound");
                assert_eq!(message, "Playlist not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = translate_error(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert!(matches!(err, YouTubeError::UpstreamBody { .. }));
        assert!(is_retryable(&err));
    }

    #[test]
    fn backoff_grows_and_caps() {
        let initial = Duration::from_millis(100);
        let max = Duration::from_millis(1_000);
        let first = backoff_delay(initial, max, 0);
        assert!(first >= initial && first <= Duration::from_millis(126));

        let capped = backoff_delay(initial, max, 10);
        assert!(capped >= max && capped <= Duration::from_millis(1_251));

        let huge = backoff_delay(initial, max, 64);
        assert!(huge >= max);
    }
}
