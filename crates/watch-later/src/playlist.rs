/// Playlist access for the tools: cached fetches, cleanup and category playlists.
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use mcp_common::error::CommonError;
use mcp_common::youtube::{PlaylistVideo, YouTubeClient};
use video_categorizer::engine::round2;
use video_categorizer::VideoRecord;

use crate::cache::PlaylistCache;
use crate::error::AppError;
use crate::model::{CreatedPlaylist, FailedRemoval, PlaylistStats, RemovedVideo};

pub struct PlaylistService {
    client: Option<YouTubeClient>,
    cache: PlaylistCache,
    playlist_id: String,
}

/// What a cleanup pass found and did.
pub struct CleanupOutcome {
    pub unavailable: Vec<RemovedVideo>,
    pub failed: Vec<FailedRemoval>,
}

impl PlaylistService {
    pub fn new(client: Option<YouTubeClient>, cache: PlaylistCache, playlist_id: String) -> Self {
        Self {
            client,
            cache,
            playlist_id,
        }
    }

    pub fn playlist_id(&self) -> &str {
        &self.playlist_id
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    pub async fn cache_available(&self) -> bool {
        self.cache.is_available().await
    }

    fn client(&self) -> Result<&YouTubeClient, AppError> {
        self.client
            .as_ref()
            .ok_or(AppError::Common(CommonError::MissingCredential(
                "YOUTUBE_API_KEY or YOUTUBE_ACCESS_TOKEN",
            )))
    }

    /// Fetch the playlist, serving from cache unless `refresh` is set.
    pub async fn videos(&self, max_results: Option<usize>, refresh: bool) -> Result<Vec<PlaylistVideo>, AppError> {
        if !refresh {
            if let Some(cached) = self.cache.get_playlist(&self.playlist_id, max_results).await {
                info!(videos = cached.len(), "playlist served from cache");
                return Ok(cached);
            }
        }

        let videos = self
            .client()?
            .fetch_playlist(&self.playlist_id, max_results)
            .await?;
        info!(
            playlist_id = %self.playlist_id,
            videos = videos.len(),
            "playlist fetched"
        );
        self.cache
            .set_playlist(&self.playlist_id, max_results, &videos)
            .await;
        Ok(videos)
    }

    /// Available videos as records ready for categorization.
    pub async fn available_records(&self, refresh: bool) -> Result<Vec<VideoRecord>, AppError> {
        let videos = self.videos(None, refresh).await?;
        Ok(videos
            .iter()
            .filter(|v| v.available)
            .map(PlaylistVideo::to_record)
            .collect())
    }

    /// Find unavailable entries in a fresh fetch and, unless `dry_run`, remove them.
    pub async fn cleanup_unavailable(&self, dry_run: bool) -> Result<CleanupOutcome, AppError> {
        let client = self.client()?;
        let videos = self.videos(None, true).await?;

        let unavailable: Vec<RemovedVideo> = videos
            .into_iter()
            .filter(|v| !v.available)
            .map(|v| RemovedVideo {
                reason: v
                    .unavailable_reason
                    .unwrap_or_else(|| "unavailable".to_string()),
                id: v.id,
                playlist_item_id: v.playlist_item_id,
                title: v.title,
            })
            .collect();

        if dry_run || unavailable.is_empty() {
            return Ok(CleanupOutcome {
                unavailable,
                failed: Vec::new(),
            });
        }

        let mut removed = Vec::with_capacity(unavailable.len());
        let mut failed = Vec::new();
        for video in unavailable {
            match client.remove_playlist_item(&video.playlist_item_id).await {
                Ok(()) => removed.push(video),
                Err(e) => {
                    warn!(error = %e, playlist_item_id = %video.playlist_item_id, "failed to remove playlist item");
                    failed.push(FailedRemoval {
                        playlist_item_id: video.playlist_item_id,
                        error: e.to_string(),
                    });
                }
            }
        }
        self.cache.invalidate_all().await;
        info!(removed = removed.len(), failed = failed.len(), "cleanup applied");

        Ok(CleanupOutcome {
            unavailable: removed,
            failed,
        })
    }

    /// Create a private playlist for `category` holding `video_ids`.
    ///
    /// `total_available` is reported as-is; callers apply the size limit to `video_ids`.
    pub async fn create_category_playlist(
        &self,
        category: &str,
        video_ids: &[String],
        total_available: usize,
    ) -> Result<CreatedPlaylist, AppError> {
        let client = self.client()?;
        let title = format!("Watch Later: {category}");
        let description = format!("{category} videos from Watch Later, sorted automatically.");
        let playlist_id = client.create_playlist(&title, &description).await?;

        let mut added = 0;
        for video_id in video_ids {
            match client.add_to_playlist(&playlist_id, video_id).await {
                Ok(()) => added += 1,
                Err(e) => warn!(error = %e, video_id = %video_id, playlist_id = %playlist_id, "failed to add video to playlist"),
            }
        }
        info!(category, playlist_id = %playlist_id, added, "category playlist created");

        Ok(CreatedPlaylist {
            category: category.to_string(),
            playlist_url: Some(playlist_url(&playlist_id)),
            playlist_id: Some(playlist_id),
            video_count: added,
            total_available,
            failed_additions: video_ids.len() - added,
        })
    }

    pub async fn invalidate_cache(&self) {
        self.cache.invalidate_all().await;
    }
}

pub fn playlist_url(playlist_id: &str) -> String {
    format!("https://www.youtube.com/playlist?list={playlist_id}")
}

/// Duration and age statistics over a fetched playlist.
///
/// Durations only count available videos. The oldest age uses every entry with a
/// parseable `added_at`.
pub fn playlist_stats(videos: &[PlaylistVideo], now: DateTime<Utc>) -> PlaylistStats {
    let available: Vec<&PlaylistVideo> = videos.iter().filter(|v| v.available).collect();
    let total_seconds: u64 = available.iter().map(|v| v.duration).sum();
    let avg_minutes = if available.is_empty() {
        0.0
    } else {
        total_seconds as f64 / available.len() as f64 / 60.0
    };

    let oldest = videos
        .iter()
        .filter_map(|v| v.added_at.as_deref())
        .filter_map(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|ts| ts.with_timezone(&Utc))
        .min();

    PlaylistStats {
        total_duration_hours: round2(total_seconds as f64 / 3600.0),
        avg_video_length_minutes: round2(avg_minutes),
        oldest_video_days: oldest.map(|ts| (now - ts).num_days()),
        unavailable_count: videos.len() - available.len(),
    }
}
