/// Redis caching layer for fetched playlist snapshots.
///
/// All operations return `Option<T>` for graceful degradation. If Redis is unavailable,
/// callers fall through to the YouTube API.
///
/// Key schema (namespaced to avoid collisions):
/// - `wlc:v1:playlist:{sha256(playlist_id|max_results)}`: JSON-serialized Vec<PlaylistVideo>
///   (TTL: `PLAYLIST_CACHE_TTL_SECS`, invalidated on cleanup and playlist mutation)
///
/// Categorization results are never cached; they are recomputed from the snapshot.
use sha2::{Digest, Sha256};
use tracing::warn;

use mcp_common::redis::RedisCache;
use mcp_common::youtube::PlaylistVideo;

const KEY_PREFIX: &str = "wlc:v1:";

pub struct PlaylistCache {
    redis: RedisCache,
    ttl_secs: u64,
}

impl PlaylistCache {
    pub fn new(redis: RedisCache, ttl_secs: u64) -> Self {
        Self { redis, ttl_secs }
    }

    pub async fn is_available(&self) -> bool {
        self.redis.is_available().await
    }

    pub async fn get_playlist(&self, playlist_id: &str, max_results: Option<usize>) -> Option<Vec<PlaylistVideo>> {
        if self.ttl_secs == 0 {
            return None;
        }
        let key = playlist_key(playlist_id, max_results);
        let json = self.redis.get(&key).await?;
        serde_json::from_str(&json)
            .inspect_err(|e| warn!(error = %e, key, "cache deserialization failed"))
            .ok()
    }

    pub async fn set_playlist(&self, playlist_id: &str, max_results: Option<usize>, videos: &[PlaylistVideo]) {
        if self.ttl_secs == 0 {
            return;
        }
        let key = playlist_key(playlist_id, max_results);
        if let Ok(json) = serde_json::to_string(videos) {
            self.redis.set_with_ttl(&key, &json, self.ttl_secs).await;
        }
    }

    /// Delete all cached data. Used after the playlist is modified.
    /// Uses SCAN-based prefix deletion (not KEYS).
    pub async fn invalidate_all(&self) {
        self.redis.delete_by_prefix(KEY_PREFIX).await;
    }
}

/// Compute a deterministic cache key for a playlist fetch using SHA-256.
fn playlist_key(playlist_id: &str, max_results: Option<usize>) -> String {
    let limit = max_results.map_or_else(|| "all".to_string(), |n| n.to_string());
    let mut hasher = Sha256::new();
    hasher.update(playlist_id.as_bytes());
    hasher.update(b"|");
    hasher.update(limit.as_bytes());
    let hash = hasher.finalize();
    format!("{KEY_PREFIX}playlist:{:x}", hash)
}
