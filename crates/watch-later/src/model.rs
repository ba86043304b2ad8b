use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use video_categorizer::{CategorySummary, RuleTable, VideoRecord};

use crate::exporters::{CalendarEvent, TimeSlotInfo, ViewingSchedule};

pub const STATUS_OK: &str = "ok";
pub const STATUS_NO_API_KEY: &str = "no_api_key";
pub const STATUS_NO_CREDENTIALS: &str = "no_credentials";
pub const STATUS_STUB: &str = "stub_implementation";

fn default_true() -> bool {
    true
}

fn default_duration_limit() -> u32 {
    120
}

fn default_playlist_size() -> u32 {
    50
}

// --- Tool parameters ---

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AnalyzeWatchLaterParams {
    /// Limit the number of videos to analyze (default: the whole playlist).
    pub max_results: Option<u32>,
    /// Include duration and age statistics (default: true).
    #[serde(default = "default_true")]
    pub include_stats: bool,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CleanupUnavailableParams {
    /// Preview the removal without modifying the playlist (default: true).
    #[serde(default = "default_true")]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CategorizeVideosParams {
    /// Videos to categorize. Each needs at least `title` and `channel`; `description`,
    /// `duration` (seconds) and `tags` are optional. Omit to categorize the playlist.
    pub videos: Option<Vec<VideoRecord>>,
    /// Refetch the playlist instead of using a cached snapshot.
    #[serde(default)]
    pub recategorize: bool,
    /// Category overrides: `{"Name": {"keywords": [...], "channels": [...], "weight": 1.0}}`.
    /// An entry replaces the built-in category of the same name entirely.
    pub custom_rules: Option<Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CategorizeVideoParams {
    pub title: String,
    pub channel: String,
    pub description: Option<String>,
    pub duration_seconds: Option<u64>,
    pub tags: Option<Vec<String>>,
    /// Category overrides, same shape as for `categorize_videos`.
    pub custom_rules: Option<Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateNotionDatabaseParams {
    /// Name for the new Notion database.
    pub database_name: String,
    /// Existing Notion template to start from.
    pub template_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ScheduleViewingParams {
    /// Available time periods, e.g. "weekday-evening", "weekend-morning".
    pub time_slots: Vec<String>,
    /// Categories to schedule.
    pub categories: Vec<String>,
    /// Maximum session length in minutes (default: 120).
    #[serde(default = "default_duration_limit")]
    pub duration_limit: u32,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateFilteredPlaylistsParams {
    /// Categories to create playlists for.
    pub categories: Vec<String>,
    /// Maximum number of videos added to each playlist (default: 50).
    #[serde(default = "default_playlist_size")]
    pub max_videos_per_playlist: u32,
    /// Videos to distribute, each with an `id`. Omit to use the playlist.
    pub videos: Option<Vec<VideoRecord>>,
}

// --- Prompt arguments ---

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CategorizationHelpArgs {
    pub video_title: String,
    pub channel_name: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SchedulingHelpArgs {
    /// Available time in minutes.
    pub available_time: u32,
    pub categories: Vec<String>,
}

// --- Tool responses ---

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PlaylistStats {
    pub total_duration_hours: f64,
    pub avg_video_length_minutes: f64,
    /// Days since the oldest video was added, when any add date is known.
    pub oldest_video_days: Option<i64>,
    pub unavailable_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzeWatchLaterResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub playlist_id: String,
    pub max_results: Option<u32>,
    pub include_stats: bool,
    pub total_videos: usize,
    /// Number of available videos per category, in order of first appearance.
    pub categories: IndexMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<PlaylistStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RemovedVideo {
    pub id: String,
    pub playlist_item_id: String,
    pub title: String,
    /// `deleted`, `private` or `unavailable`.
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FailedRemoval {
    pub playlist_item_id: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CleanupUnavailableResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub dry_run: bool,
    /// Videos that would be removed (dry run) or were removed.
    pub removed_count: usize,
    pub removed_videos: Vec<RemovedVideo>,
    pub failed: Vec<FailedRemoval>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CategorizeVideosResponse {
    pub status: String,
    /// `request` when videos were supplied, `playlist` when they were fetched.
    pub source: String,
    pub recategorize: bool,
    pub categorized_count: usize,
    /// Per-category count and mean confidence, in order of first appearance.
    pub categories: IndexMap<String, CategorySummary>,
    pub rules_applied: RuleTable,
    /// Input records with `category`, `confidence` and `scores` added.
    pub videos: Vec<VideoRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CategorizeVideoResponse {
    pub category: String,
    pub confidence: f64,
    /// Raw score of every category, in rule-table order.
    pub scores: IndexMap<String, f64>,
    /// Meaningful words from the title, for display.
    pub keywords: Vec<String>,
    pub tags: Vec<String>,
    /// Human-readable duration, e.g. "12m 5s".
    pub duration: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NotionDatabaseResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub database_name: String,
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    pub videos_exported: usize,
    pub properties_created: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScheduleViewingResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub time_slots: Vec<String>,
    /// Details of the requested slots that are known.
    pub slot_details: Vec<TimeSlotInfo>,
    pub categories: Vec<String>,
    pub duration_limit: u32,
    pub events_created: usize,
    /// Total scheduled time, e.g. "3.0 hours".
    pub total_time_scheduled: String,
    pub calendar_events: Vec<CalendarEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_schedule: Option<ViewingSchedule>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreatedPlaylist {
    pub category: String,
    /// Absent when no video matched the category.
    pub playlist_id: Option<String>,
    pub playlist_url: Option<String>,
    pub video_count: usize,
    /// Available videos in the category before the size limit.
    pub total_available: usize,
    pub failed_additions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateFilteredPlaylistsResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub categories: Vec<String>,
    pub max_videos_per_playlist: u32,
    pub playlists_created: Vec<CreatedPlaylist>,
}

// --- Resources ---

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConfiguredKeys {
    pub youtube: bool,
    pub notion: bool,
    pub google_calendar: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ServerStats {
    pub server_name: String,
    pub version: String,
    pub status: String,
    pub tools_available: usize,
    pub resources_available: usize,
    pub prompts_available: usize,
    pub api_keys_configured: ConfiguredKeys,
    pub redis_available: bool,
    pub playlist_id: String,
    /// RFC 3339 startup timestamp.
    pub last_startup: String,
}
