/// MCP server for organizing a YouTube Watch Later playlist.
///
/// Exposes seven tools:
/// - `analyze_watch_later`: Category breakdown and statistics for the playlist
/// - `cleanup_unavailable`: Find and remove deleted/private entries
/// - `categorize_videos`: Categorize supplied videos or the playlist
/// - `categorize_video`: Categorize a single video
/// - `create_notion_database`: Export to Notion (stub)
/// - `schedule_viewing`: Plan viewing sessions (stub)
/// - `create_filtered_playlists`: One playlist per category
///
/// plus the `config://categories` and `stats://server` resources and two prompts.
use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use indexmap::IndexMap;
use rmcp::{
    ErrorData as McpError, Json, RoleServer, ServerHandler,
    handler::server::router::prompt::PromptRouter,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    prompt, prompt_handler, prompt_router,
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use serde_json::Value;
use tracing::info;

use mcp_common::youtube::PlaylistVideo;
use video_categorizer::rules::CATEGORY_DESCRIPTIONS;
use video_categorizer::{
    default_rules, extract_keywords, format_duration, summarize, VideoCategorizer, VideoMetadata,
    VideoRecord,
};

use crate::config::Config;
use crate::exporters::{
    describe_slots, stub_calendar_events, stub_notion_url, stub_videos_exported,
    suggest_viewing_schedule, total_time_scheduled, NOTION_PROPERTIES,
};
use crate::model::{
    AnalyzeWatchLaterParams, AnalyzeWatchLaterResponse, CategorizationHelpArgs,
    CategorizeVideoParams, CategorizeVideoResponse, CategorizeVideosParams,
    CategorizeVideosResponse, CleanupUnavailableParams, CleanupUnavailableResponse,
    ConfiguredKeys, CreateFilteredPlaylistsParams, CreateFilteredPlaylistsResponse,
    CreateNotionDatabaseParams, CreatedPlaylist, NotionDatabaseResponse, PlaylistStats,
    ScheduleViewingParams, ScheduleViewingResponse, SchedulingHelpArgs, ServerStats, STATUS_NO_API_KEY,
    STATUS_NO_CREDENTIALS, STATUS_OK, STATUS_STUB,
};
use crate::playlist::{playlist_stats, PlaylistService};

pub const SERVER_NAME: &str = "watch-later";
const CATEGORIES_URI: &str = "config://categories";
const STATS_URI: &str = "stats://server";

/// Breakdown returned when no YouTube credentials are configured.
const SAMPLE_TOTAL_VIDEOS: usize = 247;
const SAMPLE_CATEGORIES: [(&str, usize); 5] = [
    ("Education", 89),
    ("Tech", 67),
    ("Entertainment", 45),
    ("Productivity", 32),
    ("Conference", 14),
];

// --- MCP Server ---

#[derive(Clone)]
pub struct WatchLaterServer {
    config: Arc<Config>,
    playlist: Arc<PlaylistService>,
    started_at: DateTime<Utc>,
    tool_router: ToolRouter<WatchLaterServer>,
    prompt_router: PromptRouter<WatchLaterServer>,
}

impl WatchLaterServer {
    pub fn new(config: Config, playlist: PlaylistService) -> Self {
        Self {
            config: Arc::new(config),
            playlist: Arc::new(playlist),
            started_at: Utc::now(),
            tool_router: Self::tool_router(),
            prompt_router: Self::prompt_router(),
        }
    }

    async fn server_stats(&self) -> ServerStats {
        ServerStats {
            server_name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            status: "running".to_string(),
            tools_available: self.tool_router.list_all().len(),
            resources_available: 2,
            prompts_available: self.prompt_router.list_all().len(),
            api_keys_configured: ConfiguredKeys {
                youtube: self.config.has_youtube(),
                notion: self.config.has_notion(),
                google_calendar: self.config.has_google_credentials(),
            },
            redis_available: self.playlist.cache_available().await,
            playlist_id: self.playlist.playlist_id().to_string(),
            last_startup: self.started_at.to_rfc3339(),
        }
    }
}

#[tool_router]
impl WatchLaterServer {
    #[tool(description = "Fetch and analyze the Watch Later playlist: video count per category plus duration and age statistics. Returns sample data with status 'no_api_key' when YouTube credentials are not configured.")]
    async fn analyze_watch_later(
        &self,
        Parameters(params): Parameters<AnalyzeWatchLaterParams>,
    ) -> Result<Json<AnalyzeWatchLaterResponse>, String> {
        if !self.playlist.is_connected() {
            info!("youtube credentials missing, returning sample analysis");
            return Ok(Json(sample_analysis(&params, self.playlist.playlist_id())));
        }

        let max_results = params.max_results.map(|n| n as usize);
        let videos = self
            .playlist
            .videos(max_results, false)
            .await
            .map_err(|e| format!("fetch failed: {e}"))?;

        let records: Vec<VideoRecord> = videos
            .iter()
            .filter(|v| v.available)
            .map(PlaylistVideo::to_record)
            .collect();
        let categorized = VideoCategorizer::default().categorize_batch(&records);
        let categories: IndexMap<String, usize> = summarize(&categorized)
            .into_iter()
            .map(|(name, summary)| (name, summary.count))
            .collect();
        let stats = params
            .include_stats
            .then(|| playlist_stats(&videos, Utc::now()));

        info!(
            videos = videos.len(),
            categories = categories.len(),
            "watch later analyzed"
        );

        Ok(Json(AnalyzeWatchLaterResponse {
            status: STATUS_OK.to_string(),
            message: None,
            playlist_id: self.playlist.playlist_id().to_string(),
            max_results: params.max_results,
            include_stats: params.include_stats,
            total_videos: videos.len(),
            categories,
            stats,
        }))
    }

    #[tool(description = "Find deleted, private and otherwise unavailable videos in the Watch Later playlist. With dry_run=false they are removed from the playlist.")]
    async fn cleanup_unavailable(
        &self,
        Parameters(params): Parameters<CleanupUnavailableParams>,
    ) -> Result<Json<CleanupUnavailableResponse>, String> {
        if !self.playlist.is_connected() {
            return Ok(Json(CleanupUnavailableResponse {
                status: STATUS_NO_API_KEY.to_string(),
                message: Some("YouTube credentials required for cleanup operations".to_string()),
                dry_run: params.dry_run,
                removed_count: 0,
                removed_videos: Vec::new(),
                failed: Vec::new(),
            }));
        }

        info!(dry_run = params.dry_run, "cleanup_unavailable tool invoked");
        let outcome = self
            .playlist
            .cleanup_unavailable(params.dry_run)
            .await
            .map_err(|e| format!("cleanup failed: {e}"))?;

        Ok(Json(CleanupUnavailableResponse {
            status: STATUS_OK.to_string(),
            message: None,
            dry_run: params.dry_run,
            removed_count: outcome.unavailable.len(),
            removed_videos: outcome.unavailable,
            failed: outcome.failed,
        }))
    }

    #[tool(description = "Categorize videos by keyword, channel and duration rules. Pass 'videos' (objects with title, channel, optional description, duration in seconds and tags) or omit it to categorize the Watch Later playlist. 'custom_rules' replaces or adds categories: {\"Name\": {\"keywords\": [...], \"channels\": [...], \"weight\": 1.0}}.")]
    async fn categorize_videos(
        &self,
        Parameters(params): Parameters<CategorizeVideosParams>,
    ) -> Result<Json<CategorizeVideosResponse>, String> {
        let categorizer = VideoCategorizer::from_custom_rules(params.custom_rules.as_ref());

        let (source, records) = match params.videos {
            Some(videos) => ("request", videos),
            None if self.playlist.is_connected() => {
                let records = self
                    .playlist
                    .available_records(params.recategorize)
                    .await
                    .map_err(|e| format!("fetch failed: {e}"))?;
                ("playlist", records)
            }
            None => {
                return Err(
                    "no videos supplied and YouTube credentials are not configured".to_string(),
                )
            }
        };

        let categorized = categorizer.categorize_batch(&records);
        let categories = summarize(&categorized);
        info!(
            source,
            videos = categorized.len(),
            categories = categories.len(),
            "videos categorized"
        );

        Ok(Json(CategorizeVideosResponse {
            status: STATUS_OK.to_string(),
            source: source.to_string(),
            recategorize: params.recategorize,
            categorized_count: categorized.len(),
            categories,
            rules_applied: categorizer.rules().clone(),
            videos: categorized,
        }))
    }

    #[tool(description = "Categorize a single video from its title, channel and optional description, duration and tags. Returns the winning category, confidence, per-category scores and title keywords.")]
    async fn categorize_video(
        &self,
        Parameters(params): Parameters<CategorizeVideoParams>,
    ) -> Result<Json<CategorizeVideoResponse>, String> {
        let categorizer = VideoCategorizer::from_custom_rules(params.custom_rules.as_ref());
        let meta = VideoMetadata::new(params.title, params.channel)
            .with_description(params.description.unwrap_or_default())
            .with_duration(params.duration_seconds.unwrap_or(0))
            .with_tags(params.tags.unwrap_or_default());

        let result = categorizer.categorize(&meta);
        Ok(Json(CategorizeVideoResponse {
            category: result.category,
            confidence: result.confidence,
            scores: result.scores,
            keywords: extract_keywords(&meta.title),
            tags: meta.tags,
            duration: format_duration(meta.duration_seconds),
        }))
    }

    #[tool(description = "Export organized videos to a new Notion database. Not yet connected to Notion: returns a placeholder result once NOTION_API_KEY is configured.")]
    async fn create_notion_database(
        &self,
        Parameters(params): Parameters<CreateNotionDatabaseParams>,
    ) -> Result<Json<NotionDatabaseResponse>, String> {
        let database_name = params.database_name.trim().to_string();
        if database_name.is_empty() {
            return Err("database_name must not be empty".to_string());
        }

        if !self.config.has_notion() {
            return Ok(Json(NotionDatabaseResponse {
                status: STATUS_NO_API_KEY.to_string(),
                message: Some("Notion API key required for database creation".to_string()),
                database_name,
                template_id: params.template_id,
                database_url: None,
                videos_exported: 0,
                properties_created: Vec::new(),
            }));
        }

        let database_url = stub_notion_url(&database_name);
        info!(database_name = %database_name, database_url = %database_url, "notion database created (stub)");
        Ok(Json(NotionDatabaseResponse {
            status: STATUS_STUB.to_string(),
            message: None,
            database_name,
            template_id: params.template_id,
            database_url: Some(database_url),
            videos_exported: stub_videos_exported(),
            properties_created: NOTION_PROPERTIES.iter().map(|p| p.to_string()).collect(),
        }))
    }

    #[tool(description = "Plan calendar sessions for watching videos of the given categories in the given time slots (weekday-morning, weekday-evening, weekend-morning, weekend-afternoon, weekend-evening). Not yet connected to Google Calendar: returns placeholder events once the credentials file is configured.")]
    async fn schedule_viewing(
        &self,
        Parameters(params): Parameters<ScheduleViewingParams>,
    ) -> Result<Json<ScheduleViewingResponse>, String> {
        let slot_details = describe_slots(&params.time_slots);

        if !self.config.has_google_credentials() {
            return Ok(Json(ScheduleViewingResponse {
                status: STATUS_NO_CREDENTIALS.to_string(),
                message: Some("Google Calendar credentials required for scheduling".to_string()),
                time_slots: params.time_slots,
                slot_details,
                categories: params.categories,
                duration_limit: params.duration_limit,
                events_created: 0,
                total_time_scheduled: total_time_scheduled(&[]),
                calendar_events: Vec::new(),
                suggested_schedule: None,
            }));
        }

        let events = stub_calendar_events(
            &params.categories,
            params.duration_limit,
            Local::now().date_naive(),
        );
        let suggested = suggest_viewing_schedule(params.duration_limit, &params.categories);
        info!(events = events.len(), "viewing sessions scheduled (stub)");

        Ok(Json(ScheduleViewingResponse {
            status: STATUS_STUB.to_string(),
            message: None,
            time_slots: params.time_slots,
            slot_details,
            categories: params.categories,
            duration_limit: params.duration_limit,
            events_created: events.len(),
            total_time_scheduled: total_time_scheduled(&events),
            calendar_events: events,
            suggested_schedule: Some(suggested),
        }))
    }

    #[tool(description = "Create one private YouTube playlist per requested category and fill it with matching available videos, up to max_videos_per_playlist each. Uses the supplied 'videos' (each with an 'id') or the Watch Later playlist.")]
    async fn create_filtered_playlists(
        &self,
        Parameters(params): Parameters<CreateFilteredPlaylistsParams>,
    ) -> Result<Json<CreateFilteredPlaylistsResponse>, String> {
        if params.categories.is_empty() {
            return Err("categories must not be empty".to_string());
        }

        if !self.playlist.is_connected() {
            return Ok(Json(CreateFilteredPlaylistsResponse {
                status: STATUS_NO_API_KEY.to_string(),
                message: Some("YouTube credentials required for playlist creation".to_string()),
                categories: params.categories,
                max_videos_per_playlist: params.max_videos_per_playlist,
                playlists_created: Vec::new(),
            }));
        }

        let records = match params.videos {
            Some(videos) => videos,
            None => self
                .playlist
                .available_records(false)
                .await
                .map_err(|e| format!("fetch failed: {e}"))?,
        };
        let categorized = VideoCategorizer::default().categorize_batch(&records);
        let limit = params.max_videos_per_playlist as usize;

        let mut playlists_created = Vec::with_capacity(params.categories.len());
        for category in &params.categories {
            let video_ids = video_ids_in_category(&categorized, category);
            if video_ids.is_empty() {
                playlists_created.push(CreatedPlaylist {
                    category: category.clone(),
                    playlist_id: None,
                    playlist_url: None,
                    video_count: 0,
                    total_available: 0,
                    failed_additions: 0,
                });
                continue;
            }

            let selected = &video_ids[..video_ids.len().min(limit)];
            let playlist = self
                .playlist
                .create_category_playlist(category, selected, video_ids.len())
                .await
                .map_err(|e| format!("playlist creation failed: {e}"))?;
            playlists_created.push(playlist);
        }

        if playlists_created.iter().any(|p| p.playlist_id.is_some()) {
            self.playlist.invalidate_cache().await;
        }

        Ok(Json(CreateFilteredPlaylistsResponse {
            status: STATUS_OK.to_string(),
            message: None,
            categories: params.categories,
            max_videos_per_playlist: params.max_videos_per_playlist,
            playlists_created,
        }))
    }
}

fn sample_analysis(params: &AnalyzeWatchLaterParams, playlist_id: &str) -> AnalyzeWatchLaterResponse {
    let stats = params.include_stats.then(|| PlaylistStats {
        total_duration_hours: 67.5,
        avg_video_length_minutes: 16.4,
        oldest_video_days: Some(180),
        unavailable_count: 23,
    });
    AnalyzeWatchLaterResponse {
        status: STATUS_NO_API_KEY.to_string(),
        message: Some(
            "Sample data. Set YOUTUBE_API_KEY or YOUTUBE_ACCESS_TOKEN for real analysis".to_string(),
        ),
        playlist_id: playlist_id.to_string(),
        max_results: params.max_results,
        include_stats: params.include_stats,
        total_videos: SAMPLE_TOTAL_VIDEOS,
        categories: SAMPLE_CATEGORIES
            .iter()
            .map(|(name, count)| (name.to_string(), *count))
            .collect(),
        stats,
    }
}

/// Ids of the categorized records in `category`, skipping records marked unavailable.
fn video_ids_in_category(categorized: &[VideoRecord], category: &str) -> Vec<String> {
    categorized
        .iter()
        .filter(|r| r.get("available").and_then(Value::as_bool) != Some(false))
        .filter(|r| r.get("category").and_then(Value::as_str) == Some(category))
        .filter_map(|r| r.get("id").and_then(Value::as_str).map(str::to_string))
        .collect()
}

// --- Prompts ---

#[prompt_router]
impl WatchLaterServer {
    #[prompt(name = "categorization_help", description = "Ask for help categorizing a video manually.")]
    async fn categorization_help(
        &self,
        Parameters(args): Parameters<CategorizationHelpArgs>,
    ) -> Result<Vec<PromptMessage>, McpError> {
        Ok(vec![PromptMessage::new_text(
            PromptMessageRole::User,
            categorization_prompt(&args.video_title, &args.channel_name),
        )])
    }

    #[prompt(name = "scheduling_help", description = "Ask for an optimal viewing schedule for the given time and categories.")]
    async fn scheduling_help(
        &self,
        Parameters(args): Parameters<SchedulingHelpArgs>,
    ) -> Result<Vec<PromptMessage>, McpError> {
        Ok(vec![PromptMessage::new_text(
            PromptMessageRole::User,
            scheduling_prompt(args.available_time, &args.categories),
        )])
    }
}

fn categorization_prompt(video_title: &str, channel_name: &str) -> String {
    let categories: Vec<String> = default_rules().names().map(str::to_string).collect();
    format!(
        "Help categorize this YouTube video:\n\n\
         Title: {video_title}\n\
         Channel: {channel_name}\n\n\
         Suggest the most appropriate category from: {}\n\n\
         Consider the title keywords, channel type, and likely content focus.\n\
         Provide reasoning for your categorization choice.",
        categories.join(", ")
    )
}

fn scheduling_prompt(available_time: u32, categories: &[String]) -> String {
    format!(
        "Create an optimal viewing schedule:\n\n\
         Available time: {available_time} minutes\n\
         Categories to schedule: {}\n\n\
         Suggest the best order and time allocation for these video categories.\n\
         Consider factors like:\n\
         - Attention span requirements\n\
         - Time of day appropriateness\n\
         - Category priorities\n\
         - Learning vs entertainment balance",
        categories.join(", ")
    )
}

// --- Resources ---

fn json_resource(uri: &str, name: &str, description: &str) -> Resource {
    let mut raw = RawResource::new(uri, name);
    raw.description = Some(description.to_string());
    raw.mime_type = Some("application/json".to_string());
    raw.no_annotation()
}

fn category_descriptions() -> serde_json::Map<String, Value> {
    CATEGORY_DESCRIPTIONS
        .iter()
        .map(|(name, description)| (name.to_string(), Value::String(description.to_string())))
        .collect()
}

#[tool_handler]
#[prompt_handler]
impl ServerHandler for WatchLaterServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder()
                .enable_prompts()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "YouTube Watch Later organizer. Use analyze_watch_later for a category \
                 breakdown, cleanup_unavailable to drop deleted/private videos, \
                 categorize_videos or categorize_video to label videos (custom_rules \
                 adjusts the categories), create_filtered_playlists to split the list by \
                 category, and create_notion_database / schedule_viewing for exports. \
                 Read config://categories for the category list and stats://server for \
                 server status."
                    .to_string(),
            ),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult::with_all_items(vec![
            json_resource(
                CATEGORIES_URI,
                "categories",
                "Available video categories and their descriptions",
            ),
            json_resource(STATS_URI, "server-stats", "Server status and statistics"),
        ]))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let body = match request.uri.as_str() {
            CATEGORIES_URI => Value::Object(category_descriptions()),
            STATS_URI => serde_json::to_value(self.server_stats().await)
                .map_err(|e| McpError::internal_error(e.to_string(), None))?,
            other => {
                return Err(McpError::resource_not_found(
                    format!("unknown resource: {other}"),
                    None,
                ))
            }
        };

        let text = serde_json::to_string_pretty(&body)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, request.uri)],
        })
    }
}
