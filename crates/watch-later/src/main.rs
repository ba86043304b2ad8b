mod cache;
mod config;
mod error;
mod exporters;
mod model;
mod playlist;
mod server;

use clap::{Parser, ValueEnum};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use rmcp::{ServiceExt, transport::stdio};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cache::PlaylistCache;
use config::Config;
use mcp_common::redis::RedisCache;
use mcp_common::youtube::YouTubeClient;
use playlist::PlaylistService;
use server::WatchLaterServer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    /// JSON-RPC over stdin/stdout, for local MCP clients.
    Stdio,
    /// Streamable HTTP, for remote deployment.
    Http,
}

/// YouTube Watch Later organizer MCP server.
#[derive(Parser, Debug)]
#[command(name = "watch-later", version, about)]
struct Cli {
    /// Transport to serve MCP on.
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    /// Bind address for the HTTP transport.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port for the HTTP transport.
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// URL path the HTTP transport is mounted at.
    #[arg(long, default_value = "/mcp")]
    path: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing to stderr (stdout is reserved for MCP JSON-RPC)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting watch-later MCP server");

    // 1. Load config from environment
    let config = Config::from_env()?;
    info!(
        playlist_id = %config.playlist_id,
        youtube = config.has_youtube(),
        notion = config.has_notion(),
        google_calendar = config.has_google_credentials(),
        redis = config.redis_url.is_some(),
        "configuration loaded"
    );

    // 2. Connect to Redis (optional, graceful degradation if unavailable)
    let redis_cache = RedisCache::new(config.redis_url.as_deref());
    if redis_cache.is_available().await {
        info!("redis connected");
    } else {
        info!("redis unavailable, running without cache");
    }
    let cache = PlaylistCache::new(redis_cache, config.playlist_cache_ttl_secs);

    // 3. YouTube client (optional, tools fall back to `no_api_key` responses)
    let youtube = if config.has_youtube() {
        info!(
            base_url = %config.youtube.base_url,
            timeout_ms = config.youtube.default_timeout.as_millis(),
            max_retries = config.youtube.max_retries,
            "youtube client configured"
        );
        Some(YouTubeClient::new(config.youtube.clone())?)
    } else {
        warn!("YOUTUBE_API_KEY / YOUTUBE_ACCESS_TOKEN not set, playlist tools return sample data");
        None
    };
    if !config.has_notion() {
        warn!("NOTION_API_KEY not set, notion export disabled");
    }
    if !config.has_google_credentials() {
        warn!("google calendar credentials not found, scheduling disabled");
    }

    // 4. Build MCP server and serve on the selected transport
    let playlist = PlaylistService::new(youtube, cache, config.playlist_id.clone());
    let server = WatchLaterServer::new(config, playlist);

    match cli.transport {
        Transport::Stdio => serve_stdio(server).await,
        Transport::Http => serve_http(server, &cli.host, cli.port, &cli.path).await,
    }
}

async fn serve_stdio(server: WatchLaterServer) -> anyhow::Result<()> {
    info!("MCP server ready, serving on stdio");
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!(error = %e, "MCP server error");
    })?;

    service.waiting().await?;
    info!("MCP server shut down");
    Ok(())
}

async fn serve_http(server: WatchLaterServer, host: &str, port: u16, path: &str) -> anyhow::Result<()> {
    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig::default(),
    );

    let path = normalize_path(path);
    let router = if path == "/" {
        axum::Router::new().fallback_service(service)
    } else {
        axum::Router::new().nest_service(&path, service)
    };

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!(url = %format!("http://{host}:{port}{path}"), "MCP server ready, serving on streamable HTTP");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
        })
        .await?;
    info!("MCP server shut down");
    Ok(())
}

/// Leading slash added, trailing slashes removed; empty becomes `/`.
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    format!("/{trimmed}")
}
