use mcp_common::error::CommonError;
use mcp_common::youtube::YouTubeError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error(transparent)]
    YouTube(#[from] YouTubeError),

    #[error("config error: {0}")]
    Config(String),
}
