/// Error types shared across the watch-later crates.
///
/// Infrastructure failures that are not tied to a single upstream call live here.
/// Server-level errors wrap `CommonError` via `#[from]`.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("invalid ISO-8601 duration: {0:?}")]
    InvalidDuration(String),
}
