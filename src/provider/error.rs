use thiserror::Error;

pub const GENERIC_UPSTREAM_MESSAGE: &str =
    "YouTube API error. Check the API key, quota, playlist id and playlist permissions.";

#[derive(Error, Debug)]
pub enum FetchError {
    /// No API key configured; raised before any request is sent
    #[error("Missing YT_API_KEY. Set it in the environment, in .env or in config.toml.")]
    MissingApiKey,

    /// Non-success response from the API
    #[error("{0}")]
    Upstream(String),

    #[error("Failed to reach the YouTube API: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse YouTube API response: {0}")]
    Decode(#[from] serde_json::Error),
}
