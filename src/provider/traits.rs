use crate::provider::{FetchError, PlaylistEntry};
use async_trait::async_trait;

#[async_trait]
pub trait PlaylistSource: Send + Sync {
    /// Fetch the entries of a playlist, in playlist order
    async fn fetch(&self, playlist_id: &str) -> Result<Vec<PlaylistEntry>, FetchError>;
}
