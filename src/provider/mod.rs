mod error;
pub mod parse;
mod traits;
mod types;
pub mod youtube;

pub use error::{FetchError, GENERIC_UPSTREAM_MESSAGE};
pub use parse::parse_playlist_id;
pub use traits::PlaylistSource;
pub use types::*;
pub use youtube::{embed_url, YoutubeProvider};
