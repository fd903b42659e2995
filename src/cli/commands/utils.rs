use std::sync::Arc;

use crate::provider::{PlaylistSource, YoutubeProvider};
use crate::state::Config;

pub fn create_provider(config: &Config) -> Arc<dyn PlaylistSource> {
    Arc::new(YoutubeProvider::new(config.api_key.clone()).with_api_base(config.api_base.as_str()))
}
