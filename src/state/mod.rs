pub mod config;
pub mod recent;

pub use config::Config;
pub use recent::{RecentList, RecentStore};
