pub mod config;
pub mod list;
pub mod play;
pub mod recent;
pub mod utils;
