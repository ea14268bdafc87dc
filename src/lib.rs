pub mod config;
pub mod dataset;
pub mod enrich;
pub mod query;
pub mod sentiment;
pub mod view;

/// Input file extensions picked up when a directory is given to `enrich`
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv"];

/// Application name for XDG paths
pub const APP_NAME: &str = "tubetrend";
