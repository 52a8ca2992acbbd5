use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::thumbnail::DEFAULT_THUMBNAIL_BASE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Fetch and preview YouTube video thumbnails
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Video URL to pre-fill the input with
    #[arg(long)]
    pub url: Option<String>,

    /// Seconds to wait for each thumbnail probe
    #[arg(long, default_value_t = 5)]
    pub probe_timeout: u64,

    /// Seconds to wait for the thumbnail download
    #[arg(long, default_value_t = 10)]
    pub download_timeout: u64,

    /// Base URL thumbnails are served from
    #[arg(long, default_value = DEFAULT_THUMBNAIL_BASE)]
    pub thumbnail_base: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout)
    }

    /// Thumbnail base without a trailing slash.
    pub fn thumbnail_base(&self) -> &str {
        self.thumbnail_base.trim_end_matches('/')
    }
}
