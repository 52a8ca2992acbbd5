//! Recognising YouTube links and pulling the video id out of them.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::VideoId;

// Anchored at the start only: anything after the 11 id characters is ignored.
static YOUTUBE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(https?://)?(www\.)?",
        r"(youtube|youtu|youtube-nocookie)\.(com|be)/",
        r"(watch\?v=|embed/|v/|.+\?v=)?([^&=%\?]{11})",
    ))
    .expect("YouTube URL pattern is valid")
});

/// Returns true if `url` looks like a link to a single YouTube video.
pub fn is_valid_video_url(url: &str) -> bool {
    YOUTUBE_URL.is_match(url)
}

impl VideoId {
    /// Extracts the video id from a YouTube URL.
    pub fn parse(url: &str) -> Option<Self> {
        YOUTUBE_URL
            .captures(url)
            .and_then(|caps| caps.get(6))
            .map(|m| VideoId(m.as_str().to_string()))
    }
}
