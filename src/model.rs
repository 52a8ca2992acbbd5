use std::fmt;

use eframe::egui::ColorImage;

/// Canonical 11-character YouTube video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(pub(crate) String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Thumbnail variants served for every video
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailQuality {
    /// Full resolution, only present for HD uploads
    MaxRes,
    /// 480x360
    High,
    /// 320x180
    Medium,
    /// 640x480, not generated for every video
    Standard,
    /// 120x90, always present
    Default,
}

impl ThumbnailQuality {
    /// Order in which qualities are probed; the first one that answers wins.
    pub const PROBE_ORDER: [ThumbnailQuality; 5] = [
        ThumbnailQuality::MaxRes,
        ThumbnailQuality::High,
        ThumbnailQuality::Medium,
        ThumbnailQuality::Standard,
        ThumbnailQuality::Default,
    ];

    /// File name (without extension) used by the image host.
    pub fn file_stem(self) -> &'static str {
        match self {
            ThumbnailQuality::MaxRes => "maxresdefault",
            ThumbnailQuality::High => "hqdefault",
            ThumbnailQuality::Medium => "mqdefault",
            ThumbnailQuality::Standard => "sddefault",
            ThumbnailQuality::Default => "default",
        }
    }
}

/// Result of probing the image host for a video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedThumbnail {
    pub video_id: VideoId,
    pub quality: ThumbnailQuality,
    pub url: String,
}

/// A downloaded thumbnail, decoded and ready to be uploaded as a texture
pub struct LoadedThumbnail {
    /// RGB pixels in the layout egui expects
    pub image: ColorImage,
    pub width: u32,
    pub height: u32,
    /// Encoded bytes as received, kept for saving to disk
    pub bytes: Vec<u8>,
}
