//! Finding the best available thumbnail for a video and decoding it for display.

use std::fmt::Display;

use eframe::egui::ColorImage;
use reqwest::StatusCode;
use tracing::{debug, info};

use crate::model::{LoadedThumbnail, ResolvedThumbnail, ThumbnailQuality, VideoId};

/// Default location of YouTube's static thumbnails
pub const DEFAULT_THUMBNAIL_BASE: &str = "https://img.youtube.com/vi";

/// Builds `{base}/{id}/{stem}.jpg`.
pub fn thumbnail_url(base: &str, video_id: &VideoId, quality: ThumbnailQuality) -> String {
    format!("{}/{}/{}.jpg", base, video_id, quality.file_stem())
}

/// Probes each quality in order and returns the first one answering 200 OK.
///
/// Probe errors count as a miss. When nothing answers the lowest quality is
/// returned anyway, since the host generates it for every video.
pub fn resolve_thumbnail<F, E>(base: &str, video_id: &VideoId, mut probe: F) -> ResolvedThumbnail
where
    F: FnMut(&str) -> Result<StatusCode, E>,
    E: Display,
{
    for quality in ThumbnailQuality::PROBE_ORDER {
        let url = thumbnail_url(base, video_id, quality);
        match probe(&url) {
            Ok(status) if status == StatusCode::OK => {
                info!(%video_id, ?quality, "thumbnail found");
                return ResolvedThumbnail {
                    video_id: video_id.clone(),
                    quality,
                    url,
                };
            }
            Ok(status) => debug!(%url, %status, "thumbnail quality unavailable"),
            Err(e) => debug!(%url, error = %e, "thumbnail probe failed"),
        }
    }

    info!(%video_id, "no thumbnail answered, using default");
    ResolvedThumbnail {
        video_id: video_id.clone(),
        quality: ThumbnailQuality::Default,
        url: thumbnail_url(base, video_id, ThumbnailQuality::Default),
    }
}

/// Decodes an encoded image into RGB pixels for an egui texture.
pub fn decode_thumbnail(bytes: Vec<u8>) -> Result<LoadedThumbnail, image::ImageError> {
    // Thumbnails are opaque; alpha is dropped like the host's JPEGs would have it
    let img = image::load_from_memory(&bytes)?.to_rgb8();
    let (width, height) = img.dimensions();
    let image = ColorImage::from_rgb([width as usize, height as usize], img.as_raw());
    Ok(LoadedThumbnail {
        image,
        width,
        height,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageOutputFormat, Rgba, RgbaImage};

    use super::*;

    const BASE: &str = "https://img.example.test/vi";

    fn id() -> VideoId {
        VideoId("dQw4w9WgXcQ".to_string())
    }

    #[test]
    fn test_thumbnail_url_layout() {
        assert_eq!(
            thumbnail_url(DEFAULT_THUMBNAIL_BASE, &id(), ThumbnailQuality::High),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg"
        );
    }

    #[test]
    fn test_first_ok_wins() {
        let mut probed = Vec::new();
        let resolved = resolve_thumbnail(BASE, &id(), |url| {
            probed.push(url.to_string());
            Ok::<_, String>(StatusCode::OK)
        });
        assert_eq!(resolved.quality, ThumbnailQuality::MaxRes);
        assert_eq!(resolved.url, format!("{BASE}/dQw4w9WgXcQ/maxresdefault.jpg"));
        assert_eq!(probed.len(), 1);
    }

    #[test]
    fn test_skips_missing_and_failed_probes() {
        let mut probed = Vec::new();
        let resolved = resolve_thumbnail(BASE, &id(), |url| {
            probed.push(url.to_string());
            if url.ends_with("maxresdefault.jpg") {
                Ok(StatusCode::NOT_FOUND)
            } else if url.ends_with("hqdefault.jpg") {
                Err("connection reset")
            } else {
                Ok(StatusCode::OK)
            }
        });
        assert_eq!(resolved.quality, ThumbnailQuality::Medium);
        assert_eq!(resolved.url, format!("{BASE}/dQw4w9WgXcQ/mqdefault.jpg"));
        assert_eq!(probed.len(), 3);
    }

    #[test]
    fn test_only_exact_200_counts() {
        let resolved = resolve_thumbnail(BASE, &id(), |url| {
            if url.ends_with("sddefault.jpg") {
                Ok::<_, String>(StatusCode::OK)
            } else {
                Ok(StatusCode::NO_CONTENT)
            }
        });
        assert_eq!(resolved.quality, ThumbnailQuality::Standard);
    }

    #[test]
    fn test_falls_back_to_default_when_nothing_answers() {
        let mut calls = 0;
        let resolved = resolve_thumbnail(BASE, &id(), |_| {
            calls += 1;
            Err::<StatusCode, _>("offline")
        });
        assert_eq!(calls, 5);
        assert_eq!(resolved.quality, ThumbnailQuality::Default);
        assert_eq!(resolved.url, format!("{BASE}/dQw4w9WgXcQ/default.jpg"));
        assert_eq!(resolved.video_id, id());
    }

    #[test]
    fn test_decode_converts_to_rgb() {
        let mut src = RgbaImage::new(4, 3);
        src.put_pixel(1, 2, Rgba([10, 20, 30, 0]));
        let mut encoded = Vec::new();
        image::DynamicImage::ImageRgba8(src)
            .write_to(&mut Cursor::new(&mut encoded), ImageOutputFormat::Png)
            .unwrap();

        let loaded = decode_thumbnail(encoded.clone()).unwrap();
        assert_eq!((loaded.width, loaded.height), (4, 3));
        assert_eq!(loaded.image.size, [4, 3]);
        // Alpha is discarded rather than premultiplied
        let px = loaded.image.pixels[2 * 4 + 1];
        assert_eq!((px.r(), px.g(), px.b(), px.a()), (10, 20, 30, 255));
        assert_eq!(loaded.bytes, encoded);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_thumbnail(b"<html>404</html>".to_vec()).is_err());
    }
}
