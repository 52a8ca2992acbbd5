use thiserror::Error;

/// Everything that can go wrong while handling a button press.
///
/// The `Display` text is what ends up in the status line.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Please enter a YouTube URL")]
    EmptyUrl,

    #[error("Invalid YouTube URL")]
    InvalidUrl,

    #[error("Could not extract video ID")]
    MissingVideoId,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Image processing error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Could not save thumbnail: {0}")]
    Save(#[from] std::io::Error),

    #[error("Background job failed: {0}")]
    Worker(String),
}
