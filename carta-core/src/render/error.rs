use crate::map::MapError;

/// Errors that can occur while rendering a region to an image.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// The underlying tile store failed; fatal to the request.
    #[error(transparent)]
    Map(#[from] MapError),

    /// The requested canvas could not be allocated.
    #[error("Cannot allocate a {0}x{0} canvas")]
    InvalidCanvasSize(u32),

    /// Encoding the finished canvas as PNG failed.
    #[error("Failed to encode the canvas as PNG: {0}")]
    PngEncode(#[from] png::EncodingError),

    /// The cancel flag was raised while the request was in flight.
    #[error("Rendering was cancelled")]
    Cancelled,

    /// The configured label font could not be loaded.
    #[error("Cannot load label font {0}: {1}")]
    FontLoad(std::path::PathBuf, String),
}

/// A convenience [`Result`] for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
