use std::path::PathBuf;

/// Errors produced while opening or reading a map file.
#[derive(thiserror::Error, Debug)]
pub enum MapError {
    #[error("Cannot open or map file {path}: {0}", path = .1.display())]
    IoError(#[source] std::io::Error, PathBuf),

    #[error("Unsupported map file version {0}, expected {expected}", expected = super::layout::SUPPORTED_VERSION)]
    UnsupportedVersion(i64),

    #[error("Map file is truncated: {0} bytes is too small for the file header")]
    TruncatedHeader(usize),

    #[error("Map file is truncated: {0} bytes cannot hold the declared {1} tile index entries")]
    TruncatedTileIndex(usize, i32),

    #[error("Tile {0} block at offset {1} is out of range for the mapped region")]
    TileBlockOutOfRange(i32, u64),
}

/// A convenience [`Result`] for map-store operations.
pub type MapResult<T> = Result<T, MapError>;
