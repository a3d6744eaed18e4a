use std::io;

use carta_core::map::MapError;
use carta_core::render::RenderError;

/// A convenience [`Result`] for the Carta server.
pub type CartaResult<T> = Result<T, CartaError>;

#[derive(thiserror::Error, Debug)]
pub enum CartaError {
    #[error(transparent)]
    MapError(#[from] MapError),

    #[error(transparent)]
    RenderError(#[from] RenderError),

    #[error("Unable to bind to {1}: {0}")]
    BindingError(#[source] io::Error, String),

    #[error(transparent)]
    IoError(#[from] io::Error),
}
