use std::path::PathBuf;

use thiserror::Error;

use crate::canvas::infrastructure::font_resolver::FontResolveError;

#[derive(Error, Debug)]
pub enum CanvasError {
    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("no font available for family {family:?}: {source}")]
    FontUnavailable {
        family: String,
        #[source]
        source: FontResolveError,
    },
    #[error("failed to load font {}: {message}", path.display())]
    FontLoad { path: PathBuf, message: String },
    #[error("image source {width}x{height} exposes {len} bytes, needs at least {required}")]
    InvalidSource {
        width: u32,
        height: u32,
        len: usize,
        required: usize,
    },
}

impl CanvasError {
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            CanvasError::Encode { .. } => Some("write_png"),
            CanvasError::FontUnavailable { .. } => Some("resolve_font"),
            CanvasError::FontLoad { .. } => Some("load_font"),
            CanvasError::InvalidSource { .. } => Some("write_image"),
        }
    }
}
