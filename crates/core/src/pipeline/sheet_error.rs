use std::path::PathBuf;

use thiserror::Error;

use crate::canvas::infrastructure::canvas_error::CanvasError;
use crate::media::domain::media_error::MediaError;
use crate::sheet::domain::layout::LayoutError;

/// Any failure that aborts the sheet for one input file.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error("cell {index} at {timestamp_seconds}s: {source}")]
    Cell {
        index: u32,
        timestamp_seconds: u64,
        #[source]
        source: MediaError,
    },
    #[error(transparent)]
    Canvas(#[from] CanvasError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("cannot read size of {}: {source}", path.display())]
    FileSize {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SheetError {
    /// Name of the operation that failed, when known.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            SheetError::Media(e) | SheetError::Cell { source: e, .. } => e.operation(),
            SheetError::Canvas(e) => e.operation(),
            SheetError::Layout(_) => None,
            SheetError::FileSize { .. } => Some("file_size"),
        }
    }
}
