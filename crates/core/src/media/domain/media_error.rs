use std::path::PathBuf;

use thiserror::Error;

use crate::shared::diagnostic::Diagnostic;

/// Failures raised while opening, seeking, decoding, or scaling a source.
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("failed to initialise decoder library: {0}")]
    Init(Diagnostic),
    #[error("cannot open {}: {detail}", path.display())]
    Open { path: PathBuf, detail: Diagnostic },
    #[error("couldn't find video stream")]
    NoVideoStream,
    #[error("codec is not supported: {0}")]
    UnsupportedCodec(Diagnostic),
    #[error("seek to {seconds}s failed: {detail}")]
    Seek { seconds: u64, detail: Diagnostic },
    #[error("end of stream reached before a complete frame was decoded")]
    NoMoreFrames,
    #[error("frame conversion failed: {0}")]
    Scale(Diagnostic),
}

impl MediaError {
    /// Name of the native operation that failed, when known.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            MediaError::Init(d)
            | MediaError::Open { detail: d, .. }
            | MediaError::UnsupportedCodec(d)
            | MediaError::Seek { detail: d, .. }
            | MediaError::Scale(d) => d.operation,
            MediaError::NoVideoStream | MediaError::NoMoreFrames => None,
        }
    }
}
