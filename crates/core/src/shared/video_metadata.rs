use std::path::PathBuf;

use crate::shared::constants::AV_TIME_BASE;

/// Summary of an opened source, as reported by the container and codec.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    /// Container duration in microseconds; `None` when the container does
    /// not report one.
    pub duration_micros: Option<i64>,
    pub codec: String,
    pub source_path: Option<PathBuf>,
}

impl VideoMetadata {
    /// Duration in whole seconds (truncated); 0 when unknown.
    pub fn duration_seconds(&self) -> u64 {
        self.duration_micros
            .map(|us| (us / AV_TIME_BASE).max(0) as u64)
            .unwrap_or(0)
    }
}
