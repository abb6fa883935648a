use std::path::Path;

use crate::shared::constants::AV_TIME_BASE;
use crate::shared::video_metadata::VideoMetadata;

const SIZE_UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

/// Summary text printed in the sheet header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderInfo {
    pub file_name: String,
    pub duration_micros: Option<i64>,
    pub width: u32,
    pub height: u32,
    pub file_size_bytes: u64,
}

impl HeaderInfo {
    pub fn new(path: &Path, metadata: &VideoMetadata, file_size_bytes: u64) -> Self {
        Self {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            duration_micros: metadata.duration_micros,
            width: metadata.width,
            height: metadata.height,
            file_size_bytes,
        }
    }

    /// One `Label: value` line per field; the duration line is omitted when
    /// the container reports none.
    pub fn to_text(&self) -> String {
        let mut text = format!("File Name: {}\n", self.file_name);
        if let Some(us) = self.duration_micros {
            text.push_str(&format!("Duration: {}\n", format_duration(us)));
        }
        text.push_str(&format!("Resolution: {}x{}\n", self.width, self.height));
        text.push_str(&format!("File Size: {}\n", format_file_size(self.file_size_bytes)));
        text
    }
}

/// `HH:MM:SS.hh`, rounded to the nearest hundredth of a second.
pub fn format_duration(micros: i64) -> String {
    let rounded = micros.max(0) + 5_000;
    let total_secs = rounded / AV_TIME_BASE;
    let hundredths = (rounded % AV_TIME_BASE) * 100 / AV_TIME_BASE;
    let (hours, mins, secs) = (total_secs / 3600, total_secs / 60 % 60, total_secs % 60);
    format!("{hours:02}:{mins:02}:{secs:02}.{hundredths:02}")
}

/// Human-readable size from a byte count: whole kilobytes, then scaled.
pub fn format_file_size(bytes: u64) -> String {
    format_kilobytes(bytes / 1024)
}

/// Divides by 1024 while the value exceeds 1024, stopping at terabytes.
pub fn format_kilobytes(kilobytes: u64) -> String {
    let mut value = kilobytes as f64;
    let mut unit = 0;
    while unit < SIZE_UNITS.len() - 1 && value > 1024.0 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2}{}", SIZE_UNITS[unit])
}
