use std::path::{Path, PathBuf};

use crate::shared::constants::{HEADER_FONT_FAMILY, OUTPUT_EXTENSION};
use crate::sheet::domain::layout::LayoutParams;

/// What to do with a cell whose seek lands past the last decodable frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EndOfStreamPolicy {
    /// Leave the cell empty (painted black).
    #[default]
    Skip,
    /// Repaint the most recently decoded thumbnail.
    ReusePrevious,
    /// Abort the sheet for this file.
    Fail,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SheetOptions {
    pub layout: LayoutParams,
    pub end_of_stream: EndOfStreamPolicy,
    pub font_family: String,
    /// Font file used for the header instead of searching installed fonts.
    pub font_path: Option<PathBuf>,
    pub output_dir: PathBuf,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            layout: LayoutParams::default(),
            end_of_stream: EndOfStreamPolicy::default(),
            font_family: HEADER_FONT_FAMILY.to_string(),
            font_path: None,
            output_dir: PathBuf::from("."),
        }
    }
}

impl SheetOptions {
    /// `<output_dir>/<input stem>.png`.
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sheet".to_string());
        self.output_dir.join(format!("{stem}.{OUTPUT_EXTENSION}"))
    }
}
