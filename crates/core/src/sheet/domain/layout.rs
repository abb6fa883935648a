use thiserror::Error;

use crate::shared::constants::{
    DEFAULT_COL_COUNT, DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH, DEFAULT_ROW_COUNT,
    HEADER_HEIGHT,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("grid needs at least one row and one column, got {row_count}x{col_count}")]
    InvalidGrid { row_count: u32, col_count: u32 },
    #[error("source reports an invalid frame size of {width}x{height}")]
    InvalidSourceSize { width: u32, height: u32 },
    #[error("derived thumbnail size {width}x{height} is empty")]
    InvalidFrameSize { width: u32, height: u32 },
    #[error("sheet of {cells} cells at {width}x{height} exceeds the maximum canvas size")]
    CanvasTooLarge { cells: u64, width: u32, height: u32 },
    #[error("duration of {duration_seconds}s leaves no time step between {cells} cells")]
    DegenerateDuration { duration_seconds: u64, cells: u64 },
}

/// Requested grid geometry. A zero frame dimension means "derive it from
/// the source aspect ratio".
///
/// `row_count` is the number of thumbnails across each row of the sheet
/// and `col_count` the number of thumbnails down each column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutParams {
    pub frame_width: u32,
    pub frame_height: u32,
    pub row_count: u32,
    pub col_count: u32,
    pub header_height: u32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            frame_width: DEFAULT_FRAME_WIDTH,
            frame_height: DEFAULT_FRAME_HEIGHT,
            row_count: DEFAULT_ROW_COUNT,
            col_count: DEFAULT_COL_COUNT,
            header_height: HEADER_HEIGHT,
        }
    }
}

impl LayoutParams {
    /// Fixes the thumbnail size against the source's native size.
    pub fn resolve(&self, native_width: u32, native_height: u32) -> Result<SheetLayout, LayoutError> {
        if self.row_count == 0 || self.col_count == 0 {
            return Err(LayoutError::InvalidGrid {
                row_count: self.row_count,
                col_count: self.col_count,
            });
        }
        if native_width == 0 || native_height == 0 {
            return Err(LayoutError::InvalidSourceSize {
                width: native_width,
                height: native_height,
            });
        }

        let (frame_width, frame_height) = derive_frame_size(
            self.frame_width,
            self.frame_height,
            native_width,
            native_height,
        );
        if frame_width == 0 || frame_height == 0 {
            return Err(LayoutError::InvalidFrameSize {
                width: frame_width,
                height: frame_height,
            });
        }

        let layout = SheetLayout {
            frame_width,
            frame_height,
            row_count: self.row_count,
            col_count: self.col_count,
            header_height: self.header_height,
        };
        layout.checked_canvas_size().ok_or(LayoutError::CanvasTooLarge {
            cells: layout.cell_count(),
            width: frame_width,
            height: frame_height,
        })?;
        Ok(layout)
    }
}

/// Fills in zero dimensions from the native aspect ratio. The ratio is
/// taken in floating point and the product truncated, so 1920x1080 at a
/// requested height of 240 yields a width of 426.
///
/// Ratio first, then multiply: this keeps sheet sizes identical to the
/// established tool, including its rounding losses (854x480 at width 854
/// derives height 479, where `h * w / native_w` would give 480).
pub fn derive_frame_size(
    requested_width: u32,
    requested_height: u32,
    native_width: u32,
    native_height: u32,
) -> (u32, u32) {
    match (requested_width, requested_height) {
        (0, 0) => (native_width, native_height),
        (0, h) => (
            (native_width as f64 / native_height as f64 * h as f64) as u32,
            h,
        ),
        (w, 0) => (
            w,
            (native_height as f64 / native_width as f64 * w as f64) as u32,
        ),
        (w, h) => (w, h),
    }
}

/// Resolved geometry of one contact sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SheetLayout {
    pub frame_width: u32,
    pub frame_height: u32,
    pub row_count: u32,
    pub col_count: u32,
    pub header_height: u32,
}

impl SheetLayout {
    pub fn cell_count(&self) -> u64 {
        u64::from(self.row_count) * u64::from(self.col_count)
    }

    /// `(frame_width * row_count, frame_height * col_count + header_height)`.
    pub fn canvas_size(&self) -> (u32, u32) {
        (
            self.frame_width * self.row_count,
            self.frame_height * self.col_count + self.header_height,
        )
    }

    /// Top-left corner of the thumbnail at horizontal position `row` and
    /// vertical position `column`.
    pub fn cell_origin(&self, row: u32, column: u32) -> (i64, i64) {
        (
            i64::from(row) * i64::from(self.frame_width),
            i64::from(column) * i64::from(self.frame_height) + i64::from(self.header_height),
        )
    }

    fn checked_canvas_size(&self) -> Option<(u32, u32)> {
        let width = self.frame_width.checked_mul(self.row_count)?;
        let height = self
            .frame_height
            .checked_mul(self.col_count)?
            .checked_add(self.header_height)?;
        Some((width, height))
    }
}
