/// Height in pixels of the metadata strip above the thumbnail grid.
pub const HEADER_HEIGHT: u32 = 120;

/// Header strip background (pale ivory).
pub const HEADER_BACKGROUND: [u8; 3] = [255, 255, 240];

/// Ink color for all text drawn on a canvas.
pub const TEXT_COLOR: [u8; 3] = [0, 0, 0];

pub const HEADER_FONT_FAMILY: &str = "Sans";
pub const HEADER_FONT_SIZE: f32 = 20.0;
pub const HEADER_ROW_PITCH: f32 = 10.0;
pub const HEADER_TEXT_ORIGIN: (f32, f32) = (10.0, 0.0);

/// Fill for cells that received no frame.
pub const EMPTY_CELL_COLOR: [u8; 3] = [0, 0, 0];

pub const DEFAULT_FRAME_WIDTH: u32 = 320;
pub const DEFAULT_FRAME_HEIGHT: u32 = 0;
pub const DEFAULT_ROW_COUNT: u32 = 4;
pub const DEFAULT_COL_COUNT: u32 = 10;

pub const OUTPUT_EXTENSION: &str = "png";

/// libav's internal time base (microseconds).
pub const AV_TIME_BASE: i64 = 1_000_000;

/// Sans-serif families tried when the requested family is not installed.
pub const FALLBACK_FONT_FAMILIES: &[&str] = &[
    "DejaVuSans",
    "LiberationSans",
    "NotoSans",
    "FreeSans",
    "Arial",
    "Helvetica",
    "Verdana",
];

pub const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc"];
