use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Instant;

use crate::canvas::infrastructure::canvas_error::CanvasError;
use crate::canvas::infrastructure::font_resolver;
use crate::canvas::infrastructure::raster_canvas::Canvas;
use crate::media::domain::frame_converter::FrameConverter;
use crate::media::domain::media_error::MediaError;
use crate::media::domain::media_source::{MediaOpener, MediaSource};
use crate::pipeline::sheet_error::SheetError;
use crate::pipeline::sheet_logger::SheetLogger;
use crate::shared::constants::{
    EMPTY_CELL_COLOR, HEADER_BACKGROUND, HEADER_FONT_SIZE, HEADER_ROW_PITCH, HEADER_TEXT_ORIGIN,
};
use crate::shared::video_metadata::VideoMetadata;
use crate::sheet::domain::grid_schedule::{GridCell, GridSchedule};
use crate::sheet::domain::header_info::HeaderInfo;
use crate::sheet::domain::layout::SheetLayout;
use crate::sheet::domain::sheet_options::{EndOfStreamPolicy, SheetOptions};

/// What a successful run produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetReport {
    pub output_path: PathBuf,
    pub layout: SheetLayout,
    pub canvas_size: (u32, u32),
    pub step_seconds: u64,
    pub cells_filled: u32,
    pub cells_reused: u32,
    pub cells_skipped: u32,
    pub header_text_drawn: bool,
}

/// Single-file pipeline: open → resolve layout → seek/decode/scale each
/// cell → paint header → export PNG.
///
/// Source, converter and canvas live only for one `execute` call and are
/// released when it returns, on success or failure. The header font is
/// looked up on first use and reused for every later input.
pub struct GenerateSheetUseCase<O: MediaOpener> {
    opener: O,
    options: SheetOptions,
    header_font: OnceLock<Option<PathBuf>>,
}

impl<O: MediaOpener> GenerateSheetUseCase<O> {
    pub fn new(opener: O, options: SheetOptions) -> Self {
        Self {
            opener,
            options,
            header_font: OnceLock::new(),
        }
    }

    pub fn execute(
        &self,
        input: &Path,
        logger: &mut dyn SheetLogger,
    ) -> Result<SheetReport, SheetError> {
        let mut source = self.opener.open(input)?;

        let layout = self
            .options
            .layout
            .resolve(source.width(), source.height())?;
        let mut converter = source.create_converter(layout.frame_width, layout.frame_height)?;
        let schedule =
            GridSchedule::new(source.duration_seconds(), layout.row_count, layout.col_count)?;

        let canvas_size = layout.canvas_size();
        let mut canvas = Canvas::new(canvas_size.0, canvas_size.1);

        logger.info(&format!(
            "{}: {}x{} source, {}x{} thumbnails, one every {}s",
            input.display(),
            source.width(),
            source.height(),
            layout.frame_width,
            layout.frame_height,
            schedule.step_seconds()
        ));

        let mut report = SheetReport {
            output_path: self.options.output_path_for(input),
            layout,
            canvas_size,
            step_seconds: schedule.step_seconds(),
            cells_filled: 0,
            cells_reused: 0,
            cells_skipped: 0,
            header_text_drawn: false,
        };

        let total = schedule.cells().len();
        for (n, cell) in schedule.cells().iter().enumerate() {
            let (x, y) = layout.cell_origin(cell.row, cell.column);
            match sample_cell(&mut source, &mut converter, cell, logger) {
                Ok(()) => {
                    paint_cell(&mut canvas, &converter, &layout, x, y, logger)?;
                    report.cells_filled += 1;
                }
                Err(MediaError::NoMoreFrames) => {
                    log::warn!(
                        "{}: no frame at {}s (cell {})",
                        input.display(),
                        cell.timestamp_seconds,
                        cell.index
                    );
                    match self.options.end_of_stream {
                        EndOfStreamPolicy::Fail => {
                            return Err(cell_error(cell, MediaError::NoMoreFrames));
                        }
                        EndOfStreamPolicy::ReusePrevious if report.cells_filled > 0 => {
                            // The converter still holds the last successful fill.
                            paint_cell(&mut canvas, &converter, &layout, x, y, logger)?;
                            report.cells_reused += 1;
                        }
                        EndOfStreamPolicy::ReusePrevious | EndOfStreamPolicy::Skip => {
                            canvas.fill_rect(
                                EMPTY_CELL_COLOR,
                                x,
                                y,
                                layout.frame_width,
                                layout.frame_height,
                            );
                            report.cells_skipped += 1;
                        }
                    }
                }
                Err(e) => return Err(cell_error(cell, e)),
            }
            logger.progress(n + 1, total);
        }

        let started = Instant::now();
        report.header_text_drawn = self.draw_header(&mut canvas, input, source.metadata(), &layout)?;
        logger.timing("header", elapsed_ms(started));

        let started = Instant::now();
        canvas.export(&report.output_path)?;
        logger.timing("export", elapsed_ms(started));

        Ok(report)
    }

    /// Paints the header strip and its summary text. Returns whether the
    /// text could be drawn; a missing font only degrades the header.
    fn draw_header(
        &self,
        canvas: &mut Canvas,
        input: &Path,
        metadata: &VideoMetadata,
        layout: &SheetLayout,
    ) -> Result<bool, SheetError> {
        canvas.draw_filled_rect(
            HEADER_BACKGROUND,
            0,
            0,
            canvas.width(),
            layout.header_height,
        );

        let file_size = std::fs::metadata(input)
            .map_err(|source| SheetError::FileSize {
                path: input.to_path_buf(),
                source,
            })?
            .len();
        let text = HeaderInfo::new(input, metadata, file_size).to_text();

        let family = &self.options.font_family;
        let Some(font) = self.header_font() else {
            return Ok(false);
        };
        canvas.register_font(family, font);

        let (x, y) = HEADER_TEXT_ORIGIN;
        match canvas.write_text(
            x,
            y,
            family,
            HEADER_FONT_SIZE,
            HEADER_ROW_PITCH,
            &text,
        ) {
            Ok(()) => Ok(true),
            Err(e @ (CanvasError::FontUnavailable { .. } | CanvasError::FontLoad { .. })) => {
                log::warn!("Header text skipped: {e}");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Font file for header text, resolved once per use case.
    fn header_font(&self) -> Option<&Path> {
        self.header_font
            .get_or_init(|| {
                let family = &self.options.font_family;
                match font_resolver::resolve(family, self.options.font_path.as_deref()) {
                    Ok(path) => {
                        log::debug!("Header font for {family:?}: {}", path.display());
                        Some(path)
                    }
                    Err(e) => {
                        log::warn!("Header text disabled: {e}");
                        None
                    }
                }
            })
            .as_deref()
    }
}

fn sample_cell<S: MediaSource>(
    source: &mut S,
    converter: &mut S::Converter,
    cell: &GridCell,
    logger: &mut dyn SheetLogger,
) -> Result<(), MediaError> {
    log::debug!(
        "Cell {} ({}, {}) at {}s",
        cell.index,
        cell.row,
        cell.column,
        cell.timestamp_seconds
    );

    let started = Instant::now();
    source.seek_to(cell.timestamp_seconds)?;
    logger.timing("seek", elapsed_ms(started));

    let started = Instant::now();
    let frame = source.decode_next_video_frame()?;
    logger.timing("decode", elapsed_ms(started));

    let started = Instant::now();
    converter.fill(frame)?;
    logger.timing("scale", elapsed_ms(started));
    Ok(())
}

fn paint_cell<C: FrameConverter>(
    canvas: &mut Canvas,
    converter: &C,
    layout: &SheetLayout,
    x: i64,
    y: i64,
    logger: &mut dyn SheetLogger,
) -> Result<(), SheetError> {
    let started = Instant::now();
    canvas.write_image(converter, x, y, layout.frame_width, layout.frame_height)?;
    logger.timing("paint", elapsed_ms(started));
    Ok(())
}

fn cell_error(cell: &GridCell, source: MediaError) -> SheetError {
    SheetError::Cell {
        index: cell.index,
        timestamp_seconds: cell.timestamp_seconds,
        source,
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
