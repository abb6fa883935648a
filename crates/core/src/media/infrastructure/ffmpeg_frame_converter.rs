use ffmpeg_next::format::Pixel;
use ffmpeg_next::software::scaling::{Context, Flags};
use ffmpeg_next::util::frame::video::Video;

use crate::canvas::domain::image_source::ImageSource;
use crate::media::domain::frame_converter::FrameConverter;
use crate::media::domain::media_error::MediaError;
use crate::media::infrastructure::ffmpeg_media_source::ffmpeg_diagnostic;
use crate::shared::diagnostic::Diagnostic;

/// Output layout: B, G, R, A bytes per pixel, matching the canvas'
/// [`ImageSource`] convention.
const OUTPUT_FORMAT: Pixel = Pixel::BGRA;

/// libswscale-backed converter with a preallocated destination frame.
///
/// Uses point (nearest-neighbour) sampling: thumbnails favour speed.
pub struct FfmpegFrameConverter {
    scaler: Context,
    buffer: Video,
}

impl FfmpegFrameConverter {
    pub fn new(
        source_format: Pixel,
        source_width: u32,
        source_height: u32,
        width: u32,
        height: u32,
    ) -> Result<Self, MediaError> {
        if width == 0 || height == 0 {
            return Err(MediaError::Scale(Diagnostic::new(format!(
                "invalid target size {width}x{height}"
            ))));
        }

        let scaler = Context::get(
            source_format,
            source_width,
            source_height,
            OUTPUT_FORMAT,
            width,
            height,
            Flags::POINT,
        )
        .map_err(|e| MediaError::Scale(ffmpeg_diagnostic("sws_getContext", e)))?;

        Ok(Self {
            scaler,
            buffer: Video::new(OUTPUT_FORMAT, width, height),
        })
    }
}

impl ImageSource for FfmpegFrameConverter {
    fn width(&self) -> u32 {
        self.buffer.width()
    }

    fn height(&self) -> u32 {
        self.buffer.height()
    }

    fn stride(&self) -> usize {
        self.buffer.stride(0)
    }

    fn data(&self) -> &[u8] {
        self.buffer.data(0)
    }
}

impl FrameConverter for FfmpegFrameConverter {
    type Frame = Video;

    fn fill(&mut self, frame: &Video) -> Result<(), MediaError> {
        self.scaler
            .run(frame, &mut self.buffer)
            .map_err(|e| MediaError::Scale(ffmpeg_diagnostic("sws_scale", e)))
    }
}
