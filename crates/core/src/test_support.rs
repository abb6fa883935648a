//! Fixtures shared by unit tests: a synthetic video encoder and an
//! in-memory media source.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::canvas::domain::image_source::{ImageSource, BYTES_PER_PIXEL};
use crate::media::domain::frame_converter::FrameConverter;
use crate::media::domain::media_error::MediaError;
use crate::media::domain::media_source::{MediaOpener, MediaSource};
use crate::shared::constants::AV_TIME_BASE;
use crate::shared::diagnostic::Diagnostic;
use crate::shared::video_metadata::VideoMetadata;

/// Luma ramp used for synthetic frames.
pub fn gray_ramp(index: usize) -> u8 {
    ((index * 40) % 256) as u8
}

/// Encodes `num_frames` solid gray frames (shade chosen by `shade`) as an
/// MPEG-4 stream in whatever container `path`'s extension selects.
pub fn create_test_video(
    path: &Path,
    num_frames: usize,
    width: u32,
    height: u32,
    fps: i32,
    shade: fn(usize) -> u8,
) {
    ffmpeg_next::init().unwrap();

    let mut octx = ffmpeg_next::format::output(path).unwrap();
    let global_header = octx
        .format()
        .flags()
        .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER);

    let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::MPEG4).unwrap();
    let mut ost = octx.add_stream(Some(codec)).unwrap();

    let mut encoder_ctx = ffmpeg_next::codec::context::Context::new_with_codec(codec)
        .encoder()
        .video()
        .unwrap();
    encoder_ctx.set_width(width);
    encoder_ctx.set_height(height);
    encoder_ctx.set_format(ffmpeg_next::format::Pixel::YUV420P);
    encoder_ctx.set_time_base(ffmpeg_next::Rational(1, fps));
    encoder_ctx.set_frame_rate(Some(ffmpeg_next::Rational(fps, 1)));
    // Keyframe every second so seeks land close to their target.
    encoder_ctx.set_gop(fps.max(1) as u32);
    if global_header {
        encoder_ctx.set_flags(ffmpeg_next::codec::Flags::GLOBAL_HEADER);
    }

    let mut encoder = encoder_ctx
        .open_with(ffmpeg_next::Dictionary::new())
        .unwrap();
    ost.set_parameters(&encoder);
    octx.write_header().unwrap();
    let ost_time_base = octx.stream(0).unwrap().time_base();
    let enc_time_base = ffmpeg_next::Rational(1, fps);

    let write_pending = |encoder: &mut ffmpeg_next::encoder::Video,
                         octx: &mut ffmpeg_next::format::context::Output| {
        let mut encoded = ffmpeg_next::Packet::empty();
        while encoder.receive_packet(&mut encoded).is_ok() {
            encoded.set_stream(0);
            encoded.rescale_ts(enc_time_base, ost_time_base);
            encoded.write_interleaved(octx).unwrap();
        }
    };

    for i in 0..num_frames {
        let mut frame =
            ffmpeg_next::util::frame::video::Video::new(ffmpeg_next::format::Pixel::YUV420P, width, height);
        let luma = shade(i);
        for (plane, value) in [(0, luma), (1, 128), (2, 128)] {
            frame.data_mut(plane).fill(value);
        }
        frame.set_pts(Some(i as i64));

        encoder.send_frame(&frame).unwrap();
        write_pending(&mut encoder, &mut octx);
    }

    encoder.send_eof().unwrap();
    write_pending(&mut encoder, &mut octx);
    octx.write_trailer().unwrap();
}

/// Color a [`StubSource`] paints for the frame at `seconds`.
pub fn color_for_timestamp(seconds: u64) -> [u8; 3] {
    let v = (seconds % 256) as u8;
    [v, 255 - v, v / 2]
}

/// Opens [`StubSource`]s with a fixed geometry and duration. Clones share
/// the recorded seek history.
#[derive(Clone)]
pub struct StubOpener {
    width: u32,
    height: u32,
    duration_seconds: u64,
    last_frame_at: Option<u64>,
    failing_seek_at: Option<u64>,
    no_video_for: Option<String>,
    seeks: Arc<Mutex<Vec<u64>>>,
}

impl StubOpener {
    pub fn new(width: u32, height: u32, duration_seconds: u64) -> Self {
        Self {
            width,
            height,
            duration_seconds,
            last_frame_at: None,
            failing_seek_at: None,
            no_video_for: None,
            seeks: Arc::default(),
        }
    }

    /// Decoding after a seek beyond `seconds` reports end of stream.
    pub fn with_last_frame_at(mut self, seconds: u64) -> Self {
        self.last_frame_at = Some(seconds);
        self
    }

    pub fn failing_seek_at(mut self, seconds: u64) -> Self {
        self.failing_seek_at = Some(seconds);
        self
    }

    pub fn without_video_for(mut self, file_name: &str) -> Self {
        self.no_video_for = Some(file_name.to_string());
        self
    }

    pub fn seeks(&self) -> Vec<u64> {
        self.seeks.lock().unwrap().clone()
    }

    pub fn metadata_for(&self, path: &Path) -> VideoMetadata {
        VideoMetadata {
            width: self.width,
            height: self.height,
            duration_micros: Some(self.duration_seconds as i64 * AV_TIME_BASE),
            codec: "stub".to_string(),
            source_path: Some(path.to_path_buf()),
        }
    }
}

impl MediaOpener for StubOpener {
    type Source = StubSource;

    fn open(&self, path: &Path) -> Result<StubSource, MediaError> {
        let file_name = path.file_name().and_then(|n| n.to_str());
        if file_name.is_some() && file_name == self.no_video_for.as_deref() {
            return Err(MediaError::NoVideoStream);
        }
        Ok(StubSource {
            metadata: self.metadata_for(path),
            last_frame_at: self.last_frame_at,
            failing_seek_at: self.failing_seek_at,
            seeks: Arc::clone(&self.seeks),
            position: 0,
            frame: [0; 3],
        })
    }
}

/// Source whose frame at time `t` is a single color, see
/// [`color_for_timestamp`].
pub struct StubSource {
    metadata: VideoMetadata,
    last_frame_at: Option<u64>,
    failing_seek_at: Option<u64>,
    seeks: Arc<Mutex<Vec<u64>>>,
    position: u64,
    frame: [u8; 3],
}

impl MediaSource for StubSource {
    type Frame = [u8; 3];
    type Converter = StubConverter;

    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn seek_to(&mut self, seconds: u64) -> Result<(), MediaError> {
        self.seeks.lock().unwrap().push(seconds);
        if self.failing_seek_at == Some(seconds) {
            return Err(MediaError::Seek {
                seconds,
                detail: Diagnostic::new("Operation not permitted")
                    .with_operation("avformat_seek_file")
                    .with_code(-1),
            });
        }
        self.position = seconds;
        Ok(())
    }

    fn decode_next_video_frame(&mut self) -> Result<&[u8; 3], MediaError> {
        if self.last_frame_at.is_some_and(|last| self.position > last) {
            return Err(MediaError::NoMoreFrames);
        }
        self.frame = color_for_timestamp(self.position);
        Ok(&self.frame)
    }

    fn create_converter(&self, width: u32, height: u32) -> Result<StubConverter, MediaError> {
        Ok(StubConverter {
            buffer: PixelBuffer::new(width, height),
        })
    }
}

pub struct StubConverter {
    buffer: PixelBuffer,
}

impl ImageSource for StubConverter {
    fn width(&self) -> u32 {
        self.buffer.width()
    }

    fn height(&self) -> u32 {
        self.buffer.height()
    }

    fn stride(&self) -> usize {
        self.buffer.stride()
    }

    fn data(&self) -> &[u8] {
        self.buffer.data()
    }
}

impl FrameConverter for StubConverter {
    type Frame = [u8; 3];

    fn fill(&mut self, frame: &[u8; 3]) -> Result<(), MediaError> {
        self.buffer.fill(*frame);
        Ok(())
    }
}

/// Packed BGRX buffer (4 bytes per pixel, no row padding).
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
            width,
            height,
        }
    }

    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let mut buffer = Self::new(width, height);
        buffer.fill(rgb);
        buffer
    }

    pub fn fill(&mut self, rgb: [u8; 3]) {
        for px in self.data.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&[rgb[2], rgb[1], rgb[0], 0xff]);
        }
    }
}

impl ImageSource for PixelBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    fn data(&self) -> &[u8] {
        &self.data
    }
}

#[test]
fn test_pixel_buffer_stores_bgr_order() {
    let buffer = PixelBuffer::filled(2, 1, [10, 20, 30]);
    assert_eq!(buffer.stride(), 8);
    assert_eq!(buffer.data(), &[30, 20, 10, 255, 30, 20, 10, 255]);
}
