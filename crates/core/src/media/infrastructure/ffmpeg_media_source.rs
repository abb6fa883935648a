use std::os::raw::c_int;
use std::path::Path;
use std::sync::OnceLock;

use ffmpeg_next::Rescale;

use crate::media::domain::media_error::MediaError;
use crate::media::domain::media_source::{MediaOpener, MediaSource};
use crate::media::infrastructure::ffmpeg_frame_converter::FfmpegFrameConverter;
use crate::shared::diagnostic::Diagnostic;
use crate::shared::video_metadata::VideoMetadata;

/// Registers libav components once per process. Later calls return the
/// outcome of the first.
pub fn ensure_initialized() -> Result<(), MediaError> {
    static INIT: OnceLock<Result<(), ffmpeg_next::Error>> = OnceLock::new();
    match INIT.get_or_init(ffmpeg_next::init) {
        Ok(()) => Ok(()),
        Err(e) => Err(MediaError::Init(ffmpeg_diagnostic("ffmpeg_init", *e))),
    }
}

pub(crate) fn ffmpeg_diagnostic(operation: &'static str, err: ffmpeg_next::Error) -> Diagnostic {
    Diagnostic::new(err.to_string())
        .with_operation(operation)
        .with_code(c_int::from(err))
}

/// Demuxes and decodes the first video stream of a file via ffmpeg-next
/// (libavformat + libavcodec).
///
/// Container, codec context and the reusable decode frame are owned here
/// and freed on drop.
pub struct FfmpegMediaSource {
    input: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    frame: ffmpeg_next::util::frame::video::Video,
    video_stream_index: usize,
    time_base: ffmpeg_next::Rational,
    metadata: VideoMetadata,
    draining: bool,
}

impl FfmpegMediaSource {
    pub fn open(path: &Path) -> Result<Self, MediaError> {
        ensure_initialized()?;

        let input = ffmpeg_next::format::input(path).map_err(|e| MediaError::Open {
            path: path.to_path_buf(),
            detail: ffmpeg_diagnostic("avformat_open_input", e),
        })?;

        let (video_stream_index, time_base, decoder) = {
            // First video stream wins; no "best stream" heuristics.
            let stream = input
                .streams()
                .find(|s| s.parameters().medium() == ffmpeg_next::media::Type::Video)
                .ok_or(MediaError::NoVideoStream)?;

            let codec_ctx =
                ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
                    .map_err(|e| {
                        MediaError::UnsupportedCodec(ffmpeg_diagnostic(
                            "avcodec_parameters_to_context",
                            e,
                        ))
                    })?;
            let decoder = codec_ctx
                .decoder()
                .video()
                .map_err(|e| MediaError::UnsupportedCodec(ffmpeg_diagnostic("avcodec_open2", e)))?;

            (stream.index(), stream.time_base(), decoder)
        };

        let duration = input.duration();
        let metadata = VideoMetadata {
            width: decoder.width(),
            height: decoder.height(),
            duration_micros: (duration > 0).then_some(duration),
            codec: decoder
                .codec()
                .map(|c| c.name().to_string())
                .unwrap_or_default(),
            source_path: Some(path.to_path_buf()),
        };

        log::debug!(
            "Opened {} (stream {video_stream_index}, {}x{}, {}, time base {time_base})",
            path.display(),
            metadata.width,
            metadata.height,
            metadata.codec,
        );

        Ok(Self {
            input,
            decoder,
            frame: ffmpeg_next::util::frame::video::Video::empty(),
            video_stream_index,
            time_base,
            metadata,
            draining: false,
        })
    }
}

impl MediaSource for FfmpegMediaSource {
    type Frame = ffmpeg_next::util::frame::video::Video;
    type Converter = FfmpegFrameConverter;

    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn seek_to(&mut self, seconds: u64) -> Result<(), MediaError> {
        let target = (seconds as i64).rescale((1, 1), self.time_base);

        // Keyframe at or before the target, anchored on the video stream's
        // own time base. ffmpeg-next's `Input::seek` only offers the
        // stream-agnostic AV_TIME_BASE variant.
        let ret = unsafe {
            ffmpeg_next::ffi::avformat_seek_file(
                self.input.as_mut_ptr(),
                self.video_stream_index as c_int,
                i64::MIN,
                target,
                target,
                0,
            )
        };
        if ret < 0 {
            return Err(MediaError::Seek {
                seconds,
                detail: ffmpeg_diagnostic("avformat_seek_file", ffmpeg_next::Error::from(ret)),
            });
        }

        self.decoder.flush();
        self.draining = false;
        Ok(())
    }

    fn decode_next_video_frame(&mut self) -> Result<&Self::Frame, MediaError> {
        loop {
            if self.decoder.receive_frame(&mut self.frame).is_ok() {
                return Ok(&self.frame);
            }
            if self.draining {
                return Err(MediaError::NoMoreFrames);
            }

            // The packet is dropped (and its buffer released) at the end of
            // each iteration whether or not it completed a picture.
            match self.input.packets().next() {
                Some((stream, packet)) => {
                    if stream.index() != self.video_stream_index {
                        continue;
                    }
                    if let Err(e) = self.decoder.send_packet(&packet) {
                        log::debug!("Skipping undecodable packet: {e}");
                    }
                }
                None => {
                    let _ = self.decoder.send_eof();
                    self.draining = true;
                }
            }
        }
    }

    fn create_converter(&self, width: u32, height: u32) -> Result<Self::Converter, MediaError> {
        FfmpegFrameConverter::new(
            self.decoder.format(),
            self.metadata.width,
            self.metadata.height,
            width,
            height,
        )
    }
}

/// Opens sources with [`FfmpegMediaSource::open`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FfmpegOpener;

impl MediaOpener for FfmpegOpener {
    type Source = FfmpegMediaSource;

    fn open(&self, path: &Path) -> Result<FfmpegMediaSource, MediaError> {
        FfmpegMediaSource::open(path)
    }
}
