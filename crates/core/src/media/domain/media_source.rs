use std::path::Path;

use crate::media::domain::frame_converter::FrameConverter;
use crate::media::domain::media_error::MediaError;
use crate::shared::video_metadata::VideoMetadata;

/// A demux + decode session over a single input file with exactly one
/// selected video stream.
///
/// Native resources are released when the value is dropped, on every exit
/// path of the owning scope.
pub trait MediaSource {
    /// Decoded picture in the decoder's native layout. Owned by the source
    /// and overwritten by the next decode call.
    type Frame;

    /// Converter able to turn this source's frames into fixed-size buffers.
    type Converter: FrameConverter<Frame = Self::Frame>;

    fn metadata(&self) -> &VideoMetadata;

    /// Native frame width as reported by the opened codec.
    fn width(&self) -> u32 {
        self.metadata().width
    }

    fn height(&self) -> u32 {
        self.metadata().height
    }

    /// Container duration truncated to whole seconds; 0 when unknown.
    fn duration_seconds(&self) -> u64 {
        self.metadata().duration_seconds()
    }

    /// Repositions the demuxer at or before `seconds` on the video stream
    /// and discards all decoder-internal state.
    fn seek_to(&mut self, seconds: u64) -> Result<(), MediaError>;

    /// Decodes until one complete video frame is available.
    ///
    /// Returns [`MediaError::NoMoreFrames`] if the stream ends first.
    fn decode_next_video_frame(&mut self) -> Result<&Self::Frame, MediaError>;

    /// Builds a converter from this source's native format and size to
    /// `width` x `height`.
    fn create_converter(&self, width: u32, height: u32) -> Result<Self::Converter, MediaError>;
}

/// Opens [`MediaSource`]s by path.
pub trait MediaOpener {
    type Source: MediaSource;

    fn open(&self, path: &Path) -> Result<Self::Source, MediaError>;
}
