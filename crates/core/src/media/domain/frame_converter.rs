use crate::canvas::domain::image_source::ImageSource;
use crate::media::domain::media_error::MediaError;

/// Scales and color-converts native frames into a fixed-size buffer that
/// is reused for every call.
///
/// The buffer (exposed through [`ImageSource`]) reflects the most recent
/// successful [`fill`](FrameConverter::fill) only.
pub trait FrameConverter: ImageSource {
    type Frame;

    fn fill(&mut self, frame: &Self::Frame) -> Result<(), MediaError>;
}
