/// Bytes per pixel in the sheet's fixed pixel layout.
pub const BYTES_PER_PIXEL: usize = 4;

/// Read-only view of a packed 32-bit image: each pixel is B, G, R, X
/// (the fourth byte is ignored), rows top-down, `stride` bytes apart.
pub trait ImageSource {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Distance in bytes between the starts of consecutive rows. At least
    /// `width * BYTES_PER_PIXEL`.
    fn stride(&self) -> usize;

    /// Pixel rows; at least `stride * (height - 1) + width * BYTES_PER_PIXEL` bytes.
    fn data(&self) -> &[u8];
}

/// Minimum byte length a source of the given geometry must expose.
pub fn required_len(width: u32, height: u32, stride: usize) -> usize {
    if width == 0 || height == 0 {
        return 0;
    }
    stride * (height as usize - 1) + width as usize * BYTES_PER_PIXEL
}
