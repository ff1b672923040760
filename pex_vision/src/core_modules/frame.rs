// THEORY:
// A `GrayFrame` is the engine's view of one decoded, single-channel 8-bit image.
// It borrows the pixel bytes from whoever decoded them and only describes their
// geometry: width, height and the number of bytes between the starts of two rows.
//
// Decoders frequently pad rows for alignment, so the stride may be larger than the
// width. When it is not, the whole frame is one contiguous slice and the binner can
// walk it without recomputing row offsets.

use crate::error::{GridError, Result};
use image::GrayImage;

/// A borrowed, single-channel 8-bit image.
#[derive(Debug, Clone, Copy)]
pub struct GrayFrame<'a> {
    width: u32,
    height: u32,
    /// Bytes between the start of row `y` and row `y + 1`.
    stride: usize,
    data: &'a [u8],
}

impl<'a> GrayFrame<'a> {
    /// Wraps a tightly packed, row-major buffer.
    pub fn new(width: u32, height: u32, data: &'a [u8]) -> Result<Self> {
        Self::with_stride(width, height, width as usize, data)
    }

    /// Wraps a buffer whose rows are `stride` bytes apart.
    pub fn with_stride(width: u32, height: u32, stride: usize, data: &'a [u8]) -> Result<Self> {
        let required = match height {
            0 => Some(0),
            h => stride
                .checked_mul(h as usize - 1)
                .and_then(|n| n.checked_add(width as usize)),
        };
        let fits = required.is_some_and(|required| data.len() >= required);
        if stride < width as usize || !fits {
            return Err(GridError::InvalidFrameLayout {
                width,
                height,
                stride,
                len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The `width` pixels of row `y`, without any trailing padding.
    #[inline]
    pub fn row(&self, y: u32) -> &'a [u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize]
    }

    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.stride == self.width as usize
    }

    /// All pixels as one slice, available only when rows carry no padding.
    pub fn as_slice(&self) -> Option<&'a [u8]> {
        self.is_contiguous()
            .then(|| &self.data[..self.width as usize * self.height as usize])
    }
}

impl<'a> From<&'a GrayImage> for GrayFrame<'a> {
    fn from(image: &'a GrayImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            stride: image.width() as usize,
            data: image.as_raw(),
        }
    }
}

/// Rational time base used by containers to express presentation timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBase {
    pub num: i32,
    pub den: i32,
}

impl TimeBase {
    pub fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }

    /// Converts a presentation timestamp in time-base units to seconds.
    pub fn seconds(&self, pts: i64) -> f64 {
        pts as f64 * self.num as f64 / self.den as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contiguous_frame_exposes_whole_slice() {
        let data: Vec<u8> = (0..12).collect();
        let frame = GrayFrame::new(4, 3, &data).expect("valid frame");

        assert!(frame.is_contiguous());
        assert_eq!(frame.as_slice(), Some(&data[..]));
        assert_eq!(frame.row(1), &[4, 5, 6, 7]);
    }

    #[test]
    fn strided_frame_skips_padding() {
        // Two rows of three pixels, each padded to five bytes.
        let data = [1u8, 2, 3, 0, 0, 4, 5, 6];
        let frame = GrayFrame::with_stride(3, 2, 5, &data).expect("valid frame");

        assert!(!frame.is_contiguous());
        assert_eq!(frame.stride(), 5);
        assert_eq!(frame.as_slice(), None);
        assert_eq!(frame.row(0), &[1, 2, 3]);
        assert_eq!(frame.row(1), &[4, 5, 6]);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let data = [0u8; 11];
        let err = GrayFrame::new(4, 3, &data).unwrap_err();
        assert!(matches!(err, GridError::InvalidFrameLayout { len: 11, .. }));
    }

    #[test]
    fn stride_narrower_than_width_is_rejected() {
        let data = [0u8; 64];
        assert!(GrayFrame::with_stride(8, 2, 4, &data).is_err());
    }

    #[test]
    fn huge_stride_is_rejected_instead_of_overflowing() {
        let data = [0u8; 16];
        let err = GrayFrame::with_stride(4, 3, usize::MAX / 2 + 1, &data).unwrap_err();
        assert!(matches!(err, GridError::InvalidFrameLayout { len: 16, .. }));
    }

    #[test]
    fn gray_image_converts_without_copy() {
        let image = GrayImage::from_pixel(6, 2, image::Luma([42]));
        let frame = GrayFrame::from(&image);

        assert_eq!((frame.width(), frame.height()), (6, 2));
        assert!(frame.row(1).iter().all(|&v| v == 42));
    }

    #[test]
    fn time_base_converts_pts_to_seconds() {
        let tb = TimeBase::new(1, 90_000);
        assert_eq!(tb.seconds(180_000), 2.0);
        assert_eq!(TimeBase::new(1, 25).seconds(5), 0.2);
    }
}
