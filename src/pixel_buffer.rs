//! Owned RGBA pixel buffer.
//!
//! [`PixelBuffer`] is a tightly packed, top-down grid of 4-byte RGBA pixels
//! (`stride == width * 4`). Dimensions are fixed at creation. Row access
//! follows the row-accessor pattern: `row_slice(y)` hands out one scanline,
//! pixels are addressed as `row[x * 4..x * 4 + 4]`.

use crate::color::{OrderRgba, Rgba8};
use crate::error::{InvalidArgument, Result};

/// Owned, mutable 2-D grid of RGBA8 pixels.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a buffer filled with transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; Self::byte_len(width, height)],
            width,
            height,
        }
    }

    /// Create a buffer with every pixel set to `c`.
    pub fn filled(width: u32, height: u32, c: Rgba8) -> Self {
        let mut buf = Self::new(width, height);
        buf.clear(c);
        buf
    }

    /// Wrap existing RGBA bytes. `data.len()` must equal `width * height * 4`.
    pub fn from_vec(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = Self::byte_len(width, height);
        if data.len() != expected {
            return Err(InvalidArgument::BufferLength {
                expected,
                actual: data.len(),
            }
            .into());
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Build from packed `0xAARRGGBB` words, one per pixel, row-major.
    pub fn from_argb32(width: u32, height: u32, pixels: &[u32]) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(InvalidArgument::BufferLength {
                expected,
                actual: pixels.len(),
            }
            .into());
        }
        let mut buf = Self::new(width, height);
        for (dst, &src) in buf.data.chunks_exact_mut(OrderRgba::N).zip(pixels) {
            Rgba8::from_argb32(src).write_to(dst);
        }
        Ok(buf)
    }

    /// Pack into `0xAARRGGBB` words, row-major.
    pub fn to_argb32(&self) -> Vec<u32> {
        self.data
            .chunks_exact(OrderRgba::N)
            .map(|p| Rgba8::from_slice(p).to_argb32())
            .collect()
    }

    fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * OrderRgba::N
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * OrderRgba::N
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Immutable slice for row `y`.
    pub fn row_slice(&self, y: u32) -> &[u8] {
        assert!(
            y < self.height,
            "row {} out of bounds (height={})",
            y,
            self.height
        );
        let stride = self.stride();
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Mutable slice for row `y`.
    pub fn row_slice_mut(&mut self, y: u32) -> &mut [u8] {
        assert!(
            y < self.height,
            "row {} out of bounds (height={})",
            y,
            self.height
        );
        let stride = self.stride();
        let start = y as usize * stride;
        &mut self.data[start..start + stride]
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) out of bounds ({}x{})",
            x,
            y,
            self.width,
            self.height
        );
        y as usize * self.stride() + x as usize * OrderRgba::N
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        let off = self.offset(x, y);
        Rgba8::from_slice(&self.data[off..off + OrderRgba::N])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, c: Rgba8) {
        let off = self.offset(x, y);
        c.write_to(&mut self.data[off..off + OrderRgba::N]);
    }

    /// Edge-replicating pixel read: coordinates are clamped into the buffer.
    ///
    /// The buffer must not be empty.
    pub fn pixel_clamped(&self, x: i64, y: i64) -> Rgba8 {
        assert!(
            !self.is_empty(),
            "clamped read from empty buffer ({}x{})",
            self.width,
            self.height
        );
        let cx = x.clamp(0, self.width as i64 - 1) as u32;
        let cy = y.clamp(0, self.height as i64 - 1) as u32;
        self.pixel(cx, cy)
    }

    /// Set every pixel to `c`.
    pub fn clear(&mut self, c: Rgba8) {
        let bytes = c.to_bytes();
        for p in self.data.chunks_exact_mut(OrderRgba::N) {
            p.copy_from_slice(&bytes);
        }
    }

    /// Iterate pixels row-major.
    pub fn pixels(&self) -> impl Iterator<Item = Rgba8> + '_ {
        self.data.chunks_exact(OrderRgba::N).map(Rgba8::from_slice)
    }
}

impl core::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BlurError;

    #[test]
    fn test_new_is_transparent() {
        let buf = PixelBuffer::new(3, 2);
        assert_eq!(buf.as_bytes().len(), 3 * 2 * 4);
        assert!(buf.pixels().all(|p| p == Rgba8::TRANSPARENT));
    }

    #[test]
    fn test_default_is_empty() {
        let buf = PixelBuffer::default();
        assert!(buf.is_empty());
        assert_eq!(buf.as_bytes().len(), 0);
        assert!(PixelBuffer::new(0, 5).is_empty());
    }

    #[test]
    fn test_set_get_pixel() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.set_pixel(2, 3, Rgba8::new(1, 2, 3, 4));
        assert_eq!(buf.pixel(2, 3), Rgba8::new(1, 2, 3, 4));
        let row = buf.row_slice(3);
        assert_eq!(&row[8..12], &[1, 2, 3, 4]);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_pixel_out_of_bounds_panics() {
        let buf = PixelBuffer::new(2, 2);
        let _ = buf.pixel(2, 0);
    }

    #[test]
    fn test_pixel_clamped_replicates_edges() {
        let mut buf = PixelBuffer::new(2, 2);
        buf.set_pixel(0, 0, Rgba8::new(9, 9, 9, 9));
        buf.set_pixel(1, 1, Rgba8::new(7, 7, 7, 7));
        assert_eq!(buf.pixel_clamped(-5, -3), Rgba8::new(9, 9, 9, 9));
        assert_eq!(buf.pixel_clamped(100, 100), Rgba8::new(7, 7, 7, 7));
    }

    #[test]
    #[should_panic(expected = "clamped read from empty buffer (0x3)")]
    fn test_pixel_clamped_empty_panics() {
        let buf = PixelBuffer::new(0, 3);
        let _ = buf.pixel_clamped(0, 0);
    }

    #[test]
    fn test_from_vec_length_checked() {
        let err = PixelBuffer::from_vec(2, 2, vec![0u8; 15]).unwrap_err();
        assert_eq!(
            err,
            BlurError::InvalidArgument(InvalidArgument::BufferLength {
                expected: 16,
                actual: 15
            })
        );
        assert!(PixelBuffer::from_vec(2, 2, vec![0u8; 16]).is_ok());
    }

    #[test]
    fn test_argb32_conversion() {
        let words = [0xFF102030, 0x80405060];
        let buf = PixelBuffer::from_argb32(2, 1, &words).unwrap();
        assert_eq!(buf.pixel(0, 0), Rgba8::new(0x10, 0x20, 0x30, 0xFF));
        assert_eq!(buf.to_argb32(), words.to_vec());
        assert!(PixelBuffer::from_argb32(3, 1, &words).is_err());
    }

    #[test]
    fn test_clear() {
        let mut buf = PixelBuffer::new(3, 3);
        buf.clear(Rgba8::WHITE);
        assert!(buf.pixels().all(|p| p == Rgba8::WHITE));
        assert_eq!(PixelBuffer::filled(3, 3, Rgba8::WHITE), buf);
    }
}
