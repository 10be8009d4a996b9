//! Backdrop capture: crop a region out of a backdrop and shrink it.
//!
//! Blurring a shrunk copy is much cheaper than blurring at full resolution
//! and looks the same once scaled back up. Shrinking uses area averaging
//! (box filter): each destination pixel is the mean of every source pixel
//! its footprint touches. Source coordinates use 8.24 fixed point.

use crate::color::{OrderRgba, Rgba8};
use crate::error::{InvalidArgument, Result};
use crate::pixel_buffer::PixelBuffer;

const AA_SHIFT: u32 = 24;
const AA_ONE: u64 = 1 << AA_SHIFT;

/// Axis-aligned rectangle in backdrop pixel coordinates. May extend past
/// the backdrop; those samples repeat the nearest edge pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering all of `buf`.
    pub fn of(buf: &PixelBuffer) -> Self {
        Self::new(0, 0, buf.width(), buf.height())
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Check that `factor` is a usable downscale divisor.
pub(crate) fn check_scale_factor(factor: f32) -> Result<f32> {
    if !factor.is_finite() || factor < 1.0 {
        return Err(InvalidArgument::ScaleFactor { factor }.into());
    }
    Ok(factor)
}

/// Output dimensions for `region` shrunk by `factor`, at least 1x1.
pub fn scaled_size(region: Rect, factor: f32) -> (u32, u32) {
    let w = ((region.width as f64 / factor as f64) as u32).max(1);
    let h = ((region.height as f64 / factor as f64) as u32).max(1);
    (w, h)
}

/// Source index range `[s0, s1)` covered by destination index `d`.
#[inline]
fn footprint(d: u32, step: u64, origin: i64) -> (i64, i64) {
    let start = d as u64 * step;
    let end = start + step;
    let s0 = (start >> AA_SHIFT) as i64;
    let s1 = ((end + AA_ONE - 1) >> AA_SHIFT) as i64;
    (origin + s0, origin + s1.max(s0 + 1))
}

/// Copy `region` of `backdrop` into a new buffer shrunk by `scale_factor`.
pub fn capture_region(backdrop: &PixelBuffer, region: Rect, scale_factor: f32) -> Result<PixelBuffer> {
    if backdrop.is_empty() {
        return Err(InvalidArgument::EmptySource {
            width: backdrop.width(),
            height: backdrop.height(),
        }
        .into());
    }
    if region.is_empty() {
        return Err(InvalidArgument::EmptyRegion.into());
    }
    let factor = check_scale_factor(scale_factor)?;

    let (dst_w, dst_h) = scaled_size(region, factor);
    let step_x = ((region.width as u64) << AA_SHIFT) / dst_w as u64;
    let step_y = ((region.height as u64) << AA_SHIFT) / dst_h as u64;

    let mut out = PixelBuffer::new(dst_w, dst_h);
    for dy in 0..dst_h {
        let (sy0, sy1) = footprint(dy, step_y, region.y as i64);
        let row = out.row_slice_mut(dy);
        for dx in 0..dst_w {
            let (sx0, sx1) = footprint(dx, step_x, region.x as i64);
            let mut acc = [0u64; 4];
            let mut n = 0u64;
            for sy in sy0..sy1 {
                for sx in sx0..sx1 {
                    let p = backdrop.pixel_clamped(sx, sy).to_bytes();
                    for c in 0..4 {
                        acc[c] += p[c] as u64;
                    }
                    n += 1;
                }
            }
            let avg = |c: usize| ((acc[c] + n / 2) / n) as u8;
            let off = dx as usize * OrderRgba::N;
            Rgba8::new(avg(0), avg(1), avg(2), avg(3)).write_to(&mut row[off..off + OrderRgba::N]);
        }
    }
    Ok(out)
}

/// Shrink the whole of `source` by `scale_factor`.
pub fn downscale(source: &PixelBuffer, scale_factor: f32) -> Result<PixelBuffer> {
    capture_region(source, Rect::of(source), scale_factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BlurError;

    #[test]
    fn test_scaled_size() {
        assert_eq!(scaled_size(Rect::new(0, 0, 80, 40), 8.0), (10, 5));
        assert_eq!(scaled_size(Rect::new(0, 0, 7, 3), 8.0), (1, 1));
        assert_eq!(scaled_size(Rect::new(0, 0, 10, 10), 1.5), (6, 6));
    }

    #[test]
    fn test_factor_one_is_crop() {
        let mut src = PixelBuffer::new(4, 4);
        src.set_pixel(2, 1, Rgba8::new(10, 20, 30, 40));
        let out = capture_region(&src, Rect::new(1, 1, 2, 2), 1.0).unwrap();
        assert_eq!((out.width(), out.height()), (2, 2));
        assert_eq!(out.pixel(1, 0), Rgba8::new(10, 20, 30, 40));
        assert_eq!(out.pixel(0, 0), Rgba8::TRANSPARENT);
    }

    #[test]
    fn test_downscale_averages_blocks() {
        let mut src = PixelBuffer::new(4, 2);
        src.set_pixel(0, 0, Rgba8::new(200, 0, 0, 255));
        src.set_pixel(1, 0, Rgba8::new(100, 0, 0, 255));
        src.set_pixel(0, 1, Rgba8::new(0, 0, 0, 255));
        src.set_pixel(1, 1, Rgba8::new(100, 0, 0, 255));
        let out = downscale(&src, 2.0).unwrap();
        assert_eq!((out.width(), out.height()), (2, 1));
        assert_eq!(out.pixel(0, 0), Rgba8::new(100, 0, 0, 255));
        assert_eq!(out.pixel(1, 0), Rgba8::TRANSPARENT);
    }

    #[test]
    fn test_region_outside_replicates_edge() {
        let src = PixelBuffer::filled(2, 2, Rgba8::WHITE);
        let out = capture_region(&src, Rect::new(-4, -4, 8, 8), 2.0).unwrap();
        assert!(out.pixels().all(|p| p == Rgba8::WHITE));
    }

    #[test]
    fn test_flat_field_survives() {
        let c = Rgba8::new(33, 66, 99, 132);
        let src = PixelBuffer::filled(37, 23, c);
        let out = downscale(&src, 3.3).unwrap();
        assert!(out.pixels().all(|p| p == c));
    }

    #[test]
    fn test_capture_errors() {
        let src = PixelBuffer::filled(4, 4, Rgba8::WHITE);
        assert_eq!(
            capture_region(&src, Rect::new(0, 0, 0, 4), 1.0),
            Err(BlurError::InvalidArgument(InvalidArgument::EmptyRegion))
        );
        assert!(matches!(
            downscale(&src, 0.5),
            Err(BlurError::InvalidArgument(InvalidArgument::ScaleFactor { .. }))
        ));
        assert!(downscale(&src, f32::NAN).is_err());
        assert!(downscale(&PixelBuffer::default(), 2.0).is_err());
    }
}
