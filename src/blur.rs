//! Stack blur for RGBA32 pixel buffers.
//!
//! Fast approximate Gaussian blur: a triangular kernel of `2 * radius + 1`
//! taps run separably (horizontal, then vertical). Each scanline keeps a
//! ring of the samples currently in the window plus three running sums per
//! channel (`sum`, `sum_in`, `sum_out`), so sliding the window one pixel
//! costs O(1) regardless of radius. Samples past either end of a line are
//! the edge pixel repeated.

use std::time::Instant;

use crate::color::OrderRgba;
use crate::error::{InvalidArgument, Result};
use crate::pixel_buffer::PixelBuffer;

/// Smallest accepted radius.
pub const MIN_RADIUS: u32 = 1;
/// Largest accepted radius.
pub const MAX_RADIUS: u32 = 253;

// ============================================================================
// Lookup tables for stack blur (fast division replacement)
// ============================================================================

/// Multiplication factors for fast division in stack blur.
/// Indexed by radius (0..254). Replaces division by `(radius + 1)^2` with
/// multiply+shift; exact for every 8-bit flat field.
#[rustfmt::skip]
const STACK_BLUR8_MUL: [u32; 255] = [
    512,512,456,512,328,456,335,512,405,328,271,456,388,335,292,512,
    454,405,364,328,298,271,496,456,420,388,360,335,312,292,273,512,
    482,454,428,405,383,364,345,328,312,298,284,271,259,496,475,456,
    437,420,404,388,374,360,347,335,323,312,302,292,282,273,265,512,
    497,482,468,454,441,428,417,405,394,383,373,364,354,345,337,328,
    320,312,305,298,291,284,278,271,265,259,507,496,485,475,465,456,
    446,437,428,420,412,404,396,388,381,374,367,360,354,347,341,335,
    329,323,318,312,307,302,297,292,287,282,278,273,269,265,261,512,
    505,497,489,482,475,468,461,454,447,441,435,428,422,417,411,405,
    399,394,389,383,378,373,368,364,359,354,350,345,341,337,332,328,
    324,320,316,312,309,305,301,298,294,291,287,284,281,278,274,271,
    268,265,262,259,257,507,501,496,491,485,480,475,470,465,460,456,
    451,446,442,437,433,428,424,420,416,412,408,404,400,396,392,388,
    385,381,377,374,370,367,363,360,357,354,350,347,344,341,338,335,
    332,329,326,323,320,318,315,312,310,307,304,302,299,297,294,292,
    289,287,285,282,280,278,275,273,271,269,267,265,263,261,259,
];

/// Right-shift amounts for fast division in stack blur.
/// Indexed by radius (0..254).
#[rustfmt::skip]
const STACK_BLUR8_SHR: [u32; 255] = [
     9, 11, 12, 13, 13, 14, 14, 15, 15, 15, 15, 16, 16, 16, 16, 17,
    17, 17, 17, 17, 17, 17, 18, 18, 18, 18, 18, 18, 18, 18, 18, 19,
    19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 20, 20, 20,
    20, 20, 20, 20, 20, 20, 20, 20, 20, 20, 20, 20, 20, 20, 20, 21,
    21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21,
    21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 22, 22, 22, 22, 22, 22,
    22, 22, 22, 22, 22, 22, 22, 22, 22, 22, 22, 22, 22, 22, 22, 22,
    22, 22, 22, 22, 22, 22, 22, 22, 22, 22, 22, 22, 22, 22, 22, 23,
    23, 23, 23, 23, 23, 23, 23, 23, 23, 23, 23, 23, 23, 23, 23, 23,
    23, 23, 23, 23, 23, 23, 23, 23, 23, 23, 23, 23, 23, 23, 23, 23,
    23, 23, 23, 23, 23, 23, 23, 23, 23, 23, 23, 23, 23, 23, 23, 23,
    23, 23, 23, 23, 23, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24,
    24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24,
    24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24,
    24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24,
    24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24,
];

/// Check a radius against `MIN_RADIUS..=MAX_RADIUS`.
pub(crate) fn check_radius(radius: i64) -> Result<u32> {
    if radius < MIN_RADIUS as i64 || radius > MAX_RADIUS as i64 {
        return Err(InvalidArgument::RadiusOutOfRange {
            radius,
            min: MIN_RADIUS,
            max: MAX_RADIUS,
        }
        .into());
    }
    Ok(radius as u32)
}

/// Reject a missing or empty source.
pub(crate) fn check_source(source: Option<&PixelBuffer>) -> Result<&PixelBuffer> {
    let source = source.ok_or(InvalidArgument::MissingSource)?;
    if source.is_empty() {
        return Err(InvalidArgument::EmptySource {
            width: source.width(),
            height: source.height(),
        }
        .into());
    }
    Ok(source)
}

// ============================================================================
// Kernel
// ============================================================================

/// Per-radius tables for one blur invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackBlurKernel {
    radius: u32,
    weights: Vec<u32>,
    divisor: u32,
    mul: u64,
    shr: u32,
}

impl StackBlurKernel {
    /// Precompute the kernel for `radius`, which must be in
    /// `MIN_RADIUS..=MAX_RADIUS`.
    pub fn new(radius: u32) -> Result<Self> {
        let radius = check_radius(radius as i64)?;
        let r = radius as usize;
        let weights: Vec<u32> = (0..=2 * r)
            .map(|i| (r + 1 - i.abs_diff(r)) as u32)
            .collect();
        Ok(Self {
            radius,
            weights,
            divisor: (radius + 1) * (radius + 1),
            mul: STACK_BLUR8_MUL[r] as u64,
            shr: STACK_BLUR8_SHR[r],
        })
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Number of taps, `2 * radius + 1`.
    pub fn window(&self) -> usize {
        self.weights.len()
    }

    /// Triangular tap weights, `1, 2, .., radius + 1, .., 2, 1`.
    pub fn weights(&self) -> &[u32] {
        &self.weights
    }

    /// Sum of all weights, `(radius + 1)^2`.
    pub fn divisor(&self) -> u32 {
        self.divisor
    }

    /// Divide a weighted channel sum by the divisor.
    #[inline]
    pub fn normalize(&self, sum: u64) -> u8 {
        ((sum * self.mul) >> self.shr) as u8
    }
}

// ============================================================================
// Passes
// ============================================================================

type Px = [u64; 4];

#[inline]
fn load(data: &[u8], off: usize) -> [u8; 4] {
    [
        data[off + OrderRgba::R],
        data[off + OrderRgba::G],
        data[off + OrderRgba::B],
        data[off + OrderRgba::A],
    ]
}

#[inline]
fn add(acc: &mut Px, p: &[u8; 4]) {
    for c in 0..4 {
        acc[c] += p[c] as u64;
    }
}

#[inline]
fn sub(acc: &mut Px, p: &[u8; 4]) {
    for c in 0..4 {
        acc[c] -= p[c] as u64;
    }
}

/// Blur one line of `len` pixels in place. Pixel `i` of the line starts at
/// byte `start + i * step`.
fn blur_line(
    data: &mut [u8],
    start: usize,
    step: usize,
    len: usize,
    kernel: &StackBlurKernel,
    stack: &mut [[u8; 4]],
) {
    let r = kernel.radius as usize;
    let div = kernel.window();
    let last = len - 1;

    let mut sum: Px = [0; 4];
    let mut sum_in: Px = [0; 4];
    let mut sum_out: Px = [0; 4];

    // Left half of the window (center included) is the first pixel repeated.
    let first = load(data, start);
    for (i, slot) in stack.iter_mut().enumerate().take(r + 1) {
        *slot = first;
        let w = (i + 1) as u64;
        for c in 0..4 {
            sum[c] += first[c] as u64 * w;
        }
        add(&mut sum_out, &first);
    }

    let mut src = 0usize;
    for i in 1..=r {
        if i <= last {
            src = i;
        }
        let p = load(data, start + src * step);
        stack[i + r] = p;
        let w = (r + 1 - i) as u64;
        for c in 0..4 {
            sum[c] += p[c] as u64 * w;
        }
        add(&mut sum_in, &p);
    }

    let mut stack_ptr = r;
    let mut xp = r.min(last);

    for x in 0..len {
        let dst = start + x * step;
        data[dst + OrderRgba::R] = kernel.normalize(sum[0]);
        data[dst + OrderRgba::G] = kernel.normalize(sum[1]);
        data[dst + OrderRgba::B] = kernel.normalize(sum[2]);
        data[dst + OrderRgba::A] = kernel.normalize(sum[3]);

        for c in 0..4 {
            sum[c] -= sum_out[c];
        }

        let mut stack_start = stack_ptr + div - r;
        if stack_start >= div {
            stack_start -= div;
        }
        sub(&mut sum_out, &stack[stack_start]);

        // Reads stay ahead of writes except on the final pixel, whose
        // incoming sample is never emitted.
        if xp < last {
            xp += 1;
        }
        let p = load(data, start + xp * step);
        stack[stack_start] = p;
        add(&mut sum_in, &p);
        for c in 0..4 {
            sum[c] += sum_in[c];
        }

        stack_ptr += 1;
        if stack_ptr >= div {
            stack_ptr = 0;
        }
        let sp = stack[stack_ptr];
        add(&mut sum_out, &sp);
        sub(&mut sum_in, &sp);
    }
}

/// Horizontal stack blur pass, in place.
pub fn stack_blur_rgba32_x(buf: &mut PixelBuffer, kernel: &StackBlurKernel) {
    if buf.is_empty() {
        return;
    }
    let w = buf.width() as usize;
    let mut stack = vec![[0u8; 4]; kernel.window()];
    for y in 0..buf.height() {
        let row = buf.row_slice_mut(y);
        blur_line(row, 0, OrderRgba::N, w, kernel, &mut stack);
    }
}

/// Vertical stack blur pass, in place.
pub fn stack_blur_rgba32_y(buf: &mut PixelBuffer, kernel: &StackBlurKernel) {
    if buf.is_empty() {
        return;
    }
    let w = buf.width() as usize;
    let h = buf.height() as usize;
    let stride = buf.stride();
    let mut stack = vec![[0u8; 4]; kernel.window()];
    let data = buf.as_bytes_mut();
    for x in 0..w {
        blur_line(data, x * OrderRgba::N, stride, h, kernel, &mut stack);
    }
}

/// Apply both passes in place: horizontal first, then vertical.
pub fn stack_blur_rgba32(buf: &mut PixelBuffer, kernel: &StackBlurKernel) {
    stack_blur_rgba32_x(buf, kernel);
    tracing::trace!(radius = kernel.radius(), "horizontal pass done");
    stack_blur_rgba32_y(buf, kernel);
    tracing::trace!(radius = kernel.radius(), "vertical pass done");
}

// ============================================================================
// Blocking entry point
// ============================================================================

/// Blur `source` on the calling thread and return a new buffer of the same
/// dimensions. The source is left untouched.
///
/// Fails with [`InvalidArgument`](crate::error::InvalidArgument) when the
/// source is missing or empty, or when `radius` is outside
/// `MIN_RADIUS..=MAX_RADIUS`. Nothing is allocated for the output before
/// validation passes.
pub fn blur_sync<'a>(
    source: impl Into<Option<&'a PixelBuffer>>,
    radius: u32,
) -> Result<PixelBuffer> {
    let source = check_source(source.into())?;
    let kernel = StackBlurKernel::new(radius)?;

    let started = Instant::now();
    let mut out = source.clone();
    stack_blur_rgba32(&mut out, &kernel);
    tracing::debug!(
        width = out.width(),
        height = out.height(),
        radius,
        elapsed_us = started.elapsed().as_micros() as u64,
        "stack blur finished"
    );
    Ok(out)
}
