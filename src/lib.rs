//! # backdrop-blur
//!
//! Stack blur for the blurred backdrop behind a text label: a snapshot of
//! whatever is drawn underneath is captured, shrunk, blurred, and handed
//! back for display.
//!
//! - Separable stack blur (triangular kernel, O(1) per pixel per pass)
//! - All four RGBA channels blurred alike, edges replicated
//! - Blocking ([`blur_sync`]) or background-thread ([`blur_async`],
//!   [`blur_async_with`]) execution with bit-identical results
//! - Region capture with area-averaging downscale
//! - Immutable [`BlurConfig`] and an [`ImageSink`]-driven refresh pipeline
//!
//! ## Architecture
//!
//! 1. **Capture**: [`scale::capture_region`] crops and shrinks the backdrop
//! 2. **Blur**: [`blur::StackBlurKernel`] + horizontal and vertical passes
//! 3. **Execute**: inline, or on a worker behind a [`task::BlurTask`] handle
//! 4. **Deliver**: [`backdrop::BackdropBlur`] presents into an [`ImageSink`]
//!
//! ```
//! use backdrop_blur::{blur_sync, PixelBuffer, Rgba8};
//!
//! let src = PixelBuffer::filled(4, 4, Rgba8::WHITE);
//! let out = blur_sync(&src, 2).unwrap();
//! assert_eq!(out, src);
//! ```

pub mod color;
pub mod error;
pub mod pixel_buffer;

pub mod blur;
pub mod scale;
pub mod task;

pub mod backdrop;
pub mod config;

pub use backdrop::{BackdropBlur, ImageSink, Pending};
pub use blur::{blur_sync, StackBlurKernel, MAX_RADIUS, MIN_RADIUS};
pub use color::Rgba8;
pub use config::{BlurConfig, ExecutionMode, RefreshMode};
pub use error::{BlurError, InvalidArgument, Result};
pub use pixel_buffer::PixelBuffer;
pub use scale::{capture_region, downscale, Rect};
pub use task::{blur_async, blur_async_with, BlurTask};
