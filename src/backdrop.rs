//! Blurred-backdrop pipeline: capture, shrink, blur, deliver.
//!
//! [`BackdropBlur`] holds a validated [`BlurConfig`] and turns a backdrop
//! frame plus the region behind a label into a blurred image. Where the
//! image ends up is abstracted by [`ImageSink`].

use std::time::Instant;

use crate::blur::blur_sync;
use crate::config::{BlurConfig, ExecutionMode, RefreshMode};
use crate::error::Result;
use crate::pixel_buffer::PixelBuffer;
use crate::scale::{capture_region, Rect};
use crate::task::{blur_async, BlurTask};

/// Receiver of finished backdrop images.
pub trait ImageSink {
    fn present(&mut self, image: PixelBuffer);
}

impl<F: FnMut(PixelBuffer)> ImageSink for F {
    fn present(&mut self, image: PixelBuffer) {
        self(image)
    }
}

impl ImageSink for Vec<PixelBuffer> {
    fn present(&mut self, image: PixelBuffer) {
        self.push(image);
    }
}

/// A blur that is either done or still running.
#[derive(Debug)]
pub enum Pending {
    Ready(PixelBuffer),
    Running(BlurTask),
}

impl Pending {
    /// Block until the image is available.
    pub fn wait(self) -> Option<PixelBuffer> {
        match self {
            Pending::Ready(image) => Some(image),
            Pending::Running(task) => task.wait(),
        }
    }
}

/// Backdrop blur driven by one immutable configuration.
#[derive(Debug, Clone)]
pub struct BackdropBlur {
    config: BlurConfig,
    radius: u32,
    attempted: bool,
}

impl BackdropBlur {
    pub fn new(config: BlurConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            radius: config.blur_radius()?,
            config,
            attempted: false,
        })
    }

    pub fn config(&self) -> &BlurConfig {
        &self.config
    }

    /// Integer stack radius derived from the configuration.
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Capture `region` of `backdrop`, shrink it by the configured scale
    /// factor and blur it in the configured execution mode.
    pub fn render(&self, backdrop: &PixelBuffer, region: Rect) -> Result<Pending> {
        let overlay = capture_region(backdrop, region, self.config.scale_factor)?;
        match self.config.mode {
            ExecutionMode::Sync => blur_sync(&overlay, self.radius).map(Pending::Ready),
            ExecutionMode::Async => Ok(Pending::Running(blur_async(overlay, self.radius))),
        }
    }

    /// Backdrop is about to be drawn. Blurs and presents to `sink` unless
    /// the refresh mode is `Once` and a blur has already been attempted.
    /// In `Once` mode a failed first attempt is not retried.
    /// Returns whether an image was presented.
    pub fn on_backdrop_changed<S: ImageSink + ?Sized>(
        &mut self,
        backdrop: &PixelBuffer,
        region: Rect,
        sink: &mut S,
    ) -> Result<bool> {
        if self.config.refresh == RefreshMode::Once && self.attempted {
            return Ok(false);
        }
        self.attempted = true;

        let started = Instant::now();
        let Some(image) = self.render(backdrop, region)?.wait() else {
            return Ok(false);
        };
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            radius = self.radius,
            elapsed_us = started.elapsed().as_micros() as u64,
            "backdrop blurred"
        );
        sink.present(image);
        Ok(true)
    }
}
