//! Background execution of the stack blur.
//!
//! [`blur_async`] moves the source onto a dedicated worker thread and
//! returns a [`BlurTask`] handle; the finished buffer comes back over a
//! one-shot channel. [`blur_async_with`] is the callback flavour built on the
//! same worker. Invalid input never reaches a worker: the task completes
//! immediately with `None`.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::task::Poll;
use std::thread::{self, JoinHandle};

use crate::blur::blur_sync;
use crate::error::Result;
use crate::pixel_buffer::PixelBuffer;

/// Handle to one in-flight background blur.
///
/// Yields the result at most once. Dropping the handle does not stop the
/// worker; its result is discarded.
#[derive(Debug)]
pub struct BlurTask {
    state: TaskState,
}

#[derive(Debug)]
enum TaskState {
    Running(Receiver<Option<PixelBuffer>>),
    Finished(Option<PixelBuffer>),
    Taken,
}

impl BlurTask {
    fn finished(result: Option<PixelBuffer>) -> Self {
        Self {
            state: TaskState::Finished(result),
        }
    }

    /// Block until the worker finishes and return its result.
    pub fn wait(self) -> Option<PixelBuffer> {
        match self.state {
            TaskState::Running(rx) => rx.recv().unwrap_or_else(|_| {
                tracing::warn!("blur worker exited without delivering a result");
                None
            }),
            TaskState::Finished(result) => result,
            TaskState::Taken => None,
        }
    }

    /// Non-blocking check. Returns `Ready` once, carrying the result;
    /// subsequent calls return `Ready(None)`.
    pub fn poll(&mut self) -> Poll<Option<PixelBuffer>> {
        let result = match std::mem::replace(&mut self.state, TaskState::Taken) {
            TaskState::Running(rx) => match rx.try_recv() {
                Ok(result) => result,
                Err(TryRecvError::Empty) => {
                    self.state = TaskState::Running(rx);
                    return Poll::Pending;
                }
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("blur worker exited without delivering a result");
                    None
                }
            },
            TaskState::Finished(result) => result,
            TaskState::Taken => None,
        };
        Poll::Ready(result)
    }

    /// True once a result (possibly `None`) is available or already taken.
    pub fn is_finished(&self) -> bool {
        !matches!(self.state, TaskState::Running(_))
    }
}

/// Run `blur_sync` on a fresh worker thread.
fn spawn_worker<F>(source: PixelBuffer, radius: u32, deliver: F) -> JoinHandle<()>
where
    F: FnOnce(Result<PixelBuffer>) + Send + 'static,
{
    thread::spawn(move || deliver(blur_sync(&source, radius)))
}

/// Pass through input that `blur_sync` would accept; log and drop the rest
/// without touching pixels.
fn accept(source: Option<PixelBuffer>, radius: u32) -> Option<PixelBuffer> {
    let checked = crate::blur::check_source(source.as_ref())
        .and_then(|_| crate::blur::check_radius(radius as i64));
    if let Err(err) = checked {
        tracing::warn!(%err, "async blur rejected");
        return None;
    }
    source
}

/// Blur `source` on a background thread.
///
/// Takes ownership of the source; clone first to keep a copy. A missing or
/// empty source, or an out-of-range radius, yields an already-finished task
/// whose result is `None`.
pub fn blur_async(source: impl Into<Option<PixelBuffer>>, radius: u32) -> BlurTask {
    let Some(source) = accept(source.into(), radius) else {
        return BlurTask::finished(None);
    };

    let (tx, rx) = mpsc::sync_channel(1);
    spawn_worker(source, radius, move |result| {
        // The handle may already be gone; nothing to deliver to then.
        let _ = tx.send(result.ok());
    });
    BlurTask {
        state: TaskState::Running(rx),
    }
}

/// Blur `source` on a background thread and hand the result to
/// `on_complete`, which runs exactly once on the worker thread.
///
/// Invalid input invokes `on_complete(None)` on the calling thread before
/// returning, and no worker is spawned (`None` is returned).
pub fn blur_async_with<F>(
    source: impl Into<Option<PixelBuffer>>,
    radius: u32,
    on_complete: F,
) -> Option<JoinHandle<()>>
where
    F: FnOnce(Option<PixelBuffer>) + Send + 'static,
{
    match accept(source.into(), radius) {
        Some(source) => Some(spawn_worker(source, radius, move |result| {
            on_complete(result.ok())
        })),
        None => {
            on_complete(None);
            None
        }
    }
}
