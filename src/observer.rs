//! Failure reporting hook

use crate::error::Error;

/// Receives recoverable decode failures.
///
/// Optional: a player without an observer simply logs. Cancellation is never
/// reported here.
pub trait FrameErrorObserver: Send + Sync {
    /// Frame `index` could not be decoded for display
    fn on_frame_error(&self, index: u32, error: &Error);

    /// The container could not be opened at all
    fn on_open_error(&self, error: &Error) {
        let _ = error;
    }
}

impl<F> FrameErrorObserver for F
where
    F: Fn(u32, &Error) + Send + Sync,
{
    fn on_frame_error(&self, index: u32, error: &Error) {
        self(index, error)
    }
}
