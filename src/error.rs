//! Error types for zenavif-anim

use enough::StopReason;

/// Error type for opening, decoding and playing animated AVIF sources
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The container could not be opened (malformed or unsupported).
    ///
    /// Fatal to the whole request; no player is constructed.
    #[error("AVIF open error: {0}")]
    Open(String),

    /// A single frame failed to decode or convert.
    ///
    /// Scoped to that frame; neighbouring frames and the store stay usable.
    #[error("Frame {index} decode error: {msg}")]
    Decode {
        /// Frame index that failed
        index: u32,
        /// Error description from the decode capability
        msg: String,
    },

    /// A frame index past the end of the animation was requested
    #[error("Frame {index} out of range ({frame_count} frames)")]
    FrameOutOfRange {
        /// Requested index
        index: u32,
        /// Number of frames in the source
        frame_count: u32,
    },

    /// Reading the byte source failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// In-flight decode was interrupted by teardown
    #[error("Operation cancelled: {0:?}")]
    Cancelled(StopReason),
}

impl Error {
    /// Returns true for cancellation, which is never reported as a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled(_))
    }
}

impl From<StopReason> for Error {
    fn from(reason: StopReason) -> Self {
        Error::Cancelled(reason)
    }
}

/// Result type for zenavif-anim operations with location tracking
pub type Result<T, E = whereat::At<Error>> = core::result::Result<T, E>;
