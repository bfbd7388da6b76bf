//! Boundary to the AV1/AVIF frame decoder
//!
//! The bitstream decoder is not part of this crate. Anything that can open a
//! container and decode frame `i` at a target size and color configuration
//! plugs in through [`SourceOpener`] and [`AnimatedSource`].

use std::time::Duration;

use enough::Stop;

use crate::aspect::ScaleMode;
use crate::color::ColorConfig;
use crate::error::Result;
use crate::image::{Dimensions, PixelBuffer};

/// An opened animated (or still) AVIF container.
///
/// Owned exclusively by one [`FrameStore`](crate::FrameStore) and dropped
/// with it. Calls are never made concurrently.
pub trait AnimatedSource: Send {
    /// Number of frames; 1 for a still image
    fn frame_count(&self) -> u32;

    /// Size of every frame at full resolution
    fn natural_size(&self) -> Dimensions;

    /// Display duration of frame `index`
    fn frame_duration(&self, index: u32) -> Duration;

    /// Decode and convert frame `index`.
    ///
    /// Implementations should poll `stop` between internal steps and return
    /// [`Error::Cancelled`](crate::Error::Cancelled) once it trips. A
    /// result produced after cancellation is discarded by the store anyway.
    fn decode_frame(
        &mut self,
        index: u32,
        target: Dimensions,
        color: ColorConfig,
        scale: ScaleMode,
        stop: &dyn Stop,
    ) -> Result<PixelBuffer>;
}

/// Opens raw container bytes into an [`AnimatedSource`]
pub trait SourceOpener: Send + Sync {
    /// Open `data`, failing with [`Error::Open`](crate::Error::Open) on
    /// malformed or unsupported input
    fn open(&self, data: Vec<u8>) -> Result<Box<dyn AnimatedSource>>;
}

impl<F> SourceOpener for F
where
    F: Fn(Vec<u8>) -> Result<Box<dyn AnimatedSource>> + Send + Sync,
{
    fn open(&self, data: Vec<u8>) -> Result<Box<dyn AnimatedSource>> {
        self(data)
    }
}
