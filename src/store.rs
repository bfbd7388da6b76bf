//! Frame store with read-ahead decoding
//!
//! [`FrameStore`] owns the opened source and turns frame indices into
//! decoded, converted frames at a fixed target size and color configuration.
//! Animated sources keep a [`PreheatWindow`] ahead of the playback cursor;
//! still images keep exactly one decoded frame and no window.
//!
//! Frames outside the window's range are decoded on demand and handed back
//! without being cached, so random access never disturbs the look-ahead.
//! A frame that fails during preheat is not preheated again until the cursor
//! moves past it; only a display-time [`FrameStore::get`] retries it.

use std::sync::Arc;
use std::time::Duration;

use almost_enough::Stopper;
use enough::Stop;
use whereat::at;

use crate::aspect::ScaleMode;
use crate::color::ColorConfig;
use crate::error::{Error, Result};
use crate::image::{DecodedFrame, Dimensions};
use crate::source::AnimatedSource;
use crate::window::PreheatWindow;

enum Buffer {
    Window(PreheatWindow),
    Still(Option<Arc<DecodedFrame>>),
}

/// Decoded frames for one animated source
pub struct FrameStore {
    source: Box<dyn AnimatedSource>,
    frame_count: u32,
    natural: Dimensions,
    target: Dimensions,
    color: ColorConfig,
    scale: ScaleMode,
    buffer: Buffer,
    /// Indices whose preheat failed while inside the window
    failed: Vec<u32>,
    stop: Stopper,
    decode_calls: u64,
}

impl std::fmt::Debug for FrameStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameStore")
            .field("frame_count", &self.frame_count)
            .field("natural", &self.natural)
            .field("target", &self.target)
            .field("color", &self.color)
            .field("buffered", &self.buffered_len())
            .finish()
    }
}

impl FrameStore {
    /// Create a store over an opened source.
    ///
    /// `preheat_frames` is the window capacity for animated sources and is
    /// ignored for still images. Fails with [`Error::Open`] for a source
    /// without frames.
    pub fn new(
        source: Box<dyn AnimatedSource>,
        target: Dimensions,
        color: ColorConfig,
        scale: ScaleMode,
        preheat_frames: usize,
    ) -> Result<Self> {
        let frame_count = source.frame_count();
        if frame_count == 0 {
            return Err(at(Error::Open("container has no frames".into())));
        }
        let natural = source.natural_size();
        let buffer = if frame_count <= 1 {
            Buffer::Still(None)
        } else {
            Buffer::Window(PreheatWindow::new(preheat_frames, frame_count))
        };
        log::debug!(
            "frame store: {frame_count} frames, {}x{} -> {}x{}, {color:?}",
            natural.width,
            natural.height,
            target.width,
            target.height,
        );
        Ok(Self {
            source,
            frame_count,
            natural,
            target,
            color,
            scale,
            buffer,
            failed: Vec::new(),
            stop: Stopper::new(),
            decode_calls: 0,
        })
    }

    /// Number of frames in the source
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// True for the single-frame path
    pub fn is_still(&self) -> bool {
        matches!(self.buffer, Buffer::Still(_))
    }

    /// Full-resolution frame size
    pub fn natural_size(&self) -> Dimensions {
        self.natural
    }

    /// Size frames are decoded at
    pub fn target_size(&self) -> Dimensions {
        self.target
    }

    /// Color configuration frames are decoded with
    pub fn color_config(&self) -> ColorConfig {
        self.color
    }

    /// Display duration of frame `index`, from container metadata
    pub fn frame_duration(&self, index: u32) -> Duration {
        self.source.frame_duration(index % self.frame_count)
    }

    /// Preheat window capacity; 0 for still images
    pub fn capacity(&self) -> usize {
        match &self.buffer {
            Buffer::Window(window) => window.capacity(),
            Buffer::Still(_) => 0,
        }
    }

    /// Number of frames currently in the preheat window
    pub fn window_len(&self) -> usize {
        match &self.buffer {
            Buffer::Window(window) => window.len(),
            Buffer::Still(_) => 0,
        }
    }

    fn buffered_len(&self) -> usize {
        match &self.buffer {
            Buffer::Window(window) => window.len(),
            Buffer::Still(frame) => usize::from(frame.is_some()),
        }
    }

    /// Whether frame `index` is available without decoding
    pub fn is_buffered(&self, index: u32) -> bool {
        match &self.buffer {
            Buffer::Window(window) => window.contains(index),
            Buffer::Still(frame) => index == 0 && frame.is_some(),
        }
    }

    /// Current playback cursor
    pub fn cursor(&self) -> u32 {
        match &self.buffer {
            Buffer::Window(window) => window.cursor(),
            Buffer::Still(_) => 0,
        }
    }

    /// Move the playback cursor, evicting frames that fall behind it.
    ///
    /// Returns the number of evicted frames. Evicted frames must not be
    /// dereferenced by a renderer that did not keep its own reference.
    pub fn set_cursor(&mut self, index: u32) -> usize {
        match &mut self.buffer {
            Buffer::Window(window) => {
                let evicted = window.set_cursor(index);
                self.failed.retain(|&i| window.covers(i));
                if evicted > 0 {
                    log::trace!("cursor {index}: evicted {evicted} frame(s)");
                }
                evicted
            }
            Buffer::Still(_) => 0,
        }
    }

    /// Total calls made into the frame decoder
    pub fn decode_calls(&self) -> u64 {
        self.decode_calls
    }

    /// Cancellation token shared with anything that may tear this store down
    pub fn stopper(&self) -> Stopper {
        self.stop.clone()
    }

    /// Interrupt any in-flight decode; later decodes fail as cancelled
    pub fn cancel(&self) {
        self.stop.cancel();
    }

    /// Drop every buffered frame
    pub fn release(&mut self) {
        self.failed.clear();
        match &mut self.buffer {
            Buffer::Window(window) => window.clear(),
            Buffer::Still(frame) => *frame = None,
        }
    }

    /// Get frame `index`, decoding it if it is not buffered.
    ///
    /// A failure is scoped to this call: nothing buffered is invalidated.
    pub fn get(&mut self, index: u32) -> Result<Arc<DecodedFrame>> {
        if index >= self.frame_count {
            return Err(at(Error::FrameOutOfRange {
                index,
                frame_count: self.frame_count,
            }));
        }

        let in_range = match &self.buffer {
            Buffer::Window(window) => {
                if let Some(frame) = window.get(index) {
                    return Ok(Arc::clone(frame));
                }
                window.covers(index)
            }
            Buffer::Still(Some(frame)) => return Ok(Arc::clone(frame)),
            Buffer::Still(None) => true,
        };

        let frame = self.decode(index)?;
        match &mut self.buffer {
            Buffer::Window(window) if in_range => {
                window.insert(Arc::clone(&frame));
            }
            Buffer::Window(_) => {
                log::debug!("frame {index} is outside the preheat window, not cached");
            }
            Buffer::Still(slot) => *slot = Some(Arc::clone(&frame)),
        }
        Ok(frame)
    }

    /// Decode up to `count` frames starting at `from`, wrapping at the end.
    ///
    /// Stops at the edge of the window's range, when the window is full, or
    /// on cancellation. A failing frame is skipped and the rest are still
    /// attempted; it is not attempted again by later preheats until the
    /// cursor leaves it behind. Returns the number of frames newly decoded.
    pub fn preheat(&mut self, from: u32, count: usize) -> usize {
        let mut decoded = 0;
        for step in 0..count {
            let index = ((from as u64 + step as u64) % self.frame_count as u64) as u32;
            let Buffer::Window(window) = &self.buffer else {
                return 0;
            };
            if window.is_full() || !window.covers(index) {
                break;
            }
            if window.contains(index) || self.failed.contains(&index) {
                continue;
            }
            match self.decode(index) {
                Ok(frame) => {
                    if let Buffer::Window(window) = &mut self.buffer {
                        window.insert(frame);
                    }
                    decoded += 1;
                }
                Err(e) => {
                    let e = e.into_inner();
                    if e.is_cancelled() {
                        log::debug!("preheat cancelled at frame {index}");
                        break;
                    }
                    log::warn!("preheat of frame {index} failed: {e}");
                    self.failed.push(index);
                }
            }
        }
        if decoded > 0 {
            log::trace!("preheated {decoded} frame(s) from {from}");
        }
        decoded
    }

    fn decode(&mut self, index: u32) -> Result<Arc<DecodedFrame>> {
        self.stop.check().map_err(|e| at(Error::Cancelled(e)))?;

        self.decode_calls += 1;
        log::trace!(
            "decoding frame {index} at {}x{}",
            self.target.width,
            self.target.height
        );
        let pixels = self.source.decode_frame(
            index,
            self.target,
            self.color,
            self.scale,
            &self.stop,
        )?;

        // The decoder may not poll the token itself; drop late results.
        self.stop.check().map_err(|e| at(Error::Cancelled(e)))?;

        let size = pixels.dimensions();
        Ok(Arc::new(DecodedFrame {
            index,
            pixels,
            size,
            duration: self.source.frame_duration(index),
            is_sampled: size.is_smaller_than(self.natural),
        }))
    }
}
