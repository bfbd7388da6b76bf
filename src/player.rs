//! Timed playback over a [`FrameStore`]
//!
//! ```text
//! Uninitialized ──first request──▶ Still              (still image / animation off)
//! Placeholder ──frame 0 decoded──▶ Playing            (animated)
//! any ──stop()──▶ Stopped
//! ```
//!
//! The player is clock-agnostic: the host (or [`PlaybackWorker`]) feeds it
//! elapsed time through [`Player::tick`]. Each advance moves the store's
//! cursor and tops up the preheat window so the next advance finds its frame
//! already decoded.
//!
//! [`PlaybackWorker`]: crate::PlaybackWorker

use std::sync::Arc;
use std::time::Duration;

use crate::config::PlaybackConfig;
use crate::error::Error;
use crate::image::DecodedFrame;
use crate::observer::FrameErrorObserver;
use crate::store::FrameStore;

/// Shortest display time of a frame; shorter container durations are clamped
pub const MIN_FRAME_DURATION: Duration = Duration::from_millis(10);

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// Still player before its frame was requested
    Uninitialized,
    /// Animated player waiting for frame 0
    Placeholder,
    /// Cursor advancing on the clock
    Playing,
    /// Showing a single still frame
    Still,
    /// Resources released
    Stopped,
}

/// Position of playback within the animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackCursor {
    /// Frame the clock is on
    pub current_index: u32,
    /// Time spent on that frame so far
    pub elapsed_in_frame: Duration,
}

/// What a renderer needs to paint, captured without decoding
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    /// Player state
    pub state: PlayerState,
    /// Cursor index
    pub index: u32,
    /// Frame to display; `None` means show a placeholder
    pub frame: Option<Arc<DecodedFrame>>,
    /// The result is below natural resolution
    pub is_sampled: bool,
}

/// Drives a frame store on a playback clock
pub struct Player {
    store: FrameStore,
    state: PlayerState,
    cursor: PlaybackCursor,
    displayed: Option<Arc<DecodedFrame>>,
    preheat_frames: usize,
    observer: Option<Arc<dyn FrameErrorObserver>>,
    first_attempted: bool,
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("state", &self.state)
            .field("cursor", &self.cursor)
            .field("store", &self.store)
            .finish()
    }
}

impl Player {
    /// Create a player.
    ///
    /// Animated sources with animation enabled start in
    /// [`PlayerState::Placeholder`]; everything else takes the still path.
    pub fn new(store: FrameStore, config: &PlaybackConfig, animation: bool) -> Self {
        let state = if animation && store.frame_count() > 1 {
            PlayerState::Placeholder
        } else {
            PlayerState::Uninitialized
        };
        log::debug!("player created in {state:?}");
        Self {
            store,
            state,
            cursor: PlaybackCursor::default(),
            displayed: None,
            preheat_frames: config.preheat_frames,
            observer: config.observer.clone(),
            first_attempted: false,
        }
    }

    /// Current state
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Current playback position
    pub fn cursor(&self) -> PlaybackCursor {
        self.cursor
    }

    /// The underlying store
    pub fn store(&self) -> &FrameStore {
        &self.store
    }

    /// Whether frames are produced below natural resolution
    pub fn is_sampled(&self) -> bool {
        match &self.displayed {
            Some(frame) => frame.is_sampled,
            None => self
                .store
                .target_size()
                .is_smaller_than(self.store.natural_size()),
        }
    }

    /// Frame to display, decoding the first frame if it is not ready yet.
    ///
    /// Returns `None` while the placeholder should be shown.
    pub fn current_frame(&mut self) -> Option<Arc<DecodedFrame>> {
        match self.state {
            PlayerState::Uninitialized => self.load_still(),
            PlayerState::Placeholder => {
                self.try_start();
            }
            _ => {}
        }
        self.displayed.clone()
    }

    /// Capture the displayable state without decoding anything
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            state: self.state,
            index: self.cursor.current_index,
            frame: self.displayed.clone(),
            is_sampled: self.is_sampled(),
        }
    }

    /// Feed elapsed wall time into the clock.
    ///
    /// Returns true if the displayed frame changed. At most one full cycle is
    /// advanced per call; a larger backlog is dropped.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        match self.state {
            PlayerState::Uninitialized => {
                self.load_still();
                self.displayed.is_some()
            }
            PlayerState::Placeholder => self.try_start(),
            PlayerState::Playing => {
                self.cursor.elapsed_in_frame += elapsed;
                let before = self.displayed_index();
                let mut advanced = 0;
                while advanced < self.store.frame_count() {
                    let duration = self.current_duration();
                    if self.cursor.elapsed_in_frame < duration {
                        break;
                    }
                    self.cursor.elapsed_in_frame -= duration;
                    self.advance();
                    advanced += 1;
                    if self.state != PlayerState::Playing {
                        break;
                    }
                }
                if advanced == self.store.frame_count() {
                    self.cursor.elapsed_in_frame = Duration::ZERO;
                }
                self.displayed_index() != before
            }
            PlayerState::Still | PlayerState::Stopped => false,
        }
    }

    /// Advance exactly one frame, ignoring the clock
    pub fn step(&mut self) {
        if self.state == PlayerState::Playing {
            self.cursor.elapsed_in_frame = Duration::ZERO;
            self.advance();
        }
    }

    /// Time until the next [`tick`](Self::tick) has work to do.
    ///
    /// `None` when nothing is scheduled (still, stopped).
    pub fn time_until_next_frame(&self) -> Option<Duration> {
        match self.state {
            PlayerState::Playing => Some(
                self.current_duration()
                    .saturating_sub(self.cursor.elapsed_in_frame),
            ),
            PlayerState::Placeholder if !self.first_attempted => Some(Duration::ZERO),
            PlayerState::Placeholder => Some(self.current_duration()),
            PlayerState::Uninitialized => Some(Duration::ZERO),
            PlayerState::Still | PlayerState::Stopped => None,
        }
    }

    /// Release every buffered frame and stop playback.
    ///
    /// Interrupts an in-flight decode that polls the store's token.
    pub fn stop(&mut self) {
        if self.state == PlayerState::Stopped {
            return;
        }
        self.store.cancel();
        self.store.release();
        self.displayed = None;
        self.state = PlayerState::Stopped;
        log::debug!("player stopped");
    }

    fn displayed_index(&self) -> Option<u32> {
        self.displayed.as_ref().map(|f| f.index)
    }

    fn current_duration(&self) -> Duration {
        self.store
            .frame_duration(self.cursor.current_index)
            .max(MIN_FRAME_DURATION)
    }

    fn load_still(&mut self) {
        match self.store.get(0) {
            Ok(frame) => self.displayed = Some(frame),
            Err(e) => self.report(0, e.into_inner()),
        }
        if self.state != PlayerState::Stopped {
            self.state = PlayerState::Still;
        }
    }

    fn try_start(&mut self) -> bool {
        self.first_attempted = true;
        match self.store.get(0) {
            Ok(frame) => {
                self.displayed = Some(frame);
                self.cursor = PlaybackCursor::default();
                self.state = PlayerState::Playing;
                log::debug!("first frame ready, playing");
                self.store.preheat(1, self.preheat_frames);
                true
            }
            Err(e) => {
                self.report(0, e.into_inner());
                false
            }
        }
    }

    fn advance(&mut self) {
        let next = (self.cursor.current_index + 1) % self.store.frame_count();
        self.cursor.current_index = next;
        self.store.set_cursor(next);

        match self.store.get(next) {
            Ok(frame) => self.displayed = Some(frame),
            Err(e) => {
                let e = e.into_inner();
                if e.is_cancelled() {
                    return;
                }
                // Keep showing the last good frame.
                self.report(next, e);
            }
        }
        self.store.preheat(next + 1, self.preheat_frames);
    }

    fn report(&self, index: u32, error: Error) {
        if error.is_cancelled() {
            log::debug!("decode of frame {index} cancelled");
            return;
        }
        log::warn!("frame {index} failed: {error}");
        if let Some(observer) = &self.observer {
            observer.on_frame_error(index, &error);
        }
    }
}
