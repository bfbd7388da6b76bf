//! Background playback thread
//!
//! Decoding is CPU-bound and synchronous, so it runs on a dedicated thread
//! that owns the [`Player`]. Every store call happens on that thread, which
//! keeps decodes for one store strictly serialized. The render thread only
//! reads the latest [`FrameSnapshot`] and never waits on a decode.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use almost_enough::Stopper;
use enough::Stop;
use parking_lot::{Condvar, Mutex};

use crate::player::{FrameSnapshot, Player, PlayerState};

struct Shared {
    snapshot: Mutex<FrameSnapshot>,
    /// Wakes the playback thread early
    wake: Condvar,
    /// Signalled whenever a new snapshot is published
    published: Condvar,
}

/// Spawns playback threads
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaybackWorker;

impl PlaybackWorker {
    /// Move `player` onto a new thread and start its clock
    pub fn spawn(player: Player) -> std::io::Result<PlaybackHandle> {
        let stop = player.store().stopper();
        let shared = Arc::new(Shared {
            snapshot: Mutex::new(player.snapshot()),
            wake: Condvar::new(),
            published: Condvar::new(),
        });

        let thread = std::thread::Builder::new()
            .name("avif-playback".into())
            .spawn({
                let shared = Arc::clone(&shared);
                let stop = stop.clone();
                move || run(player, &shared, &stop)
            })?;

        Ok(PlaybackHandle {
            shared,
            stop,
            thread: Some(thread),
        })
    }
}

fn run(mut player: Player, shared: &Shared, stop: &Stopper) {
    let mut last = Instant::now();
    loop {
        if stop.check().is_err() {
            break;
        }
        let now = Instant::now();
        player.tick(now - last);
        last = now;

        let mut snapshot = shared.snapshot.lock();
        *snapshot = player.snapshot();
        shared.published.notify_all();
        if stop.check().is_err() {
            break;
        }
        match player.time_until_next_frame() {
            Some(wait) if wait.is_zero() => {}
            Some(wait) => {
                shared.wake.wait_for(&mut snapshot, wait);
            }
            None => shared.wake.wait(&mut snapshot),
        }
    }

    player.stop();
    *shared.snapshot.lock() = player.snapshot();
    shared.published.notify_all();
    log::debug!("playback thread exiting");
}

/// Handle to a running playback thread
///
/// Dropping the handle stops playback and joins the thread.
pub struct PlaybackHandle {
    shared: Arc<Shared>,
    stop: Stopper,
    thread: Option<JoinHandle<()>>,
}

impl PlaybackHandle {
    /// Latest displayable state
    pub fn snapshot(&self) -> FrameSnapshot {
        self.shared.snapshot.lock().clone()
    }

    /// Current state of the player
    pub fn state(&self) -> PlayerState {
        self.shared.snapshot.lock().state
    }

    /// Whether the thread is still running
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Block until the snapshot satisfies `pred` or `timeout` passes.
    ///
    /// Returns the last snapshot seen.
    pub fn wait_until(
        &self,
        timeout: Duration,
        mut pred: impl FnMut(&FrameSnapshot) -> bool,
    ) -> FrameSnapshot {
        let deadline = Instant::now() + timeout;
        let mut snapshot = self.shared.snapshot.lock();
        while !pred(&snapshot) {
            if self
                .shared
                .published
                .wait_until(&mut snapshot, deadline)
                .timed_out()
            {
                break;
            }
        }
        snapshot.clone()
    }

    /// Stop playback, interrupt any in-flight decode, and join the thread
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.cancel();
        {
            let _guard = self.shared.snapshot.lock();
            self.shared.wake.notify_all();
        }
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            log::warn!("playback thread panicked");
        }
    }
}

impl Drop for PlaybackHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for PlaybackHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackHandle")
            .field("state", &self.state())
            .field("running", &self.is_running())
            .finish()
    }
}
