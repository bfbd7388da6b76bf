//! Bounded look-ahead buffer of decoded frames
//!
//! Slots are keyed by frame index and ordered by cyclic distance from the
//! playback cursor. The window covers `[cursor, cursor + capacity)` modulo the
//! frame count; anything outside is evicted when the cursor moves.

use std::sync::Arc;

use crate::image::DecodedFrame;

/// Forward distance from `cursor` to `index` in a cycle of `n` frames
pub(crate) fn cyclic_distance(index: u32, cursor: u32, n: u32) -> u32 {
    let n = n.max(1);
    ((index % n) + n - (cursor % n)) % n
}

/// Fixed-capacity window of decoded frames ahead of the cursor
#[derive(Debug)]
pub struct PreheatWindow {
    slots: Vec<Arc<DecodedFrame>>,
    capacity: usize,
    frame_count: u32,
    cursor: u32,
}

impl PreheatWindow {
    /// Create an empty window; `capacity` is at least 1
    pub fn new(capacity: usize, frame_count: u32) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            frame_count: frame_count.max(1),
            cursor: 0,
        }
    }

    /// Maximum number of buffered frames
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of buffered frames
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// True when no more frames fit
    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    /// Current cursor position
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    /// Cyclic distance from the cursor to `index`
    pub fn distance(&self, index: u32) -> u32 {
        cyclic_distance(index, self.cursor, self.frame_count)
    }

    /// Whether `index` falls inside the window's range
    pub fn covers(&self, index: u32) -> bool {
        (self.distance(index) as usize) < self.capacity
    }

    /// Buffered frame at `index`, if any
    pub fn get(&self, index: u32) -> Option<&Arc<DecodedFrame>> {
        self.slots.iter().find(|f| f.index == index)
    }

    /// Whether `index` is buffered
    pub fn contains(&self, index: u32) -> bool {
        self.get(index).is_some()
    }

    /// Buffered indices, nearest to the cursor first
    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.slots.iter().map(|f| f.index)
    }

    /// Buffer a frame.
    ///
    /// Returns false without buffering when the index is outside the window's
    /// range. At capacity the slot farthest from the cursor is evicted first.
    pub fn insert(&mut self, frame: Arc<DecodedFrame>) -> bool {
        if !self.covers(frame.index) {
            return false;
        }
        if let Some(existing) = self.slots.iter_mut().find(|f| f.index == frame.index) {
            *existing = frame;
            return true;
        }
        if self.is_full() {
            // Slots are sorted, so the farthest is last
            if let Some(evicted) = self.slots.pop() {
                log::trace!("preheat window full, evicting frame {}", evicted.index);
            }
        }
        let (cursor, n) = (self.cursor, self.frame_count);
        let target = cyclic_distance(frame.index, cursor, n);
        let at = self
            .slots
            .partition_point(|f| cyclic_distance(f.index, cursor, n) < target);
        self.slots.insert(at, frame);
        true
    }

    /// Move the cursor and evict slots that fall out of range.
    ///
    /// Returns the number of evicted frames.
    pub fn set_cursor(&mut self, cursor: u32) -> usize {
        self.cursor = cursor % self.frame_count;
        let before = self.slots.len();
        let (cursor, n, capacity) = (self.cursor, self.frame_count, self.capacity);
        self.slots.retain(|f| {
            let keep = (cyclic_distance(f.index, cursor, n) as usize) < capacity;
            if !keep {
                log::trace!("evicting frame {} (cursor {cursor})", f.index);
            }
            keep
        });
        self.slots.sort_by_key(|f| cyclic_distance(f.index, cursor, n));
        before - self.slots.len()
    }

    /// Drop every buffered frame
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
