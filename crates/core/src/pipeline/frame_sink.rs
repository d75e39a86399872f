use std::sync::{Arc, Mutex};

use crate::shared::frame::Frame;

/// Single-slot hand-off from the capture thread to the display consumer.
///
/// Last-writer-wins: `publish` replaces any unconsumed occupant, so
/// detection throughput may exceed display throughput without buildup, and
/// the display may skip frames without backpressuring capture. Neither side
/// ever blocks beyond the slot swap itself; the mutex is held only for the
/// duration of an `Option` swap, never while a frame is produced or
/// rendered.
#[derive(Clone, Default)]
pub struct FrameSink {
    slot: Arc<Mutex<Option<Frame>>>,
}

impl FrameSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a frame, discarding any previous unconsumed occupant.
    pub fn publish(&self, frame: Frame) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(frame);
    }

    /// Takes the latest published frame, or `None` if nothing new has been
    /// published since the last take.
    pub fn try_take(&self) -> Option<Frame> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.take()
    }
}
