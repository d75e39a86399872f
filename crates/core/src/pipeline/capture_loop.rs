use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};
use thiserror::Error;

use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::capture::domain::frame_source::{FrameSource, OpenError, ReadError};
use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::frame_sink::FrameSink;

/// Observable state of a [`CaptureLoop`]. `Stopped` is terminal: a stopped
/// loop is never restarted, a new one is constructed instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum LoopState {
    NotStarted = 0,
    Running = 1,
    StopRequested = 2,
    Stopped = 3,
}

impl LoopState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LoopState::NotStarted,
            1 => LoopState::Running,
            2 => LoopState::StopRequested,
            _ => LoopState::Stopped,
        }
    }
}

/// Why the capture loop reached `Stopped`. Emitted exactly once per loop
/// lifetime on the event channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// `stop()` was called.
    Requested,
    /// The frame source reported closed/disconnected.
    SourceClosed,
    /// Consecutive read failures reached the configured limit.
    ReadFailureLimit,
}

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("capture loop cannot start from state {0:?}")]
    InvalidState(LoopState),
    #[error(transparent)]
    Open(#[from] OpenError),
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CaptureOptions {
    /// Escalate to `Stopped` after this many consecutive failed reads.
    /// `None` retries forever, logging each failure.
    pub max_consecutive_read_failures: Option<u32>,
}

struct Components {
    source: Box<dyn FrameSource>,
    detector: Box<dyn FaceDetector>,
    annotator: Box<dyn FrameAnnotator>,
}

/// The capture/detect/annotate/publish state machine.
///
/// One dedicated worker thread pulls frames from the source, converts to
/// grayscale, detects, annotates the colour frame and publishes it to the
/// sink. Cancellation is cooperative: `stop()` raises a flag that the worker
/// observes at the top of its next tick, so an in-flight detect always
/// finishes and shutdown latency is bounded by one frame's processing time.
///
/// The source is closed exactly once per loop lifetime, on the transition
/// into `Stopped`, whichever path led there.
pub struct CaptureLoop {
    state: Arc<AtomicU8>,
    stop: Arc<AtomicBool>,
    sink: FrameSink,
    options: CaptureOptions,
    components: Option<Components>,
    worker: Option<JoinHandle<()>>,
    events_tx: Sender<StopReason>,
    events_rx: Receiver<StopReason>,
}

// Safety: the only non-`Sync` fields are the boxed trait objects inside
// `components`, and those are never reached through `&self` — they are taken
// in `start(&mut self)` and moved into the worker thread. Every `&self`
// method (`state`, `events`, `sink`, `stop`) touches only atomics, channel
// handles and the sink, all of which are `Sync`, so sharing `&CaptureLoop`
// across threads is safe — as `stop()` documents.
unsafe impl Sync for CaptureLoop {}

impl CaptureLoop {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn FaceDetector>,
        annotator: Box<dyn FrameAnnotator>,
        sink: FrameSink,
        options: CaptureOptions,
    ) -> Self {
        let (events_tx, events_rx) = crossbeam_channel::unbounded();
        Self {
            state: Arc::new(AtomicU8::new(LoopState::NotStarted as u8)),
            stop: Arc::new(AtomicBool::new(false)),
            sink,
            options,
            components: Some(Components {
                source,
                detector,
                annotator,
            }),
            worker: None,
            events_tx,
            events_rx,
        }
    }

    pub fn state(&self) -> LoopState {
        LoopState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Receiver for the single terminal [`StopReason`] event.
    pub fn events(&self) -> Receiver<StopReason> {
        self.events_rx.clone()
    }

    pub fn sink(&self) -> FrameSink {
        self.sink.clone()
    }

    /// Opens the source and spawns the capture worker.
    ///
    /// Allowed only from `NotStarted`; a second call (or a call on a stopped
    /// loop) fails with [`CaptureError::InvalidState`] and opens no second
    /// device handle. An open failure transitions directly to `Stopped`
    /// without entering `Running`.
    pub fn start(&mut self, device_index: u32) -> Result<(), CaptureError> {
        let current = self.state();
        if current != LoopState::NotStarted {
            return Err(CaptureError::InvalidState(current));
        }
        // NotStarted is only ever left through this method, and `self` is
        // exclusively borrowed, so the take cannot race.
        let mut components = self.components.take().expect("components present before start");

        if let Err(e) = components.source.open(device_index) {
            components.source.close();
            self.state.store(LoopState::Stopped as u8, Ordering::Release);
            return Err(CaptureError::Open(e));
        }

        self.state.store(LoopState::Running as u8, Ordering::Release);
        log::info!("capture loop started on device {device_index}");

        let state = self.state.clone();
        let stop = self.stop.clone();
        let sink = self.sink.clone();
        let options = self.options;
        let events_tx = self.events_tx.clone();

        self.worker = Some(std::thread::spawn(move || {
            let Components {
                mut source,
                mut detector,
                annotator,
            } = components;

            let reason = run_ticks(&mut *source, &mut *detector, &*annotator, &sink, &stop, options);

            source.close();
            state.store(LoopState::Stopped as u8, Ordering::Release);
            log::info!("capture loop stopped: {reason:?}");
            let _ = events_tx.send(reason);
        }));

        Ok(())
    }

    /// Requests cooperative shutdown. Callable from any thread, any number
    /// of times; observed by the worker at its next tick boundary.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
        let _ = self.state.compare_exchange(
            LoopState::Running as u8,
            LoopState::StopRequested as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// Blocks until the worker has exited and the loop is `Stopped`.
    pub fn wait(&mut self) {
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                log::error!("capture worker panicked");
                self.state.store(LoopState::Stopped as u8, Ordering::Release);
            }
        }
    }
}

/// Runs capture ticks until a terminal condition and returns why the loop
/// ended. Never returns with the source still needed: the caller closes it.
fn run_ticks(
    source: &mut dyn FrameSource,
    detector: &mut dyn FaceDetector,
    annotator: &dyn FrameAnnotator,
    sink: &FrameSink,
    stop: &AtomicBool,
    options: CaptureOptions,
) -> StopReason {
    let mut consecutive_failures: u32 = 0;

    loop {
        if stop.load(Ordering::Acquire) {
            return StopReason::Requested;
        }

        let mut frame = match source.read() {
            Ok(frame) => frame,
            Err(ReadError::Closed) => return StopReason::SourceClosed,
            Err(e) => {
                consecutive_failures += 1;
                log::warn!("frame read failed ({consecutive_failures} consecutive): {e}");
                if let Some(limit) = options.max_consecutive_read_failures {
                    if consecutive_failures >= limit {
                        log::error!("read failure limit reached ({limit}), stopping capture");
                        return StopReason::ReadFailureLimit;
                    }
                }
                continue;
            }
        };
        consecutive_failures = 0;

        let gray = frame.to_grayscale();
        let regions = detector.detect(&gray);
        annotator.annotate(&mut frame, &regions);
        sink.publish(frame);
    }
}
