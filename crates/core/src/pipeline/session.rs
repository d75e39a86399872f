use crossbeam_channel::Receiver;
use thiserror::Error;

use crate::pipeline::capture_loop::{CaptureError, CaptureLoop, StopReason};
use crate::pipeline::frame_sink::FrameSink;

/// Lifecycle of a permission-gated capture session.
///
/// There is exactly one live capture loop while the state is neither `Idle`
/// nor `Stopped`. `Stopped` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    AwaitingPermission,
    Capturing,
    Stopping,
    Stopped,
}

/// User-facing events routed into the session by the outer UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// Camera permission granted.
    Allow,
    /// Camera permission refused.
    Deny,
    /// Shutdown requested (window closed, Escape, signal).
    Exit,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("{event:?} is not valid in state {state:?}")]
    InvalidTransition {
        state: PipelineState,
        event: SessionEvent,
    },
    #[error("permission cannot be requested in state {0:?}")]
    PermissionNotRequestable(PipelineState),
    #[error(transparent)]
    Capture(#[from] CaptureError),
}

/// Permission-gated controller around a [`CaptureLoop`].
///
/// The session never opens the camera before an explicit `Allow`; on `Deny`
/// the device is never touched. `Exit` is accepted in every state and always
/// lands in `Stopped`, waiting for the worker when one is running.
pub struct CaptureSession {
    state: PipelineState,
    capture: CaptureLoop,
    device_index: u32,
}

impl CaptureSession {
    pub fn new(capture: CaptureLoop, device_index: u32) -> Self {
        Self {
            state: PipelineState::Idle,
            capture,
            device_index,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn sink(&self) -> FrameSink {
        self.capture.sink()
    }

    /// Receiver for the capture loop's terminal [`StopReason`] event.
    pub fn events(&self) -> Receiver<StopReason> {
        self.capture.events()
    }

    /// Idle → AwaitingPermission. The camera stays untouched until the
    /// permission decision arrives.
    pub fn request_permission(&mut self) -> Result<(), SessionError> {
        if self.state != PipelineState::Idle {
            return Err(SessionError::PermissionNotRequestable(self.state));
        }
        self.state = PipelineState::AwaitingPermission;
        log::info!("awaiting camera permission");
        Ok(())
    }

    pub fn handle(&mut self, event: SessionEvent) -> Result<(), SessionError> {
        match event {
            SessionEvent::Allow => self.handle_allow(),
            SessionEvent::Deny => self.handle_deny(),
            SessionEvent::Exit => self.handle_exit(),
        }
    }

    fn handle_allow(&mut self) -> Result<(), SessionError> {
        if self.state != PipelineState::AwaitingPermission {
            return Err(SessionError::InvalidTransition {
                state: self.state,
                event: SessionEvent::Allow,
            });
        }
        match self.capture.start(self.device_index) {
            Ok(()) => {
                self.state = PipelineState::Capturing;
                Ok(())
            }
            Err(e) => {
                self.state = PipelineState::Stopped;
                Err(SessionError::Capture(e))
            }
        }
    }

    fn handle_deny(&mut self) -> Result<(), SessionError> {
        if self.state != PipelineState::AwaitingPermission {
            return Err(SessionError::InvalidTransition {
                state: self.state,
                event: SessionEvent::Deny,
            });
        }
        log::info!("camera permission denied");
        self.state = PipelineState::Stopped;
        Ok(())
    }

    fn handle_exit(&mut self) -> Result<(), SessionError> {
        if self.state == PipelineState::Capturing {
            self.state = PipelineState::Stopping;
            self.capture.stop();
            self.capture.wait();
        }
        self.state = PipelineState::Stopped;
        Ok(())
    }
}
