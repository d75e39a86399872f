use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum OpenError {
    #[error("no camera at device index {0}")]
    NoSuchDevice(u32),
    #[error("failed to open camera: {0}")]
    Device(String),
}

#[derive(Error, Debug)]
pub enum ReadError {
    /// The device is closed or has disconnected. Terminal: no further reads
    /// will succeed.
    #[error("frame source is closed")]
    Closed,
    /// A single frame failed to arrive or decode. Transient: the next read
    /// may succeed.
    #[error("failed to read frame: {0}")]
    Frame(String),
}

/// Acquires raw colour frames from an opaque camera device.
///
/// Implementations hold the device exclusively between `open` and `close`.
/// Single-open across the application is enforced one level up, by the
/// pipeline state: only one capture phase is ever live.
pub trait FrameSource: Send {
    /// Opens the device. The source yields frames only between `open` and
    /// `close`.
    fn open(&mut self, device_index: u32) -> Result<(), OpenError>;

    /// Blocks until the next frame is available. Fails with
    /// [`ReadError::Closed`] once the source is closed or the device is
    /// gone.
    fn read(&mut self) -> Result<Frame, ReadError>;

    /// Releases the device. Idempotent.
    fn close(&mut self);
}
