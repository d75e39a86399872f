use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;

use crate::capture::domain::frame_source::{FrameSource, OpenError, ReadError};
use crate::shared::frame::{Frame, PixelFormat};

/// Webcam frame source backed by the `nokhwa` native capture backend.
///
/// Requests the highest native resolution and decodes every captured buffer
/// to tightly-packed RGB. Frames are stamped with a monotonically increasing
/// sequence index starting at 0 for each open.
pub struct NokhwaFrameSource {
    camera: Option<Camera>,
    next_index: u64,
}

// Safety: NokhwaFrameSource is only used from a single thread at a time —
// it is constructed, moved into the capture thread, and never shared.
unsafe impl Send for NokhwaFrameSource {}

impl NokhwaFrameSource {
    pub fn new() -> Self {
        Self {
            camera: None,
            next_index: 0,
        }
    }
}

impl Default for NokhwaFrameSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for NokhwaFrameSource {
    fn open(&mut self, device_index: u32) -> Result<(), OpenError> {
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);
        let mut camera = Camera::new(CameraIndex::Index(device_index), requested)
            .map_err(|e| OpenError::Device(e.to_string()))?;
        camera
            .open_stream()
            .map_err(|e| OpenError::Device(e.to_string()))?;

        log::info!(
            "opened camera {device_index}: {}x{} @ {} fps",
            camera.resolution().width(),
            camera.resolution().height(),
            camera.frame_rate()
        );

        self.camera = Some(camera);
        self.next_index = 0;
        Ok(())
    }

    fn read(&mut self) -> Result<Frame, ReadError> {
        let camera = self.camera.as_mut().ok_or(ReadError::Closed)?;

        let buffer = camera.frame().map_err(|e| ReadError::Frame(e.to_string()))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| ReadError::Frame(e.to_string()))?;

        let (width, height) = decoded.dimensions();
        let frame = Frame::new(
            decoded.into_raw(),
            width,
            height,
            PixelFormat::Rgb,
            self.next_index,
        );
        self.next_index += 1;
        Ok(frame)
    }

    fn close(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                log::warn!("failed to stop camera stream cleanly: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_before_open_is_closed() {
        let mut source = NokhwaFrameSource::new();
        assert!(matches!(source.read(), Err(ReadError::Closed)));
    }

    #[test]
    fn test_close_without_open_is_noop() {
        let mut source = NokhwaFrameSource::new();
        source.close();
        source.close();
        assert!(matches!(source.read(), Err(ReadError::Closed)));
    }
}
