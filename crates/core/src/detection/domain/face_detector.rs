use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

/// Domain interface for face detection.
///
/// Detection is best-effort and never fails: an internal error is logged by
/// the implementation and reported as an empty result. The input is expected
/// to be a grayscale frame; implementations may be stateful (e.g. reusing
/// results across frames), hence `&mut self`. A detector is only ever
/// invoked from the single capture thread, at most once per frame.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Vec<FaceRegion>;
}
