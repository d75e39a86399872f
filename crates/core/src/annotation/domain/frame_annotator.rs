use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

/// Draws detection results onto a colour frame in place.
///
/// Annotation happens on the capture thread, strictly before the frame is
/// published — the display consumer never observes a partially drawn frame.
/// An empty region set must leave the frame pixel-identical.
pub trait FrameAnnotator: Send {
    fn annotate(&self, frame: &mut Frame, regions: &[FaceRegion]);
}
