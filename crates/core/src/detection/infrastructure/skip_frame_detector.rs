use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

/// Decorator that runs detection every N frames, reusing results in between.
///
/// A throttling tunable for when detection cost exceeds the acquisition
/// interval. Skipped frames repeat the most recent real result; with an
/// interval of 1 every frame is detected and the decorator is a pass-through.
pub struct SkipFrameDetector {
    inner: Box<dyn FaceDetector>,
    skip_interval: usize,
    frame_count: usize,
    last_regions: Vec<FaceRegion>,
}

impl SkipFrameDetector {
    pub fn new(inner: Box<dyn FaceDetector>, skip_interval: usize) -> Result<Self, &'static str> {
        if skip_interval < 1 {
            return Err("skip_interval must be >= 1");
        }
        Ok(Self {
            inner,
            skip_interval,
            frame_count: 0,
            last_regions: Vec::new(),
        })
    }
}

impl FaceDetector for SkipFrameDetector {
    fn detect(&mut self, frame: &Frame) -> Vec<FaceRegion> {
        if self.frame_count % self.skip_interval == 0 {
            self.last_regions = self.inner.detect(frame);
        }
        self.frame_count += 1;
        self.last_regions.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::frame::PixelFormat;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FakeDetector {
        results: Vec<Vec<FaceRegion>>,
        call_count: Arc<AtomicUsize>,
    }

    impl FaceDetector for FakeDetector {
        fn detect(&mut self, _frame: &Frame) -> Vec<FaceRegion> {
            let calls = self.call_count.fetch_add(1, Ordering::Relaxed);
            self.results[calls % self.results.len()].clone()
        }
    }

    fn fake(results: Vec<Vec<FaceRegion>>) -> (Box<dyn FaceDetector>, Arc<AtomicUsize>) {
        let call_count = Arc::new(AtomicUsize::new(0));
        let detector = FakeDetector {
            results,
            call_count: call_count.clone(),
        };
        (Box::new(detector), call_count)
    }

    fn frame(index: u64) -> Frame {
        Frame::new(vec![0u8; 16 * 16], 16, 16, PixelFormat::Gray, index)
    }

    fn region(x: i32) -> FaceRegion {
        FaceRegion::new(x, 0, 10, 10)
    }

    #[test]
    fn test_interval_1_delegates_every_frame() {
        let (inner, calls) = fake(vec![vec![region(1)]]);
        let mut detector = SkipFrameDetector::new(inner, 1).unwrap();

        for i in 0..4 {
            detector.detect(&frame(i));
        }
        assert_eq!(calls.load(Ordering::Relaxed), 4);
    }

    #[test]
    fn test_interval_2_reuses_previous_result() {
        let (inner, calls) = fake(vec![vec![region(10)], vec![region(30)]]);
        let mut detector = SkipFrameDetector::new(inner, 2).unwrap();

        let r0 = detector.detect(&frame(0)); // real
        let r1 = detector.detect(&frame(1)); // skipped
        let r2 = detector.detect(&frame(2)); // real

        assert_eq!(calls.load(Ordering::Relaxed), 2);
        assert_eq!(r0, vec![region(10)]);
        assert_eq!(r1, vec![region(10)]);
        assert_eq!(r2, vec![region(30)]);
    }

    #[test]
    fn test_empty_result_repeats_on_skipped_frame() {
        let (inner, _) = fake(vec![vec![]]);
        let mut detector = SkipFrameDetector::new(inner, 3).unwrap();

        assert!(detector.detect(&frame(0)).is_empty());
        assert!(detector.detect(&frame(1)).is_empty());
        assert!(detector.detect(&frame(2)).is_empty());
    }

    #[test]
    fn test_interval_0_errors() {
        let (inner, _) = fake(vec![vec![]]);
        assert!(SkipFrameDetector::new(inner, 0).is_err());
    }
}
