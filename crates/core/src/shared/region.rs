/// An axis-aligned face bounding box in the coordinate space of the frame it
/// was detected on.
///
/// Detectors may report rectangles that extend past the frame edges;
/// [`FaceRegion::clip`] produces the in-bounds portion before any drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceRegion {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl FaceRegion {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Intersects the region with `[0, frame_width) × [0, frame_height)`.
    ///
    /// Returns `None` when nothing of the region remains in bounds, or when
    /// the region is degenerate (non-positive width or height).
    pub fn clip(&self, frame_width: u32, frame_height: u32) -> Option<FaceRegion> {
        if self.width <= 0 || self.height <= 0 {
            return None;
        }

        let x1 = self.x.max(0);
        let y1 = self.y.max(0);
        let x2 = self.x.saturating_add(self.width).min(frame_width as i32);
        let y2 = self.y.saturating_add(self.height).min(frame_height as i32);

        if x2 <= x1 || y2 <= y1 {
            return None;
        }

        Some(FaceRegion::new(x1, y1, x2 - x1, y2 - y1))
    }
}
