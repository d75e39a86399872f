use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::shared::constants::{BOX_BORDER_COLOR, BOX_BORDER_THICKNESS};
use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

/// Draws a fixed-width rectangular border around each region.
///
/// Each region is clipped to the frame before drawing, so no pixel outside
/// `[0, width) × [0, height)` is ever touched. The border is drawn inside
/// the clipped rectangle; a region narrower than twice the thickness is
/// filled entirely.
pub struct BoxAnnotator {
    thickness: i32,
    color: [u8; 3],
}

impl BoxAnnotator {
    pub fn new(thickness: i32, color: [u8; 3]) -> Self {
        Self { thickness, color }
    }
}

impl Default for BoxAnnotator {
    fn default() -> Self {
        Self::new(BOX_BORDER_THICKNESS, BOX_BORDER_COLOR)
    }
}

impl FrameAnnotator for BoxAnnotator {
    fn annotate(&self, frame: &mut Frame, regions: &[FaceRegion]) {
        let fw = frame.width();
        let fh = frame.height();
        let channels = frame.channels();
        let data = frame.data_mut();

        for region in regions {
            let Some(r) = region.clip(fw, fh) else {
                continue;
            };

            let x1 = r.x;
            let y1 = r.y;
            let x2 = r.x + r.width;
            let y2 = r.y + r.height;
            let t = self.thickness;

            // Four border bands, each confined to the clipped rectangle.
            fill_band(data, fw, channels, &self.color, x1, x2, y1, (y1 + t).min(y2));
            fill_band(data, fw, channels, &self.color, x1, x2, (y2 - t).max(y1), y2);
            fill_band(data, fw, channels, &self.color, x1, (x1 + t).min(x2), y1, y2);
            fill_band(data, fw, channels, &self.color, (x2 - t).max(x1), x2, y1, y2);
        }
    }
}

fn fill_band(
    data: &mut [u8],
    frame_width: u32,
    channels: usize,
    color: &[u8; 3],
    x1: i32,
    x2: i32,
    y1: i32,
    y2: i32,
) {
    for y in y1..y2 {
        for x in x1..x2 {
            let idx = (y as usize * frame_width as usize + x as usize) * channels;
            for c in 0..channels {
                data[idx + c] = color[c.min(2)];
            }
        }
    }
}
