pub const DEFAULT_DEVICE_INDEX: u32 = 0;

/// Border thickness of the detection rectangles, in pixels.
pub const BOX_BORDER_THICKNESS: i32 = 3;

/// Border colour of the detection rectangles (RGB).
pub const BOX_BORDER_COLOR: [u8; 3] = [0, 255, 0];

// SeetaFace cascade tuning. Fixed by design: the only configurable
// detection input is the model artifact itself.
pub const CASCADE_MIN_FACE_SIZE: u32 = 20;
pub const CASCADE_SCORE_THRESHOLD: f64 = 2.0;
pub const CASCADE_PYRAMID_SCALE_FACTOR: f32 = 0.8;
pub const CASCADE_SLIDE_WINDOW_STEP: (u32, u32) = (4, 4);
