pub mod seeta_cascade_detector;
pub mod skip_frame_detector;
