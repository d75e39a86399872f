pub mod nokhwa_frame_source;
