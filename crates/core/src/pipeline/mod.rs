pub mod capture_loop;
pub mod frame_sink;
pub mod session;
