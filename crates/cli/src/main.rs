use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;

use facewatch_core::annotation::infrastructure::box_annotator::BoxAnnotator;
use facewatch_core::capture::infrastructure::nokhwa_frame_source::NokhwaFrameSource;
use facewatch_core::detection::domain::face_detector::FaceDetector;
use facewatch_core::detection::infrastructure::seeta_cascade_detector::SeetaCascadeDetector;
use facewatch_core::detection::infrastructure::skip_frame_detector::SkipFrameDetector;
use facewatch_core::pipeline::capture_loop::{CaptureLoop, CaptureOptions, StopReason};
use facewatch_core::pipeline::frame_sink::FrameSink;
use facewatch_core::pipeline::session::{CaptureSession, SessionEvent};
use facewatch_core::shared::constants::DEFAULT_DEVICE_INDEX;
use facewatch_core::shared::frame::Frame;

mod display;

use display::DisplayWindow;

/// Live camera face detection viewer.
#[derive(Parser)]
#[command(name = "facewatch")]
struct Cli {
    /// Path to the SeetaFace cascade model (.bin).
    #[arg(long)]
    model: PathBuf,

    /// Camera device index.
    #[arg(long, default_value_t = DEFAULT_DEVICE_INDEX)]
    device: u32,

    /// Run detection every Nth frame (1 = every frame).
    #[arg(long, default_value = "1")]
    skip_frames: usize,

    /// Stop after this many consecutive failed reads (default: retry forever).
    #[arg(long)]
    max_read_failures: Option<u32>,

    /// Grant camera permission without prompting.
    #[arg(long)]
    allow: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let detector = build_detector(&cli)?;
    let capture = CaptureLoop::new(
        Box::new(NokhwaFrameSource::new()),
        detector,
        Box::new(BoxAnnotator::default()),
        FrameSink::new(),
        CaptureOptions {
            max_consecutive_read_failures: cli.max_read_failures,
        },
    );
    let mut session = CaptureSession::new(capture, cli.device);

    session.request_permission()?;
    if !permission_granted(cli.allow)? {
        session.handle(SessionEvent::Deny)?;
        log::info!("Camera permission denied, exiting");
        return Ok(());
    }
    session.handle(SessionEvent::Allow)?;

    let sink = session.sink();
    let stopped = session.events();

    // The first frame fixes the window size.
    let first = match wait_for_first_frame(&sink, &stopped) {
        Some(frame) => frame,
        None => {
            session.handle(SessionEvent::Exit)?;
            return Err("camera stopped before producing a frame".into());
        }
    };
    let mut window = DisplayWindow::open(
        "facewatch",
        first.width() as usize,
        first.height() as usize,
    )?;
    window.render(&first)?;

    while !window.exit_requested() {
        if let Ok(reason) = stopped.try_recv() {
            log::info!("Capture ended on its own: {reason:?}");
            break;
        }
        match sink.try_take() {
            Some(frame) => window.render(&frame)?,
            None => window.idle(),
        }
    }

    session.handle(SessionEvent::Exit)?;
    Ok(())
}

/// Blocks until the capture loop publishes its first frame, or `None` if it
/// stopped before doing so.
fn wait_for_first_frame(
    sink: &FrameSink,
    stopped: &crossbeam_channel::Receiver<StopReason>,
) -> Option<Frame> {
    loop {
        if let Some(frame) = sink.try_take() {
            return Some(frame);
        }
        if stopped.try_recv().is_ok() {
            return None;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn permission_granted(allow_flag: bool) -> Result<bool, Box<dyn std::error::Error>> {
    if allow_flag {
        return Ok(true);
    }
    eprint!("Allow camera access? [y/N] ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let answer = line.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn build_detector(cli: &Cli) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    let base: Box<dyn FaceDetector> = Box::new(SeetaCascadeDetector::load(&cli.model)?);
    if cli.skip_frames > 1 {
        Ok(Box::new(SkipFrameDetector::new(base, cli.skip_frames)?))
    } else {
        Ok(base)
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.model.exists() {
        return Err(format!("Model file not found: {}", cli.model.display()).into());
    }
    if cli.skip_frames == 0 {
        return Err("Skip frames must be at least 1".into());
    }
    if cli.max_read_failures == Some(0) {
        return Err("Max read failures must be at least 1".into());
    }
    Ok(())
}
