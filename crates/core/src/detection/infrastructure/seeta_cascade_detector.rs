use std::io::Cursor;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::constants::{
    CASCADE_MIN_FACE_SIZE, CASCADE_PYRAMID_SCALE_FACTOR, CASCADE_SCORE_THRESHOLD,
    CASCADE_SLIDE_WINDOW_STEP,
};
use crate::shared::frame::{Frame, PixelFormat};
use crate::shared::region::FaceRegion;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read model {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed model {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

/// Face detector backed by the `rustface` crate (SeetaFace frontal cascade).
///
/// The model artifact is loaded once at startup and is immutable thereafter.
/// Detection parameters are fixed; the model path is the only configurable
/// input.
pub struct SeetaCascadeDetector {
    model: rustface::Model,
}

// `rustface::Model` does not implement `Debug`; the model bytes carry no
// useful textual representation anyway.
impl std::fmt::Debug for SeetaCascadeDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeetaCascadeDetector").finish_non_exhaustive()
    }
}

impl SeetaCascadeDetector {
    /// Loads the cascade model from `path`. A missing or malformed artifact
    /// is a fatal startup condition, not retried.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model = rustface::read_model(Cursor::new(bytes)).map_err(|e| LoadError::Malformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        log::info!("loaded cascade model from {}", path.display());
        Ok(Self { model })
    }
}

impl FaceDetector for SeetaCascadeDetector {
    fn detect(&mut self, frame: &Frame) -> Vec<FaceRegion> {
        // The loop always hands us grayscale; converting here keeps the
        // contract best-effort rather than a panic if a caller does not.
        let converted;
        let gray = if frame.format() == PixelFormat::Gray {
            frame
        } else {
            converted = frame.to_grayscale();
            &converted
        };

        // rustface detectors are cheap to build but not Send; the model is,
        // so a detector is constructed per call from the shared model.
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(CASCADE_MIN_FACE_SIZE);
        detector.set_score_thresh(CASCADE_SCORE_THRESHOLD);
        detector.set_pyramid_scale_factor(CASCADE_PYRAMID_SCALE_FACTOR);
        detector.set_slide_window_step(CASCADE_SLIDE_WINDOW_STEP.0, CASCADE_SLIDE_WINDOW_STEP.1);

        let image = rustface::ImageData::new(gray.data(), gray.width(), gray.height());
        detector
            .detect(&image)
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceRegion::new(
                    bbox.x(),
                    bbox.y(),
                    bbox.width() as i32,
                    bbox.height() as i32,
                )
            })
            .collect()
    }
}
