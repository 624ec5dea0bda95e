//! Error types shared across Percept crates.

use std::path::PathBuf;

/// Top-level error type for Percept operations.
///
/// An empty landmark frame ("no subject this frame") is not represented here:
/// it is a normal no-op frame and surfaces as `None` or an empty list.
#[derive(Debug, thiserror::Error)]
pub enum PerceptError {
    /// A requested keypoint identifier is absent from a non-empty frame.
    #[error("Landmark {id} missing from frame")]
    MissingLandmark { id: u32 },

    /// The preferred detector or its class table could not be loaded.
    #[error("Detector unavailable: {reason}")]
    DetectorUnavailable { reason: String },

    #[error(
        "Degenerate calibration range '{name}': source [{src_min}, {src_max}] -> target [{dst_start}, {dst_end}]"
    )]
    DegenerateCalibrationRange {
        name: String,
        src_min: f64,
        src_max: f64,
        dst_start: f64,
        dst_end: f64,
    },

    #[error("Detection error: {message}")]
    Detection { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using PerceptError.
pub type PerceptResult<T> = Result<T, PerceptError>;

impl PerceptError {
    pub fn missing_landmark(id: u32) -> Self {
        Self::MissingLandmark { id }
    }

    pub fn detector_unavailable(reason: impl Into<String>) -> Self {
        Self::DetectorUnavailable {
            reason: reason.into(),
        }
    }

    pub fn detection(msg: impl Into<String>) -> Self {
        Self::Detection {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn degenerate_range(
        name: impl Into<String>,
        src: (f64, f64),
        dst: (f64, f64),
    ) -> Self {
        Self::DegenerateCalibrationRange {
            name: name.into(),
            src_min: src.0,
            src_max: src.1,
            dst_start: dst.0,
            dst_end: dst.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_landmark_message_names_id() {
        let err = PerceptError::missing_landmark(8);
        assert_eq!(err.to_string(), "Landmark 8 missing from frame");
    }

    #[test]
    fn test_degenerate_range_message() {
        let err = PerceptError::degenerate_range("volume", (125.0, 25.0), (0.0, 100.0));
        let msg = err.to_string();
        assert!(msg.contains("volume"));
        assert!(msg.contains("[125, 25]"));
    }
}
