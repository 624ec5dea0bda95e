//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PerceptError, PerceptResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Landmark-driven control parameters.
    pub landmark: LandmarkConfig,

    /// Detection thresholds and fallback parameters.
    pub detection: DetectionConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Parameters for the hand-landmark control loops.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkConfig {
    /// Pointer damping divisor. 1.0 disables smoothing.
    pub smoothing_factor: f64,

    /// Index-to-middle distance (px) below which a click fires.
    pub click_threshold_px: f64,

    /// Report only the first frame of each pinch instead of every frame.
    pub click_edge_only: bool,

    /// Margin (px) trimmed from each camera edge before mapping to the screen.
    pub frame_reduction_px: f64,

    /// Camera frame width in pixels.
    pub camera_width: u32,

    /// Camera frame height in pixels.
    pub camera_height: u32,

    /// Thumb/index distance mapping for the volume control.
    pub volume: LevelPreset,

    /// Thumb/index distance mapping for the brightness control.
    pub brightness: LevelPreset,
}

/// A source distance range and the three outputs derived from it.
///
/// Each pair is `[value at source min, value at source max]`, so `bar`
/// is typically inverted (a wider pinch moves the bar top upwards).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelPreset {
    /// Pinch distance range in pixels.
    pub source: [f64; 2],
    /// Actuator-native level range.
    pub level: [f64; 2],
    /// On-screen bar y coordinate range.
    pub bar: [f64; 2],
}

/// Parameters for the detection engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Class-name table for the primary detector, one label per line.
    pub labels_path: Option<PathBuf>,

    /// Candidates at or below this confidence are dropped.
    pub score_threshold: f32,

    /// Overlap (IoU) above which the lower-ranked candidate is suppressed.
    pub nms_threshold: f32,

    /// Only suppress overlapping candidates of the same class.
    pub class_aware: bool,

    /// Intensity difference above which a pixel counts as motion.
    pub motion_threshold: u8,

    /// 3x3 dilation passes applied to the motion mask.
    pub dilate_iterations: u8,

    /// Contours enclosing less than this area (px²) are noise.
    pub min_contour_area: f64,

    /// Optional Gaussian pre-blur applied to each intensity frame.
    pub blur_sigma: Option<f32>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "percept=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl LevelPreset {
    /// Volume mapping: wide pinch range onto a device decibel range.
    pub const VOLUME: LevelPreset = LevelPreset {
        source: [25.0, 125.0],
        level: [-65.25, 0.0],
        bar: [400.0, 150.0],
    };

    /// Brightness mapping onto a 0-100 percentage.
    pub const BRIGHTNESS: LevelPreset = LevelPreset {
        source: [15.0, 150.0],
        level: [0.0, 100.0],
        bar: [400.0, 150.0],
    };

    /// Reject presets whose ranges cannot be interpolated.
    pub fn validate(&self, name: &str) -> PerceptResult<()> {
        let [src_min, src_max] = self.source;
        if src_min.is_nan() || src_max.is_nan() || src_min >= src_max {
            return Err(PerceptError::degenerate_range(
                name,
                (src_min, src_max),
                (self.level[0], self.level[1]),
            ));
        }
        for (suffix, dst) in [("level", self.level), ("bar", self.bar)] {
            if dst[0] == dst[1] || !dst[0].is_finite() || !dst[1].is_finite() {
                return Err(PerceptError::degenerate_range(
                    format!("{name}.{suffix}"),
                    (src_min, src_max),
                    (dst[0], dst[1]),
                ));
            }
        }
        Ok(())
    }
}

impl Default for LandmarkConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: 2.0,
            click_threshold_px: 30.0,
            click_edge_only: false,
            frame_reduction_px: 100.0,
            camera_width: 640,
            camera_height: 480,
            volume: LevelPreset::VOLUME,
            brightness: LevelPreset::BRIGHTNESS,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            labels_path: None,
            score_threshold: 0.5,
            nms_threshold: 0.4,
            class_aware: false,
            motion_threshold: 25,
            dilate_iterations: 2,
            min_contour_area: 500.0,
            blur_sigma: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> PerceptResult<Self> {
        if !path.exists() {
            return Err(PerceptError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }

    /// Check every range and threshold before any frame is processed.
    pub fn validate(&self) -> PerceptResult<()> {
        let landmark = &self.landmark;
        landmark.volume.validate("volume")?;
        landmark.brightness.validate("brightness")?;

        if landmark.click_threshold_px <= 0.0 {
            return Err(PerceptError::config("click_threshold_px must be positive"));
        }
        let reduced_w = landmark.camera_width as f64 - 2.0 * landmark.frame_reduction_px;
        let reduced_h = landmark.camera_height as f64 - 2.0 * landmark.frame_reduction_px;
        if landmark.frame_reduction_px < 0.0 || reduced_w <= 0.0 || reduced_h <= 0.0 {
            return Err(PerceptError::config(format!(
                "frame_reduction_px {} leaves no usable area in a {}x{} camera",
                landmark.frame_reduction_px, landmark.camera_width, landmark.camera_height
            )));
        }

        let detection = &self.detection;
        if !(0.0..=1.0).contains(&detection.score_threshold) {
            return Err(PerceptError::config("score_threshold must be within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&detection.nms_threshold) {
            return Err(PerceptError::config("nms_threshold must be within [0, 1]"));
        }
        if detection.min_contour_area < 0.0 {
            return Err(PerceptError::config("min_contour_area must not be negative"));
        }
        if let Some(sigma) = detection.blur_sigma {
            if !(sigma > 0.0 && sigma.is_finite()) {
                return Err(PerceptError::config("blur_sigma must be positive and finite"));
            }
        }
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("percept").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_source_range_rejected() {
        let mut config = AppConfig::default();
        config.landmark.volume.source = [125.0, 25.0];
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            PerceptError::DegenerateCalibrationRange { ref name, .. } if name == "volume"
        ));
    }

    #[test]
    fn test_collapsed_bar_range_rejected() {
        let mut config = AppConfig::default();
        config.landmark.brightness.bar = [150.0, 150.0];
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            PerceptError::DegenerateCalibrationRange { ref name, .. } if name == "brightness.bar"
        ));
    }

    #[test]
    fn test_inverted_target_range_accepted() {
        let preset = LevelPreset {
            source: [0.0, 10.0],
            level: [100.0, 0.0],
            bar: [0.0, 1.0],
        };
        assert!(preset.validate("inverted").is_ok());
    }

    #[test]
    fn test_oversized_frame_reduction_rejected() {
        let mut config = AppConfig::default();
        config.landmark.frame_reduction_px = 240.0;
        assert!(matches!(
            config.validate(),
            Err(PerceptError::Config { .. })
        ));
    }

    #[test]
    fn test_non_positive_or_nan_blur_rejected() {
        for sigma in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let mut config = AppConfig::default();
            config.detection.blur_sigma = Some(sigma);
            assert!(
                matches!(config.validate(), Err(PerceptError::Config { .. })),
                "sigma {sigma} accepted"
            );
        }
        let mut config = AppConfig::default();
        config.detection.blur_sigma = Some(1.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_section_defaults() {
        let raw = r#"{ "detection": { "nms_threshold": 0.3 } }"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert!((config.detection.nms_threshold - 0.3).abs() < 1e-6);
        assert!((config.detection.score_threshold - 0.5).abs() < 1e-6);
        assert_eq!(config.landmark.camera_width, 640);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = AppConfig::load_from(Path::new("/nonexistent/percept.json")).unwrap_err();
        assert!(matches!(err, PerceptError::FileNotFound { .. }));
    }
}
