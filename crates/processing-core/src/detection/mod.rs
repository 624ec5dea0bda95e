//! Frame Detection Engine
//!
//! Turns one frame of raw detector output into a stable list of labeled
//! [`Region`]s. Two strategies exist and exactly one is chosen when the
//! engine is built:
//!
//! - **Primary:** the external object detector produced candidate boxes.
//!   Candidates are confidence-filtered, overlap-suppressed, and labeled from
//!   the class table.
//! - **Fallback:** no detector could be loaded. Raw grayscale frames are
//!   compared against a captured background and changed blobs are reported
//!   as `"Motion"`.
//!
//! The mode is never re-probed after construction.

pub mod labels;
pub mod motion;
pub mod nms;

use image::GrayImage;
use serde::Serialize;

use percept_common::{DetectionConfig, PerceptError, PerceptResult};
use percept_frame_model::{BoundingBox, DetectionCandidate, Region};

pub use labels::ClassLabels;
pub use motion::{MotionConfig, MotionDetector, ReferenceFrame};
pub use nms::{non_max_suppression, NmsConfig};

/// Which strategy the engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMode {
    Primary,
    Fallback,
}

/// Where a report's regions came from. Decides the summary wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionSource {
    Objects,
    Motion,
    Faces,
}

/// One frame of raw input, matching the engine's mode.
#[derive(Debug, Clone, Copy)]
pub enum FrameInput<'a> {
    /// Candidate boxes from the object detector.
    Candidates(&'a [DetectionCandidate]),
    /// Single-channel intensity frame for background subtraction.
    Intensity(&'a GrayImage),
}

/// The regions reported for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionReport {
    pub source: RegionSource,
    pub regions: Vec<Region>,
}

impl DetectionReport {
    pub fn new(source: RegionSource, regions: Vec<Region>) -> Self {
        Self { source, regions }
    }

    pub fn count(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Overlay status line.
    pub fn summary(&self) -> String {
        let n = self.count();
        match (self.source, n) {
            (RegionSource::Objects, 0) => "No Objects Detected".to_string(),
            (RegionSource::Objects, n) => format!("Objects Detected: {n}"),
            (RegionSource::Motion, 0) => "No Motion Detected".to_string(),
            (RegionSource::Motion, n) => format!("Moving Objects: {n}"),
            (RegionSource::Faces, 0) => "No Faces Detected".to_string(),
            (RegionSource::Faces, n) => format!("Faces Detected: {n}"),
        }
    }
}

#[derive(Debug, Clone)]
enum Strategy {
    Primary { labels: ClassLabels, nms: NmsConfig },
    Fallback { motion: MotionDetector },
}

/// Per-stream detection engine.
///
/// Owns all cross-frame state (the motion reference frame). Not shared
/// between streams; each stream builds its own.
#[derive(Debug, Clone)]
pub struct FrameDetectionEngine {
    strategy: Strategy,
}

impl FrameDetectionEngine {
    /// Engine running the primary path with a loaded class table.
    pub fn primary(labels: ClassLabels, nms: NmsConfig) -> Self {
        Self {
            strategy: Strategy::Primary { labels, nms },
        }
    }

    /// Engine running the motion path.
    pub fn fallback(motion: MotionConfig) -> Self {
        Self {
            strategy: Strategy::Fallback {
                motion: MotionDetector::new(motion),
            },
        }
    }

    /// Choose the mode from the outcome of loading the detector's class table.
    pub fn select(probe: PerceptResult<ClassLabels>, config: &DetectionConfig) -> Self {
        match probe {
            Ok(labels) => {
                tracing::info!(classes = labels.len(), "object detector available, using primary mode");
                Self::primary(labels, NmsConfig::from(config))
            }
            Err(e) => {
                tracing::warn!(error = %e, "object detector unavailable, falling back to motion detection");
                Self::fallback(MotionConfig::from(config))
            }
        }
    }

    /// Probe the configured label file and pick the mode.
    pub fn from_config(config: &DetectionConfig) -> Self {
        let probe = match &config.labels_path {
            Some(path) => ClassLabels::load(path),
            None => Err(PerceptError::detector_unavailable("no label file configured")),
        };
        Self::select(probe, config)
    }

    pub fn mode(&self) -> DetectionMode {
        match self.strategy {
            Strategy::Primary { .. } => DetectionMode::Primary,
            Strategy::Fallback { .. } => DetectionMode::Fallback,
        }
    }

    /// Process one frame.
    ///
    /// The input variant must match [`Self::mode`]; a mismatch is a
    /// `Detection` error.
    pub fn process(&mut self, input: FrameInput<'_>) -> PerceptResult<DetectionReport> {
        match input {
            FrameInput::Candidates(candidates) => self.process_candidates(candidates),
            FrameInput::Intensity(frame) => self.process_intensity(frame),
        }
    }

    /// Primary path: filter, suppress, label.
    ///
    /// Surviving regions keep the order of their candidates in the input.
    pub fn process_candidates(
        &mut self,
        candidates: &[DetectionCandidate],
    ) -> PerceptResult<DetectionReport> {
        let Strategy::Primary { labels, nms } = &self.strategy else {
            return Err(PerceptError::detection(
                "candidate boxes given to an engine in fallback mode",
            ));
        };

        let mut kept = non_max_suppression(candidates, nms);
        kept.sort_unstable();

        let regions: Vec<Region> = kept
            .into_iter()
            .map(|i| {
                let c = &candidates[i];
                Region::labeled(c.bbox, labels.label_for(c.class_id), c.confidence)
            })
            .collect();

        tracing::debug!(
            candidates = candidates.len(),
            kept = regions.len(),
            "object regions"
        );
        Ok(DetectionReport::new(RegionSource::Objects, regions))
    }

    /// Fallback path: background subtraction against the reference frame.
    pub fn process_intensity(&mut self, frame: &GrayImage) -> PerceptResult<DetectionReport> {
        let Strategy::Fallback { motion } = &mut self.strategy else {
            return Err(PerceptError::detection(
                "intensity frame given to an engine in primary mode",
            ));
        };
        let regions = motion.detect(frame)?;
        Ok(DetectionReport::new(RegionSource::Motion, regions))
    }

    /// The motion detector, in fallback mode.
    pub fn motion_mut(&mut self) -> Option<&mut MotionDetector> {
        match &mut self.strategy {
            Strategy::Fallback { motion } => Some(motion),
            Strategy::Primary { .. } => None,
        }
    }

    /// The background reference, in fallback mode.
    pub fn reference_mut(&mut self) -> Option<&mut ReferenceFrame> {
        self.motion_mut().map(MotionDetector::reference_mut)
    }
}

/// Wrap an external face detector's boxes as `"Face"` regions.
pub fn face_regions(boxes: &[BoundingBox]) -> DetectionReport {
    let regions = boxes.iter().copied().map(Region::face).collect();
    DetectionReport::new(RegionSource::Faces, regions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn labels() -> ClassLabels {
        ClassLabels::parse("person\nbicycle\ncar\n").unwrap()
    }

    fn candidate(x: f32, class_id: usize, confidence: f32) -> DetectionCandidate {
        DetectionCandidate::new(BoundingBox::new(x, 0.0, 60.0, 10.0), class_id, confidence)
    }

    #[test]
    fn test_select_uses_probe_outcome() {
        let config = DetectionConfig::default();
        let primary = FrameDetectionEngine::select(Ok(labels()), &config);
        assert_eq!(primary.mode(), DetectionMode::Primary);

        let fallback = FrameDetectionEngine::select(
            Err(PerceptError::detector_unavailable("weights missing")),
            &config,
        );
        assert_eq!(fallback.mode(), DetectionMode::Fallback);
    }

    #[test]
    fn test_from_config_without_labels_falls_back() {
        let engine = FrameDetectionEngine::from_config(&DetectionConfig::default());
        assert_eq!(engine.mode(), DetectionMode::Fallback);
    }

    #[test]
    fn test_primary_regions_keep_input_order() {
        let mut engine = FrameDetectionEngine::primary(labels(), NmsConfig::default());
        let candidates = [
            candidate(0.0, 2, 0.6),
            candidate(200.0, 0, 0.9),
            candidate(10.0, 1, 0.3),
        ];
        let report = engine.process(FrameInput::Candidates(&candidates)).unwrap();
        let labels: Vec<&str> = report.regions.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["car", "person"]);
        assert_eq!(report.regions[1].confidence, Some(0.9));
        assert_eq!(report.summary(), "Objects Detected: 2");
    }

    #[test]
    fn test_primary_overlap_is_suppressed() {
        let mut engine = FrameDetectionEngine::primary(labels(), NmsConfig::default());
        let candidates = [candidate(20.0, 0, 0.6), candidate(0.0, 0, 0.9)];
        let report = engine.process_candidates(&candidates).unwrap();
        assert_eq!(report.count(), 1);
        assert_eq!(report.regions[0].bbox.x, 0.0);
    }

    #[test]
    fn test_primary_unknown_class_placeholder() {
        let mut engine = FrameDetectionEngine::primary(labels(), NmsConfig::default());
        let report = engine.process_candidates(&[candidate(0.0, 42, 0.8)]).unwrap();
        assert_eq!(report.regions[0].label, "class 42");
    }

    #[test]
    fn test_primary_empty_frame_summary() {
        let mut engine = FrameDetectionEngine::primary(labels(), NmsConfig::default());
        let report = engine.process_candidates(&[]).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.summary(), "No Objects Detected");
    }

    #[test]
    fn test_fallback_motion_report() {
        let mut engine = FrameDetectionEngine::fallback(MotionConfig::default());
        let background = GrayImage::new(120, 120);
        let first = engine.process(FrameInput::Intensity(&background)).unwrap();
        assert_eq!(first.summary(), "No Motion Detected");

        let mut moved = background.clone();
        for y in 30..70 {
            for x in 30..70 {
                moved.put_pixel(x, y, Luma([255]));
            }
        }
        let report = engine.process(FrameInput::Intensity(&moved)).unwrap();
        assert_eq!(report.count(), 1);
        assert_eq!(report.summary(), "Moving Objects: 1");
    }

    #[test]
    fn test_mode_mismatch_is_error() {
        let mut primary = FrameDetectionEngine::primary(labels(), NmsConfig::default());
        let frame = GrayImage::new(8, 8);
        assert!(matches!(
            primary.process(FrameInput::Intensity(&frame)),
            Err(PerceptError::Detection { .. })
        ));
        assert!(primary.reference_mut().is_none());

        let mut fallback = FrameDetectionEngine::fallback(MotionConfig::default());
        assert!(matches!(
            fallback.process(FrameInput::Candidates(&[])),
            Err(PerceptError::Detection { .. })
        ));
    }

    #[test]
    fn test_reference_reset_through_engine() {
        let mut engine = FrameDetectionEngine::fallback(MotionConfig::default());
        engine.process_intensity(&GrayImage::new(16, 16)).unwrap();
        let reference = engine.reference_mut().unwrap();
        assert!(reference.is_set());
        reference.reset();
        assert!(!engine.reference_mut().unwrap().is_set());
    }

    #[test]
    fn test_face_regions() {
        let report = face_regions(&[BoundingBox::new(1.0, 2.0, 30.0, 30.0)]);
        assert_eq!(report.regions[0].label, "Face");
        assert_eq!(report.summary(), "Faces Detected: 1");
        assert_eq!(face_regions(&[]).summary(), "No Faces Detected");
    }
}
