//! Detector candidates and reported regions.

use serde::{Deserialize, Serialize};

use crate::geometry::BoundingBox;
use crate::jsonl;
use crate::landmark::TimestampNs;

/// Label attached to regions found by background subtraction.
pub const MOTION_LABEL: &str = "Motion";

/// Label attached to regions reported by a face detector.
pub const FACE_LABEL: &str = "Face";

/// One raw box from the external object detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionCandidate {
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
    /// Index into the class-name table.
    pub class_id: usize,
    /// Detector score in `[0, 1]`.
    pub confidence: f32,
}

impl DetectionCandidate {
    pub fn new(bbox: BoundingBox, class_id: usize, confidence: f32) -> Self {
        Self {
            bbox,
            class_id,
            confidence,
        }
    }
}

/// One reported area for the overlay renderer.
///
/// Regions carry no identity: each frame's list stands alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl Region {
    pub fn labeled(bbox: BoundingBox, label: impl Into<String>, confidence: f32) -> Self {
        Self {
            bbox,
            label: label.into(),
            confidence: Some(confidence),
        }
    }

    pub fn motion(bbox: BoundingBox) -> Self {
        Self {
            bbox,
            label: MOTION_LABEL.to_string(),
            confidence: None,
        }
    }

    pub fn face(bbox: BoundingBox) -> Self {
        Self {
            bbox,
            label: FACE_LABEL.to_string(),
            confidence: None,
        }
    }

    /// Caption drawn next to the box, e.g. `person 0.87`.
    pub fn caption(&self) -> String {
        match self.confidence {
            Some(confidence) => format!("{} {:.2}", self.label, confidence),
            None => self.label.clone(),
        }
    }
}

/// All detector candidates produced for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateFrame {
    #[serde(rename = "t", default)]
    pub timestamp_ns: TimestampNs,
    #[serde(default)]
    pub candidates: Vec<DetectionCandidate>,
}

/// Parse candidate frames from JSONL content.
pub fn parse_candidate_frames(jsonl: &str) -> Result<Vec<CandidateFrame>, serde_json::Error> {
    jsonl::parse_lines(jsonl)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_formats_confidence() {
        let region = Region::labeled(BoundingBox::new(0.0, 0.0, 1.0, 1.0), "person", 0.876);
        assert_eq!(region.caption(), "person 0.88");
        assert_eq!(Region::motion(region.bbox).caption(), "Motion");
    }

    #[test]
    fn test_motion_region_omits_confidence_in_json() {
        let region = Region::motion(BoundingBox::new(1.0, 2.0, 3.0, 4.0));
        let json = serde_json::to_string(&region).unwrap();
        assert!(json.contains("\"box\""));
        assert!(!json.contains("confidence"));
    }

    #[test]
    fn test_parse_candidate_frames() {
        let jsonl = "{\"t\":0,\"candidates\":[{\"box\":{\"x\":0,\"y\":0,\"width\":10,\"height\":10},\"class_id\":2,\"confidence\":0.9}]}\n\
                     {\"t\":1}\n";
        let frames = parse_candidate_frames(jsonl).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].candidates[0].class_id, 2);
        assert!(frames[1].candidates.is_empty());
    }
}
