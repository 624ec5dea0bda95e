//! Hand landmark frames.
//!
//! The external hand model reports 21 keypoints per hand, identified by a
//! stable index. A frame with no detected hand has no keypoints at all.

use serde::{Deserialize, Serialize};

use crate::geometry::Point2D;
use crate::jsonl;

/// Monotonic timestamp in nanoseconds since the loop started.
pub type TimestampNs = u64;

/// Keypoint identifier as assigned by the landmark model.
pub type LandmarkId = u32;

pub const WRIST: LandmarkId = 0;
pub const THUMB_CMC: LandmarkId = 1;
pub const THUMB_MCP: LandmarkId = 2;
pub const THUMB_IP: LandmarkId = 3;
pub const THUMB_TIP: LandmarkId = 4;
pub const INDEX_MCP: LandmarkId = 5;
pub const INDEX_PIP: LandmarkId = 6;
pub const INDEX_DIP: LandmarkId = 7;
pub const INDEX_TIP: LandmarkId = 8;
pub const MIDDLE_MCP: LandmarkId = 9;
pub const MIDDLE_PIP: LandmarkId = 10;
pub const MIDDLE_DIP: LandmarkId = 11;
pub const MIDDLE_TIP: LandmarkId = 12;
pub const RING_MCP: LandmarkId = 13;
pub const RING_PIP: LandmarkId = 14;
pub const RING_DIP: LandmarkId = 15;
pub const RING_TIP: LandmarkId = 16;
pub const PINKY_MCP: LandmarkId = 17;
pub const PINKY_PIP: LandmarkId = 18;
pub const PINKY_DIP: LandmarkId = 19;
pub const PINKY_TIP: LandmarkId = 20;

/// Number of keypoints in a full hand.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// One labeled keypoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub id: LandmarkId,
    pub x: f64,
    pub y: f64,
}

impl Keypoint {
    pub fn new(id: LandmarkId, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

/// All keypoints of one tracked hand in one video frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Capture time of the frame.
    #[serde(rename = "t", default)]
    pub timestamp_ns: TimestampNs,

    /// Keypoints ordered by identifier. Empty when no hand was detected.
    #[serde(default)]
    pub points: Vec<Keypoint>,
}

impl LandmarkFrame {
    /// Build a frame, ordering keypoints by identifier.
    pub fn new(timestamp_ns: TimestampNs, mut points: Vec<Keypoint>) -> Self {
        points.sort_by_key(|p| p.id);
        Self {
            timestamp_ns,
            points,
        }
    }

    /// A frame in which no subject was detected.
    pub fn empty(timestamp_ns: TimestampNs) -> Self {
        Self {
            timestamp_ns,
            points: Vec::new(),
        }
    }

    /// Build a frame from index-addressed positions (`positions[i]` is id `i`).
    pub fn from_positions(timestamp_ns: TimestampNs, positions: &[(f64, f64)]) -> Self {
        let points = positions
            .iter()
            .enumerate()
            .map(|(id, &(x, y))| Keypoint::new(id as LandmarkId, x, y))
            .collect();
        Self {
            timestamp_ns,
            points,
        }
    }

    /// True when no subject was detected this frame.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Look up a keypoint by identifier.
    pub fn get(&self, id: LandmarkId) -> Option<&Keypoint> {
        self.points.iter().find(|p| p.id == id)
    }

    /// Position of a keypoint by identifier.
    pub fn position(&self, id: LandmarkId) -> Option<Point2D> {
        self.get(id).map(Keypoint::position)
    }
}

/// Parse landmark frames from JSONL content.
///
/// Keypoints are reordered by identifier, as [`LandmarkFrame::new`] does.
pub fn parse_landmark_frames(jsonl: &str) -> Result<Vec<LandmarkFrame>, serde_json::Error> {
    let mut frames: Vec<LandmarkFrame> = jsonl::parse_lines(jsonl)?;
    for frame in &mut frames {
        frame.points.sort_by_key(|p| p.id);
    }
    Ok(frames)
}

/// Serialize landmark frames to JSONL.
pub fn serialize_landmark_frames(frames: &[LandmarkFrame]) -> Result<String, serde_json::Error> {
    jsonl::to_lines(frames)
}
