//! Landmark signal extraction: finger states, pinch distances, and the
//! Idle/Move/Select gesture vocabulary.
//!
//! Everything here is a pure function of one [`LandmarkFrame`]. Callers
//! check [`LandmarkFrame::is_empty`] first; an empty frame means "no hand,
//! no action" and is not an error.

use serde::{Deserialize, Serialize};

use percept_common::{PerceptError, PerceptResult};
use percept_frame_model::{LandmarkFrame, LandmarkId, Point2D, INDEX_TIP, MIDDLE_TIP};

/// Offset from a fingertip to the joint it is compared against.
const REFERENCE_JOINT_OFFSET: LandmarkId = 2;

/// Whether one digit is raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerState {
    pub tip_id: LandmarkId,
    pub up: bool,
}

/// Operating mode selected from the index and middle fingers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureMode {
    /// No recognised gesture.
    Idle,
    /// Index up, middle down: the pointer follows the index tip.
    Move,
    /// Index and middle up: a pinch between them clicks.
    Select,
}

/// Finger states for the requested tips, in request order.
///
/// A tip is up iff its `y` is strictly above (smaller than) the joint two
/// identifiers below it. Returns an empty list if the frame is empty or any
/// tip or reference joint is missing.
pub fn finger_states(frame: &LandmarkFrame, tip_ids: &[LandmarkId]) -> Vec<FingerState> {
    if frame.is_empty() {
        return Vec::new();
    }
    let states: Option<Vec<FingerState>> = tip_ids
        .iter()
        .map(|&tip_id| {
            let tip = frame.get(tip_id)?;
            let joint = frame.get(tip_id.checked_sub(REFERENCE_JOINT_OFFSET)?)?;
            Some(FingerState {
                tip_id,
                up: tip.y < joint.y,
            })
        })
        .collect();
    states.unwrap_or_default()
}

/// Euclidean distance between two keypoints.
pub fn distance_between(
    frame: &LandmarkFrame,
    id_a: LandmarkId,
    id_b: LandmarkId,
) -> PerceptResult<f64> {
    let (a, b) = endpoints(frame, id_a, id_b)?;
    Ok(a.distance_to(&b))
}

/// Center of the segment between two keypoints.
pub fn midpoint(frame: &LandmarkFrame, id_a: LandmarkId, id_b: LandmarkId) -> PerceptResult<Point2D> {
    let (a, b) = endpoints(frame, id_a, id_b)?;
    Ok(Point2D::midpoint(&a, &b))
}

fn endpoints(
    frame: &LandmarkFrame,
    id_a: LandmarkId,
    id_b: LandmarkId,
) -> PerceptResult<(Point2D, Point2D)> {
    let a = frame
        .position(id_a)
        .ok_or_else(|| PerceptError::missing_landmark(id_a))?;
    let b = frame
        .position(id_b)
        .ok_or_else(|| PerceptError::missing_landmark(id_b))?;
    Ok((a, b))
}

/// Select the gesture mode. Digits absent from `states` count as down.
///
/// | index | middle | mode   |
/// |-------|--------|--------|
/// | up    | down   | Move   |
/// | up    | up     | Select |
/// | down  | any    | Idle   |
pub fn classify_mode(states: &[FingerState]) -> GestureMode {
    let is_up = |tip_id| states.iter().any(|s| s.tip_id == tip_id && s.up);
    match (is_up(INDEX_TIP), is_up(MIDDLE_TIP)) {
        (true, false) => GestureMode::Move,
        (true, true) => GestureMode::Select,
        _ => GestureMode::Idle,
    }
}

/// True iff `distance` is strictly below `threshold`.
///
/// Evaluated independently every frame; wrap in [`ClickEdge`] for one
/// event per pinch.
pub fn select_triggered(distance: f64, threshold: f64) -> bool {
    distance < threshold
}

/// Rising-edge detector over a per-frame trigger.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClickEdge {
    was_active: bool,
}

impl ClickEdge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this frame's trigger; true only on the first active frame.
    pub fn update(&mut self, active: bool) -> bool {
        let rising = active && !self.was_active;
        self.was_active = active;
        rising
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use percept_frame_model::{Keypoint, INDEX_PIP, MIDDLE_PIP, THUMB_TIP};

    fn hand(index_up: bool, middle_up: bool) -> LandmarkFrame {
        let tip_y = |up: bool| if up { 100.0 } else { 300.0 };
        LandmarkFrame::new(
            0,
            vec![
                Keypoint::new(INDEX_PIP, 200.0, 200.0),
                Keypoint::new(INDEX_TIP, 200.0, tip_y(index_up)),
                Keypoint::new(MIDDLE_PIP, 240.0, 200.0),
                Keypoint::new(MIDDLE_TIP, 240.0, tip_y(middle_up)),
            ],
        )
    }

    fn state(tip_id: LandmarkId, up: bool) -> FingerState {
        FingerState { tip_id, up }
    }

    #[test]
    fn test_finger_states_compare_against_joint_two_below() {
        let states = finger_states(&hand(true, false), &[INDEX_TIP, MIDDLE_TIP]);
        assert_eq!(states, vec![state(INDEX_TIP, true), state(MIDDLE_TIP, false)]);
    }

    #[test]
    fn test_equal_height_is_down() {
        let frame = LandmarkFrame::new(
            0,
            vec![
                Keypoint::new(INDEX_PIP, 0.0, 150.0),
                Keypoint::new(INDEX_TIP, 0.0, 150.0),
            ],
        );
        assert_eq!(finger_states(&frame, &[INDEX_TIP]), vec![state(INDEX_TIP, false)]);
    }

    #[test]
    fn test_finger_states_empty_on_missing_or_empty() {
        assert!(finger_states(&LandmarkFrame::empty(0), &[INDEX_TIP]).is_empty());
        assert!(finger_states(&hand(true, true), &[INDEX_TIP, THUMB_TIP]).is_empty());
        assert!(finger_states(&hand(true, true), &[1]).is_empty());
    }

    #[test]
    fn test_classify_mode_table() {
        let cases = [
            ((true, false), GestureMode::Move),
            ((true, true), GestureMode::Select),
            ((false, false), GestureMode::Idle),
            ((false, true), GestureMode::Idle),
        ];
        for ((index_up, middle_up), expected) in cases {
            let states = [state(INDEX_TIP, index_up), state(MIDDLE_TIP, middle_up)];
            assert_eq!(classify_mode(&states), expected, "index={index_up} middle={middle_up}");
        }
    }

    #[test]
    fn test_classify_mode_empty_is_idle() {
        assert_eq!(classify_mode(&[]), GestureMode::Idle);
    }

    #[test]
    fn test_distance_and_midpoint() {
        let frame = LandmarkFrame::new(
            0,
            vec![
                Keypoint::new(THUMB_TIP, 100.0, 100.0),
                Keypoint::new(INDEX_TIP, 130.0, 100.0),
            ],
        );
        assert!((distance_between(&frame, THUMB_TIP, INDEX_TIP).unwrap() - 30.0).abs() < 1e-9);
        assert_eq!(
            midpoint(&frame, THUMB_TIP, INDEX_TIP).unwrap(),
            Point2D::new(115.0, 100.0)
        );
    }

    #[test]
    fn test_distance_missing_landmark() {
        let err = distance_between(&hand(true, true), THUMB_TIP, INDEX_TIP).unwrap_err();
        assert!(matches!(err, PerceptError::MissingLandmark { id: THUMB_TIP }));
    }

    #[test]
    fn test_select_triggered_is_strict() {
        assert!(select_triggered(29.9, 30.0));
        assert!(!select_triggered(30.0, 30.0));
    }

    #[test]
    fn test_click_edge_fires_once_per_pinch() {
        let mut edge = ClickEdge::new();
        let fired: Vec<bool> = [false, true, true, true, false, true]
            .into_iter()
            .map(|active| edge.update(active))
            .collect();
        assert_eq!(fired, vec![false, true, false, false, false, true]);
    }
}
