//! Confidence filtering and greedy non-maximum suppression.

use percept_common::DetectionConfig;
use percept_frame_model::DetectionCandidate;

/// Thresholds for [`non_max_suppression`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NmsConfig {
    /// Candidates with confidence at or below this are dropped before suppression.
    pub score_threshold: f32,
    /// A candidate overlapping an already-kept one by more than this IoU is dropped.
    pub iou_threshold: f32,
    /// Restrict suppression to candidates of the same class.
    pub class_aware: bool,
}

impl Default for NmsConfig {
    fn default() -> Self {
        Self {
            score_threshold: 0.5,
            iou_threshold: 0.4,
            class_aware: false,
        }
    }
}

impl From<&DetectionConfig> for NmsConfig {
    fn from(config: &DetectionConfig) -> Self {
        Self {
            score_threshold: config.score_threshold,
            iou_threshold: config.nms_threshold,
            class_aware: config.class_aware,
        }
    }
}

/// Indices of the candidates that survive filtering and suppression,
/// highest confidence first.
///
/// Candidates are ranked by confidence with a stable sort, so among equal
/// confidences the earlier input wins. Each ranked candidate is kept iff its
/// IoU with every kept candidate is at most `iou_threshold`.
pub fn non_max_suppression(candidates: &[DetectionCandidate], config: &NmsConfig) -> Vec<usize> {
    let mut ranked: Vec<usize> = (0..candidates.len())
        .filter(|&i| candidates[i].confidence > config.score_threshold)
        .collect();
    ranked.sort_by(|&a, &b| {
        candidates[b]
            .confidence
            .partial_cmp(&candidates[a].confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut kept: Vec<usize> = Vec::with_capacity(ranked.len());
    for idx in ranked {
        let candidate = &candidates[idx];
        let suppressed = kept.iter().any(|&k| {
            let winner = &candidates[k];
            let comparable = !config.class_aware || winner.class_id == candidate.class_id;
            comparable && winner.bbox.iou(&candidate.bbox) > config.iou_threshold
        });
        if !suppressed {
            kept.push(idx);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use percept_frame_model::BoundingBox;

    fn candidate(x: f32, width: f32, class_id: usize, confidence: f32) -> DetectionCandidate {
        DetectionCandidate::new(BoundingBox::new(x, 0.0, width, 10.0), class_id, confidence)
    }

    #[test]
    fn test_half_overlap_keeps_higher_confidence() {
        // IoU = 400 / 800 = 0.5
        let candidates = [candidate(20.0, 60.0, 0, 0.6), candidate(0.0, 60.0, 0, 0.9)];
        assert_eq!(non_max_suppression(&candidates, &NmsConfig::default()), vec![1]);
    }

    #[test]
    fn test_low_overlap_keeps_both_in_either_order() {
        // IoU = 300 / 1000 = 0.3
        let a = candidate(0.0, 65.0, 0, 0.9);
        let b = candidate(35.0, 65.0, 0, 0.6);
        assert_eq!(non_max_suppression(&[a, b], &NmsConfig::default()), vec![0, 1]);
        assert_eq!(non_max_suppression(&[b, a], &NmsConfig::default()), vec![1, 0]);
    }

    #[test]
    fn test_confidence_filter_is_exclusive() {
        let candidates = [
            candidate(0.0, 10.0, 0, 0.5),
            candidate(100.0, 10.0, 0, 0.51),
            candidate(200.0, 10.0, 0, 0.2),
        ];
        assert_eq!(non_max_suppression(&candidates, &NmsConfig::default()), vec![1]);
    }

    #[test]
    fn test_equal_confidence_keeps_first_seen() {
        let candidates = [candidate(0.0, 60.0, 0, 0.8), candidate(5.0, 60.0, 0, 0.8)];
        assert_eq!(non_max_suppression(&candidates, &NmsConfig::default()), vec![0]);
    }

    #[test]
    fn test_suppressed_candidate_does_not_suppress_others() {
        // b overlaps both a and c heavily; a and c barely overlap each other.
        let a = candidate(0.0, 60.0, 0, 0.95);
        let b = candidate(15.0, 60.0, 0, 0.9);
        let c = candidate(45.0, 60.0, 0, 0.85);
        assert_eq!(non_max_suppression(&[a, b, c], &NmsConfig::default()), vec![0, 2]);
    }

    #[test]
    fn test_class_aware_keeps_overlapping_different_classes() {
        let candidates = [candidate(0.0, 60.0, 0, 0.9), candidate(0.0, 60.0, 1, 0.8)];
        let agnostic = non_max_suppression(&candidates, &NmsConfig::default());
        assert_eq!(agnostic, vec![0]);

        let config = NmsConfig {
            class_aware: true,
            ..NmsConfig::default()
        };
        assert_eq!(non_max_suppression(&candidates, &config), vec![0, 1]);
    }

    #[test]
    fn test_nan_confidence_is_dropped() {
        let candidates = [candidate(0.0, 10.0, 0, f32::NAN)];
        assert!(non_max_suppression(&candidates, &NmsConfig::default()).is_empty());
    }
}
