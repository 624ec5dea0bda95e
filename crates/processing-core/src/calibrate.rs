//! Linear calibration with clamping.
//!
//! Maps a measured source quantity (a pinch distance in pixels) onto a
//! control quantity (a volume level, a percentage, a bar coordinate). Inputs
//! outside the source range clamp to the matching target endpoint; there is
//! no extrapolation.

use serde::{Deserialize, Serialize};

use percept_common::{LevelPreset, PerceptError, PerceptResult};

/// A validated source range and the target values at each of its ends.
///
/// The target may run in either direction: `target_at_min > target_at_max`
/// gives an inverted mapping (a larger distance yields a smaller output).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRange {
    src_min: f64,
    src_max: f64,
    target_at_min: f64,
    target_at_max: f64,
}

impl CalibrationRange {
    /// Build a range from `(src_min, src_max)` and `(target_at_min, target_at_max)`.
    ///
    /// Fails with `DegenerateCalibrationRange` unless `src_min < src_max` and
    /// the two target endpoints are finite and distinct.
    pub fn new(source: (f64, f64), target: (f64, f64)) -> PerceptResult<Self> {
        Self::named("calibration", source, target)
    }

    /// Same as [`CalibrationRange::new`], with a name for the error message.
    pub fn named(name: &str, source: (f64, f64), target: (f64, f64)) -> PerceptResult<Self> {
        let (src_min, src_max) = source;
        let (target_at_min, target_at_max) = target;
        let source_ok = src_min.is_finite() && src_max.is_finite() && src_min < src_max;
        let target_ok =
            target_at_min.is_finite() && target_at_max.is_finite() && target_at_min != target_at_max;
        if !source_ok || !target_ok {
            return Err(PerceptError::degenerate_range(name, source, target));
        }
        Ok(Self {
            src_min,
            src_max,
            target_at_min,
            target_at_max,
        })
    }

    /// Level mapping of a configured preset.
    pub fn preset_level(name: &str, preset: &LevelPreset) -> PerceptResult<Self> {
        Self::named(
            name,
            (preset.source[0], preset.source[1]),
            (preset.level[0], preset.level[1]),
        )
    }

    /// On-screen bar mapping of a configured preset.
    pub fn preset_bar(name: &str, preset: &LevelPreset) -> PerceptResult<Self> {
        Self::named(
            name,
            (preset.source[0], preset.source[1]),
            (preset.bar[0], preset.bar[1]),
        )
    }

    /// A copy of this range with the same source and a different target.
    pub fn retarget(&self, target: (f64, f64)) -> PerceptResult<Self> {
        Self::new((self.src_min, self.src_max), target)
    }

    pub fn source(&self) -> (f64, f64) {
        (self.src_min, self.src_max)
    }

    pub fn target(&self) -> (f64, f64) {
        (self.target_at_min, self.target_at_max)
    }

    /// True when the target runs opposite to the source.
    pub fn is_inverted(&self) -> bool {
        self.target_at_min > self.target_at_max
    }

    /// Map `value` into the target range.
    pub fn calibrate(&self, value: f64) -> f64 {
        if value <= self.src_min {
            return self.target_at_min;
        }
        if value >= self.src_max {
            return self.target_at_max;
        }
        let t = (value - self.src_min) / (self.src_max - self.src_min);
        self.target_at_min + t * (self.target_at_max - self.target_at_min)
    }
}

/// Map `value` through `range`. See [`CalibrationRange::calibrate`].
pub fn calibrate(value: f64, range: &CalibrationRange) -> f64 {
    range.calibrate(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn percent() -> CalibrationRange {
        CalibrationRange::new((25.0, 125.0), (0.0, 100.0)).unwrap()
    }

    fn bar() -> CalibrationRange {
        CalibrationRange::new((25.0, 125.0), (400.0, 150.0)).unwrap()
    }

    #[test]
    fn test_interpolates_inside_range() {
        assert!((calibrate(30.0, &percent()) - 5.0).abs() < 1e-9);
        assert!((calibrate(75.0, &percent()) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_inverted_target() {
        let bar = bar();
        assert!(bar.is_inverted());
        assert_eq!(bar.calibrate(0.0), 400.0);
        assert_eq!(bar.calibrate(500.0), 150.0);
        assert!((bar.calibrate(75.0) - 275.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_ranges_rejected() {
        assert!(matches!(
            CalibrationRange::new((125.0, 25.0), (0.0, 100.0)),
            Err(PerceptError::DegenerateCalibrationRange { .. })
        ));
        assert!(CalibrationRange::new((25.0, 25.0), (0.0, 100.0)).is_err());
        assert!(CalibrationRange::new((25.0, 125.0), (50.0, 50.0)).is_err());
        assert!(CalibrationRange::new((f64::NAN, 125.0), (0.0, 100.0)).is_err());
    }

    #[test]
    fn test_presets_build() {
        let level = CalibrationRange::preset_level("volume", &LevelPreset::VOLUME).unwrap();
        assert_eq!(level.calibrate(125.0), 0.0);
        assert_eq!(level.calibrate(0.0), -65.25);
        let bar = CalibrationRange::preset_bar("volume", &LevelPreset::VOLUME).unwrap();
        assert!(bar.is_inverted());
    }

    #[test]
    fn test_retarget_keeps_source() {
        let percent = bar().retarget((0.0, 100.0)).unwrap();
        assert_eq!(percent.source(), (25.0, 125.0));
        assert_eq!(percent.target(), (0.0, 100.0));
    }

    proptest! {
        #[test]
        fn below_source_min_hits_first_endpoint(below in 0.0f64..1e6, inverted in any::<bool>()) {
            let range = if inverted { bar() } else { percent() };
            let value = range.source().0 - below;
            prop_assert_eq!(range.calibrate(value), range.target().0);
        }

        #[test]
        fn above_source_max_hits_second_endpoint(above in 0.0f64..1e6, inverted in any::<bool>()) {
            let range = if inverted { bar() } else { percent() };
            let value = range.source().1 + above;
            prop_assert_eq!(range.calibrate(value), range.target().1);
        }

        #[test]
        fn calibration_is_monotonic(a in 25.0f64..=125.0, b in 25.0f64..=125.0, inverted in any::<bool>()) {
            let range = if inverted { bar() } else { percent() };
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let (out_lo, out_hi) = (range.calibrate(lo), range.calibrate(hi));
            if range.is_inverted() {
                prop_assert!(out_lo >= out_hi);
            } else {
                prop_assert!(out_lo <= out_hi);
            }
        }

        #[test]
        fn output_stays_within_target(value in -1e4f64..1e4, inverted in any::<bool>()) {
            let range = if inverted { bar() } else { percent() };
            let (t0, t1) = range.target();
            let out = range.calibrate(value);
            prop_assert!(out >= t0.min(t1) && out <= t0.max(t1));
        }
    }
}
