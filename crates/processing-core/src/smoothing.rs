//! Frame-to-frame damping of control values.
//!
//! Each frame the output moves a fixed fraction of the way from the previous
//! output toward the new measurement:
//!
//! ```text
//! output = previous + (new - previous) / factor
//! ```
//!
//! `factor = 1` passes measurements through; larger factors trade latency
//! for stability. The previous output lives in a [`SmoothingState`] owned by
//! whoever drives the loop, never in a global.

use serde::{Deserialize, Serialize};

use percept_frame_model::Point2D;

/// A value that can be damped toward a target.
pub trait Damped: Copy {
    /// Step `self` toward `target` by `1 / factor` of the remaining gap.
    fn damp_toward(self, target: Self, factor: f64) -> Self;
}

impl Damped for f64 {
    fn damp_toward(self, target: Self, factor: f64) -> Self {
        self + (target - self) / factor
    }
}

impl Damped for Point2D {
    fn damp_toward(self, target: Self, factor: f64) -> Self {
        Point2D::new(
            self.x.damp_toward(target.x, factor),
            self.y.damp_toward(target.y, factor),
        )
    }
}

/// Previous smoothed output, carried across frames.
///
/// Starts at the zero value, so the first frames glide in from the origin
/// unless the state is [seeded](SmoothingState::seeded).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SmoothingState<T> {
    previous: T,
}

impl<T: Damped + Default> SmoothingState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a known value instead of zero.
    pub fn seeded(value: T) -> Self {
        Self { previous: value }
    }

    /// The last output written to this state.
    pub fn previous(&self) -> T {
        self.previous
    }

    /// Return to the zero value.
    pub fn reset(&mut self) {
        self.previous = T::default();
    }
}

/// Damp `new` against `state`, store the result in `state`, and return it.
///
/// Factors below 1 (or NaN) are treated as 1.
pub fn smooth<T: Damped>(new: T, state: &mut SmoothingState<T>, factor: f64) -> T {
    let output = if factor > 1.0 {
        state.previous.damp_toward(new, factor)
    } else {
        new
    };
    state.previous = output;
    output
}

/// Pointer-position smoothing. See [`smooth`].
pub fn smooth_point(new: Point2D, state: &mut SmoothingState<Point2D>, factor: f64) -> Point2D {
    smooth(new, state, factor)
}
