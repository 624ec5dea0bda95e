//! Percept Processing Core — signal conditioning and decisions
//!
//! Turns noisy per-frame perception output into stable control values:
//! - **Landmark signals:** finger states, pinch distances, gesture modes
//! - **Calibration:** clamped linear mapping into actuator ranges
//! - **Smoothing:** exponential damping of points and scalars
//! - **Controls:** volume/brightness levels and the virtual pointer
//! - **Detection:** overlap-suppressed object regions, or motion regions
//!   when no detector is available
//!
//! This crate is pure computation: no capture, no actuators.
//! All inputs are data; all outputs are data.

pub mod calibrate;
pub mod controls;
pub mod detection;
pub mod gesture;
pub mod smoothing;

pub use calibrate::{calibrate, CalibrationRange};
pub use controls::{
    LevelControl, LevelReading, PointerCommand, PointerConfig, PointerUpdate, VirtualPointer,
};
pub use detection::{
    face_regions, DetectionMode, DetectionReport, FrameDetectionEngine, FrameInput, RegionSource,
};
pub use gesture::{
    classify_mode, distance_between, finger_states, midpoint, select_triggered, ClickEdge,
    FingerState, GestureMode,
};
pub use smoothing::{smooth, smooth_point, SmoothingState};
