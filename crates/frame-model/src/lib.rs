//! Percept Frame Model
//!
//! Defines the per-frame data contracts exchanged with external collaborators:
//! - **Landmarks:** labeled 2D keypoints for one tracked hand in one frame
//! - **Geometry:** pixel-space points and axis-aligned boxes
//! - **Detection:** raw detector candidates and the regions reported for overlays
//!
//! All coordinates are in frame pixel space with the origin at the top-left,
//! so a smaller `y` is higher on screen. Nothing here outlives a frame.

pub mod detection;
pub mod geometry;
pub mod jsonl;
pub mod landmark;

pub use detection::*;
pub use geometry::*;
pub use landmark::*;
