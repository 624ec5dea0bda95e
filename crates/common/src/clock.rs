//! Clock and frame-rate utilities for the capture loop.
//!
//! The per-frame loop owns a [`FrameClock`] anchored at session start and a
//! [`FrameRateMeter`] holding the previous frame timestamp, so no timing
//! state lives in module-level variables.

use std::time::Instant;

/// A session clock that provides monotonic timestamps relative to
/// a fixed epoch (the moment the loop started).
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// The instant the session started.
    epoch: Instant,

    /// Wall-clock time at epoch (ISO 8601 string).
    epoch_wall: String,
}

impl FrameClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Get nanoseconds elapsed since session start.
    pub fn elapsed_ns(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// Convert an elapsed nanosecond value to seconds.
    pub fn ns_to_secs(ns: u64) -> f64 {
        ns as f64 / 1_000_000_000.0
    }
}

/// Instantaneous frames-per-second from consecutive frame timestamps.
#[derive(Debug, Default, Clone)]
pub struct FrameRateMeter {
    last_frame_ns: Option<u64>,
}

impl FrameRateMeter {
    /// Shortest interval considered when computing a rate (0.1 ms).
    const MIN_INTERVAL_NS: u64 = 100_000;

    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame at `now_ns` and return the rate since the previous one.
    ///
    /// The first call has no previous frame and returns `None`. Intervals
    /// shorter than 0.1 ms are clamped so the rate stays finite.
    pub fn tick(&mut self, now_ns: u64) -> Option<f64> {
        let previous = self.last_frame_ns.replace(now_ns)?;
        let interval = now_ns
            .saturating_sub(previous)
            .max(Self::MIN_INTERVAL_NS);
        Some(1_000_000_000.0 / interval as f64)
    }
}
