//! Hand-driven controllers: the pinch level (volume, brightness) and the
//! virtual pointer.
//!
//! Each controller owns its smoothing state and is fed one [`LandmarkFrame`]
//! per video frame. It returns `Ok(None)` when no hand is present and an
//! error only if a non-empty frame lacks a keypoint it needs. The values it
//! returns are what the caller hands to the OS actuator.

use serde::Serialize;

use percept_common::{LandmarkConfig, LevelPreset, PerceptError, PerceptResult};
use percept_frame_model::{
    LandmarkFrame, LandmarkId, Point2D, INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, THUMB_TIP,
};

use crate::calibrate::CalibrationRange;
use crate::gesture::{
    classify_mode, distance_between, finger_states, midpoint, select_triggered, ClickEdge,
    GestureMode,
};
use crate::smoothing::{smooth, smooth_point, SmoothingState};

/// One frame's output of a [`LevelControl`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelReading {
    /// Pinch distance after smoothing, in pixels.
    pub distance: f64,
    /// Actuator-native level (e.g. decibels or a brightness percentage).
    pub level: f64,
    /// Position within the source range as 0-100.
    pub percent: f64,
    /// Top of the on-screen level bar, in frame pixels.
    pub bar_y: f64,
    /// Center of the pinch, for drawing.
    pub center: Point2D,
}

impl LevelReading {
    /// Whole-number percentage, truncated the way brightness APIs expect.
    pub fn percent_int(&self) -> u8 {
        self.percent.clamp(0.0, 100.0) as u8
    }
}

/// Maps the thumb-to-index pinch distance onto a level.
#[derive(Debug, Clone)]
pub struct LevelControl {
    from: LandmarkId,
    to: LandmarkId,
    level: CalibrationRange,
    percent: CalibrationRange,
    bar: CalibrationRange,
    smoothing_factor: f64,
    smoothing: SmoothingState<f64>,
}

impl LevelControl {
    /// Build a control from a configured preset, unsmoothed.
    pub fn from_preset(name: &str, preset: &LevelPreset) -> PerceptResult<Self> {
        let level = CalibrationRange::preset_level(name, preset)?;
        Ok(Self {
            from: THUMB_TIP,
            to: INDEX_TIP,
            percent: level.retarget((0.0, 100.0))?,
            bar: CalibrationRange::preset_bar(name, preset)?,
            level,
            smoothing_factor: 1.0,
            smoothing: SmoothingState::new(),
        })
    }

    /// Volume control for a device reporting `[min_db, max_db]`.
    pub fn volume(min_db: f64, max_db: f64) -> PerceptResult<Self> {
        let preset = LevelPreset {
            level: [min_db, max_db],
            ..LevelPreset::VOLUME
        };
        Self::from_preset("volume", &preset)
    }

    /// Brightness control producing a 0-100 percentage.
    pub fn brightness() -> PerceptResult<Self> {
        Self::from_preset("brightness", &LevelPreset::BRIGHTNESS)
    }

    /// Damp the measured distance across frames. `1.0` disables damping.
    ///
    /// The first damped frame starts from zero distance, so the level
    /// ramps up from its minimum.
    pub fn with_smoothing(mut self, factor: f64) -> Self {
        self.smoothing_factor = factor;
        self
    }

    /// Measure between two other keypoints instead of thumb and index tips.
    pub fn with_landmarks(mut self, from: LandmarkId, to: LandmarkId) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn update(&mut self, frame: &LandmarkFrame) -> PerceptResult<Option<LevelReading>> {
        if frame.is_empty() {
            return Ok(None);
        }

        let raw = distance_between(frame, self.from, self.to)?;
        let distance = smooth(raw, &mut self.smoothing, self.smoothing_factor);
        let reading = LevelReading {
            distance,
            level: self.level.calibrate(distance),
            percent: self.percent.calibrate(distance),
            bar_y: self.bar.calibrate(distance),
            center: midpoint(frame, self.from, self.to)?,
        };

        tracing::debug!(
            distance = reading.distance,
            level = reading.level,
            percent = reading.percent,
            "level reading"
        );
        Ok(Some(reading))
    }
}

/// Geometry and behaviour of the virtual pointer.
#[derive(Debug, Clone)]
pub struct PointerConfig {
    pub camera_width: f64,
    pub camera_height: f64,
    /// Margin trimmed from every camera edge; the remaining window spans the screen.
    pub frame_reduction: f64,
    pub screen_width: f64,
    pub screen_height: f64,
    /// Damping divisor for the pointer position.
    pub smoothing_factor: f64,
    /// Index-to-middle distance below which Select mode clicks.
    pub click_threshold: f64,
    /// Click once per pinch rather than on every pinched frame.
    pub click_edge_only: bool,
    /// Mirror horizontally so the pointer follows a selfie-view camera.
    pub mirror_x: bool,
}

impl PointerConfig {
    pub fn new(screen_width: f64, screen_height: f64) -> Self {
        Self::from_landmark_config(&LandmarkConfig::default(), screen_width, screen_height)
    }

    pub fn from_landmark_config(
        config: &LandmarkConfig,
        screen_width: f64,
        screen_height: f64,
    ) -> Self {
        Self {
            camera_width: config.camera_width as f64,
            camera_height: config.camera_height as f64,
            frame_reduction: config.frame_reduction_px,
            screen_width,
            screen_height,
            smoothing_factor: config.smoothing_factor,
            click_threshold: config.click_threshold_px,
            click_edge_only: config.click_edge_only,
            mirror_x: true,
        }
    }
}

/// Command for the pointer actuator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PointerCommand {
    MoveTo { x: f64, y: f64 },
    Click { x: f64, y: f64 },
}

/// One frame's output of a [`VirtualPointer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointerUpdate {
    pub mode: GestureMode,
    pub command: Option<PointerCommand>,
}

/// Index finger drives the pointer; raising the middle finger and pinching
/// the two tips together clicks.
#[derive(Debug, Clone)]
pub struct VirtualPointer {
    config: PointerConfig,
    map_x: CalibrationRange,
    map_y: CalibrationRange,
    smoothing: SmoothingState<Point2D>,
    click_edge: ClickEdge,
    location: Point2D,
}

impl VirtualPointer {
    pub fn new(config: PointerConfig) -> PerceptResult<Self> {
        if config.screen_width <= 0.0 || config.screen_height <= 0.0 {
            return Err(PerceptError::config(format!(
                "screen size {}x{} must be positive",
                config.screen_width, config.screen_height
            )));
        }
        let margin = config.frame_reduction;
        let map_x = CalibrationRange::named(
            "pointer.x",
            (margin, config.camera_width - margin),
            (0.0, config.screen_width),
        )?;
        let map_y = CalibrationRange::named(
            "pointer.y",
            (margin, config.camera_height - margin),
            (0.0, config.screen_height),
        )?;
        Ok(Self {
            config,
            map_x,
            map_y,
            smoothing: SmoothingState::new(),
            click_edge: ClickEdge::new(),
            location: Point2D::ORIGIN,
        })
    }

    /// Last position sent to the actuator, in screen pixels.
    pub fn location(&self) -> Point2D {
        self.location
    }

    pub fn update(&mut self, frame: &LandmarkFrame) -> PerceptResult<Option<PointerUpdate>> {
        if frame.is_empty() {
            return Ok(None);
        }

        let states = finger_states(frame, &[INDEX_TIP, MIDDLE_TIP]);
        if states.is_empty() {
            let missing = [INDEX_TIP, INDEX_PIP, MIDDLE_TIP, MIDDLE_PIP]
                .into_iter()
                .find(|&id| frame.get(id).is_none())
                .unwrap_or(INDEX_TIP);
            return Err(PerceptError::missing_landmark(missing));
        }

        let mode = classify_mode(&states);
        let command = match mode {
            GestureMode::Move => {
                self.click_edge.update(false);
                Some(self.move_to(frame)?)
            }
            GestureMode::Select => {
                let pinch = distance_between(frame, INDEX_TIP, MIDDLE_TIP)?;
                let triggered = select_triggered(pinch, self.config.click_threshold);
                let rising = self.click_edge.update(triggered);
                let fire = if self.config.click_edge_only {
                    rising
                } else {
                    triggered
                };
                fire.then_some(PointerCommand::Click {
                    x: self.location.x,
                    y: self.location.y,
                })
            }
            GestureMode::Idle => {
                self.click_edge.update(false);
                None
            }
        };

        tracing::debug!(?mode, ?command, "pointer update");
        Ok(Some(PointerUpdate { mode, command }))
    }

    fn move_to(&mut self, frame: &LandmarkFrame) -> PerceptResult<PointerCommand> {
        let tip = frame
            .position(INDEX_TIP)
            .ok_or_else(|| PerceptError::missing_landmark(INDEX_TIP))?;
        let target = Point2D::new(self.map_x.calibrate(tip.x), self.map_y.calibrate(tip.y));
        let smoothed = smooth_point(target, &mut self.smoothing, self.config.smoothing_factor);

        let x = if self.config.mirror_x {
            self.config.screen_width - smoothed.x
        } else {
            smoothed.x
        };
        self.location = Point2D::new(x, smoothed.y);
        Ok(PointerCommand::MoveTo {
            x: self.location.x,
            y: self.location.y,
        })
    }
}
