//! Background-subtraction motion regions, used when no object detector is
//! available.
//!
//! # Algorithm
//!
//! 1. The first processed frame becomes the **reference** background.
//! 2. Each later frame is **differenced** against it pixel by pixel; pixels
//!    that changed by more than the threshold become foreground.
//! 3. The mask is **dilated** with a 3×3 square to merge nearby blobs.
//! 4. **External contours** are traced and those enclosing less than the
//!    minimum area are discarded as noise.

use std::borrow::Cow;

use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::distance_transform::Norm;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::dilate;

use percept_common::{DetectionConfig, PerceptError, PerceptResult};
use percept_frame_model::{BoundingBox, Region};

/// Parameters of the motion pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionConfig {
    /// Intensity change above which a pixel is foreground.
    pub threshold: u8,
    /// Number of 3×3 dilation passes.
    pub dilate_iterations: u8,
    /// Minimum enclosed contour area in px².
    pub min_area: f64,
    /// Gaussian pre-blur; `None` compares raw intensities.
    pub blur_sigma: Option<f32>,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            threshold: 25,
            dilate_iterations: 2,
            min_area: 500.0,
            blur_sigma: None,
        }
    }
}

impl From<&DetectionConfig> for MotionConfig {
    fn from(config: &DetectionConfig) -> Self {
        Self {
            threshold: config.motion_threshold,
            dilate_iterations: config.dilate_iterations,
            min_area: config.min_contour_area,
            blur_sigma: config.blur_sigma,
        }
    }
}

/// The background frame, captured once from the first observation.
///
/// Nothing in the pipeline clears it; [`ReferenceFrame::reset`] is there for
/// callers that want to re-capture after lighting changes.
#[derive(Debug, Clone, Default)]
pub struct ReferenceFrame {
    image: Option<GrayImage>,
}

impl ReferenceFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.image.is_some()
    }

    pub fn get(&self) -> Option<&GrayImage> {
        self.image.as_ref()
    }

    /// Store `frame` if no reference exists yet. Returns true if it was stored.
    pub fn capture_once(&mut self, frame: &GrayImage) -> bool {
        if self.image.is_some() {
            return false;
        }
        self.image = Some(frame.clone());
        true
    }

    /// Forget the reference; the next frame becomes the new background.
    pub fn reset(&mut self) {
        self.image = None;
    }
}

/// Stateful motion detector: a [`MotionConfig`] plus its [`ReferenceFrame`].
#[derive(Debug, Clone, Default)]
pub struct MotionDetector {
    config: MotionConfig,
    reference: ReferenceFrame,
}

impl MotionDetector {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            reference: ReferenceFrame::new(),
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    pub fn reference(&self) -> &ReferenceFrame {
        &self.reference
    }

    pub fn reference_mut(&mut self) -> &mut ReferenceFrame {
        &mut self.reference
    }

    /// Motion regions in `frame`.
    ///
    /// The first call stores the frame as the reference and reports nothing.
    /// Frames must match the reference dimensions.
    pub fn detect(&mut self, frame: &GrayImage) -> PerceptResult<Vec<Region>> {
        let prepared: Cow<'_, GrayImage> = match self.config.blur_sigma {
            Some(sigma) if !(sigma > 0.0 && sigma.is_finite()) => {
                return Err(PerceptError::config(format!(
                    "blur sigma must be positive and finite, got {sigma}"
                )));
            }
            Some(sigma) => Cow::Owned(gaussian_blur_f32(frame, sigma)),
            None => Cow::Borrowed(frame),
        };

        if self.reference.capture_once(&prepared) {
            tracing::info!(
                width = frame.width(),
                height = frame.height(),
                "captured motion reference frame"
            );
            return Ok(Vec::new());
        }
        let Some(reference) = self.reference.get() else {
            return Ok(Vec::new());
        };
        if reference.dimensions() != prepared.dimensions() {
            return Err(PerceptError::detection(format!(
                "frame is {:?} but the reference frame is {:?}",
                prepared.dimensions(),
                reference.dimensions()
            )));
        }

        let mut mask = difference_mask(reference, &prepared, self.config.threshold);
        for _ in 0..self.config.dilate_iterations {
            mask = dilate(&mask, Norm::LInf, 1);
        }

        // Contour tracing misclassifies blobs on the image border, so trace
        // a copy framed by one background pixel and shift boxes back.
        let regions: Vec<Region> = find_contours::<i32>(&pad_border(&mask))
            .iter()
            .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
            .filter(|c| contour_area(c) >= self.config.min_area)
            .filter_map(bounding_box)
            .map(|b| BoundingBox::new(b.x - 1.0, b.y - 1.0, b.width, b.height))
            .map(Region::motion)
            .collect();

        tracing::debug!(regions = regions.len(), "motion regions");
        Ok(regions)
    }
}

/// Binary mask: 255 where `|reference - frame| > threshold`, else 0.
pub fn difference_mask(reference: &GrayImage, frame: &GrayImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(frame.width(), frame.height(), |x, y| {
        let before = reference.get_pixel(x, y).0[0];
        let after = frame.get_pixel(x, y).0[0];
        if before.abs_diff(after) > threshold {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// `mask` surrounded by a one-pixel background frame.
fn pad_border(mask: &GrayImage) -> GrayImage {
    let mut padded = GrayImage::new(mask.width() + 2, mask.height() + 2);
    image::imageops::replace(&mut padded, mask, 1, 1);
    padded
}

/// Area enclosed by a traced contour (shoelace over pixel centers).
pub fn contour_area(contour: &Contour<i32>) -> f64 {
    let points = &contour.points;
    if points.len() < 3 {
        return 0.0;
    }
    let twice_area: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64)
        .sum();
    twice_area.abs() as f64 / 2.0
}

/// Smallest pixel box containing every contour point.
fn bounding_box(contour: &Contour<i32>) -> Option<BoundingBox> {
    let first = contour.points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &contour.points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(BoundingBox::new(
        min_x as f32,
        min_y as f32,
        (max_x - min_x + 1) as f32,
        (max_y - min_y + 1) as f32,
    ))
}
