//! Pixel-space points and boxes.

use serde::{Deserialize, Serialize};

/// A 2D point in frame or screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const ORIGIN: Point2D = Point2D { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Point halfway between two points.
    pub fn midpoint(a: &Point2D, b: &Point2D) -> Point2D {
        Point2D {
            x: (a.x + b.x) / 2.0,
            y: (a.y + b.y) / 2.0,
        }
    }
}

/// An axis-aligned box: top-left corner plus size, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Area of the box; zero for degenerate (non-positive) sizes.
    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Area of the overlap with another box.
    pub fn intersection_area(&self, other: &Self) -> f32 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w <= 0.0 || h <= 0.0 {
            return 0.0;
        }
        w * h
    }

    /// Intersection over Union with another box, in `[0, 1]`.
    pub fn iou(&self, other: &Self) -> f32 {
        let intersection = self.intersection_area(other);
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            0.0
        } else {
            intersection / union
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point2d_distance() {
        let a = Point2D::new(100.0, 100.0);
        let b = Point2D::new(130.0, 140.0);
        assert!((a.distance_to(&b) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_midpoint() {
        let mid = Point2D::midpoint(&Point2D::new(0.0, 10.0), &Point2D::new(20.0, 30.0));
        assert_eq!(mid, Point2D::new(10.0, 20.0));
    }

    #[test]
    fn test_iou_half_overlap() {
        let a = BoundingBox::new(0.0, 0.0, 60.0, 10.0);
        let b = BoundingBox::new(20.0, 0.0, 60.0, 10.0);
        assert!((a.iou(&b) - 0.5).abs() < 1e-6);
        assert!((b.iou(&a) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_iou_disjoint_and_touching() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let touching = BoundingBox::new(10.0, 0.0, 10.0, 10.0);
        let far = BoundingBox::new(50.0, 50.0, 10.0, 10.0);
        assert_eq!(a.iou(&touching), 0.0);
        assert_eq!(a.iou(&far), 0.0);
    }

    #[test]
    fn test_iou_identical_is_one() {
        let a = BoundingBox::new(3.0, 4.0, 25.0, 12.0);
        assert!((a.iou(&a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_area_boxes_do_not_divide_by_zero() {
        let a = BoundingBox::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(a.iou(&a), 0.0);
    }

    proptest::proptest! {
        #[test]
        fn iou_is_symmetric_and_bounded(
            ax in -50.0f32..50.0, ay in -50.0f32..50.0, aw in 1.0f32..80.0, ah in 1.0f32..80.0,
            bx in -50.0f32..50.0, by in -50.0f32..50.0, bw in 1.0f32..80.0, bh in 1.0f32..80.0
        ) {
            let a = BoundingBox::new(ax, ay, aw, ah);
            let b = BoundingBox::new(bx, by, bw, bh);
            let forward = a.iou(&b);
            proptest::prop_assert!((0.0..=1.0 + 1e-4).contains(&forward));
            proptest::prop_assert!((forward - b.iou(&a)).abs() < 1e-6);
        }
    }
}
