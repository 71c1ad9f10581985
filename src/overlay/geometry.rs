//! Feature shapes in frame coordinates.
//!
//! Brows and mouth are laid out in a local frame centered on the feature
//! line and rotated along its slope, then mapped back to frame pixels.
//! Ellipse arcs are sampled into polygon outlines.

use std::f32::consts::{PI, TAU};

use crate::detection::{Landmarks, Point};
use crate::mood::{BrowShape, MouthShape};

/// Line segments sampled per full ellipse turn.
const ELLIPSE_SEGMENTS: usize = 48;

const BROW_HEIGHT: f32 = 10.0;
const MOUTH_HEIGHT: f32 = 15.0;

/// A filled shape ready to paint.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle { center: Point, radius: f32 },
    Polygon(Vec<Point>),
}

/// Which side of the face a paired feature is on, as seen on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Landmark indices of one eye.
#[derive(Debug, Clone, Copy)]
struct EyeLandmarks {
    x_from: usize,
    x_to: usize,
    y_from: usize,
    y_to: usize,
}

const LEFT_EYE: EyeLandmarks = EyeLandmarks {
    x_from: 36,
    x_to: 39,
    y_from: 37,
    y_to: 41,
};

const RIGHT_EYE: EyeLandmarks = EyeLandmarks {
    x_from: 42,
    x_to: 45,
    y_from: 47,
    y_to: 43,
};

const LEFT_BROW: (usize, usize) = (17, 21);
const RIGHT_BROW: (usize, usize) = (22, 26);
const MOUTH: (usize, usize) = (48, 54);

/// Translation plus rotation from a feature's local frame to frame pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    pub origin: Point,
    pub angle: f32,
}

impl LocalFrame {
    /// Frame centered horizontally on the segment `from -> to`, `drop`
    /// pixels below `from`, rotated along the segment's slope.
    pub fn along(from: Point, to: Point, drop: f32) -> Self {
        let width = to.x - from.x;
        let angle = if width == 0.0 {
            0.0
        } else {
            ((to.y - from.y) / width).atan()
        };
        Self {
            origin: Point::new(from.x + width / 2.0, from.y + drop),
            angle,
        }
    }

    pub fn rotated(self, radians: f32) -> Self {
        Self {
            angle: self.angle + radians,
            ..self
        }
    }

    pub fn to_world(&self, local: Point) -> Point {
        let (sin, cos) = self.angle.sin_cos();
        Point::new(
            self.origin.x + local.x * cos - local.y * sin,
            self.origin.y + local.x * sin + local.y * cos,
        )
    }

    fn rect(&self, x: f32, y: f32, width: f32, height: f32) -> Shape {
        Shape::Polygon(
            [
                Point::new(x, y),
                Point::new(x + width, y),
                Point::new(x + width, y + height),
                Point::new(x, y + height),
            ]
            .into_iter()
            .map(|p| self.to_world(p))
            .collect(),
        )
    }

    /// Elliptical arc from `start` to `end` (radians, clockwise on screen),
    /// closed back through its chord.
    fn arc(&self, center: Point, rx: f32, ry: f32, start: f32, end: f32) -> Shape {
        let sweep = end - start;
        let steps = ((ELLIPSE_SEGMENTS as f32 * sweep.abs() / TAU).ceil() as usize).max(2);
        // a full turn would repeat its first point
        let last = if (sweep.abs() - TAU).abs() < f32::EPSILON {
            steps - 1
        } else {
            steps
        };
        let outline = (0..=last)
            .map(|i| {
                let t = start + sweep * i as f32 / steps as f32;
                self.to_world(Point::new(center.x + rx * t.cos(), center.y + ry * t.sin()))
            })
            .collect();
        Shape::Polygon(outline)
    }
}

pub fn eye(landmarks: &Landmarks, side: Side) -> Shape {
    let idx = match side {
        Side::Left => LEFT_EYE,
        Side::Right => RIGHT_EYE,
    };
    let x1 = landmarks.get(idx.x_from).x;
    let x2 = landmarks.get(idx.x_to).x;
    let y1 = landmarks.get(idx.y_from).y;
    let y2 = landmarks.get(idx.y_to).y;

    Shape::Circle {
        center: Point::new(x1 + (x2 - x1) / 2.0, y1 + (y2 - y1) / 2.0),
        radius: ((x2 - x1) / 2.0).abs(),
    }
}

pub fn brow(landmarks: &Landmarks, side: Side, shape: BrowShape) -> Shape {
    let (from, to) = match side {
        Side::Left => LEFT_BROW,
        Side::Right => RIGHT_BROW,
    };
    let from = landmarks.get(from);
    let to = landmarks.get(to);
    let width = to.x - from.x;
    let frame = LocalFrame::along(from, to, BROW_HEIGHT / 2.0);
    let left = side == Side::Left;

    match shape {
        BrowShape::Raised => frame.rect(-width / 2.0, -25.0, width, BROW_HEIGHT),
        BrowShape::Furrowed => {
            let tilt = if left { 15f32 } else { -15f32 };
            frame
                .rotated(tilt.to_radians())
                .rect(-width / 2.0, -30.0, width, BROW_HEIGHT)
        }
        BrowShape::Drooped => {
            let tilt = if left { -30f32 } else { 30f32 };
            frame
                .rotated(tilt.to_radians())
                .rect(-width / 2.0, -15.0, width, BROW_HEIGHT)
        }
        BrowShape::Arched => frame.arc(
            Point::new(0.0, -20.0),
            width / 2.0,
            width / 4.0,
            PI,
            TAU,
        ),
        BrowShape::Flat => frame.rect(-width / 2.0, -15.0, width, BROW_HEIGHT),
    }
}

pub fn mouth(landmarks: &Landmarks, shape: MouthShape) -> Shape {
    let from = landmarks.get(MOUTH.0);
    let to = landmarks.get(MOUTH.1);
    let width = to.x - from.x;
    let half = width / 2.0;
    let frame = LocalFrame::along(from, to, MOUTH_HEIGHT / 2.0);
    let center = Point::new(0.0, 0.0);

    match shape {
        MouthShape::Smile => frame.arc(center, half, half / 2.0, 0.0, PI),
        MouthShape::Frown => frame.arc(center, half, half / 2.0, PI, TAU),
        MouthShape::Open => frame.arc(center, half, half * 1.15, 0.0, TAU),
        MouthShape::Flat => frame.rect(-half, -MOUTH_HEIGHT / 2.0, width, MOUTH_HEIGHT),
    }
}
