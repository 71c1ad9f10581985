//! Per-tick face snapshot and the adapter from raw engine output.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::mood::{ExpressionScores, MoodError, MoodLabel};

/// Number of points in the landmark model.
pub const LANDMARK_COUNT: usize = 68;

/// A 2-D point in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned face box in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One face exactly as the inference engine reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    #[serde(rename = "box")]
    pub bounding_box: BoundingBox,
    /// Detector confidence, when the engine reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    #[serde(default)]
    pub landmarks: Vec<Point>,
    /// Expression name to probability
    #[serde(default)]
    pub expressions: HashMap<String, f32>,
}

/// Landmark layout of a frontal face in unit box coordinates.
const CANONICAL_FACE: [(f32, f32); LANDMARK_COUNT] = [
    // jaw 0-16
    (0.00, 0.35), (0.01, 0.47), (0.03, 0.58), (0.06, 0.69), (0.11, 0.78),
    (0.18, 0.86), (0.27, 0.92), (0.38, 0.97), (0.50, 0.98), (0.62, 0.97),
    (0.73, 0.92), (0.82, 0.86), (0.89, 0.78), (0.94, 0.69), (0.97, 0.58),
    (0.99, 0.47), (1.00, 0.35),
    // left brow 17-21
    (0.15, 0.28), (0.21, 0.26), (0.28, 0.25), (0.35, 0.26), (0.42, 0.28),
    // right brow 22-26
    (0.58, 0.28), (0.65, 0.26), (0.72, 0.25), (0.79, 0.26), (0.85, 0.28),
    // nose bridge 27-30
    (0.50, 0.36), (0.50, 0.43), (0.50, 0.50), (0.50, 0.56),
    // nostrils 31-35
    (0.42, 0.60), (0.46, 0.61), (0.50, 0.62), (0.54, 0.61), (0.58, 0.60),
    // left eye 36-41
    (0.22, 0.38), (0.27, 0.35), (0.33, 0.35), (0.38, 0.38), (0.33, 0.41), (0.27, 0.41),
    // right eye 42-47
    (0.62, 0.38), (0.67, 0.35), (0.73, 0.35), (0.78, 0.38), (0.73, 0.41), (0.67, 0.41),
    // outer lips 48-59
    (0.35, 0.75), (0.40, 0.72), (0.45, 0.71), (0.50, 0.72), (0.55, 0.71), (0.60, 0.72),
    (0.65, 0.75), (0.60, 0.79), (0.55, 0.80), (0.50, 0.81), (0.45, 0.80), (0.40, 0.79),
    // inner lips 60-67
    (0.38, 0.75), (0.45, 0.74), (0.50, 0.745), (0.55, 0.74), (0.62, 0.75),
    (0.55, 0.77), (0.50, 0.775), (0.45, 0.77),
];

impl RawDetection {
    /// A frontal face filling `bounding_box`, with no expression data.
    ///
    /// Used for fixtures and demo recordings.
    pub fn canonical_face(bounding_box: BoundingBox) -> Self {
        let landmarks = CANONICAL_FACE
            .iter()
            .map(|&(u, v)| {
                Point::new(
                    bounding_box.x + u * bounding_box.width,
                    bounding_box.y + v * bounding_box.height,
                )
            })
            .collect();
        Self {
            bounding_box,
            score: None,
            landmarks,
            expressions: HashMap::new(),
        }
    }

    /// Add an expression probability.
    pub fn with_expression(mut self, label: MoodLabel, probability: f32) -> Self {
        self.expressions.insert(label.name().to_string(), probability);
        self
    }

    /// The same face seen in a frame of `frame_width` flipped left to right.
    ///
    /// A full landmark set is also re-indexed, so the subject's left eye
    /// and brow stay at the left-eye and left-brow indices.
    pub fn mirrored(&self, frame_width: f32) -> Self {
        let flip = |p: Point| Point::new(frame_width - p.x, p.y);
        let landmarks = if self.landmarks.len() == LANDMARK_COUNT {
            (0..LANDMARK_COUNT)
                .map(|i| flip(self.landmarks[mirror_index(i)]))
                .collect()
        } else {
            self.landmarks.iter().copied().map(flip).collect()
        };

        let b = self.bounding_box;
        Self {
            bounding_box: BoundingBox {
                x: frame_width - b.x - b.width,
                ..b
            },
            score: self.score,
            landmarks,
            expressions: self.expressions.clone(),
        }
    }
}

/// Index of the landmark that takes point `i`'s place in a mirrored face.
fn mirror_index(i: usize) -> usize {
    match i {
        0..=16 => 16 - i,
        17..=26 => 43 - i,
        27..=30 => i,
        31..=35 => 66 - i,
        36..=39 => 81 - i,
        40..=41 => 87 - i,
        42..=45 => 81 - i,
        46..=47 => 87 - i,
        48..=54 => 102 - i,
        55..=59 => 114 - i,
        60..=64 => 124 - i,
        65..=67 => 132 - i,
        _ => i,
    }
}

/// The 68 landmark points of one face.
#[derive(Debug, Clone, PartialEq)]
pub struct Landmarks {
    points: Box<[Point; LANDMARK_COUNT]>,
}

impl Landmarks {
    pub fn new(points: [Point; LANDMARK_COUNT]) -> Self {
        Self {
            points: Box::new(points),
        }
    }

    /// Point at a model index (0..68).
    pub fn get(&self, index: usize) -> Point {
        self.points[index]
    }

    pub fn points(&self) -> &[Point] {
        &self.points[..]
    }
}

impl TryFrom<Vec<Point>> for Landmarks {
    type Error = MoodError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        let count = points.len();
        let boxed: Box<[Point; LANDMARK_COUNT]> = points
            .into_boxed_slice()
            .try_into()
            .map_err(|_| MoodError::MalformedLandmarks { count })?;
        Ok(Self { points: boxed })
    }
}

/// Immutable view of the face seen on one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionSnapshot {
    pub bounding_box: BoundingBox,
    pub landmarks: Landmarks,
    pub expressions: ExpressionScores,
}

impl TryFrom<RawDetection> for DetectionSnapshot {
    type Error = MoodError;

    fn try_from(raw: RawDetection) -> Result<Self, Self::Error> {
        let landmarks = Landmarks::try_from(raw.landmarks)?;

        let mut expressions = ExpressionScores::new();
        for (name, probability) in raw.expressions {
            match name.parse::<MoodLabel>() {
                Ok(label) => expressions.set(label, probability),
                Err(_) => log::debug!("Ignoring unknown expression '{}'", name),
            }
        }

        Ok(Self {
            bounding_box: raw.bounding_box,
            landmarks,
            expressions,
        })
    }
}

/// Reduce one tick's engine output to the face the pipeline follows.
///
/// Only the first face is used. `None` means "no face this tick"; a face
/// with a broken landmark set is logged and treated the same way.
pub fn adapt(faces: Vec<RawDetection>) -> Option<DetectionSnapshot> {
    let first = faces.into_iter().next()?;
    match DetectionSnapshot::try_from(first) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            log::warn!("Discarding detection: {}", e);
            None
        }
    }
}
