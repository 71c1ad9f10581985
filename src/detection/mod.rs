//! Face detections: the engine boundary and the per-tick snapshot.

mod engine;
mod snapshot;

pub use engine::{EngineError, FaceEngine, MirroredEngine, ReplayEngine};
pub use snapshot::{
    adapt, BoundingBox, DetectionSnapshot, Landmarks, Point, RawDetection, LANDMARK_COUNT,
};
