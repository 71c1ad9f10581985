//! Mood tracking: expression labels, classification, debounced commitment,
//! and the static per-mood presentation table.

mod classifier;
mod label;
mod profile;
mod state;

pub use classifier::{classify, Classification, ExpressionScores};
pub use label::MoodLabel;
pub use profile::{
    feature_color, BrowShape, FeatureShapes, MoodProfile, MouthShape, NEUTRAL_FEATURE_COLOR,
    PROFILES,
};
pub use state::{MoodEvent, MoodMachine, MoodPreset, MoodSettings, MoodState};

/// Malformed per-face input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MoodError {
    /// The face carried no usable expression probabilities
    #[error("Detection has no expression data")]
    NoExpressionData,
    /// The face did not carry the full 68-point landmark set
    #[error("Expected 68 landmarks, got {count}")]
    MalformedLandmarks { count: usize },
}
