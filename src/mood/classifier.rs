//! Arg-max expression classification.

use super::label::MoodLabel;
use super::MoodError;

/// Per-label expression probabilities for one face.
///
/// Labels the engine did not report are absent rather than zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExpressionScores {
    scores: [Option<f32>; 7],
}

impl ExpressionScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a probability. Non-finite values are ignored.
    pub fn set(&mut self, label: MoodLabel, probability: f32) {
        if probability.is_finite() {
            self.scores[label.index()] = Some(probability);
        }
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, label: MoodLabel, probability: f32) -> Self {
        self.set(label, probability);
        self
    }

    pub fn get(&self, label: MoodLabel) -> Option<f32> {
        self.scores[label.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.scores.iter().all(Option::is_none)
    }

    /// Reported scores in tie-break order.
    pub fn iter(&self) -> impl Iterator<Item = (MoodLabel, f32)> + '_ {
        MoodLabel::ALL
            .into_iter()
            .filter_map(|label| self.get(label).map(|p| (label, p)))
    }
}

impl FromIterator<(MoodLabel, f32)> for ExpressionScores {
    fn from_iter<I: IntoIterator<Item = (MoodLabel, f32)>>(iter: I) -> Self {
        let mut scores = ExpressionScores::new();
        for (label, p) in iter {
            scores.set(label, p);
        }
        scores
    }
}

/// Most likely expression and its probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: MoodLabel,
    pub confidence: f32,
}

/// Pick the label with the strictly highest probability.
///
/// Ties go to the label that comes first in [`MoodLabel::ALL`].
pub fn classify(scores: &ExpressionScores) -> Result<Classification, MoodError> {
    let mut best: Option<Classification> = None;

    for (label, confidence) in scores.iter() {
        match best {
            Some(current) if confidence <= current.confidence => {}
            _ => best = Some(Classification { label, confidence }),
        }
    }

    best.ok_or(MoodError::NoExpressionData)
}
