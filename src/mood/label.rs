//! Expression labels reported by the inference engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the seven expressions the engine scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodLabel {
    #[default]
    Neutral,
    Happy,
    Sad,
    Angry,
    Fearful,
    Disgusted,
    Surprised,
}

impl MoodLabel {
    /// Every label in the order the engine declares its expression outputs.
    ///
    /// This order is the classifier's tie-break order: on equal scores the
    /// earlier label wins.
    pub const ALL: [MoodLabel; 7] = [
        MoodLabel::Neutral,
        MoodLabel::Happy,
        MoodLabel::Sad,
        MoodLabel::Angry,
        MoodLabel::Fearful,
        MoodLabel::Disgusted,
        MoodLabel::Surprised,
    ];

    /// Labels that never become a visual destination unless configured otherwise.
    pub const DEFAULT_EXCLUDED: [MoodLabel; 3] =
        [MoodLabel::Neutral, MoodLabel::Disgusted, MoodLabel::Fearful];

    /// Position of this label in [`MoodLabel::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Lower-case name as the engine spells it.
    pub fn name(self) -> &'static str {
        match self {
            MoodLabel::Neutral => "neutral",
            MoodLabel::Happy => "happy",
            MoodLabel::Sad => "sad",
            MoodLabel::Angry => "angry",
            MoodLabel::Fearful => "fearful",
            MoodLabel::Disgusted => "disgusted",
            MoodLabel::Surprised => "surprised",
        }
    }

    /// Header text shown once the mood is committed.
    pub fn header(self) -> String {
        self.name().to_uppercase()
    }
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MoodLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoodLabel::ALL
            .into_iter()
            .find(|label| label.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown expression label '{}'", s))
    }
}
