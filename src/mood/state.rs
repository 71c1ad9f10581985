//! Hysteresis state machine that debounces per-frame expressions into a
//! committed mood.
//!
//! A new label has to win the gate on consecutive ticks while a ramp
//! fills from 0 to its maximum; only then does it become the committed
//! mood. Any other eligible label in between restarts the ramp. The ramp
//! doubles as the visible "loading" bar.

use serde::{Deserialize, Serialize};

use super::classifier::Classification;
use super::label::MoodLabel;

/// Tuning for [`MoodMachine`].
#[derive(Debug, Clone, PartialEq)]
pub struct MoodSettings {
    /// Confidence a reading must exceed to count. `None` accepts every reading.
    pub gate: Option<f32>,
    /// Ramp increment per agreeing tick
    pub step: u8,
    /// Ramp value at which the pending mood commits
    pub max_progress: u8,
    /// Labels that are never a destination
    pub excluded: Vec<MoodLabel>,
}

impl Default for MoodSettings {
    fn default() -> Self {
        Self {
            gate: Some(0.8),
            step: 4,
            max_progress: 100,
            excluded: MoodLabel::DEFAULT_EXCLUDED.to_vec(),
        }
    }
}

impl MoodSettings {
    /// The early behavior: no gate, no exclusions, one unit per tick.
    pub fn ungated() -> Self {
        Self {
            gate: None,
            step: 1,
            excluded: Vec::new(),
            ..Default::default()
        }
    }

    /// Agreeing ticks needed after a transition starts before it commits.
    pub fn ticks_to_commit(&self) -> u32 {
        let step = self.step.max(1) as u32;
        (self.max_progress as u32).div_ceil(step).max(1)
    }

    fn accepts(&self, reading: Classification) -> bool {
        let passes_gate = self.gate.map_or(true, |gate| reading.confidence > gate);
        passes_gate && !self.excluded.contains(&reading.label)
    }
}

/// Named starting points for [`MoodSettings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodPreset {
    /// Gate 0.8, step 4, fearful and disgusted excluded
    #[default]
    Standard,
    /// Standard ramp and exclusions with every confidence accepted
    Open,
    /// No gate, no exclusions, one unit per tick
    Early,
}

impl MoodPreset {
    pub fn settings(self) -> MoodSettings {
        match self {
            MoodPreset::Standard => MoodSettings::default(),
            MoodPreset::Open => MoodSettings {
                gate: None,
                ..MoodSettings::default()
            },
            MoodPreset::Early => MoodSettings::ungated(),
        }
    }
}

/// Current committed mood and the transition in flight, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodState {
    committed: MoodLabel,
    pending: Option<MoodLabel>,
    ramp_progress: u8,
    fully_committed: bool,
}

impl Default for MoodState {
    fn default() -> Self {
        Self {
            committed: MoodLabel::Neutral,
            pending: None,
            ramp_progress: 0,
            fully_committed: false,
        }
    }
}

impl MoodState {
    pub fn committed(&self) -> MoodLabel {
        self.committed
    }

    pub fn pending(&self) -> Option<MoodLabel> {
        self.pending
    }

    pub fn ramp_progress(&self) -> u8 {
        self.ramp_progress
    }

    pub fn is_fully_committed(&self) -> bool {
        self.fully_committed
    }
}

/// What a reading did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodEvent {
    /// A new pending mood replaced whatever was ramping
    TransitionStarted { to: MoodLabel },
    /// The pending mood gained ground
    Advanced { to: MoodLabel, progress: u8 },
    /// The pending mood became the committed mood
    Committed { mood: MoodLabel },
}

/// Owns the [`MoodState`] and applies readings to it.
#[derive(Debug, Clone, Default)]
pub struct MoodMachine {
    settings: MoodSettings,
    state: MoodState,
}

impl MoodMachine {
    pub fn new(settings: MoodSettings) -> Self {
        Self {
            settings,
            state: MoodState::default(),
        }
    }

    pub fn state(&self) -> &MoodState {
        &self.state
    }

    pub fn settings(&self) -> &MoodSettings {
        &self.settings
    }

    /// Ramp progress of the pending transition as a fraction of the maximum.
    pub fn ramp_fraction(&self) -> f32 {
        if self.settings.max_progress == 0 {
            return 1.0;
        }
        self.state.ramp_progress as f32 / self.settings.max_progress as f32
    }

    /// Apply one tick's reading.
    ///
    /// Returns `None` when the reading leaves the state untouched.
    pub fn observe(&mut self, reading: Classification) -> Option<MoodEvent> {
        if !self.settings.accepts(reading) {
            return None;
        }

        let state = &mut self.state;
        let label = reading.label;

        if label == state.committed && state.fully_committed {
            return None;
        }

        if state.pending != Some(label) {
            state.pending = Some(label);
            state.ramp_progress = 0;
            state.fully_committed = false;
            log::debug!("Mood transition started toward {}", label);
            return Some(MoodEvent::TransitionStarted { to: label });
        }

        let max = self.settings.max_progress;
        state.ramp_progress = state
            .ramp_progress
            .saturating_add(self.settings.step.max(1))
            .min(max);

        if state.ramp_progress < max {
            return Some(MoodEvent::Advanced {
                to: label,
                progress: state.ramp_progress,
            });
        }

        state.committed = label;
        state.pending = None;
        state.fully_committed = true;
        log::info!("Mood committed: {}", label);
        Some(MoodEvent::Committed { mood: label })
    }

    /// Forget everything, back to neutral.
    pub fn reset(&mut self) {
        self.state = MoodState::default();
    }
}
