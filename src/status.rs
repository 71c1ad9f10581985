//! One-line status summary for the terminal preview.

use crate::mood::MoodMachine;

/// Cells in the ramp bar.
const RAMP_WIDTH: usize = 10;

#[derive(Debug, Clone)]
pub struct StatusLine {
    /// Whether the status line is printed
    pub visible: bool,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self { visible: true }
    }

    pub fn with_visibility(visible: bool) -> Self {
        Self { visible }
    }

    /// Format: " HAPPY | sad [####......] 40% | 5.0 fps "
    ///
    /// The middle part is `-` when no transition is pending.
    pub fn format(&self, mood: &MoodMachine, fps: f32) -> String {
        let state = mood.state();
        let ramp = match state.pending() {
            Some(pending) => {
                let fraction = mood.ramp_fraction().clamp(0.0, 1.0);
                let filled = (fraction * RAMP_WIDTH as f32).round() as usize;
                format!(
                    "{} [{}{}] {:>3}%",
                    pending,
                    "#".repeat(filled),
                    ".".repeat(RAMP_WIDTH - filled),
                    (fraction * 100.0).round() as u32
                )
            }
            None => "-".to_string(),
        };
        format!(" {} | {} | {:.1} fps ", state.committed().header(), ramp, fps)
    }
}
