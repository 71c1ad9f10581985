//! Presentation state of the music player widget.
//!
//! On every commit the widget hides, swaps its playlist, and fades back
//! in once the new embed has "loaded".

use crate::mood::{MoodLabel, MoodProfile};

/// Visibility of the player and its shadow.
#[derive(Debug, Clone, PartialEq)]
pub enum FadeState {
    /// Nothing loaded yet.
    Hidden,
    /// Fading in after a playlist swap.
    FadeIn {
        /// Progress from 0.0 to 1.0.
        progress: f32,
    },
    /// Fully opaque.
    Visible,
}

#[derive(Debug, Clone)]
pub struct PlayerWidget {
    header: String,
    theme: MoodLabel,
    playlist: Option<&'static str>,
    shadow: Option<MoodLabel>,
    fade: FadeState,
    /// Fade-in duration in milliseconds.
    fade_ms: u32,
}

impl PlayerWidget {
    /// Default fade-in duration in milliseconds.
    pub const DEFAULT_FADE_MS: u32 = 600;

    pub fn new(fade_ms: u32) -> Self {
        Self {
            header: MoodLabel::Neutral.header(),
            theme: MoodLabel::Neutral,
            playlist: None,
            shadow: None,
            fade: FadeState::Hidden,
            fade_ms,
        }
    }

    /// Switch to a newly committed mood.
    ///
    /// Moods without a profile keep the current playlist but still retheme.
    pub fn commit(&mut self, mood: MoodLabel) {
        self.header = mood.header();
        self.theme = mood;

        let Some(profile) = MoodProfile::for_mood(mood) else {
            log::debug!("No playlist for {}, keeping the current one", mood);
            return;
        };

        self.playlist = Some(profile.playlist);
        self.shadow = Some(mood);
        self.fade = FadeState::FadeIn { progress: 0.0 };
        log::info!("Player loading {} playlist: {}", mood, profile.playlist);
    }

    /// Advance the fade (called once per tick).
    pub fn tick(&mut self, delta_ms: u32) {
        if let FadeState::FadeIn { progress } = &mut self.fade {
            if self.fade_ms == 0 {
                self.fade = FadeState::Visible;
                return;
            }
            *progress += delta_ms as f32 / self.fade_ms as f32;
            if *progress >= 1.0 {
                self.fade = FadeState::Visible;
            }
        }
    }

    /// Current opacity of the player and its shadow.
    pub fn opacity(&self) -> f32 {
        match self.fade {
            FadeState::Hidden => 0.0,
            FadeState::FadeIn { progress } => progress.clamp(0.0, 1.0),
            FadeState::Visible => 1.0,
        }
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn theme(&self) -> MoodLabel {
        self.theme
    }

    pub fn playlist(&self) -> Option<&'static str> {
        self.playlist
    }

    pub fn shadow(&self) -> Option<MoodLabel> {
        self.shadow
    }

    pub fn fade_state(&self) -> &FadeState {
        &self.fade
    }
}

impl Default for PlayerWidget {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FADE_MS)
    }
}
