//! Per-tick frame pipeline.
//!
//! Runs one frame and its detections through the adapter, classifier and
//! mood machine, then redraws the canvas for the active render mode.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::ascii::{AsciiRasterizer, CellGeometry, GlyphRange};
use crate::camera::Frame;
use crate::canvas::Canvas;
use crate::detection::{adapt, DetectionSnapshot, RawDetection};
use crate::mood::{classify, Classification, MoodEvent, MoodMachine, MoodSettings};
use crate::overlay::OverlayRenderer;
use crate::player::PlayerWidget;

/// Which layers are drawn each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// ASCII rendition only
    Ascii,
    /// Feature overlay and icon only
    Overlay,
    /// ASCII with the overlay on top
    #[default]
    Both,
}

impl RenderMode {
    pub fn draws_ascii(self) -> bool {
        matches!(self, RenderMode::Ascii | RenderMode::Both)
    }

    pub fn draws_overlay(self) -> bool {
        matches!(self, RenderMode::Overlay | RenderMode::Both)
    }

    pub fn name(self) -> &'static str {
        match self {
            RenderMode::Ascii => "ascii",
            RenderMode::Overlay => "overlay",
            RenderMode::Both => "both",
        }
    }
}

/// Everything the pipeline needs besides icons.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub mood: MoodSettings,
    pub mode: RenderMode,
    pub cell: CellGeometry,
    pub glyphs: GlyphRange,
    /// Player fade-in duration in milliseconds
    pub fade_ms: u32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            mood: MoodSettings::default(),
            mode: RenderMode::default(),
            cell: CellGeometry::default(),
            glyphs: GlyphRange::default(),
            fade_ms: PlayerWidget::DEFAULT_FADE_MS,
        }
    }
}

/// What happened on one tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickReport {
    /// A usable face was detected
    pub face_present: bool,
    /// Arg-max reading, if the face carried expression data
    pub reading: Option<Classification>,
    /// Mood machine change caused by the reading
    pub event: Option<MoodEvent>,
}

impl TickReport {
    pub fn committed(&self) -> bool {
        matches!(self.event, Some(MoodEvent::Committed { .. }))
    }
}

/// Owns all per-session state; only the scheduler drives it.
#[derive(Debug)]
pub struct FramePipeline {
    mood: MoodMachine,
    last_snapshot: Option<DetectionSnapshot>,
    rasterizer: AsciiRasterizer,
    overlay: OverlayRenderer,
    canvas: Canvas,
    player: PlayerWidget,
    mode: RenderMode,
    rng: StdRng,
}

impl FramePipeline {
    pub fn new(settings: PipelineSettings, overlay: OverlayRenderer) -> Self {
        Self::with_rng(settings, overlay, StdRng::from_entropy())
    }

    /// Pipeline whose glyph choices are reproducible.
    pub fn seeded(settings: PipelineSettings, overlay: OverlayRenderer, seed: u64) -> Self {
        Self::with_rng(settings, overlay, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: PipelineSettings, overlay: OverlayRenderer, rng: StdRng) -> Self {
        Self {
            mood: MoodMachine::new(settings.mood),
            last_snapshot: None,
            rasterizer: AsciiRasterizer::new(settings.cell, settings.glyphs),
            overlay,
            canvas: Canvas::new(0, 0),
            player: PlayerWidget::new(settings.fade_ms),
            mode: settings.mode,
            rng,
        }
    }

    /// Run one tick.
    ///
    /// `faces` is the engine output for `frame`; `delta_ms` is the time
    /// since the previous tick and drives the player fade.
    pub fn process(&mut self, frame: &Frame, faces: Vec<RawDetection>, delta_ms: u32) -> TickReport {
        self.canvas.resize(frame.width, frame.height);

        let mut report = TickReport::default();
        let snapshot = adapt(faces);

        if let Some(snapshot) = snapshot {
            report.face_present = true;
            match classify(&snapshot.expressions) {
                Ok(reading) => {
                    log::trace!(
                        "Frame {}: read {} ({:.2})",
                        frame.sequence,
                        reading.label,
                        reading.confidence
                    );
                    report.reading = Some(reading);
                    report.event = self.mood.observe(reading);
                }
                Err(e) => {
                    log::warn!("Frame {}: skipping mood evaluation: {}", frame.sequence, e);
                }
            }
            self.last_snapshot = Some(snapshot);
        } else {
            log::debug!("Frame {}: no face", frame.sequence);
        }

        if let Some(MoodEvent::Committed { mood }) = report.event {
            self.player.commit(mood);
        }

        self.draw(frame, report.face_present);
        self.player.tick(delta_ms);
        report
    }

    fn draw(&mut self, frame: &Frame, face_present: bool) {
        // overlay-only output holds the last drawing until a face returns
        if !face_present && !self.mode.draws_ascii() {
            return;
        }

        self.canvas.clear();

        if self.mode.draws_ascii() {
            let ascii = self.rasterizer.rasterize(frame, &mut self.rng);
            self.canvas.paint_ascii(&ascii);
        }

        if self.mode.draws_overlay() {
            if let Some(snapshot) = &self.last_snapshot {
                self.overlay
                    .render(&mut self.canvas, snapshot, self.mood.state().committed());
            }
        }
    }

    pub fn mood(&self) -> &MoodMachine {
        &self.mood
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn player(&self) -> &PlayerWidget {
        &self.player
    }

    pub fn last_snapshot(&self) -> Option<&DetectionSnapshot> {
        self.last_snapshot.as_ref()
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }
}
