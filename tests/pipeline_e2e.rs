//! End-to-end tests for the mood pipeline.
//!
//! Drives the scheduler with recorded detections and checks what reaches
//! the sink:
//! - a sustained happy face commits happy and loads the happy playlist
//! - a different label interrupts a ramp and restarts it
//! - a tick without a face leaves the mood and the overlay untouched

use image::RgbaImage;
use std::time::Duration;

use mood_mirror::camera::{BlankSource, Resolution};
use mood_mirror::detection::{BoundingBox, RawDetection, ReplayEngine};
use mood_mirror::mood::{MoodLabel, MoodProfile, MoodSettings, MoodState};
use mood_mirror::overlay::OverlayRenderer;
use mood_mirror::pipeline::{FramePipeline, PipelineSettings, RenderMode};
use mood_mirror::scheduler::{Scheduler, SchedulerSettings};
use mood_mirror::sink::{FrameSink, Presentation, SinkError};

// ============================================================================
// Test Helpers
// ============================================================================

const SMALL: Resolution = Resolution {
    width: 160,
    height: 120,
};

/// What a sink saw on one tick.
#[derive(Debug, Clone)]
struct Presented {
    sequence: u64,
    state: MoodState,
    header: String,
    playlist: Option<&'static str>,
    pixels: RgbaImage,
}

#[derive(Debug, Default)]
struct RecordingSink {
    ticks: Vec<Presented>,
}

impl FrameSink for RecordingSink {
    fn present(&mut self, tick: &Presentation<'_>) -> Result<(), SinkError> {
        self.ticks.push(Presented {
            sequence: tick.sequence,
            state: tick.mood.state().clone(),
            header: tick.player.header().to_string(),
            playlist: tick.player.playlist(),
            pixels: tick.canvas.pixels().clone(),
        });
        Ok(())
    }
}

fn face(expressions: &[(MoodLabel, f32)]) -> Vec<RawDetection> {
    let mut raw = RawDetection::canonical_face(BoundingBox {
        x: 30.0,
        y: 20.0,
        width: 100.0,
        height: 90.0,
    });
    for &(label, p) in expressions {
        raw = raw.with_expression(label, p);
    }
    vec![raw]
}

fn pipeline(mode: RenderMode) -> FramePipeline {
    let settings = PipelineSettings {
        mood: MoodSettings::default(),
        mode,
        ..PipelineSettings::default()
    };
    FramePipeline::seeded(settings, OverlayRenderer::default(), 11)
}

async fn replay(
    pipeline: &mut FramePipeline,
    ticks: Vec<Vec<RawDetection>>,
) -> RecordingSink {
    let count = ticks.len() as u64;
    let mut engine = ReplayEngine::from_ticks(ticks);
    let mut source = BlankSource::new(SMALL);
    let mut sink = RecordingSink::default();
    let scheduler = Scheduler::new(SchedulerSettings {
        interval: Duration::from_millis(200),
        inference_timeout: Duration::from_millis(500),
        max_ticks: Some(count),
    });

    let summary = scheduler
        .run(pipeline, &mut source, &mut engine, &mut sink)
        .await
        .expect("replay should not fail");
    assert_eq!(summary.ticks, count);
    assert_eq!(summary.presented, count);
    sink
}

// ============================================================================
// Sustained expression commits
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_sustained_happy_commits_after_ramp() {
    let happy = face(&[(MoodLabel::Happy, 0.95), (MoodLabel::Neutral, 0.05)]);
    let mut p = pipeline(RenderMode::Both);
    let sink = replay(&mut p, vec![happy; 30]).await;

    // tick 1 starts the transition, 24 advances reach 96, the next commits
    let before = &sink.ticks[24].state;
    assert_eq!(before.committed(), MoodLabel::Neutral);
    assert_eq!(before.pending(), Some(MoodLabel::Happy));
    assert_eq!(before.ramp_progress(), 96);

    let at_commit = &sink.ticks[25].state;
    assert_eq!(at_commit.committed(), MoodLabel::Happy);
    assert!(at_commit.is_fully_committed());

    let last = sink.ticks.last().unwrap();
    assert_eq!(last.state.committed(), MoodLabel::Happy);
    assert_eq!(last.header, "HAPPY");
    assert_eq!(
        last.playlist,
        Some(MoodProfile::for_mood(MoodLabel::Happy).unwrap().playlist)
    );
    assert_eq!(p.player().theme(), MoodLabel::Happy);
}

#[tokio::test(start_paused = true)]
async fn test_sequences_follow_source_frames() {
    let mut p = pipeline(RenderMode::Ascii);
    let sink = replay(&mut p, vec![Vec::new(); 4]).await;
    let sequences: Vec<u64> = sink.ticks.iter().map(|t| t.sequence).collect();
    assert_eq!(sequences, vec![0, 1, 2, 3]);
}

// ============================================================================
// Interrupted transition
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_new_label_restarts_ramp() {
    let mut p = pipeline(RenderMode::Both);
    let sink = replay(
        &mut p,
        vec![
            face(&[(MoodLabel::Happy, 0.9)]),
            face(&[(MoodLabel::Sad, 0.85)]),
        ],
    )
    .await;

    let state = &sink.ticks[1].state;
    assert_eq!(state.pending(), Some(MoodLabel::Sad));
    assert_eq!(state.ramp_progress(), 0);
    assert_eq!(state.committed(), MoodLabel::Neutral);
    assert_eq!(sink.ticks[1].playlist, None);
}

#[tokio::test(start_paused = true)]
async fn test_low_confidence_and_excluded_labels_are_ignored() {
    let mut p = pipeline(RenderMode::Both);
    let sink = replay(
        &mut p,
        vec![
            face(&[(MoodLabel::Happy, 0.9)]),
            face(&[(MoodLabel::Sad, 0.7)]),
            face(&[(MoodLabel::Fearful, 0.99)]),
            face(&[(MoodLabel::Happy, 0.9)]),
        ],
    )
    .await;

    let state = &sink.ticks[3].state;
    assert_eq!(state.pending(), Some(MoodLabel::Happy));
    assert_eq!(state.ramp_progress(), 4);
}

// ============================================================================
// Missing face
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_no_face_holds_state_and_overlay() {
    let happy = face(&[(MoodLabel::Happy, 0.95)]);
    let mut ticks = vec![happy; 30];
    ticks.push(Vec::new());
    ticks.push(Vec::new());

    let mut p = pipeline(RenderMode::Overlay);
    let sink = replay(&mut p, ticks).await;

    let with_face = &sink.ticks[29];
    assert_eq!(with_face.state.committed(), MoodLabel::Happy);
    assert!(with_face.pixels.pixels().any(|px| px.0 == [0x48, 0xac, 0x8e, 255]));

    for missing in &sink.ticks[30..] {
        assert_eq!(missing.state, with_face.state);
        assert_eq!(missing.pixels, with_face.pixels);
    }
}

#[tokio::test(start_paused = true)]
async fn test_no_face_in_both_mode_keeps_overlay_on_fresh_ascii() {
    let happy = face(&[(MoodLabel::Happy, 0.95)]);
    let mut p = pipeline(RenderMode::Both);
    let sink = replay(&mut p, vec![happy, Vec::new()]).await;

    let pending = sink.ticks[0].state.clone();
    assert_eq!(sink.ticks[1].state, pending);
    // black video: the overlay is the only thing not painted black
    let colored = |img: &RgbaImage| {
        img.pixels()
            .filter(|px| px.0 == [0xac, 0x7e, 0x48, 255])
            .count()
    };
    assert!(colored(&sink.ticks[0].pixels) > 0);
    assert_eq!(colored(&sink.ticks[0].pixels), colored(&sink.ticks[1].pixels));
}
