//! Throttled tick loop.
//!
//! One tick at a time: pull a frame, run inference under a timeout, run
//! the pipeline, present, then sleep out the rest of the frame interval.
//! All timing goes through `tokio::time`, so a paused runtime drives the
//! loop deterministically.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Notify;
use tokio::time::Instant;

use crate::camera::{FrameSource, SourceError};
use crate::detection::{EngineError, FaceEngine};
use crate::mood::MoodEvent;
use crate::pipeline::FramePipeline;
use crate::sink::{FrameSink, Presentation, SinkError};

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Frame source failed: {0}")]
    Source(#[from] SourceError),

    #[error("Inference engine failed: {0}")]
    Engine(#[from] EngineError),

    #[error("Sink failed: {0}")]
    Sink(#[from] SinkError),
}

/// Timing knobs of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerSettings {
    /// Minimum time between tick starts
    pub interval: Duration,
    /// Longest a single inference call may take before the tick is skipped
    pub inference_timeout: Duration,
    /// Stop after this many ticks
    pub max_ticks: Option<u64>,
}

impl SchedulerSettings {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(200);
    pub const DEFAULT_INFERENCE_TIMEOUT: Duration = Duration::from_millis(1000);
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            inference_timeout: Self::DEFAULT_INFERENCE_TIMEOUT,
            max_ticks: None,
        }
    }
}

/// Tracks when the last tick started.
#[derive(Debug, Clone)]
pub struct FrameClock {
    interval: Duration,
    last_frame: Option<Instant>,
    last_delta: Duration,
}

impl FrameClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_frame: None,
            last_delta: Duration::ZERO,
        }
    }

    /// Mark the start of a tick at `now`, returning the time since the previous one.
    pub fn start_tick(&mut self, now: Instant) -> Duration {
        let delta = self
            .last_frame
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_frame = Some(now);
        self.last_delta = delta;
        delta
    }

    /// How long to sleep at `now` before the next tick may start.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.last_frame {
            Some(last) => self
                .interval
                .saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    /// Tick rate implied by the last tick-to-tick gap.
    pub fn fps(&self) -> f32 {
        if self.last_delta.is_zero() {
            return 0.0;
        }
        1.0 / self.last_delta.as_secs_f32()
    }

    pub fn last_frame(&self) -> Option<Instant> {
        self.last_frame
    }
}

/// Cloneable handle that stops a running loop, waking it from its throttle sleep.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Resolves once [`stop`](Self::stop) has been called.
    pub async fn stopped(&self) {
        while !self.is_stopped() {
            self.notify.notified().await;
        }
    }
}

/// Counters for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames pulled from the source
    pub ticks: u64,
    /// Ticks handed to the sink
    pub presented: u64,
    /// Ticks dropped because inference failed or overran
    pub skipped: u64,
    /// Mood commits during the run
    pub commits: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    settings: SchedulerSettings,
    stop: StopHandle,
}

impl Scheduler {
    pub fn new(settings: SchedulerSettings) -> Self {
        Self {
            settings,
            stop: StopHandle::new(),
        }
    }

    pub fn settings(&self) -> &SchedulerSettings {
        &self.settings
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Drive `pipeline` until the source ends, `max_ticks` is reached, or
    /// the stop handle fires.
    ///
    /// Engine failures and inference overruns skip the tick. Source and
    /// sink failures end the run.
    pub async fn run<S, E, K>(
        &self,
        pipeline: &mut FramePipeline,
        source: &mut S,
        engine: &mut E,
        sink: &mut K,
    ) -> Result<RunSummary, SchedulerError>
    where
        S: FrameSource,
        E: FaceEngine,
        K: FrameSink,
    {
        let mut clock = FrameClock::new(self.settings.interval);
        let mut summary = RunSummary::default();

        log::info!(
            "Scheduler started: interval {:?}, inference timeout {:?}",
            self.settings.interval,
            self.settings.inference_timeout
        );

        loop {
            if self.stop.is_stopped() {
                log::info!("Stop requested");
                break;
            }
            if let Some(max) = self.settings.max_ticks {
                if summary.ticks >= max {
                    log::info!("Reached {} ticks", max);
                    break;
                }
            }

            let delta = clock.start_tick(Instant::now());
            let Some(frame) = source.next_frame()? else {
                log::info!("Frame source ended");
                break;
            };
            summary.ticks += 1;

            let detected =
                tokio::time::timeout(self.settings.inference_timeout, engine.detect(&frame)).await;

            match detected {
                Ok(Ok(faces)) => {
                    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
                    let report = pipeline.process(&frame, faces, delta_ms);
                    if let Some(MoodEvent::Committed { .. }) = report.event {
                        summary.commits += 1;
                    }
                    sink.present(&Presentation {
                        sequence: frame.sequence,
                        canvas: pipeline.canvas(),
                        mood: pipeline.mood(),
                        player: pipeline.player(),
                        fps: clock.fps(),
                    })?;
                    summary.presented += 1;
                }
                Ok(Err(e)) => {
                    log::warn!("Skipping frame {}: {}", frame.sequence, e);
                    summary.skipped += 1;
                }
                Err(_) => {
                    log::warn!(
                        "Skipping frame {}: inference exceeded {:?}",
                        frame.sequence,
                        self.settings.inference_timeout
                    );
                    summary.skipped += 1;
                }
            }

            let remaining = clock.remaining(Instant::now());
            if !remaining.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(remaining) => {}
                    _ = self.stop.stopped() => {
                        log::info!("Stop requested");
                        break;
                    }
                }
            }
        }

        log::info!(
            "Scheduler finished: {} ticks, {} presented, {} skipped, {} commits",
            summary.ticks,
            summary.presented,
            summary.skipped,
            summary.commits
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_has_no_delay() {
        let mut clock = FrameClock::new(Duration::from_millis(200));
        assert_eq!(clock.remaining(Instant::now()), Duration::ZERO);
        assert_eq!(clock.start_tick(Instant::now()), Duration::ZERO);
        assert_eq!(clock.fps(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remaining_is_interval_minus_elapsed() {
        let mut clock = FrameClock::new(Duration::from_millis(200));
        clock.start_tick(Instant::now());
        tokio::time::advance(Duration::from_millis(50)).await;
        assert_eq!(clock.remaining(Instant::now()), Duration::from_millis(150));
        tokio::time::advance(Duration::from_millis(300)).await;
        assert_eq!(clock.remaining(Instant::now()), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fps_from_tick_gap() {
        let mut clock = FrameClock::new(Duration::from_millis(200));
        clock.start_tick(Instant::now());
        tokio::time::advance(Duration::from_millis(250)).await;
        let delta = clock.start_tick(Instant::now());
        assert_eq!(delta, Duration::from_millis(250));
        assert!((clock.fps() - 4.0).abs() < 1e-3);
    }

    #[tokio::test]
    async fn test_stop_handle_wakes_waiter() {
        let stop = StopHandle::new();
        let waiter = stop.clone();
        let task = tokio::spawn(async move { waiter.stopped().await });
        stop.stop();
        task.await.unwrap();
        assert!(stop.is_stopped());
    }

    #[tokio::test]
    async fn test_stopped_returns_immediately_after_stop() {
        let stop = StopHandle::new();
        stop.stop();
        stop.stopped().await;
    }

    #[test]
    fn test_default_settings() {
        let settings = SchedulerSettings::default();
        assert_eq!(settings.interval, Duration::from_millis(200));
        assert!(settings.max_ticks.is_none());
    }
}
