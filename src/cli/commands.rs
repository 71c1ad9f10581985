//! Subcommand handlers.

use std::path::Path;
use thiserror::Error;

use super::args::{ConfigAction, RunArgs};
use crate::camera::{BlankSource, FrameSource, ImageSequence, Resolution, SourceError};
use crate::config::{default_path, Config, ConfigError};
use crate::detection::{EngineError, MirroredEngine, ReplayEngine};
use crate::mood::{MoodPreset, MoodProfile, PROFILES};
use crate::overlay::{IconError, IconSet, OverlayRenderer};
use crate::pipeline::FramePipeline;
use crate::scheduler::{RunSummary, Scheduler, SchedulerError, StopHandle};
use crate::sink::{FrameSink, PngSink, SinkError, TerminalSink};
use crate::status::StatusLine;

/// Anything that stops a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error(transparent)]
    Icons(#[from] IconError),
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
    #[error("Failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Fold `run` flags into the loaded config. Flags win over the file.
pub fn apply_run_overrides(config: &mut Config, args: &RunArgs) {
    if let Some(mode) = args.mode {
        config.scheduler.mode = mode.into();
    }
    if let Some(interval) = args.interval_ms {
        config.scheduler.interval_ms = interval;
    }
    if let Some(max) = args.max_ticks {
        config.scheduler.max_ticks = Some(max);
    }
    if let Some(icons) = &args.icons {
        config.overlay.icons_dir = Some(icons.clone());
    }
    if let Some(preset) = args.preset {
        config.mood.preset = preset.into();
    }
    if args.no_gate {
        config.mood.gate = None;
        if config.mood.preset == MoodPreset::Standard {
            config.mood.preset = MoodPreset::Open;
        }
    }
    if args.no_mirror {
        config.camera.mirror = false;
    }
}

fn load_icons(dir: Option<&Path>) -> Result<IconSet, CliError> {
    match dir {
        Some(dir) => Ok(IconSet::load(dir)?),
        None => {
            log::info!("No icon directory configured, drawing without icons");
            Ok(IconSet::default())
        }
    }
}

/// Replay a recorded session until it ends or `stop` fires.
pub async fn run_session(
    args: &RunArgs,
    mut config: Config,
    stop: Option<StopHandle>,
) -> Result<RunSummary, CliError> {
    apply_run_overrides(&mut config, args);

    let replay = ReplayEngine::open(&args.detections)?;
    if config.scheduler.max_ticks.is_none() {
        config.scheduler.max_ticks = Some(replay.remaining() as u64);
    }
    // detections were recorded on unmirrored video
    let mut engine = MirroredEngine::new(replay, config.camera.mirror);

    let mut source: Box<dyn FrameSource> = match &args.frames {
        Some(dir) => Box::new(ImageSequence::open(dir, config.camera.mirror)?.looping(args.loop_frames)),
        None => Box::new(BlankSource::new(Resolution::default())),
    };

    let mut sinks: Vec<Box<dyn FrameSink>> = Vec::new();
    if let Some(dir) = &args.output {
        sinks.push(Box::new(PngSink::create(dir)?));
    }
    if args.preview {
        // clear once, later ticks redraw from the top-left corner
        print!("\x1b[2J");
        sinks.push(Box::new(TerminalSink::stdout(StatusLine::with_visibility(
            !args.no_status,
        ))));
    }
    if sinks.is_empty() {
        log::warn!("No --output or --preview given, ticks will not be shown");
    }

    let overlay = OverlayRenderer::new(load_icons(config.overlay.icons_dir.as_deref())?);
    let settings = config.pipeline_settings();
    let mut pipeline = match args.seed {
        Some(seed) => FramePipeline::seeded(settings, overlay, seed),
        None => FramePipeline::new(settings, overlay),
    };

    let scheduler = Scheduler::new(config.scheduler_settings());
    if let Some(stop) = stop {
        let handle = scheduler.stop_handle();
        tokio::spawn(async move {
            stop.stopped().await;
            handle.stop();
        });
    }

    let summary = scheduler
        .run(&mut pipeline, &mut source, &mut engine, &mut sinks)
        .await?;

    let state = pipeline.mood().state();
    println!(
        "Finished after {} ticks ({} skipped). Mood: {}",
        summary.ticks,
        summary.skipped,
        state.committed().header()
    );
    if let Some(playlist) = pipeline.player().playlist() {
        println!("Playlist: {}", playlist);
    }
    Ok(summary)
}

/// Print the mood profile table to stdout.
pub fn print_profiles() {
    println!(
        "{:<10} {:<8} {:<12} {:>6} {:>6} {:>6}  PLAYLIST",
        "MOOD", "COLOR", "ICON", "X", "Y", "W+"
    );
    for profile in &PROFILES {
        print_profile(profile);
    }
}

fn print_profile(profile: &MoodProfile) {
    println!(
        "{:<10} {:<8} {:<12} {:>6} {:>6} {:>6}  {}",
        profile.label.name(),
        profile.color_hex(),
        format!("{}.png", profile.icon),
        profile.icon_x_offset,
        profile.icon_y_offset,
        profile.icon_width_offset,
        profile.playlist
    );
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, config_path: Option<&Path>) -> Result<(), CliError> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_path);

    match action {
        ConfigAction::Show => {
            let config = Config::load(Some(&path))?;
            if path.exists() {
                println!("# Config file: {} (exists)", path.display());
            } else {
                println!("# Config file: {} (not found, showing defaults)", path.display());
            }
            println!();
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Init => {
            Config::default().write_new(&path)?;
            println!("Created config file: {}", path.display());
        }
    }
    Ok(())
}
