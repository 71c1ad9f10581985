//! Output sinks that receive each presented tick.

use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::canvas::{Canvas, CanvasError};
use crate::mood::MoodMachine;
use crate::player::PlayerWidget;
use crate::status::StatusLine;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to create output directory '{}': {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Canvas(#[from] CanvasError),

    #[error("Failed to write to terminal: {0}")]
    Io(#[from] std::io::Error),
}

/// One tick as handed to a sink.
#[derive(Debug, Clone, Copy)]
pub struct Presentation<'a> {
    /// Sequence number of the source frame
    pub sequence: u64,
    pub canvas: &'a Canvas,
    pub mood: &'a MoodMachine,
    pub player: &'a PlayerWidget,
    /// Measured tick rate
    pub fps: f32,
}

pub trait FrameSink {
    fn present(&mut self, tick: &Presentation<'_>) -> Result<(), SinkError>;
}

impl<K: FrameSink + ?Sized> FrameSink for Box<K> {
    fn present(&mut self, tick: &Presentation<'_>) -> Result<(), SinkError> {
        (**self).present(tick)
    }
}

/// Fan out to every sink in order, stopping at the first failure.
impl<K: FrameSink> FrameSink for Vec<K> {
    fn present(&mut self, tick: &Presentation<'_>) -> Result<(), SinkError> {
        for sink in self.iter_mut() {
            sink.present(tick)?;
        }
        Ok(())
    }
}

/// Writes the canvas pixel layer of every tick as `frame_000123.png`.
#[derive(Debug)]
pub struct PngSink {
    dir: PathBuf,
    written: usize,
}

impl PngSink {
    /// Sink writing into `dir`, created if missing.
    pub fn create(dir: &Path) -> Result<Self, SinkError> {
        std::fs::create_dir_all(dir).map_err(|e| SinkError::CreateDir {
            path: dir.to_path_buf(),
            source: e,
        })?;
        log::info!("Writing frames to {}", dir.display());
        Ok(Self {
            dir: dir.to_path_buf(),
            written: 0,
        })
    }

    pub fn frame_path(&self, sequence: u64) -> PathBuf {
        self.dir.join(format!("frame_{:06}.png", sequence))
    }

    /// Number of frames written so far.
    pub fn written(&self) -> usize {
        self.written
    }
}

impl FrameSink for PngSink {
    fn present(&mut self, tick: &Presentation<'_>) -> Result<(), SinkError> {
        let (width, height) = tick.canvas.dimensions();
        if width == 0 || height == 0 {
            return Ok(());
        }
        let path = self.frame_path(tick.sequence);
        tick.canvas.save_png(&path)?;
        self.written += 1;
        log::trace!("Wrote {}", path.display());
        Ok(())
    }
}

/// ANSI true-color preview: the ASCII layer redrawn in place plus a status line.
pub struct TerminalSink<W: Write> {
    out: W,
    status: StatusLine,
}

impl<W: Write> std::fmt::Debug for TerminalSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalSink")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl TerminalSink<std::io::Stdout> {
    pub fn stdout(status: StatusLine) -> Self {
        Self::new(std::io::stdout(), status)
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, status: StatusLine) -> Self {
        Self { out, status }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameSink for TerminalSink<W> {
    fn present(&mut self, tick: &Presentation<'_>) -> Result<(), SinkError> {
        // home the cursor so each tick overdraws the previous one
        write!(self.out, "\x1b[H")?;
        self.out.write_all(tick.canvas.text().to_ansi_string().as_bytes())?;
        if self.status.visible {
            write!(self.out, "\x1b[2K{}", self.status.format(tick.mood, tick.fps))?;
            if let Some(playlist) = tick.player.playlist() {
                write!(
                    self.out,
                    "| {} {:.0}% ",
                    playlist,
                    tick.player.opacity() * 100.0
                )?;
            }
            writeln!(self.out)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::{AsciiFrame, GlyphCell, MeanColor};
    use crate::mood::MoodSettings;

    fn canvas_with_text() -> Canvas {
        let mut canvas = Canvas::new(2, 1);
        canvas.paint_ascii(&AsciiFrame {
            columns: 1,
            rows: 1,
            cells: vec![GlyphCell {
                x: 0,
                y: 0,
                width: 2,
                height: 1,
                glyph: 'Q',
                color: MeanColor {
                    r: 1.0,
                    g: 2.0,
                    b: 3.0,
                },
            }],
        });
        canvas
    }

    #[test]
    fn test_png_sink_writes_numbered_frames() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("frames");
        let mut sink = PngSink::create(&out).unwrap();

        let canvas = canvas_with_text();
        let mood = MoodMachine::new(MoodSettings::default());
        let player = PlayerWidget::default();
        let tick = Presentation {
            sequence: 7,
            canvas: &canvas,
            mood: &mood,
            player: &player,
            fps: 5.0,
        };
        sink.present(&tick).unwrap();

        assert_eq!(sink.written(), 1);
        assert!(out.join("frame_000007.png").exists());
    }

    #[test]
    fn test_png_sink_skips_empty_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = PngSink::create(dir.path()).unwrap();
        let canvas = Canvas::new(0, 0);
        let mood = MoodMachine::default();
        let player = PlayerWidget::default();
        sink.present(&Presentation {
            sequence: 0,
            canvas: &canvas,
            mood: &mood,
            player: &player,
            fps: 0.0,
        })
        .unwrap();
        assert_eq!(sink.written(), 0);
    }

    #[test]
    fn test_terminal_sink_writes_ascii_and_status() {
        let canvas = canvas_with_text();
        let mood = MoodMachine::default();
        let player = PlayerWidget::default();
        let mut sink = TerminalSink::new(Vec::new(), StatusLine::new());
        sink.present(&Presentation {
            sequence: 0,
            canvas: &canvas,
            mood: &mood,
            player: &player,
            fps: 5.0,
        })
        .unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert!(text.starts_with("\x1b[H"));
        assert!(text.contains("\x1b[38;2;1;2;3mQ"));
        assert!(text.contains(" NEUTRAL | - | 5.0 fps "));
    }

    #[test]
    fn test_terminal_sink_hidden_status() {
        let canvas = canvas_with_text();
        let mood = MoodMachine::default();
        let player = PlayerWidget::default();
        let mut sink = TerminalSink::new(Vec::new(), StatusLine::with_visibility(false));
        sink.present(&Presentation {
            sequence: 0,
            canvas: &canvas,
            mood: &mood,
            player: &player,
            fps: 5.0,
        })
        .unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert!(!text.contains("fps"));
    }
}
