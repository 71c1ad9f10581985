//! mood-mirror library crate.
//!
//! Frame pipeline of an expression-driven mirror: face detections are
//! reduced to a debounced mood, which themes an ASCII rendition of the
//! video, a cartoon feature overlay and a music player widget.

pub mod ascii;
pub mod camera;
pub mod canvas;
pub mod cli;
pub mod config;
pub mod detection;
pub mod mood;
pub mod overlay;
pub mod pipeline;
pub mod player;
pub mod scheduler;
pub mod sink;
pub mod status;
