//! # probe-json
//!
//! Describe media containers as ffprobe-compatible JSON.
//!
//! `probe-json` turns the structural description of a media container (its
//! streams, chapters, and container-level metadata) into the document that
//! `ffprobe -show_streams -show_chapters -show_format -show_error
//! -print_format json` prints, byte for byte: same keys, same order, same
//! number formatting, and the same rules for leaving fields out.
//!
//! ## Quick Start
//!
//! ```no_run
//! use probe_json::{FfmpegInspector, ProbeOptions, render_document};
//!
//! let inspector = FfmpegInspector::new()?;
//! let (outcome, document) = render_document(&inspector, "input.mp4", &ProbeOptions::new())?;
//! print!("{document}");
//! if !outcome.is_success() {
//!     eprintln!("probe failed");
//! }
//! # Ok::<(), probe_json::ProbeError>(())
//! ```
//!
//! ## Without FFmpeg
//!
//! The document engine only reads a [`Container`] and a [`Registry`]. Both
//! can be built by hand, which is how the crate is tested:
//!
//! ```
//! use probe_json::{Container, EmptyRegistry, ProbeOptions, write_container_document};
//!
//! let container = Container::new("empty.mkv", "matroska,webm");
//! let mut out = Vec::new();
//! write_container_document(&mut out, &container, &EmptyRegistry, &ProbeOptions::new())?;
//! assert!(String::from_utf8_lossy(&out).contains("\"nb_streams\": 0"));
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! ## Layout
//!
//! - [`json`]: escaping and the object/array writers
//! - [`fields`]: per-entity field tables with their omission rules
//! - [`formatter`]: stream, chapter, format, and error formatters
//! - [`document`]: the orchestrator choosing between success and error
//!   documents
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `ffmpeg` (default) | [`FfmpegInspector`] and [`FfmpegRegistry`] backed by `ffmpeg-next`, plus the `probe-json` binary |
//!
//! ## Requirements
//!
//! The `ffmpeg` feature needs the FFmpeg development libraries installed on
//! the system.

#[cfg(feature = "ffmpeg")]
pub mod codecs;
pub mod config;
pub mod conversion;
#[cfg(feature = "ffmpeg")]
pub mod demuxer;
pub mod document;
pub mod error;
#[cfg(feature = "ffmpeg")]
pub mod ffmpeg;
pub mod fields;
pub mod formatter;
pub mod inspector;
pub mod json;
pub mod metadata;
pub mod registry;

#[cfg(feature = "ffmpeg")]
pub use codecs::FfmpegRegistry;
pub use config::ProbeOptions;
#[cfg(feature = "ffmpeg")]
pub use demuxer::FfmpegInspector;
pub use document::{
    Outcome, render_document, write_container_document, write_document, write_error_document,
};
pub use error::ProbeError;
#[cfg(feature = "ffmpeg")]
pub use ffmpeg::{FfmpegLogLevel, get_ffmpeg_log_level, set_ffmpeg_log_level};
pub use inspector::ContainerInspector;
pub use metadata::{
    AudioParameters, ChannelLayout, ChannelOrder, Chapter, CodecId, ColorKind, ColorProperties,
    ColorValue, Container, Disposition, FieldOrder, MediaType, NOPTS_VALUE, PROFILE_UNKNOWN,
    Rational, Stream, StreamKind, Tags, VideoParameters,
};
pub use registry::{CodecDescriptor, EmptyRegistry, Registry};
