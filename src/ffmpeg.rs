//! FFmpeg initialisation and log level configuration.
//!
//! FFmpeg prints its own diagnostics to stderr, separately from the Rust
//! [`log`](https://crates.io/crates/log) facade. Since the probe document
//! usually goes to stdout, callers often want to silence or tune that
//! output without importing `ffmpeg-next` directly.
//!
//! # Example
//!
//! ```no_run
//! use probe_json::FfmpegLogLevel;
//!
//! probe_json::ffmpeg::initialize()?;
//! probe_json::set_ffmpeg_log_level("error".parse()?);
//! # Ok::<(), probe_json::ProbeError>(())
//! ```

use std::ffi::{CStr, c_char};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::sync::OnceLock;

use ffmpeg_next::util::log::Level;

use crate::error::ProbeError;

/// FFmpeg internal log verbosity, from silent to most verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FfmpegLogLevel {
    /// Print nothing.
    Quiet,
    /// Only conditions that abort the process.
    Panic,
    /// Unrecoverable errors.
    Fatal,
    /// Recoverable errors.
    Error,
    /// Warnings (FFmpeg's default).
    Warning,
    /// Informational messages.
    Info,
    /// Verbose informational messages.
    Verbose,
    /// Debugging messages.
    Debug,
    /// Everything.
    Trace,
}

impl FfmpegLogLevel {
    /// Every level, from quietest to most verbose.
    pub const ALL: [FfmpegLogLevel; 9] = [
        FfmpegLogLevel::Quiet,
        FfmpegLogLevel::Panic,
        FfmpegLogLevel::Fatal,
        FfmpegLogLevel::Error,
        FfmpegLogLevel::Warning,
        FfmpegLogLevel::Info,
        FfmpegLogLevel::Verbose,
        FfmpegLogLevel::Debug,
        FfmpegLogLevel::Trace,
    ];

    /// The name accepted by [`FromStr`] (FFmpeg's `-loglevel` spelling).
    pub fn name(self) -> &'static str {
        match self {
            FfmpegLogLevel::Quiet => "quiet",
            FfmpegLogLevel::Panic => "panic",
            FfmpegLogLevel::Fatal => "fatal",
            FfmpegLogLevel::Error => "error",
            FfmpegLogLevel::Warning => "warning",
            FfmpegLogLevel::Info => "info",
            FfmpegLogLevel::Verbose => "verbose",
            FfmpegLogLevel::Debug => "debug",
            FfmpegLogLevel::Trace => "trace",
        }
    }

    fn to_ffmpeg_level(self) -> Level {
        match self {
            FfmpegLogLevel::Quiet => Level::Quiet,
            FfmpegLogLevel::Panic => Level::Panic,
            FfmpegLogLevel::Fatal => Level::Fatal,
            FfmpegLogLevel::Error => Level::Error,
            FfmpegLogLevel::Warning => Level::Warning,
            FfmpegLogLevel::Info => Level::Info,
            FfmpegLogLevel::Verbose => Level::Verbose,
            FfmpegLogLevel::Debug => Level::Debug,
            FfmpegLogLevel::Trace => Level::Trace,
        }
    }

    fn from_ffmpeg_level(level: Level) -> Self {
        match level {
            Level::Quiet => FfmpegLogLevel::Quiet,
            Level::Panic => FfmpegLogLevel::Panic,
            Level::Fatal => FfmpegLogLevel::Fatal,
            Level::Error => FfmpegLogLevel::Error,
            Level::Warning => FfmpegLogLevel::Warning,
            Level::Info => FfmpegLogLevel::Info,
            Level::Verbose => FfmpegLogLevel::Verbose,
            Level::Debug => FfmpegLogLevel::Debug,
            Level::Trace => FfmpegLogLevel::Trace,
        }
    }
}

impl Display for FfmpegLogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

impl FromStr for FfmpegLogLevel {
    type Err = ProbeError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let wanted = text.trim().to_ascii_lowercase();
        if wanted == "warn" {
            return Ok(FfmpegLogLevel::Warning);
        }
        FfmpegLogLevel::ALL
            .into_iter()
            .find(|level| level.name() == wanted)
            .ok_or_else(|| ProbeError::InvalidOption(format!("unknown FFmpeg log level '{text}'")))
    }
}

/// Set FFmpeg's console verbosity. Does not affect the `log` facade.
pub fn set_ffmpeg_log_level(level: FfmpegLogLevel) {
    ffmpeg_next::util::log::set_level(level.to_ffmpeg_level());
}

/// FFmpeg's current console verbosity, if it maps to a known level.
pub fn get_ffmpeg_log_level() -> Option<FfmpegLogLevel> {
    ffmpeg_next::util::log::get_level()
        .ok()
        .map(FfmpegLogLevel::from_ffmpeg_level)
}

static INITIALIZED: OnceLock<Result<(), ffmpeg_next::Error>> = OnceLock::new();

/// Initialise FFmpeg's global registries once per process.
///
/// Later calls return the result of the first one.
///
/// # Errors
///
/// Returns [`ProbeError::Initialization`] if FFmpeg failed to initialise.
pub fn initialize() -> Result<(), ProbeError> {
    INITIALIZED
        .get_or_init(|| {
            log::debug!("Initialising FFmpeg");
            ffmpeg_next::init()
        })
        .clone()
        .map_err(ProbeError::from)
}

/// Copy a C string owned by FFmpeg, replacing invalid UTF-8.
///
/// # Safety
///
/// `pointer` must be null or point to a NUL-terminated string that stays
/// valid for the duration of the call.
pub(crate) unsafe fn string_from_ptr(pointer: *const c_char) -> Option<String> {
    if pointer.is_null() {
        return None;
    }
    let text = unsafe { CStr::from_ptr(pointer) };
    Some(text.to_string_lossy().into_owned())
}

/// FFmpeg's description of an error code.
pub(crate) fn error_message(code: i32) -> String {
    ffmpeg_next::Error::from(code).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_come_from_ffmpeg() {
        assert_eq!(error_message(-2), "No such file or directory");
        assert_eq!(
            error_message(-1094995529),
            "Invalid data found when processing input"
        );
        assert_eq!(error_message(-22), "Invalid argument");
    }

    #[test]
    fn parses_level_names() {
        for level in FfmpegLogLevel::ALL {
            assert_eq!(level.name().parse::<FfmpegLogLevel>().unwrap(), level);
        }
        assert_eq!("WARN".parse::<FfmpegLogLevel>().unwrap(), FfmpegLogLevel::Warning);
        assert!(matches!(
            "loud".parse::<FfmpegLogLevel>(),
            Err(ProbeError::InvalidOption(_))
        ));
    }

    #[test]
    fn set_level_round_trips() {
        initialize().unwrap();
        set_ffmpeg_log_level(FfmpegLogLevel::Error);
        assert_eq!(get_ffmpeg_log_level(), Some(FfmpegLogLevel::Error));
        set_ffmpeg_log_level(FfmpegLogLevel::Warning);
    }
}
