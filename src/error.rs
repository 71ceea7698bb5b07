//! Error types for the `probe-json` crate.
//!
//! This module defines [`ProbeError`], the unified error type returned by all
//! fallible operations in the crate. The two probe failure kinds carry the
//! numeric code and message that end up in the `error` document; everything
//! else describes a problem with the caller's setup or the output sink.

use std::io::Error as IoError;

use thiserror::Error;

/// The unified error type for all `probe-json` operations.
///
/// [`Open`](ProbeError::Open) and [`StreamInfo`](ProbeError::StreamInfo) are
/// the only failures the [document orchestrator](crate::document) turns into
/// an `error` document. The remaining variants are returned to the caller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProbeError {
    /// The input could not be opened or recognised as a media container.
    #[error("Failed to open {url}: {message}")]
    Open {
        /// Path or URL that was passed to the inspector.
        url: String,
        /// Negative error code reported by the demuxer.
        code: i32,
        /// Human-readable description of `code`.
        message: String,
    },

    /// The container was opened but its stream information could not be
    /// resolved.
    #[error("Failed to read stream information from {url}: {message}")]
    StreamInfo {
        /// Path or URL that was passed to the inspector.
        url: String,
        /// Negative error code reported by the demuxer.
        code: i32,
        /// Human-readable description of `code`.
        message: String,
    },

    /// The media libraries could not be initialised.
    #[error("Initialisation failed: {0}")]
    Initialization(String),

    /// A [`ProbeOptions`](crate::ProbeOptions) combination was rejected.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Writing the document to its destination failed.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),
}

impl ProbeError {
    /// The `(code, message)` pair for the probe failure kinds.
    ///
    /// Returns `None` for errors that are not reported through an `error`
    /// document.
    pub fn failure(&self) -> Option<(i32, &str)> {
        match self {
            ProbeError::Open { code, message, .. }
            | ProbeError::StreamInfo { code, message, .. } => Some((*code, message.as_str())),
            _ => None,
        }
    }
}

#[cfg(feature = "ffmpeg")]
impl From<ffmpeg_next::Error> for ProbeError {
    fn from(error: ffmpeg_next::Error) -> Self {
        ProbeError::Initialization(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::ProbeError;

    #[test]
    fn failure_exposes_code_and_message() {
        let error = ProbeError::Open {
            url: "missing.mp4".to_string(),
            code: -2,
            message: "No such file or directory".to_string(),
        };
        assert_eq!(error.failure(), Some((-2, "No such file or directory")));
        assert_eq!(
            error.to_string(),
            "Failed to open missing.mp4: No such file or directory"
        );
    }

    #[test]
    fn io_errors_are_not_probe_failures() {
        let error = ProbeError::from(std::io::Error::other("broken pipe"));
        assert!(error.failure().is_none());
    }

    #[cfg(feature = "ffmpeg")]
    #[test]
    fn ffmpeg_errors_become_initialization_errors() {
        let error = ProbeError::from(ffmpeg_next::Error::Bug);
        assert!(matches!(error, ProbeError::Initialization(_)));
        assert!(error.failure().is_none());
    }
}
