//! Document configuration.
//!
//! [`ProbeOptions`] is a builder selecting which sections a success document
//! contains, mirroring ffprobe's `-show_streams`, `-show_chapters` and
//! `-show_format`. The default enables all three.
//!
//! # Example
//!
//! ```
//! use probe_json::ProbeOptions;
//!
//! let options = ProbeOptions::new().with_chapters(false);
//! assert!(options.streams());
//! assert!(!options.chapters());
//! assert!(options.validate().is_ok());
//! ```

use crate::error::ProbeError;

/// Sections of a success document.
///
/// The `error` section is not configurable: a probe failure always produces
/// the error document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOptions {
    streams: bool,
    chapters: bool,
    format: bool,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbeOptions {
    /// Options producing the full document (streams, chapters, format).
    pub fn new() -> Self {
        Self {
            streams: true,
            chapters: true,
            format: true,
        }
    }

    /// Include or drop the `streams` array.
    #[must_use]
    pub fn with_streams(mut self, enabled: bool) -> Self {
        self.streams = enabled;
        self
    }

    /// Include or drop the `chapters` array.
    #[must_use]
    pub fn with_chapters(mut self, enabled: bool) -> Self {
        self.chapters = enabled;
        self
    }

    /// Include or drop the `format` object.
    #[must_use]
    pub fn with_format(mut self, enabled: bool) -> Self {
        self.format = enabled;
        self
    }

    /// Whether the `streams` array is written.
    pub fn streams(&self) -> bool {
        self.streams
    }

    /// Whether the `chapters` array is written.
    pub fn chapters(&self) -> bool {
        self.chapters
    }

    /// Whether the `format` object is written.
    pub fn format(&self) -> bool {
        self.format
    }

    /// Check that at least one section is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::InvalidOption`] when every section is disabled.
    pub fn validate(&self) -> Result<(), ProbeError> {
        if !(self.streams || self.chapters || self.format) {
            return Err(ProbeError::InvalidOption(
                "at least one of streams, chapters or format must be enabled".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_every_section() {
        let options = ProbeOptions::default();
        assert!(options.streams() && options.chapters() && options.format());
        assert_eq!(options, ProbeOptions::new());
    }

    #[test]
    fn rejects_empty_selection() {
        let options = ProbeOptions::new()
            .with_streams(false)
            .with_chapters(false)
            .with_format(false);
        assert!(matches!(options.validate(), Err(ProbeError::InvalidOption(_))));
        assert!(options.with_format(true).validate().is_ok());
    }
}
