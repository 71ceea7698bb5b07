//! Read-only codec lookups.
//!
//! Codec names, profile names, and sample sizes live in the media library's
//! global tables. The formatters only read them through [`Registry`], so the
//! document engine can run against synthetic streams without FFmpeg.

use crate::metadata::CodecId;

/// Names of a codec, as found in its descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecDescriptor {
    /// Short name (e.g. `"h264"`).
    pub name: String,
    /// Descriptive name (e.g. `"H.264 / AVC / MPEG-4 AVC / MPEG-4 part 10"`).
    pub long_name: Option<String>,
}

impl CodecDescriptor {
    /// A descriptor with both names.
    pub fn new(name: impl Into<String>, long_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            long_name: Some(long_name.into()),
        }
    }
}

/// Read-only codec lookup capability.
///
/// Every method has an "unknown" default so implementations only override
/// what they can answer. Implementations must be free of observable side
/// effects; one registry may serve any number of documents concurrently.
pub trait Registry {
    /// Descriptor of `codec`, if the codec is known.
    fn codec_descriptor(&self, codec: CodecId) -> Option<CodecDescriptor> {
        let _ = codec;
        None
    }

    /// Name of `profile` for `codec`, if the codec defines one.
    fn profile_name(&self, codec: CodecId, profile: i32) -> Option<String> {
        let _ = (codec, profile);
        None
    }

    /// Bits per sample implied by `codec` alone; `0` when not fixed.
    fn bits_per_sample(&self, codec: CodecId) -> i32 {
        let _ = codec;
        0
    }
}

/// A registry that knows no codecs.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyRegistry;

impl Registry for EmptyRegistry {}

impl<R: Registry + ?Sized> Registry for &R {
    fn codec_descriptor(&self, codec: CodecId) -> Option<CodecDescriptor> {
        (**self).codec_descriptor(codec)
    }

    fn profile_name(&self, codec: CodecId, profile: i32) -> Option<String> {
        (**self).profile_name(codec, profile)
    }

    fn bits_per_sample(&self, codec: CodecId) -> i32 {
        (**self).bits_per_sample(codec)
    }
}
