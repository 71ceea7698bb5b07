//! Codec lookups backed by libavcodec.

use std::collections::HashMap;
use std::ptr;

use ffmpeg_sys_next::AVCodecID;

use crate::error::ProbeError;
use crate::ffmpeg::{initialize, string_from_ptr};
use crate::metadata::CodecId;
use crate::registry::{CodecDescriptor, Registry};

struct Entry {
    id: AVCodecID,
    descriptor: CodecDescriptor,
}

/// [`Registry`] over libavcodec's codec descriptor table.
///
/// The descriptor table is copied once at construction; profile names and
/// sample sizes are looked up on demand.
pub struct FfmpegRegistry {
    entries: HashMap<u32, Entry>,
}

impl FfmpegRegistry {
    /// Read the descriptor table.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Initialization`] if FFmpeg cannot be initialised.
    pub fn new() -> Result<Self, ProbeError> {
        initialize()?;

        let mut entries = HashMap::new();
        // SAFETY: avcodec_descriptor_next walks a static table and returns
        // null after the last entry. Descriptor names are static strings.
        unsafe {
            let mut descriptor = ffmpeg_sys_next::avcodec_descriptor_next(ptr::null());
            while !descriptor.is_null() {
                let id = (*descriptor).id;
                if let Some(name) = string_from_ptr((*descriptor).name) {
                    let long_name = string_from_ptr((*descriptor).long_name);
                    entries.insert(
                        id as u32,
                        Entry {
                            id,
                            descriptor: CodecDescriptor { name, long_name },
                        },
                    );
                }
                descriptor = ffmpeg_sys_next::avcodec_descriptor_next(descriptor);
            }
        }

        log::debug!("Loaded {} codec descriptors", entries.len());
        Ok(Self { entries })
    }

    /// The codec id FFmpeg uses for `name`, if a descriptor has that name.
    pub fn codec_id(&self, name: &str) -> Option<CodecId> {
        self.entries
            .iter()
            .find(|(_, entry)| entry.descriptor.name == name)
            .map(|(id, _)| CodecId(*id))
    }
}

impl Registry for FfmpegRegistry {
    fn codec_descriptor(&self, codec: CodecId) -> Option<CodecDescriptor> {
        self.entries
            .get(&codec.0)
            .map(|entry| entry.descriptor.clone())
    }

    fn profile_name(&self, codec: CodecId, profile: i32) -> Option<String> {
        let entry = self.entries.get(&codec.0)?;
        // SAFETY: the id comes from the descriptor table; the returned name
        // is null or a static string.
        unsafe { string_from_ptr(ffmpeg_sys_next::avcodec_profile_name(entry.id, profile)) }
    }

    fn bits_per_sample(&self, codec: CodecId) -> i32 {
        match self.entries.get(&codec.0) {
            // SAFETY: pure lookup on a valid codec id.
            Some(entry) => unsafe { ffmpeg_sys_next::av_get_bits_per_sample(entry.id) },
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knows_common_codecs() {
        let registry = FfmpegRegistry::new().unwrap();
        let h264 = registry.codec_id("h264").unwrap();
        let descriptor = registry.codec_descriptor(h264).unwrap();
        assert_eq!(descriptor.name, "h264");
        assert_eq!(
            descriptor.long_name.as_deref(),
            Some("H.264 / AVC / MPEG-4 AVC / MPEG-4 part 10")
        );
        assert_eq!(registry.profile_name(h264, 100).as_deref(), Some("High"));
        assert_eq!(registry.profile_name(h264, 12345), None);
    }

    #[test]
    fn bits_per_sample_only_for_fixed_size_codecs() {
        let registry = FfmpegRegistry::new().unwrap();
        let pcm = registry.codec_id("pcm_s16le").unwrap();
        let aac = registry.codec_id("aac").unwrap();
        assert_eq!(registry.bits_per_sample(pcm), 16);
        assert_eq!(registry.bits_per_sample(aac), 0);
        assert_eq!(registry.bits_per_sample(CodecId(u32::MAX)), 0);
        assert!(registry.codec_descriptor(CodecId(u32::MAX)).is_none());
    }
}
