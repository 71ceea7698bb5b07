//! Container, stream, and chapter description types.
//!
//! These structures are the read-only input of the document formatters. A
//! [`ContainerInspector`](crate::ContainerInspector) builds one [`Container`]
//! per probed input; nothing mutates it afterwards. Values keep the units and
//! sentinels of the demuxer they came from (ticks in a time base,
//! [`NOPTS_VALUE`] for "not available", raw colour codes) so that the
//! formatters can apply the exact omission rules of ffprobe.

/// Timestamp sentinel meaning "no timestamp known" (`AV_NOPTS_VALUE`).
pub const NOPTS_VALUE: i64 = i64::MIN;

/// Profile sentinel meaning "unknown profile" (`AV_PROFILE_UNKNOWN`).
pub const PROFILE_UNKNOWN: i32 = -99;

/// Time base of container-level start time and duration (`AV_TIME_BASE_Q`).
pub const CONTAINER_TIME_BASE: Rational = Rational::new(1, 1_000_000);

/// A numerator/denominator pair.
///
/// Used for frame rates, time bases, and aspect ratios. The denominator may
/// be zero (e.g. an unknown frame rate is `0/0`); such values are still
/// rendered verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rational {
    /// Numerator.
    pub numerator: i32,
    /// Denominator.
    pub denominator: i32,
}

impl Rational {
    /// Create a rational from its two parts.
    pub const fn new(numerator: i32, denominator: i32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// The value as a double, computed the way `av_q2d` does.
    pub fn to_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Render as `num/den` (frame rates and time bases).
    pub fn to_fraction_string(self) -> String {
        format!("{}/{}", self.numerator, self.denominator)
    }

    /// Render as `num:den` (aspect ratios).
    pub fn to_ratio_string(self) -> String {
        format!("{}:{}", self.numerator, self.denominator)
    }
}

/// Opaque codec identifier, resolved through a [`Registry`](crate::Registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CodecId(pub u32);

/// Media type of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// Video stream.
    Video,
    /// Audio stream.
    Audio,
    /// Opaque data stream (timecodes, metadata tracks, ...).
    Data,
    /// Subtitle stream.
    Subtitle,
    /// Attachment (fonts, cover files, ...).
    Attachment,
    /// A media type the demuxer could not classify.
    Unknown,
}

impl MediaType {
    /// The `codec_type` string, or `None` for [`MediaType::Unknown`].
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            MediaType::Video => Some("video"),
            MediaType::Audio => Some("audio"),
            MediaType::Data => Some("data"),
            MediaType::Subtitle => Some("subtitle"),
            MediaType::Attachment => Some("attachment"),
            MediaType::Unknown => None,
        }
    }
}

/// Interlacing order of a video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldOrder {
    /// Not reported.
    #[default]
    Unknown,
    /// Progressive (no fields).
    Progressive,
    /// Top field coded and displayed first.
    TopFirst,
    /// Bottom field coded and displayed first.
    BottomFirst,
    /// Top field coded first, bottom displayed first.
    TopCodedBottomDisplayed,
    /// Bottom field coded first, top displayed first.
    BottomCodedTopDisplayed,
}

impl FieldOrder {
    /// The `field_order` string, or `None` when the order is unknown.
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            FieldOrder::Progressive => Some("progressive"),
            FieldOrder::TopFirst => Some("tt"),
            FieldOrder::BottomFirst => Some("bb"),
            FieldOrder::TopCodedBottomDisplayed => Some("tb"),
            FieldOrder::BottomCodedTopDisplayed => Some("bt"),
            FieldOrder::Unknown => None,
        }
    }
}

/// Which colour property a [`ColorValue`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorKind {
    /// `AVColorRange`.
    Range,
    /// `AVColorSpace` (matrix coefficients).
    Space,
    /// `AVColorTransferCharacteristic`.
    Transfer,
    /// `AVColorPrimaries`.
    Primaries,
    /// `AVChromaLocation`.
    ChromaLocation,
}

impl ColorKind {
    /// The raw code meaning "unspecified" for this property.
    pub const fn unspecified(self) -> i32 {
        match self {
            ColorKind::Range | ColorKind::ChromaLocation => 0,
            ColorKind::Space | ColorKind::Transfer | ColorKind::Primaries => 2,
        }
    }

    /// Output key for this property.
    pub const fn key(self) -> &'static str {
        match self {
            ColorKind::Range => "color_range",
            ColorKind::Space => "color_space",
            ColorKind::Transfer => "color_transfer",
            ColorKind::Primaries => "color_primaries",
            ColorKind::ChromaLocation => "chroma_location",
        }
    }
}

/// A colour property: the raw code reported by the demuxer and its name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColorValue {
    /// Raw enum value.
    pub code: i32,
    /// Name of `code`, if it has one.
    pub name: Option<String>,
}

impl ColorValue {
    /// A named colour value.
    pub fn named(code: i32, name: impl Into<String>) -> Self {
        Self {
            code,
            name: Some(name.into()),
        }
    }

    /// The "unspecified" value of a property.
    pub fn unspecified(kind: ColorKind) -> Self {
        Self {
            code: kind.unspecified(),
            name: Some("unknown".to_string()),
        }
    }
}

/// Colour description of a video stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorProperties {
    /// Colour range (`tv`, `pc`).
    pub range: ColorValue,
    /// Matrix coefficients (`bt709`, `bt2020nc`, ...).
    pub space: ColorValue,
    /// Transfer characteristic (`bt709`, `smpte2084`, ...).
    pub transfer: ColorValue,
    /// Colour primaries (`bt709`, `bt2020`, ...).
    pub primaries: ColorValue,
    /// Chroma sample location (`left`, `topleft`, ...).
    pub chroma_location: ColorValue,
}

impl ColorProperties {
    /// The value of one property.
    pub fn get(&self, kind: ColorKind) -> &ColorValue {
        match kind {
            ColorKind::Range => &self.range,
            ColorKind::Space => &self.space,
            ColorKind::Transfer => &self.transfer,
            ColorKind::Primaries => &self.primaries,
            ColorKind::ChromaLocation => &self.chroma_location,
        }
    }
}

impl Default for ColorProperties {
    fn default() -> Self {
        Self {
            range: ColorValue::unspecified(ColorKind::Range),
            space: ColorValue::unspecified(ColorKind::Space),
            transfer: ColorValue::unspecified(ColorKind::Transfer),
            primaries: ColorValue::unspecified(ColorKind::Primaries),
            chroma_location: ColorValue::unspecified(ColorKind::ChromaLocation),
        }
    }
}

/// Video-only codec parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VideoParameters {
    /// Frame width in pixels.
    pub width: i32,
    /// Frame height in pixels.
    pub height: i32,
    /// Decoder delay hint, reported as `has_b_frames`.
    pub video_delay: i32,
    /// Sample aspect ratio; a zero numerator means "unknown".
    pub sample_aspect_ratio: Rational,
    /// Pixel format name (e.g. `"yuv420p"`), if the format has one.
    pub pixel_format: Option<String>,
    /// Codec level.
    pub level: i32,
    /// Colour description.
    pub color: ColorProperties,
    /// Interlacing order.
    pub field_order: FieldOrder,
}

/// How the channels of an audio layout are described.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelOrder {
    /// Only the channel count is known.
    #[default]
    Unspecified,
    /// Standard channel mask order.
    Native,
    /// Explicit per-channel map.
    Custom,
    /// Ambisonic order.
    Ambisonic,
}

/// An audio channel layout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChannelLayout {
    /// Layout order.
    pub order: ChannelOrder,
    /// Number of channels.
    pub channels: i32,
    /// Textual description (e.g. `"stereo"`, `"5.1(side)"`).
    pub description: String,
}

impl ChannelLayout {
    /// A native-order layout with a description.
    pub fn native(channels: i32, description: impl Into<String>) -> Self {
        Self {
            order: ChannelOrder::Native,
            channels,
            description: description.into(),
        }
    }
}

/// Audio-only codec parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AudioParameters {
    /// Sample format name (e.g. `"fltp"`), if the format has one.
    pub sample_format: Option<String>,
    /// Sample rate in hertz.
    pub sample_rate: i32,
    /// Channel layout.
    pub channel_layout: ChannelLayout,
    /// Number of priming samples.
    pub initial_padding: i32,
}

/// Media type of a stream together with its type-specific parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamKind {
    /// A video stream.
    Video(VideoParameters),
    /// An audio stream.
    Audio(AudioParameters),
    /// Any other stream; only the shared fields are described.
    Other(MediaType),
}

impl StreamKind {
    /// The media type of this kind.
    pub fn media_type(&self) -> MediaType {
        match self {
            StreamKind::Video(_) => MediaType::Video,
            StreamKind::Audio(_) => MediaType::Audio,
            StreamKind::Other(media_type) => *media_type,
        }
    }
}

/// Stream disposition flags (`AV_DISPOSITION_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Disposition(pub u32);

impl Disposition {
    /// Preferred stream of its type.
    pub const DEFAULT: u32 = 1 << 0;
    /// Dubbed audio.
    pub const DUB: u32 = 1 << 1;
    /// Original-language track.
    pub const ORIGINAL: u32 = 1 << 2;
    /// Commentary track.
    pub const COMMENT: u32 = 1 << 3;
    /// Lyrics.
    pub const LYRICS: u32 = 1 << 4;
    /// Karaoke track.
    pub const KARAOKE: u32 = 1 << 5;
    /// Forced subtitles, shown regardless of user choice.
    pub const FORCED: u32 = 1 << 6;
    /// Intended for hearing-impaired viewers.
    pub const HEARING_IMPAIRED: u32 = 1 << 7;
    /// Intended for visually-impaired viewers.
    pub const VISUAL_IMPAIRED: u32 = 1 << 8;
    /// Audio without voice.
    pub const CLEAN_EFFECTS: u32 = 1 << 9;
    /// Cover art carried as a single-frame video stream.
    pub const ATTACHED_PIC: u32 = 1 << 10;
    /// Sparse thumbnail pictures.
    pub const TIMED_THUMBNAILS: u32 = 1 << 11;
    /// Audio not part of the scene (music, narration).
    pub const NON_DIEGETIC: u32 = 1 << 12;
    /// Captions for the hearing impaired.
    pub const CAPTIONS: u32 = 1 << 16;
    /// Textual descriptions of the video.
    pub const DESCRIPTIONS: u32 = 1 << 17;
    /// Metadata describing another stream.
    pub const METADATA: u32 = 1 << 18;
    /// Only meaningful mixed with another stream.
    pub const DEPENDENT: u32 = 1 << 19;
    /// Video made of still images.
    pub const STILL_IMAGE: u32 = 1 << 20;

    /// Every flag with its output key, in emission order.
    pub const FLAGS: [(&'static str, u32); 18] = [
        ("default", Self::DEFAULT),
        ("dub", Self::DUB),
        ("original", Self::ORIGINAL),
        ("comment", Self::COMMENT),
        ("lyrics", Self::LYRICS),
        ("karaoke", Self::KARAOKE),
        ("forced", Self::FORCED),
        ("hearing_impaired", Self::HEARING_IMPAIRED),
        ("visual_impaired", Self::VISUAL_IMPAIRED),
        ("clean_effects", Self::CLEAN_EFFECTS),
        ("attached_pic", Self::ATTACHED_PIC),
        ("timed_thumbnails", Self::TIMED_THUMBNAILS),
        ("non_diegetic", Self::NON_DIEGETIC),
        ("captions", Self::CAPTIONS),
        ("descriptions", Self::DESCRIPTIONS),
        ("metadata", Self::METADATA),
        ("dependent", Self::DEPENDENT),
        ("still_image", Self::STILL_IMAGE),
    ];

    /// Whether `flag` is set.
    pub fn contains(self, flag: u32) -> bool {
        self.0 & flag != 0
    }
}

/// Ordered string metadata (`AVDictionary`).
///
/// Iteration follows insertion order. Keys are unique: inserting an
/// existing key replaces its value in place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tags {
    entries: Vec<(String, String)>,
}

impl Tags {
    /// An empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a tag.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up a tag by exact key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no tags.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tags = Tags::new();
        for (key, value) in iter {
            tags.insert(key, value);
        }
        tags
    }
}

/// One elementary stream of a container.
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    /// Zero-based position in the container's stream list.
    pub index: usize,
    /// Format-specific stream identifier (e.g. an MPEG-TS PID).
    pub id: i32,
    /// Media type and type-specific parameters.
    pub kind: StreamKind,
    /// Codec identifier.
    pub codec_id: CodecId,
    /// Codec profile, or [`PROFILE_UNKNOWN`].
    pub profile: i32,
    /// Raw fourcc codec tag.
    pub codec_tag: u32,
    /// Lowest common multiple of all frame rates in the stream.
    pub r_frame_rate: Rational,
    /// Average frame rate.
    pub avg_frame_rate: Rational,
    /// Unit of `start_time` and `duration`.
    pub time_base: Rational,
    /// First presentation timestamp, or [`NOPTS_VALUE`].
    pub start_time: i64,
    /// Duration in `time_base` ticks, [`NOPTS_VALUE`] or `0` when unknown.
    pub duration: i64,
    /// Bit rate in bits per second; `0` when unknown.
    pub bit_rate: i64,
    /// Frame count reported by the container; `0` when unknown.
    pub nb_frames: i64,
    /// Size of the codec extradata in bytes.
    pub extradata_size: i32,
    /// Disposition flags.
    pub disposition: Disposition,
    /// Stream metadata.
    pub tags: Tags,
}

impl Stream {
    /// A stream with every optional value unknown.
    pub fn new(index: usize, kind: StreamKind) -> Self {
        Self {
            index,
            id: 0,
            kind,
            codec_id: CodecId::default(),
            profile: PROFILE_UNKNOWN,
            codec_tag: 0,
            r_frame_rate: Rational::new(0, 0),
            avg_frame_rate: Rational::new(0, 0),
            time_base: Rational::new(0, 0),
            start_time: NOPTS_VALUE,
            duration: NOPTS_VALUE,
            bit_rate: 0,
            nb_frames: 0,
            extradata_size: 0,
            disposition: Disposition::default(),
            tags: Tags::new(),
        }
    }

    /// The stream's media type.
    pub fn media_type(&self) -> MediaType {
        self.kind.media_type()
    }

    /// Video parameters, if this is a video stream.
    pub fn video(&self) -> Option<&VideoParameters> {
        match &self.kind {
            StreamKind::Video(video) => Some(video),
            _ => None,
        }
    }

    /// Audio parameters, if this is an audio stream.
    pub fn audio(&self) -> Option<&AudioParameters> {
        match &self.kind {
            StreamKind::Audio(audio) => Some(audio),
            _ => None,
        }
    }
}

/// A chapter marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// Container-assigned chapter id.
    pub id: i64,
    /// Unit of `start` and `end`; independent of any stream.
    pub time_base: Rational,
    /// Start in `time_base` ticks.
    pub start: i64,
    /// End in `time_base` ticks.
    pub end: i64,
    /// Chapter metadata (usually `title`).
    pub tags: Tags,
}

/// A probed media container.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    /// Path or URL the container was opened from.
    pub url: String,
    /// Short demuxer name (e.g. `"mov,mp4,m4a,3gp,3g2,mj2"`).
    pub format_name: String,
    /// Descriptive demuxer name.
    pub format_long_name: Option<String>,
    /// Whether the format carries meaningful stream ids (`AVFMT_SHOW_IDS`).
    pub show_ids: bool,
    /// Start time in [`CONTAINER_TIME_BASE`] ticks, or [`NOPTS_VALUE`].
    pub start_time: i64,
    /// Duration in [`CONTAINER_TIME_BASE`] ticks, or [`NOPTS_VALUE`].
    pub duration: i64,
    /// Size of the underlying byte stream, when it can be determined.
    pub size: Option<u64>,
    /// Overall bit rate; `0` when unknown.
    pub bit_rate: i64,
    /// Demuxer probe confidence (0–100).
    pub probe_score: i32,
    /// Number of programs (MPEG-TS and similar).
    pub nb_programs: u32,
    /// Streams in container order.
    pub streams: Vec<Stream>,
    /// Chapters in container order.
    pub chapters: Vec<Chapter>,
    /// Container metadata.
    pub tags: Tags,
}

impl Container {
    /// An empty container with every optional value unknown.
    pub fn new(url: impl Into<String>, format_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            format_name: format_name.into(),
            format_long_name: None,
            show_ids: false,
            start_time: NOPTS_VALUE,
            duration: NOPTS_VALUE,
            size: None,
            bit_rate: 0,
            probe_score: 0,
            nb_programs: 0,
            streams: Vec::new(),
            chapters: Vec::new(),
            tags: Tags::new(),
        }
    }
}
