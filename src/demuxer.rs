//! Container inspection backed by libavformat.
//!
//! [`FfmpegInspector`] opens an input with `avformat_open_input`, resolves
//! stream parameters with `avformat_find_stream_info`, and copies everything
//! the document needs into a [`Container`]. The demuxer context is owned by
//! an `ffmpeg_next` [`Input`] from the moment it is opened, so it is closed
//! on every return path.
//!
//! Codec parameters are read straight from `AVCodecParameters`: the
//! `ffmpeg-next` accessors convert raw values into Rust enums, which loses
//! the codes the document needs to print verbatim.

use std::ffi::{CString, c_char, c_int};
use std::ptr;

use ffmpeg_next::DictionaryRef;
use ffmpeg_next::format::context::Input;
use ffmpeg_next::format::stream::Stream as InputStream;
use ffmpeg_next::media::Type;
use ffmpeg_sys_next::{
    AVChannelLayout, AVChannelOrder, AVCodecParameters, AVFieldOrder, AVFormatContext,
    AVSampleFormat,
};

use crate::codecs::FfmpegRegistry;
use crate::error::ProbeError;
use crate::ffmpeg::{error_message, initialize, string_from_ptr};
use crate::inspector::ContainerInspector;
use crate::metadata::{
    AudioParameters, ChannelLayout, ChannelOrder, Chapter, CodecId, ColorProperties, ColorValue,
    Container, Disposition, FieldOrder, MediaType, Rational, Stream, StreamKind, Tags,
    VideoParameters,
};
use crate::registry::Registry;

/// `AVERROR(EINVAL)`, reported for URLs FFmpeg cannot even receive.
const INVALID_ARGUMENT: i32 = -22;

const SAMPLE_FORMATS: [AVSampleFormat; 12] = [
    AVSampleFormat::AV_SAMPLE_FMT_U8,
    AVSampleFormat::AV_SAMPLE_FMT_S16,
    AVSampleFormat::AV_SAMPLE_FMT_S32,
    AVSampleFormat::AV_SAMPLE_FMT_FLT,
    AVSampleFormat::AV_SAMPLE_FMT_DBL,
    AVSampleFormat::AV_SAMPLE_FMT_U8P,
    AVSampleFormat::AV_SAMPLE_FMT_S16P,
    AVSampleFormat::AV_SAMPLE_FMT_S32P,
    AVSampleFormat::AV_SAMPLE_FMT_FLTP,
    AVSampleFormat::AV_SAMPLE_FMT_DBLP,
    AVSampleFormat::AV_SAMPLE_FMT_S64,
    AVSampleFormat::AV_SAMPLE_FMT_S64P,
];

/// [`ContainerInspector`] backed by FFmpeg.
///
/// # Example
///
/// ```no_run
/// use probe_json::{ContainerInspector, FfmpegInspector};
///
/// let inspector = FfmpegInspector::new()?;
/// let container = inspector.inspect("input.mkv")?;
/// println!("{} streams", container.streams.len());
/// # Ok::<(), probe_json::ProbeError>(())
/// ```
pub struct FfmpegInspector {
    registry: FfmpegRegistry,
}

impl FfmpegInspector {
    /// Initialise FFmpeg and load its codec registry.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Initialization`] if FFmpeg cannot be initialised.
    pub fn new() -> Result<Self, ProbeError> {
        Ok(Self {
            registry: FfmpegRegistry::new()?,
        })
    }
}

impl ContainerInspector for FfmpegInspector {
    fn inspect(&self, url: &str) -> Result<Container, ProbeError> {
        let mut input = open(url)?;

        // SAFETY: `input` owns a context that avformat_open_input returned.
        let code =
            unsafe { ffmpeg_sys_next::avformat_find_stream_info(input.as_mut_ptr(), ptr::null_mut()) };
        if code < 0 {
            return Err(ProbeError::StreamInfo {
                url: url.to_string(),
                code,
                message: error_message(code),
            });
        }

        let container = snapshot(url, &input);
        log::debug!(
            "Read {} streams and {} chapters from {url}",
            container.streams.len(),
            container.chapters.len()
        );
        Ok(container)
    }

    fn registry(&self) -> &dyn Registry {
        &self.registry
    }
}

fn open(url: &str) -> Result<Input, ProbeError> {
    initialize()?;

    let path = CString::new(url).map_err(|_| ProbeError::Open {
        url: url.to_string(),
        code: INVALID_ARGUMENT,
        message: error_message(INVALID_ARGUMENT),
    })?;

    let mut context: *mut AVFormatContext = ptr::null_mut();
    // SAFETY: on failure avformat_open_input frees the context and leaves
    // the pointer null; on success the context is handed to `Input`.
    unsafe {
        let code = ffmpeg_sys_next::avformat_open_input(
            &mut context,
            path.as_ptr(),
            ptr::null(),
            ptr::null_mut(),
        );
        if code < 0 {
            return Err(ProbeError::Open {
                url: url.to_string(),
                code,
                message: error_message(code),
            });
        }
        Ok(Input::wrap(context))
    }
}

/// Copy the description of an opened, probed input.
fn snapshot(url: &str, input: &Input) -> Container {
    let mut container = Container::new(url, input.format().name());
    container.duration = input.duration();
    container.bit_rate = input.bit_rate();
    container.tags = read_tags(&input.metadata());

    // SAFETY: `input` owns a live context for the whole borrow.
    unsafe {
        let format = &*input.as_ptr();
        let input_format = format.iformat;
        if !input_format.is_null() {
            container.format_long_name = string_from_ptr((*input_format).long_name);
            container.show_ids =
                (*input_format).flags & ffmpeg_sys_next::AVFMT_SHOW_IDS as c_int != 0;
        }
        container.start_time = format.start_time;
        container.probe_score = format.probe_score;
        container.nb_programs = format.nb_programs;
        if !format.pb.is_null() {
            let size = ffmpeg_sys_next::avio_size(format.pb);
            container.size = u64::try_from(size).ok();
        }
    }

    container.streams = input
        .streams()
        .map(|stream| read_stream(input, &stream))
        .collect();

    container.chapters = input
        .chapters()
        .map(|chapter| Chapter {
            id: i64::from(chapter.id()),
            time_base: rational(chapter.time_base()),
            start: chapter.start(),
            end: chapter.end(),
            tags: read_tags(&chapter.metadata()),
        })
        .collect();

    container
}

fn read_stream(input: &Input, stream: &InputStream<'_>) -> Stream {
    // SAFETY: the codec parameters live as long as the stream.
    let parameters = unsafe { &*(*stream.as_ptr()).codecpar };

    let kind = match stream.parameters().medium() {
        Type::Video => {
            // SAFETY: both pointers belong to the live input.
            let sample_aspect_ratio = unsafe {
                ffmpeg_sys_next::av_guess_sample_aspect_ratio(
                    input.as_ptr().cast_mut(),
                    stream.as_ptr().cast_mut(),
                    ptr::null_mut(),
                )
            };
            StreamKind::Video(read_video(
                parameters,
                rational(sample_aspect_ratio.into()),
            ))
        }
        Type::Audio => StreamKind::Audio(read_audio(parameters)),
        Type::Data => StreamKind::Other(MediaType::Data),
        Type::Subtitle => StreamKind::Other(MediaType::Subtitle),
        Type::Attachment => StreamKind::Other(MediaType::Attachment),
        Type::Unknown => StreamKind::Other(MediaType::Unknown),
    };

    let mut description = Stream::new(stream.index(), kind);
    description.id = stream.id();
    description.codec_id = CodecId(parameters.codec_id as u32);
    description.profile = parameters.profile;
    description.codec_tag = parameters.codec_tag;
    description.r_frame_rate = rational(stream.rate());
    description.avg_frame_rate = rational(stream.avg_frame_rate());
    description.time_base = rational(stream.time_base());
    description.start_time = stream.start_time();
    description.duration = stream.duration();
    description.bit_rate = parameters.bit_rate;
    description.nb_frames = stream.frames();
    description.extradata_size = parameters.extradata_size;
    // Raw bits: `Stream::disposition` drops flags its bitflags type lacks.
    // SAFETY: the stream is alive for the borrow.
    description.disposition = Disposition(unsafe { (*stream.as_ptr()).disposition } as u32);
    description.tags = read_tags(&stream.metadata());
    description
}

fn read_video(parameters: &AVCodecParameters, sample_aspect_ratio: Rational) -> VideoParameters {
    // SAFETY: colour names are null or static strings.
    let color = unsafe {
        ColorProperties {
            range: ColorValue {
                code: parameters.color_range as i32,
                name: string_from_ptr(ffmpeg_sys_next::av_color_range_name(parameters.color_range)),
            },
            space: ColorValue {
                code: parameters.color_space as i32,
                name: string_from_ptr(ffmpeg_sys_next::av_color_space_name(parameters.color_space)),
            },
            transfer: ColorValue {
                code: parameters.color_trc as i32,
                name: string_from_ptr(ffmpeg_sys_next::av_color_transfer_name(parameters.color_trc)),
            },
            primaries: ColorValue {
                code: parameters.color_primaries as i32,
                name: string_from_ptr(ffmpeg_sys_next::av_color_primaries_name(
                    parameters.color_primaries,
                )),
            },
            chroma_location: ColorValue {
                code: parameters.chroma_location as i32,
                name: string_from_ptr(ffmpeg_sys_next::av_chroma_location_name(
                    parameters.chroma_location,
                )),
            },
        }
    };

    VideoParameters {
        width: parameters.width,
        height: parameters.height,
        video_delay: parameters.video_delay,
        sample_aspect_ratio,
        pixel_format: pixel_format_name(parameters.format),
        level: parameters.level,
        color,
        field_order: field_order(parameters.field_order),
    }
}

fn read_audio(parameters: &AVCodecParameters) -> AudioParameters {
    AudioParameters {
        sample_format: sample_format_name(parameters.format),
        sample_rate: parameters.sample_rate,
        channel_layout: channel_layout(&parameters.ch_layout),
        initial_padding: parameters.initial_padding,
    }
}

fn read_tags(dictionary: &DictionaryRef<'_>) -> Tags {
    dictionary.iter().collect()
}

fn rational(value: ffmpeg_next::Rational) -> Rational {
    Rational::new(value.numerator(), value.denominator())
}

fn field_order(order: AVFieldOrder) -> FieldOrder {
    match order {
        AVFieldOrder::AV_FIELD_PROGRESSIVE => FieldOrder::Progressive,
        AVFieldOrder::AV_FIELD_TT => FieldOrder::TopFirst,
        AVFieldOrder::AV_FIELD_BB => FieldOrder::BottomFirst,
        AVFieldOrder::AV_FIELD_TB => FieldOrder::TopCodedBottomDisplayed,
        AVFieldOrder::AV_FIELD_BT => FieldOrder::BottomCodedTopDisplayed,
        _ => FieldOrder::Unknown,
    }
}

/// Name of a raw pixel format code, found by walking the descriptor table.
fn pixel_format_name(format: c_int) -> Option<String> {
    if format < 0 {
        return None;
    }
    // SAFETY: the pixel format descriptor table is static.
    unsafe {
        let mut descriptor = ffmpeg_sys_next::av_pix_fmt_desc_next(ptr::null());
        while !descriptor.is_null() {
            if ffmpeg_sys_next::av_pix_fmt_desc_get_id(descriptor) as c_int == format {
                return string_from_ptr((*descriptor).name);
            }
            descriptor = ffmpeg_sys_next::av_pix_fmt_desc_next(descriptor);
        }
    }
    None
}

fn sample_format_name(format: c_int) -> Option<String> {
    let sample_format = SAMPLE_FORMATS
        .into_iter()
        .find(|candidate| *candidate as c_int == format)?;
    // SAFETY: the returned name is null or a static string.
    unsafe { string_from_ptr(ffmpeg_sys_next::av_get_sample_fmt_name(sample_format)) }
}

fn channel_layout(layout: &AVChannelLayout) -> ChannelLayout {
    let order = match layout.order {
        AVChannelOrder::AV_CHANNEL_ORDER_NATIVE => ChannelOrder::Native,
        AVChannelOrder::AV_CHANNEL_ORDER_CUSTOM => ChannelOrder::Custom,
        AVChannelOrder::AV_CHANNEL_ORDER_AMBISONIC => ChannelOrder::Ambisonic,
        _ => ChannelOrder::Unspecified,
    };

    let mut buffer = [0 as c_char; 128];
    // SAFETY: the description is truncated to the buffer and NUL-terminated.
    let description = unsafe {
        let written =
            ffmpeg_sys_next::av_channel_layout_describe(layout, buffer.as_mut_ptr(), buffer.len());
        if written < 0 {
            None
        } else {
            string_from_ptr(buffer.as_ptr())
        }
    };

    ChannelLayout {
        order,
        channels: layout.nb_channels,
        description: description.unwrap_or_default(),
    }
}
