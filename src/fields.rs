//! Field policies.
//!
//! Every entity kind has an ordered table of [`Field`]s. A field pairs an
//! output key with a function that either produces the value or decides the
//! field is omitted. The formatters walk these tables in order; all the
//! emission rules of the document live here.

use crate::conversion::{display_aspect_ratio, fourcc_to_string};
use crate::json::Value;
use crate::metadata::{
    CONTAINER_TIME_BASE, Chapter, ColorKind, ChannelOrder, Container, PROFILE_UNKNOWN, Stream,
};
use crate::registry::Registry;

/// What field functions may consult besides the entity itself.
#[derive(Clone, Copy)]
pub struct FieldContext<'a> {
    /// Codec lookups.
    pub registry: &'a dyn Registry,
    /// Whether the container format carries meaningful stream ids.
    pub show_ids: bool,
}

/// One output field of an entity.
pub struct Field<E> {
    /// Output key.
    pub key: &'static str,
    /// The value, or `None` to omit the field.
    pub value: fn(&E, &FieldContext<'_>) -> Option<Value>,
}

impl<E> Field<E> {
    const fn new(key: &'static str, value: fn(&E, &FieldContext<'_>) -> Option<Value>) -> Self {
        Self { key, value }
    }
}

// ── Stream head ─────────────────────────────────────────────────────

/// Fields every stream starts with.
pub static STREAM_HEAD: [Field<Stream>; 7] = [
    Field::new("index", |stream, _| Some(Value::Integer(stream.index as i64))),
    Field::new("codec_name", |stream, context| {
        let descriptor = context.registry.codec_descriptor(stream.codec_id)?;
        Some(Value::String(descriptor.name))
    }),
    Field::new("codec_long_name", |stream, context| {
        let descriptor = context.registry.codec_descriptor(stream.codec_id)?;
        descriptor.long_name.map(Value::String)
    }),
    Field::new("profile", profile),
    Field::new("codec_type", |stream, _| {
        stream.media_type().as_str().map(Value::from)
    }),
    Field::new("codec_tag_string", |stream, _| {
        Some(Value::String(fourcc_to_string(stream.codec_tag)))
    }),
    Field::new("codec_tag", |stream, _| {
        Some(Value::String(format!("0x{:04x}", stream.codec_tag)))
    }),
];

fn profile(stream: &Stream, context: &FieldContext<'_>) -> Option<Value> {
    match context.registry.profile_name(stream.codec_id, stream.profile) {
        Some(name) => Some(Value::String(name)),
        None if stream.profile != PROFILE_UNKNOWN => Some(Value::String(stream.profile.to_string())),
        None => None,
    }
}

// ── Video ───────────────────────────────────────────────────────────

/// Fields of video streams, after the head.
pub static VIDEO: [Field<Stream>; 13] = [
    Field::new("width", |stream, _| stream.video().map(|video| video.width.into())),
    Field::new("height", |stream, _| stream.video().map(|video| video.height.into())),
    Field::new("has_b_frames", |stream, _| {
        stream.video().map(|video| video.video_delay.into())
    }),
    Field::new("sample_aspect_ratio", |stream, _| {
        let video = stream.video()?;
        let sar = video.sample_aspect_ratio;
        (sar.numerator != 0).then(|| Value::String(sar.to_ratio_string()))
    }),
    Field::new("display_aspect_ratio", |stream, _| {
        let video = stream.video()?;
        let sar = video.sample_aspect_ratio;
        (sar.numerator != 0).then(|| {
            Value::String(display_aspect_ratio(video.width, video.height, sar).to_ratio_string())
        })
    }),
    Field::new("pix_fmt", |stream, _| {
        stream.video()?.pixel_format.as_deref().map(Value::from)
    }),
    Field::new("level", |stream, _| stream.video().map(|video| video.level.into())),
    Field::new(ColorKind::Range.key(), |stream, _| color(stream, ColorKind::Range)),
    Field::new(ColorKind::Space.key(), |stream, _| color(stream, ColorKind::Space)),
    Field::new(ColorKind::Transfer.key(), |stream, _| color(stream, ColorKind::Transfer)),
    Field::new(ColorKind::Primaries.key(), |stream, _| color(stream, ColorKind::Primaries)),
    Field::new(ColorKind::ChromaLocation.key(), |stream, _| {
        color(stream, ColorKind::ChromaLocation)
    }),
    Field::new("field_order", |stream, _| {
        stream.video()?.field_order.as_str().map(Value::from)
    }),
];

/// A colour property is printed only when it is specified and has a name.
fn color(stream: &Stream, kind: ColorKind) -> Option<Value> {
    let value = stream.video()?.color.get(kind);
    if value.code == kind.unspecified() {
        return None;
    }
    value.name.as_deref().map(Value::from)
}

// ── Audio ───────────────────────────────────────────────────────────

/// Fields of audio streams, after the head.
pub static AUDIO: [Field<Stream>; 6] = [
    Field::new("sample_fmt", |stream, _| {
        stream.audio()?.sample_format.as_deref().map(Value::from)
    }),
    Field::new("sample_rate", |stream, _| {
        stream
            .audio()
            .map(|audio| Value::String(audio.sample_rate.to_string()))
    }),
    Field::new("channels", |stream, _| {
        stream
            .audio()
            .map(|audio| audio.channel_layout.channels.into())
    }),
    Field::new("channel_layout", |stream, _| {
        let layout = &stream.audio()?.channel_layout;
        (layout.order != ChannelOrder::Unspecified)
            .then(|| Value::String(layout.description.clone()))
    }),
    Field::new("bits_per_sample", |stream, context| {
        stream
            .audio()
            .map(|_| context.registry.bits_per_sample(stream.codec_id).into())
    }),
    Field::new("initial_padding", |stream, _| {
        stream.audio().map(|audio| audio.initial_padding.into())
    }),
];

// ── Stream tail ─────────────────────────────────────────────────────

/// Fields every stream ends with, before disposition and tags.
pub static STREAM_TAIL: [Field<Stream>; 11] = [
    Field::new("id", |stream, context| {
        context
            .show_ids
            .then(|| Value::String(format!("0x{:x}", stream.id)))
    }),
    Field::new("r_frame_rate", |stream, _| {
        Some(Value::String(stream.r_frame_rate.to_fraction_string()))
    }),
    Field::new("avg_frame_rate", |stream, _| {
        Some(Value::String(stream.avg_frame_rate.to_fraction_string()))
    }),
    Field::new("time_base", |stream, _| {
        Some(Value::String(stream.time_base.to_fraction_string()))
    }),
    Field::new("start_pts", |stream, _| Value::timestamp(stream.start_time)),
    Field::new("start_time", |stream, _| {
        Value::time(stream.start_time, stream.time_base)
    }),
    Field::new("duration_ts", |stream, _| Value::timestamp(stream.duration)),
    Field::new("duration", |stream, _| {
        Value::duration(stream.duration, stream.time_base)
    }),
    Field::new("bit_rate", |stream, _| {
        (stream.bit_rate > 0).then(|| Value::String(stream.bit_rate.to_string()))
    }),
    Field::new("nb_frames", |stream, _| {
        (stream.nb_frames != 0).then(|| Value::String(stream.nb_frames.to_string()))
    }),
    Field::new("extradata_size", |stream, _| {
        (stream.extradata_size > 0).then(|| stream.extradata_size.into())
    }),
];

// ── Chapters ────────────────────────────────────────────────────────

/// Fields of a chapter, before its tags.
pub static CHAPTER: [Field<Chapter>; 6] = [
    Field::new("id", |chapter, _| Some(Value::Integer(chapter.id))),
    Field::new("time_base", |chapter, _| {
        Some(Value::String(chapter.time_base.to_fraction_string()))
    }),
    Field::new("start", |chapter, _| Some(Value::Integer(chapter.start))),
    Field::new("start_time", |chapter, _| {
        Value::time(chapter.start, chapter.time_base)
    }),
    Field::new("end", |chapter, _| Some(Value::Integer(chapter.end))),
    Field::new("end_time", |chapter, _| Value::time(chapter.end, chapter.time_base)),
];

// ── Format ──────────────────────────────────────────────────────────

/// Fields of the format block, before its tags.
pub static FORMAT: [Field<Container>; 10] = [
    Field::new("filename", |container, _| Some(Value::from(container.url.as_str()))),
    Field::new("nb_streams", |container, _| {
        Some(Value::Integer(container.streams.len() as i64))
    }),
    Field::new("nb_programs", |container, _| {
        Some(Value::Integer(container.nb_programs.into()))
    }),
    Field::new("format_name", |container, _| {
        Some(Value::from(container.format_name.as_str()))
    }),
    Field::new("format_long_name", |container, _| {
        container.format_long_name.as_deref().map(Value::from)
    }),
    Field::new("start_time", |container, _| {
        Value::time(container.start_time, CONTAINER_TIME_BASE)
    }),
    Field::new("duration", |container, _| {
        Value::time(container.duration, CONTAINER_TIME_BASE)
    }),
    Field::new("size", |container, _| {
        container.size.map(|size| Value::String(size.to_string()))
    }),
    Field::new("bit_rate", |container, _| {
        (container.bit_rate > 0).then(|| Value::String(container.bit_rate.to_string()))
    }),
    Field::new("probe_score", |container, _| {
        Some(Value::Integer(container.probe_score.into()))
    }),
];
