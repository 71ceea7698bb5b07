//! Entity formatters.
//!
//! Each formatter writes one entity into an object writer by walking its
//! [field tables](crate::fields) and appending the structural members
//! (disposition, tags). Formatters never fail on content; the only errors
//! they return come from the sink.

use std::io::{Result as IoResult, Write};

use crate::fields::{AUDIO, CHAPTER, FORMAT, Field, FieldContext, STREAM_HEAD, STREAM_TAIL, VIDEO};
use crate::json::{ArrayWriter, ObjectWriter};
use crate::metadata::{Chapter, Container, Disposition, Stream, StreamKind, Tags};
use crate::registry::Registry;

fn write_fields<E, W: Write + ?Sized>(
    object: &mut ObjectWriter<'_, W>,
    fields: &[Field<E>],
    entity: &E,
    context: &FieldContext<'_>,
) -> IoResult<()> {
    for field in fields {
        object.optional(field.key, (field.value)(entity, context).as_ref())?;
    }
    Ok(())
}

/// Write a `disposition` object with every flag as `0` or `1`.
pub fn write_disposition<W: Write + ?Sized>(
    object: &mut ObjectWriter<'_, W>,
    disposition: Disposition,
) -> IoResult<()> {
    let mut flags = object.object("disposition")?;
    for (key, flag) in Disposition::FLAGS {
        flags.integer(key, i64::from(disposition.contains(flag)))?;
    }
    flags.finish()
}

/// Write a `tags` object, or nothing when `tags` is empty.
pub fn write_tags<W: Write + ?Sized>(object: &mut ObjectWriter<'_, W>, tags: &Tags) -> IoResult<()> {
    if tags.is_empty() {
        return Ok(());
    }
    let mut entries = object.object("tags")?;
    for (key, value) in tags.iter() {
        entries.string(key, value)?;
    }
    entries.finish()
}

/// Write one stream as the next element of `streams`.
///
/// Video and audio streams get their type-specific block between the head
/// and the shared tail; every other media type gets head and tail only.
pub fn write_stream<W: Write + ?Sized>(
    streams: &mut ArrayWriter<'_, W>,
    stream: &Stream,
    context: &FieldContext<'_>,
) -> IoResult<()> {
    let mut object = streams.object()?;
    write_fields(&mut object, &STREAM_HEAD, stream, context)?;
    match &stream.kind {
        StreamKind::Video(_) => write_fields(&mut object, &VIDEO, stream, context)?,
        StreamKind::Audio(_) => write_fields(&mut object, &AUDIO, stream, context)?,
        StreamKind::Other(media_type) => {
            log::trace!(
                "Stream {} ({media_type:?}) has no type-specific fields",
                stream.index
            );
        }
    }
    write_fields(&mut object, &STREAM_TAIL, stream, context)?;
    write_disposition(&mut object, stream.disposition)?;
    write_tags(&mut object, &stream.tags)?;
    object.finish()
}

/// Write one chapter as the next element of `chapters`.
pub fn write_chapter<W: Write + ?Sized>(
    chapters: &mut ArrayWriter<'_, W>,
    chapter: &Chapter,
    context: &FieldContext<'_>,
) -> IoResult<()> {
    let mut object = chapters.object()?;
    write_fields(&mut object, &CHAPTER, chapter, context)?;
    write_tags(&mut object, &chapter.tags)?;
    object.finish()
}

/// Write the `format` block of `container`.
pub fn write_format<W: Write + ?Sized>(
    root: &mut ObjectWriter<'_, W>,
    container: &Container,
    context: &FieldContext<'_>,
) -> IoResult<()> {
    let mut object = root.object("format")?;
    write_fields(&mut object, &FORMAT, container, context)?;
    write_tags(&mut object, &container.tags)?;
    object.finish()
}

/// Write the `error` block.
pub fn write_error<W: Write + ?Sized>(
    root: &mut ObjectWriter<'_, W>,
    code: i32,
    message: &str,
) -> IoResult<()> {
    let mut object = root.object("error")?;
    object.integer("code", code.into())?;
    object.string("string", message)?;
    object.finish()
}

/// Build the field context for `container`.
pub fn field_context<'a>(container: &Container, registry: &'a dyn Registry) -> FieldContext<'a> {
    FieldContext {
        registry,
        show_ids: container.show_ids,
    }
}
