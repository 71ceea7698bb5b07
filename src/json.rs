//! JSON text primitives.
//!
//! Objects in the document have field sets decided at emission time, so the
//! writers here track the "first field" state explicitly instead of relying
//! on a serializer; only keys and string values go through `serde_json`,
//! for escaping. The layout is ffprobe's: four spaces per level,
//! `"key": value`, one field per line, `,` at the end of every line but the
//! last.
//!
//! Writers borrow the sink mutably and nest by reborrowing, so the state of
//! one document never leaks into another.
//!
//! ```
//! use probe_json::json::ObjectWriter;
//!
//! let mut out = Vec::new();
//! let mut root = ObjectWriter::document(&mut out)?;
//! root.integer("answer", 42)?;
//! root.string("name", "tab\there")?;
//! root.finish()?;
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "{\n    \"answer\": 42,\n    \"name\": \"tab\\there\"\n}"
//! );
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{Error as IoError, Result as IoResult, Write};

use crate::conversion::{format_seconds, ticks_to_seconds};
use crate::metadata::{NOPTS_VALUE, Rational};

/// Indentation added per nesting level.
pub const INDENT_STEP: usize = 4;

/// A scalar field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A quoted, escaped string.
    String(String),
    /// A bare integer.
    Integer(i64),
}

impl Value {
    /// A raw timestamp; `None` for [`NOPTS_VALUE`].
    pub fn timestamp(ticks: i64) -> Option<Value> {
        (ticks != NOPTS_VALUE).then_some(Value::Integer(ticks))
    }

    /// Seconds computed from ticks; `None` for [`NOPTS_VALUE`].
    pub fn time(ticks: i64, time_base: Rational) -> Option<Value> {
        (ticks != NOPTS_VALUE)
            .then(|| Value::String(format_seconds(ticks_to_seconds(ticks, time_base))))
    }

    /// Seconds computed from a duration; `None` for `0` and [`NOPTS_VALUE`].
    pub fn duration(ticks: i64, time_base: Rational) -> Option<Value> {
        if ticks == 0 {
            return None;
        }
        Value::time(ticks, time_base)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

/// Write `text` as a quoted JSON string.
fn write_string<W: Write + ?Sized>(out: &mut W, text: &str) -> IoResult<()> {
    serde_json::to_writer(&mut *out, text).map_err(IoError::from)
}

fn write_indent<W: Write + ?Sized>(out: &mut W, indent: usize) -> IoResult<()> {
    write!(out, "{:indent$}", "")
}

/// Writer for the fields of one JSON object.
///
/// `indent` is the indentation of the fields; the closing brace goes one
/// level to the left.
pub struct ObjectWriter<'w, W: Write + ?Sized> {
    out: &'w mut W,
    indent: usize,
    first: bool,
}

impl<'w, W: Write + ?Sized> ObjectWriter<'w, W> {
    /// Start a top-level object.
    pub fn document(out: &'w mut W) -> IoResult<Self> {
        out.write_all(b"{\n")?;
        Ok(Self::new(out, INDENT_STEP))
    }

    /// Continue an object whose opening brace is already written.
    pub fn new(out: &'w mut W, indent: usize) -> Self {
        Self {
            out,
            indent,
            first: true,
        }
    }

    fn begin_field(&mut self, key: &str) -> IoResult<()> {
        if !self.first {
            self.out.write_all(b",\n")?;
        }
        self.first = false;
        write_indent(self.out, self.indent)?;
        write_string(self.out, key)?;
        self.out.write_all(b": ")
    }

    /// Write a field with a value.
    pub fn field(&mut self, key: &str, value: &Value) -> IoResult<()> {
        match value {
            Value::String(text) => self.string(key, text),
            Value::Integer(number) => self.integer(key, *number),
        }
    }

    /// Write a string field.
    pub fn string(&mut self, key: &str, value: &str) -> IoResult<()> {
        self.begin_field(key)?;
        write_string(self.out, value)
    }

    /// Write an integer field.
    pub fn integer(&mut self, key: &str, value: i64) -> IoResult<()> {
        self.begin_field(key)?;
        write!(self.out, "{value}")
    }

    /// Write a field when `value` is `Some`.
    pub fn optional(&mut self, key: &str, value: Option<&Value>) -> IoResult<()> {
        match value {
            Some(value) => self.field(key, value),
            None => Ok(()),
        }
    }

    /// Write a raw timestamp unless it is [`NOPTS_VALUE`].
    pub fn optional_timestamp(&mut self, key: &str, ticks: i64) -> IoResult<()> {
        self.optional(key, Value::timestamp(ticks).as_ref())
    }

    /// Write a computed time unless the ticks are [`NOPTS_VALUE`].
    pub fn optional_time(&mut self, key: &str, ticks: i64, time_base: Rational) -> IoResult<()> {
        self.optional(key, Value::time(ticks, time_base).as_ref())
    }

    /// Write a computed duration unless the ticks are `0` or [`NOPTS_VALUE`].
    pub fn optional_duration(
        &mut self,
        key: &str,
        ticks: i64,
        time_base: Rational,
    ) -> IoResult<()> {
        self.optional(key, Value::duration(ticks, time_base).as_ref())
    }

    /// Start a nested object field.
    pub fn object(&mut self, key: &str) -> IoResult<ObjectWriter<'_, W>> {
        self.begin_field(key)?;
        self.out.write_all(b"{\n")?;
        Ok(ObjectWriter::new(&mut *self.out, self.indent + INDENT_STEP))
    }

    /// Start a nested array field.
    pub fn array(&mut self, key: &str) -> IoResult<ArrayWriter<'_, W>> {
        self.begin_field(key)?;
        self.out.write_all(b"[\n")?;
        Ok(ArrayWriter {
            out: &mut *self.out,
            indent: self.indent + INDENT_STEP,
            first: true,
        })
    }

    /// Close the object.
    pub fn finish(self) -> IoResult<()> {
        self.out.write_all(b"\n")?;
        write_indent(self.out, self.indent.saturating_sub(INDENT_STEP))?;
        self.out.write_all(b"}")
    }
}

/// Writer for the elements of one JSON array of objects.
pub struct ArrayWriter<'w, W: Write + ?Sized> {
    out: &'w mut W,
    indent: usize,
    first: bool,
}

impl<W: Write + ?Sized> ArrayWriter<'_, W> {
    /// Start the next element.
    pub fn object(&mut self) -> IoResult<ObjectWriter<'_, W>> {
        if !self.first {
            self.out.write_all(b",\n")?;
        }
        self.first = false;
        write_indent(self.out, self.indent)?;
        self.out.write_all(b"{\n")?;
        Ok(ObjectWriter::new(&mut *self.out, self.indent + INDENT_STEP))
    }

    /// Close the array.
    pub fn finish(self) -> IoResult<()> {
        self.out.write_all(b"\n")?;
        write_indent(self.out, self.indent.saturating_sub(INDENT_STEP))?;
        self.out.write_all(b"]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(build: impl FnOnce(&mut ObjectWriter<'_, Vec<u8>>) -> IoResult<()>) -> String {
        let mut out = Vec::new();
        let mut root = ObjectWriter::document(&mut out).unwrap();
        build(&mut root).unwrap();
        root.finish().unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn escapes_quotes_backslashes_and_controls() {
        let text = render(|root| {
            root.string("quote", "say \"hi\"")?;
            root.string("path", "C:\\media")?;
            root.string("whitespace", "a\nb\rc\td")?;
            root.string("short", "\u{8}\u{c}")?;
            root.string("control", "\u{1}\u{1f}\u{0}")?;
            root.string("unicode", "caf\u{e9} \u{1f3b5} \u{2028}")?;
            root.string("delete\u{7f}", "/")?;
            root.string("empty", "")
        });
        let expected = concat!(
            "{\n",
            "    \"quote\": \"say \\\"hi\\\"\",\n",
            "    \"path\": \"C:\\\\media\",\n",
            "    \"whitespace\": \"a\\nb\\rc\\td\",\n",
            "    \"short\": \"\\b\\f\",\n",
            "    \"control\": \"\\u0001\\u001f\\u0000\",\n",
            "    \"unicode\": \"caf\u{e9} \u{1f3b5} \u{2028}\",\n",
            "    \"delete\u{7f}\": \"/\",\n",
            "    \"empty\": \"\"\n",
            "}"
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn keys_are_escaped_like_values() {
        let text = render(|root| root.string("tab\tkey", "v"));
        assert_eq!(text, "{\n    \"tab\\tkey\": \"v\"\n}");
    }

    #[test]
    fn separates_fields_with_commas() {
        let text = render(|root| {
            root.integer("a", 1)?;
            root.string("b", "two")?;
            root.integer("c", -3)
        });
        assert_eq!(text, "{\n    \"a\": 1,\n    \"b\": \"two\",\n    \"c\": -3\n}");
    }

    #[test]
    fn optional_timestamp_skips_nopts_only() {
        let text = render(|root| {
            root.optional_timestamp("missing", NOPTS_VALUE)?;
            root.optional_timestamp("zero", 0)?;
            root.optional_timestamp("negative", -1024)
        });
        assert_eq!(text, "{\n    \"zero\": 0,\n    \"negative\": -1024\n}");
    }

    #[test]
    fn optional_time_renders_six_decimals() {
        let time_base = Rational::new(1, 1000);
        let text = render(|root| {
            root.optional_time("missing", NOPTS_VALUE, time_base)?;
            root.optional_time("zero", 0, time_base)?;
            root.optional_time("later", 1500, time_base)
        });
        assert_eq!(
            text,
            "{\n    \"zero\": \"0.000000\",\n    \"later\": \"1.500000\"\n}"
        );
    }

    #[test]
    fn optional_duration_skips_zero_and_nopts() {
        let time_base = Rational::new(1, 90000);
        let text = render(|root| {
            root.optional_duration("zero", 0, time_base)?;
            root.optional_duration("missing", NOPTS_VALUE, time_base)?;
            root.optional_duration("negative", -90000, time_base)
        });
        assert_eq!(text, "{\n    \"negative\": \"-1.000000\"\n}");
    }

    #[test]
    fn nests_objects_and_arrays() {
        let text = render(|root| {
            {
                let mut items = root.array("items")?;
                let mut item = items.object()?;
                item.integer("id", 1)?;
                item.finish()?;
                let mut item = items.object()?;
                item.integer("id", 2)?;
                item.finish()?;
                items.finish()?;
            }
            let mut nested = root.object("nested")?;
            nested.string("key", "value")?;
            nested.finish()
        });
        let expected = "{\n    \"items\": [\n        {\n            \"id\": 1\n        },\n        {\n            \"id\": 2\n        }\n    ],\n    \"nested\": {\n        \"key\": \"value\"\n    }\n}";
        assert_eq!(text, expected);
    }

    #[test]
    fn empty_array_keeps_blank_line() {
        let text = render(|root| root.array("chapters")?.finish());
        assert_eq!(text, "{\n    \"chapters\": [\n\n    ]\n}");
    }
}
